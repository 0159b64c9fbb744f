use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{auth, contestant, result, round, user, vote};
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/rounds", round_routes())
        .nest("/contestants", contestant_routes())
        .nest("/votes", vote_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::login))
        .routes(routes!(auth::me))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(user::list_users, user::create_user))
        .routes(routes!(user::delete_user))
        .routes(routes!(user::list_votes_by_judge))
}

fn round_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(round::list_rounds, round::create_round))
        .routes(routes!(round::get_active_round))
        .routes(routes!(round::deactivate_all_rounds))
        .routes(routes!(round::get_round, round::update_round))
        .routes(routes!(round::activate_round))
        .routes(routes!(
            contestant::list_contestants_by_round,
            contestant::create_contestant
        ))
        .routes(routes!(contestant::list_visible_contestants_for_round))
        .routes(routes!(contestant::reorder_contestants))
        .routes(routes!(result::get_round_results))
}

fn contestant_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(contestant::list_all_visible_contestants))
        .routes(routes!(
            contestant::get_contestant,
            contestant::update_contestant,
            contestant::delete_contestant
        ))
        .routes(routes!(contestant::set_visibility))
        .routes(routes!(
            vote::list_votes_by_contestant,
            vote::delete_votes_for_contestant
        ))
        .routes(routes!(vote::get_my_vote))
        .routes(routes!(result::get_contestant_results))
}

fn vote_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(vote::cast_vote))
}
