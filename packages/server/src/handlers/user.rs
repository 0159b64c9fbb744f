use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::user::*;
use crate::models::vote::VoteResponse;
use crate::services::{Roster, VoteLedger};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Users",
    operation_id = "createUser",
    summary = "Create a judge or admin account",
    description = "Creates a user with a fixed role. Requires `user:manage` permission. The email is stored lower-cased; a case-insensitive duplicate returns 409 EMAIL_TAKEN.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Email already registered (EMAIL_TAKEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(role = %payload.role))]
pub async fn create_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("user:manage")?;
    validate_create_user(&payload)?;

    let model = Roster::new(&state.db).create(payload).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List users",
    description = "Lists users ordered by name, optionally filtered by role. Requires `user:manage` permission.",
    params(UserListQuery),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 400, description = "Unknown role (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    auth_user.require_permission("user:manage")?;
    if let Some(ref role) = query.role {
        validate_role(role)?;
    }

    let users = Roster::new(&state.db)
        .list(query.role.as_deref())
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    operation_id = "deleteUser",
    summary = "Delete a user",
    description = "Deletes a user and every vote they cast, in one transaction, so live results always match the current judge roster. Requires `user:manage` permission. Administrators cannot delete their own account.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Attempt to delete own account (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("user:manage")?;
    if id == auth_user.user_id {
        return Err(AppError::Validation(
            "You cannot delete your own account".into(),
        ));
    }

    Roster::new(&state.db).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/votes",
    tag = "Votes",
    operation_id = "listVotesByJudge",
    summary = "List a judge's votes",
    description = "Returns every vote cast by the user, newest first. Judges may only read their own votes; `vote:view_all` reads anyone's.",
    params(("id" = i32, Path, description = "User ID of the judge")),
    responses(
        (status = 200, description = "Votes cast by the judge", body = Vec<VoteResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_votes_by_judge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<VoteResponse>>, AppError> {
    if id != auth_user.user_id {
        auth_user.require_permission("vote:view_all")?;
        Roster::new(&state.db).find(id).await?;
    }

    let votes = VoteLedger::new(&state.db)
        .by_judge(id)
        .await?
        .into_iter()
        .map(VoteResponse::from)
        .collect();

    Ok(Json(votes))
}
