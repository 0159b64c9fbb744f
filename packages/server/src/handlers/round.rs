use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::round::*;
use crate::services::RoundService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Rounds",
    operation_id = "listRounds",
    summary = "List rounds",
    description = "Returns all rounds ordered by round number, highest first.",
    responses(
        (status = 200, description = "List of rounds", body = Vec<RoundResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_rounds(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<RoundResponse>>, AppError> {
    let rounds = RoundService::new(&state.db)
        .list()
        .await?
        .into_iter()
        .map(RoundResponse::from)
        .collect();
    Ok(Json(rounds))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Rounds",
    operation_id = "createRound",
    summary = "Create a round",
    description = "Creates an inactive round. Requires `round:manage` permission. `round_number` must be at least 1; duplicate numbers are accepted.",
    request_body = CreateRoundRequest,
    responses(
        (status = 201, description = "Round created", body = RoundResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(round_number = payload.round_number))]
pub async fn create_round(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRoundRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("round:manage")?;
    validate_create_round(&payload)?;

    let model = RoundService::new(&state.db)
        .create(&payload.name, payload.description, payload.round_number)
        .await?;

    Ok((StatusCode::CREATED, Json(RoundResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/active",
    tag = "Rounds",
    operation_id = "getActiveRound",
    summary = "Get the active round",
    description = "Returns the single active round, or `null` when no round is active.",
    responses(
        (status = 200, description = "Active round or null", body = Option<RoundResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_active_round(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Option<RoundResponse>>, AppError> {
    let active = RoundService::new(&state.db).active().await?;
    Ok(Json(active.map(RoundResponse::from)))
}

#[utoipa::path(
    put,
    path = "/deactivate",
    tag = "Rounds",
    operation_id = "deactivateAllRounds",
    summary = "Stop voting",
    description = "Clears the active flag on every round without activating a replacement. Requires `round:manage` permission.",
    responses(
        (status = 204, description = "All rounds inactive"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn deactivate_all_rounds(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("round:manage")?;
    RoundService::new(&state.db).deactivate_all().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Rounds",
    operation_id = "getRound",
    summary = "Get a round by ID",
    params(("id" = i32, Path, description = "Round ID")),
    responses(
        (status = 200, description = "Round details", body = RoundResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Round not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_round(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RoundResponse>, AppError> {
    let model = RoundService::new(&state.db).find(id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Rounds",
    operation_id = "updateRound",
    summary = "Update a round",
    description = "Partially updates name, description or round number. Activation is only changed through the activate/deactivate endpoints. Requires `round:manage` permission.",
    params(("id" = i32, Path, description = "Round ID")),
    request_body = UpdateRoundRequest,
    responses(
        (status = 200, description = "Round updated", body = RoundResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Round not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_round(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateRoundRequest>,
) -> Result<Json<RoundResponse>, AppError> {
    auth_user.require_permission("round:manage")?;
    validate_update_round(&payload)?;

    let model = RoundService::new(&state.db).update(id, payload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}/activate",
    tag = "Rounds",
    operation_id = "activateRound",
    summary = "Activate a round",
    description = "Makes this round the only active one, deactivating every other round in the same transaction. Concurrent activations resolve last-writer-wins. Requires `round:manage` permission.",
    params(("id" = i32, Path, description = "Round ID")),
    responses(
        (status = 200, description = "Round activated", body = RoundResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Round not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn activate_round(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RoundResponse>, AppError> {
    auth_user.require_permission("round:manage")?;
    let model = RoundService::new(&state.db).activate(id).await?;
    Ok(Json(model.into()))
}
