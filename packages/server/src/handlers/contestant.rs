use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::entity::contestant;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::contestant::*;
use crate::services::{ContestantService, RoundService};
use crate::state::AppState;

fn to_responses(models: Vec<contestant::Model>) -> Vec<ContestantResponse> {
    models.into_iter().map(ContestantResponse::from).collect()
}

/// Find a contestant the caller is allowed to see. Hidden contestants are
/// reported as missing to judges so their existence is not leaked.
pub(crate) async fn find_visible_to(
    state: &AppState,
    auth_user: &AuthUser,
    id: i32,
) -> Result<contestant::Model, AppError> {
    let model = ContestantService::new(&state.db).find(id).await?;
    if !model.is_visible_to_judges && !auth_user.sees_hidden_contestants() {
        return Err(AppError::NotFound("Contestant not found".into()));
    }
    Ok(model)
}

#[utoipa::path(
    post,
    path = "/{id}/contestants",
    tag = "Contestants",
    operation_id = "createContestant",
    summary = "Add a contestant to a round",
    description = "Creates a contestant in the round. Hidden from judges unless `is_visible_to_judges` is set. `order` defaults to one past the round's last position. Requires `contestant:manage` permission.",
    params(("id" = i32, Path, description = "Round ID")),
    request_body = CreateContestantRequest,
    responses(
        (status = 201, description = "Contestant created", body = ContestantResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Round not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_contestant(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(round_id): Path<i32>,
    AppJson(payload): AppJson<CreateContestantRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("contestant:manage")?;
    validate_create_contestant(&payload)?;

    let model = ContestantService::new(&state.db)
        .create(round_id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ContestantResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}/contestants",
    tag = "Contestants",
    operation_id = "listContestantsByRound",
    summary = "List a round's contestants",
    description = "Returns the round's contestants ordered by position. Callers without `contestant:manage` only receive visible contestants.",
    params(("id" = i32, Path, description = "Round ID")),
    responses(
        (status = 200, description = "Contestants of the round", body = Vec<ContestantResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Round not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_contestants_by_round(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(round_id): Path<i32>,
) -> Result<Json<Vec<ContestantResponse>>, AppError> {
    RoundService::new(&state.db).find(round_id).await?;

    let visible_only = !auth_user.sees_hidden_contestants();
    let models = ContestantService::new(&state.db)
        .list_by_round(round_id, visible_only)
        .await?;

    Ok(Json(to_responses(models)))
}

#[utoipa::path(
    get,
    path = "/{id}/contestants/visible",
    tag = "Contestants",
    operation_id = "listVisibleContestantsForRound",
    summary = "List a round's visible contestants",
    description = "Returns the contestants of the round that are visible to judges, ordered by position. Independent of whether the round is active.",
    params(("id" = i32, Path, description = "Round ID")),
    responses(
        (status = 200, description = "Visible contestants of the round", body = Vec<ContestantResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Round not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_visible_contestants_for_round(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(round_id): Path<i32>,
) -> Result<Json<Vec<ContestantResponse>>, AppError> {
    RoundService::new(&state.db).find(round_id).await?;

    let models = ContestantService::new(&state.db)
        .list_visible_for_round(round_id)
        .await?;

    Ok(Json(to_responses(models)))
}

#[utoipa::path(
    put,
    path = "/{id}/contestants/reorder",
    tag = "Contestants",
    operation_id = "reorderContestants",
    summary = "Reorder a round's contestants",
    description = "Assigns positions 1..n following the given id list, which must contain exactly the round's contestants. Requires `contestant:manage` permission.",
    params(("id" = i32, Path, description = "Round ID")),
    request_body = ReorderContestantsRequest,
    responses(
        (status = 200, description = "Contestants in their new order", body = Vec<ContestantResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Round not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_contestants(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(round_id): Path<i32>,
    AppJson(payload): AppJson<ReorderContestantsRequest>,
) -> Result<Json<Vec<ContestantResponse>>, AppError> {
    auth_user.require_permission("contestant:manage")?;
    validate_reorder_contestants(&payload)?;

    let models = ContestantService::new(&state.db)
        .reorder(round_id, &payload.contestant_ids)
        .await?;

    Ok(Json(to_responses(models)))
}

#[utoipa::path(
    get,
    path = "/visible",
    tag = "Contestants",
    operation_id = "listAllVisibleContestants",
    summary = "List visible contestants across all rounds",
    description = "Returns every contestant visible to judges regardless of round or round activity. The live voting screen additionally checks the active round.",
    responses(
        (status = 200, description = "Visible contestants", body = Vec<ContestantResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_all_visible_contestants(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ContestantResponse>>, AppError> {
    let models = ContestantService::new(&state.db).list_all_visible().await?;
    Ok(Json(to_responses(models)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Contestants",
    operation_id = "getContestant",
    summary = "Get a contestant by ID",
    description = "Hidden contestants are reported as NOT_FOUND to callers without `contestant:manage`.",
    params(("id" = i32, Path, description = "Contestant ID")),
    responses(
        (status = 200, description = "Contestant details", body = ContestantResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Contestant not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_contestant(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestantResponse>, AppError> {
    let model = find_visible_to(&state, &auth_user, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Contestants",
    operation_id = "updateContestant",
    summary = "Update a contestant",
    description = "Partially updates a contestant, including moving it to another round. Visibility is changed through its own endpoint. Requires `contestant:manage` permission.",
    params(("id" = i32, Path, description = "Contestant ID")),
    request_body = UpdateContestantRequest,
    responses(
        (status = 200, description = "Contestant updated", body = ContestantResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contestant or target round not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_contestant(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateContestantRequest>,
) -> Result<Json<ContestantResponse>, AppError> {
    auth_user.require_permission("contestant:manage")?;
    validate_update_contestant(&payload)?;

    let model = ContestantService::new(&state.db).update(id, payload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Contestants",
    operation_id = "deleteContestant",
    summary = "Delete a contestant",
    description = "Deletes the contestant's votes and then the contestant, in one transaction. Requires `contestant:manage` permission.",
    params(("id" = i32, Path, description = "Contestant ID")),
    responses(
        (status = 204, description = "Contestant deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contestant not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_contestant(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("contestant:manage")?;
    ContestantService::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/{id}/visibility",
    tag = "Contestants",
    operation_id = "setContestantVisibility",
    summary = "Reveal or hide a contestant",
    description = "Sets whether judges can see and vote on the contestant. Independent of round activity. Requires `contestant:manage` permission.",
    params(("id" = i32, Path, description = "Contestant ID")),
    request_body = SetVisibilityRequest,
    responses(
        (status = 200, description = "Visibility updated", body = ContestantResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contestant not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn set_visibility(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<SetVisibilityRequest>,
) -> Result<Json<ContestantResponse>, AppError> {
    auth_user.require_permission("contestant:manage")?;

    let model = ContestantService::new(&state.db)
        .set_visibility(id, payload.is_visible_to_judges)
        .await?;

    Ok(Json(model.into()))
}
