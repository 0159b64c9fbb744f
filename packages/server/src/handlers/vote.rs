use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use super::contestant::find_visible_to;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::vote::*;
use crate::services::{ContestantService, RoundService, VoteLedger};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Votes",
    operation_id = "castVote",
    summary = "Cast or change a vote",
    description = "Records the caller's approve/reject vote for a contestant. Voting again replaces the previous value and keeps the original timestamp. The contestant must be visible to judges and belong to the active round. Requires `vote:cast` permission.",
    request_body = CastVoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = VoteResponse),
        (status = 400, description = "Round is not active (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contestant not found or hidden (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, contestant_id = payload.contestant_id))]
pub async fn cast_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CastVoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    auth_user.require_permission("vote:cast")?;

    let contestant = ContestantService::new(&state.db)
        .find(payload.contestant_id)
        .await?;
    if !contestant.is_visible_to_judges {
        return Err(AppError::NotFound("Contestant not found".into()));
    }

    let active = RoundService::new(&state.db).active().await?;
    if active.map(|r| r.id) != Some(contestant.round_id) {
        return Err(AppError::Validation("Round is not active".into()));
    }

    let model = VoteLedger::new(&state.db)
        .cast(auth_user.user_id, contestant.id, payload.value)
        .await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/{id}/votes/me",
    tag = "Votes",
    operation_id = "getMyVote",
    summary = "Get the caller's vote for a contestant",
    description = "Requires `vote:cast` permission.",
    params(("id" = i32, Path, description = "Contestant ID")),
    responses(
        (status = 200, description = "The caller's current vote", body = VoteResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contestant or vote not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_my_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VoteResponse>, AppError> {
    auth_user.require_permission("vote:cast")?;
    let contestant = find_visible_to(&state, &auth_user, id).await?;

    let model = VoteLedger::new(&state.db)
        .get(auth_user.user_id, contestant.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vote not found".into()))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/{id}/votes",
    tag = "Votes",
    operation_id = "listVotesByContestant",
    summary = "List all votes for a contestant",
    description = "Requires `vote:view_all` permission.",
    params(("id" = i32, Path, description = "Contestant ID")),
    responses(
        (status = 200, description = "Votes for the contestant", body = Vec<VoteResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contestant not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_votes_by_contestant(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<VoteResponse>>, AppError> {
    auth_user.require_permission("vote:view_all")?;
    ContestantService::new(&state.db).find(id).await?;

    let votes = VoteLedger::new(&state.db).by_contestant(id).await?;
    Ok(Json(votes.into_iter().map(VoteResponse::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/{id}/votes",
    tag = "Votes",
    operation_id = "deleteVotesForContestant",
    summary = "Reset a contestant's votes",
    description = "Deletes every vote recorded for the contestant. Requires `vote:delete` permission.",
    params(("id" = i32, Path, description = "Contestant ID")),
    responses(
        (status = 200, description = "Votes deleted", body = DeleteVotesResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contestant not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_votes_for_contestant(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteVotesResponse>, AppError> {
    auth_user.require_permission("vote:delete")?;
    ContestantService::new(&state.db).find(id).await?;

    let deleted = VoteLedger::new(&state.db).delete_for_contestant(id).await?;
    Ok(Json(DeleteVotesResponse {
        contestant_id: id,
        deleted,
    }))
}
