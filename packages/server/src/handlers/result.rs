use axum::Json;
use axum::extract::{Path, Query, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::result::*;
use crate::services::{ContestantService, ResultsAggregator};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{id}/results",
    tag = "Results",
    operation_id = "getContestantResults",
    summary = "Live results for a contestant",
    description = "Counts approvals and rejections. `approval_percentage` is approvals over the number of judges on the roster, rounded to the nearest integer. Requires `result:view` permission.",
    params(("id" = i32, Path, description = "Contestant ID")),
    responses(
        (status = 200, description = "Contestant results", body = ContestantResultsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contestant not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_contestant_results(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestantResultsResponse>, AppError> {
    auth_user.require_permission("result:view")?;

    let contestant = ContestantService::new(&state.db).find(id).await?;
    let aggregator = ResultsAggregator::new(&state.db);
    let total_judges = aggregator.total_judges().await?;
    let results = aggregator.contestant_results(id, total_judges).await?;

    Ok(Json(ContestantResultsResponse {
        contestant: contestant.into(),
        total_judges,
        results,
    }))
}

#[utoipa::path(
    get,
    path = "/{id}/results",
    tag = "Results",
    operation_id = "getRoundResults",
    summary = "Live results for every contestant of a round",
    description = "Contestants are listed in round order. Hidden contestants are included unless `include_hidden=false`. Requires `result:view` permission.",
    params(
        ("id" = i32, Path, description = "Round ID"),
        RoundResultsQuery,
    ),
    responses(
        (status = 200, description = "Round results", body = RoundSummaryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Round not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn get_round_results(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<RoundResultsQuery>,
) -> Result<Json<RoundSummaryResponse>, AppError> {
    auth_user.require_permission("result:view")?;

    let include_hidden = query.include_hidden.unwrap_or(true);
    let summary = ResultsAggregator::new(&state.db)
        .round_summary(id, include_hidden)
        .await?;

    Ok(Json(RoundSummaryResponse {
        round: summary.round.into(),
        total_judges: summary.total_judges,
        contestants: summary
            .contestants
            .into_iter()
            .map(|(contestant, results)| ContestantSummary {
                contestant: contestant.into(),
                results,
            })
            .collect(),
    }))
}
