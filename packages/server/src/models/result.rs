use serde::{Deserialize, Serialize};

use super::contestant::ContestantResponse;
use super::round::RoundResponse;

/// Live tally for one contestant.
///
/// `approval_percentage` is relative to the whole judge roster, not to the
/// votes cast: two approvals out of three judges is 67 even if the third
/// judge has not voted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, utoipa::ToSchema)]
pub struct ContestantResults {
    pub positive_count: u64,
    pub negative_count: u64,
    pub total_votes_cast: u64,
    #[schema(example = 67)]
    pub approval_percentage: u32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestantResultsResponse {
    pub contestant: ContestantResponse,
    pub total_judges: u64,
    pub results: ContestantResults,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestantSummary {
    pub contestant: ContestantResponse,
    pub results: ContestantResults,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RoundSummaryResponse {
    pub round: RoundResponse,
    pub total_judges: u64,
    pub contestants: Vec<ContestantSummary>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoundResultsQuery {
    /// Include contestants that are hidden from judges. Defaults to `true`.
    pub include_hidden: Option<bool>,
}
