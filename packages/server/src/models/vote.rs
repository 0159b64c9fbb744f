use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cast or change the caller's vote. The judge is always the token holder.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CastVoteRequest {
    #[schema(example = 17)]
    pub contestant_id: i32,
    /// `true` approves the contestant, `false` rejects.
    #[schema(example = true)]
    pub value: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VoteResponse {
    pub id: i32,
    pub user_id: i32,
    pub contestant_id: i32,
    pub value: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::vote::Model> for VoteResponse {
    fn from(m: crate::entity::vote::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            contestant_id: m.contestant_id,
            value: m.vote,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteVotesResponse {
    pub contestant_id: i32,
    pub deleted: u64,
}
