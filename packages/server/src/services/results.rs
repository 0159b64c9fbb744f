use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};

use super::{ContestantService, Roster, RoundService};
use crate::entity::{contestant, round, vote};
use crate::error::AppError;
use crate::models::result::ContestantResults;

/// Fold a contestant's vote values into a tally.
///
/// The percentage is `positive / total_judges`, rounded half away from zero,
/// and 0 when there are no judges.
pub fn tally<I>(votes: I, total_judges: u64) -> ContestantResults
where
    I: IntoIterator<Item = bool>,
{
    let (positive_count, negative_count) =
        votes.into_iter().fold((0u64, 0u64), |(pos, neg), approved| {
            if approved { (pos + 1, neg) } else { (pos, neg + 1) }
        });

    let approval_percentage = if total_judges > 0 {
        (positive_count as f64 / total_judges as f64 * 100.0).round() as u32
    } else {
        0
    };

    ContestantResults {
        positive_count,
        negative_count,
        total_votes_cast: positive_count + negative_count,
        approval_percentage,
    }
}

/// A round with each listed contestant's live tally.
pub struct RoundSummary {
    pub round: round::Model,
    pub total_judges: u64,
    pub contestants: Vec<(contestant::Model, ContestantResults)>,
}

/// Live results, always read fresh from the vote ledger.
pub struct ResultsAggregator<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ResultsAggregator<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn total_judges(&self) -> Result<u64, AppError> {
        Roster::new(self.conn).count_judges().await
    }

    /// Tally one contestant's votes against `total_judges`.
    pub async fn contestant_results(
        &self,
        contestant_id: i32,
        total_judges: u64,
    ) -> Result<ContestantResults, AppError> {
        let values: Vec<bool> = vote::Entity::find()
            .filter(vote::Column::ContestantId.eq(contestant_id))
            .select_only()
            .column(vote::Column::Vote)
            .into_tuple()
            .all(self.conn)
            .await?;
        Ok(tally(values, total_judges))
    }

    /// Every contestant of a round (or only the visible ones) with its tally.
    pub async fn round_summary(
        &self,
        round_id: i32,
        include_hidden: bool,
    ) -> Result<RoundSummary, AppError> {
        let round = RoundService::new(self.conn).find(round_id).await?;
        let contestants = ContestantService::new(self.conn)
            .list_by_round(round_id, !include_hidden)
            .await?;
        let total_judges = self.total_judges().await?;

        let ids: Vec<i32> = contestants.iter().map(|c| c.id).collect();
        let mut by_contestant: HashMap<i32, Vec<bool>> = HashMap::new();
        if !ids.is_empty() {
            let rows: Vec<(i32, bool)> = vote::Entity::find()
                .filter(vote::Column::ContestantId.is_in(ids))
                .select_only()
                .column(vote::Column::ContestantId)
                .column(vote::Column::Vote)
                .into_tuple()
                .all(self.conn)
                .await?;
            for (contestant_id, value) in rows {
                by_contestant.entry(contestant_id).or_default().push(value);
            }
        }

        let contestants = contestants
            .into_iter()
            .map(|c| {
                let votes = by_contestant.remove(&c.id).unwrap_or_default();
                (c, tally(votes, total_judges))
            })
            .collect();

        Ok(RoundSummary {
            round,
            total_judges,
            contestants,
        })
    }
}
