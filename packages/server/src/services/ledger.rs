use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};
use tracing::{debug, info};

use crate::entity::{contestant, user, vote};
use crate::error::AppError;

/// One vote per (judge, contestant), changeable in place.
pub struct VoteLedger<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> VoteLedger<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Record `value` as the judge's vote for the contestant.
    ///
    /// A single `INSERT ... ON CONFLICT (user_id, contestant_id) DO UPDATE`
    /// statement: the first call inserts with `created_at = now`, later calls
    /// only overwrite `vote`. Concurrent calls for the same pair converge on
    /// one row holding the last committed value.
    pub async fn cast(
        &self,
        judge_id: i32,
        contestant_id: i32,
        value: bool,
    ) -> Result<vote::Model, AppError> {
        user::Entity::find_by_id(judge_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Judge not found".into()))?;
        contestant::Entity::find_by_id(contestant_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Contestant not found".into()))?;

        let row = vote::ActiveModel {
            user_id: Set(judge_id),
            contestant_id: Set(contestant_id),
            vote: Set(value),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        vote::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([vote::Column::UserId, vote::Column::ContestantId])
                    .update_column(vote::Column::Vote)
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    AppError::NotFound("Contestant not found".into())
                }
                _ => AppError::from(e),
            })?;

        // Gone only if the contestant or judge was deleted since the upsert.
        let stored = self
            .get(judge_id, contestant_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contestant not found".into()))?;
        debug!(
            vote_id = stored.id,
            judge_id,
            contestant_id,
            value = stored.vote,
            "Vote recorded"
        );
        Ok(stored)
    }

    /// The judge's current vote for a contestant, if any.
    pub async fn get(
        &self,
        judge_id: i32,
        contestant_id: i32,
    ) -> Result<Option<vote::Model>, AppError> {
        Ok(vote::Entity::find()
            .filter(vote::Column::UserId.eq(judge_id))
            .filter(vote::Column::ContestantId.eq(contestant_id))
            .one(self.conn)
            .await?)
    }

    /// Every vote cast by one judge, newest first.
    pub async fn by_judge(&self, judge_id: i32) -> Result<Vec<vote::Model>, AppError> {
        Ok(vote::Entity::find()
            .filter(vote::Column::UserId.eq(judge_id))
            .order_by_desc(vote::Column::CreatedAt)
            .order_by_desc(vote::Column::Id)
            .all(self.conn)
            .await?)
    }

    pub async fn by_contestant(&self, contestant_id: i32) -> Result<Vec<vote::Model>, AppError> {
        Ok(vote::Entity::find()
            .filter(vote::Column::ContestantId.eq(contestant_id))
            .order_by_asc(vote::Column::Id)
            .all(self.conn)
            .await?)
    }

    /// Remove every vote for a contestant. Returns the number of rows deleted.
    pub async fn delete_for_contestant(&self, contestant_id: i32) -> Result<u64, AppError> {
        let res = vote::Entity::delete_many()
            .filter(vote::Column::ContestantId.eq(contestant_id))
            .exec(self.conn)
            .await?;
        info!(contestant_id, votes_deleted = res.rows_affected, "Votes deleted");
        Ok(res.rows_affected)
    }
}
