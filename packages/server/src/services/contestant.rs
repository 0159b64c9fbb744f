use std::collections::HashSet;

use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionSession, TransactionTrait,
};
use tracing::info;

use crate::entity::{contestant, round, vote};
use crate::error::AppError;
use crate::models::contestant::{CreateContestantRequest, UpdateContestantRequest};
use crate::models::shared::normalize_optional_text;

/// Contestant records and the per-contestant visibility gate.
///
/// Visibility is independent of round activation. The judge-facing voting
/// flow requires both, but neither flag constrains the other here.
pub struct ContestantService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ContestantService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find(&self, id: i32) -> Result<contestant::Model, AppError> {
        contestant::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Contestant not found".into()))
    }

    /// Contestants of one round in display order, optionally only the visible ones.
    pub async fn list_by_round(
        &self,
        round_id: i32,
        visible_only: bool,
    ) -> Result<Vec<contestant::Model>, AppError> {
        let mut select =
            contestant::Entity::find().filter(contestant::Column::RoundId.eq(round_id));
        if visible_only {
            select = select.filter(contestant::Column::IsVisibleToJudges.eq(true));
        }
        Ok(select
            .order_by_asc(contestant::Column::Position)
            .order_by_asc(contestant::Column::Id)
            .all(self.conn)
            .await?)
    }

    /// Visible contestants of one round, in display order.
    pub async fn list_visible_for_round(
        &self,
        round_id: i32,
    ) -> Result<Vec<contestant::Model>, AppError> {
        self.list_by_round(round_id, true).await
    }

    /// Every visible contestant across all rounds, whether or not their round
    /// is active. A contestant left visible in a finished round shows up here.
    pub async fn list_all_visible(&self) -> Result<Vec<contestant::Model>, AppError> {
        Ok(contestant::Entity::find()
            .filter(contestant::Column::IsVisibleToJudges.eq(true))
            .order_by_asc(contestant::Column::RoundId)
            .order_by_asc(contestant::Column::Position)
            .order_by_asc(contestant::Column::Id)
            .all(self.conn)
            .await?)
    }

    pub async fn create(
        &self,
        round_id: i32,
        req: CreateContestantRequest,
    ) -> Result<contestant::Model, AppError> {
        ensure_round_exists(self.conn, round_id).await?;

        let position = match req.order {
            Some(p) => p,
            None => self.next_position(round_id).await?,
        };

        let model = contestant::ActiveModel {
            name: Set(req.name.trim().to_string()),
            class_name: Set(req.class_name.trim().to_string()),
            age: Set(req.age),
            category: Set(req.category.trim().to_string()),
            description: Set(normalize_optional_text(req.description)),
            round_id: Set(round_id),
            position: Set(position),
            is_visible_to_judges: Set(req.is_visible_to_judges.unwrap_or(false)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let model = model.insert(self.conn).await?;
        info!(contestant_id = model.id, round_id, position, "Contestant created");
        Ok(model)
    }

    pub async fn update(
        &self,
        id: i32,
        patch: UpdateContestantRequest,
    ) -> Result<contestant::Model, AppError> {
        let existing = self.find(id).await?;
        if patch == UpdateContestantRequest::default() {
            return Ok(existing);
        }
        if let Some(round_id) = patch.round_id
            && round_id != existing.round_id
        {
            ensure_round_exists(self.conn, round_id).await?;
        }

        let mut active: contestant::ActiveModel = existing.into();
        if let Some(name) = patch.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(class_name) = patch.class_name {
            active.class_name = Set(class_name.trim().to_string());
        }
        if let Some(age) = patch.age {
            active.age = Set(age);
        }
        if let Some(category) = patch.category {
            active.category = Set(category.trim().to_string());
        }
        if let Some(description) = patch.description {
            active.description = Set(normalize_optional_text(description));
        }
        if let Some(round_id) = patch.round_id {
            active.round_id = Set(round_id);
        }
        if let Some(order) = patch.order {
            active.position = Set(order);
        }

        Ok(active.update(self.conn).await?)
    }

    /// Reveal or hide a contestant. A single-column update, so concurrent
    /// field edits are not overwritten.
    pub async fn set_visibility(
        &self,
        id: i32,
        is_visible: bool,
    ) -> Result<contestant::Model, AppError> {
        let res = contestant::Entity::update_many()
            .col_expr(contestant::Column::IsVisibleToJudges, Expr::value(is_visible))
            .filter(contestant::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Contestant not found".into()));
        }
        info!(contestant_id = id, is_visible, "Contestant visibility changed");
        self.find(id).await
    }

    async fn next_position(&self, round_id: i32) -> Result<i32, AppError> {
        let last: Option<i32> = contestant::Entity::find()
            .filter(contestant::Column::RoundId.eq(round_id))
            .select_only()
            .column(contestant::Column::Position)
            .order_by_desc(contestant::Column::Position)
            .into_tuple()
            .one(self.conn)
            .await?;
        Ok(last.map_or(1, |p| p + 1))
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> ContestantService<'a, C> {
    /// Assign positions 1..=n following `ids`, which must list exactly the
    /// round's contestants.
    pub async fn reorder(
        &self,
        round_id: i32,
        ids: &[i32],
    ) -> Result<Vec<contestant::Model>, AppError> {
        let txn = self.conn.begin().await?;
        ensure_round_exists(&txn, round_id).await?;

        let current: HashSet<i32> = contestant::Entity::find()
            .filter(contestant::Column::RoundId.eq(round_id))
            .select_only()
            .column(contestant::Column::Id)
            .into_tuple::<i32>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();
        let requested: HashSet<i32> = ids.iter().copied().collect();
        if current != requested {
            return Err(AppError::Validation(
                "contestant_ids must list exactly the contestants of this round".into(),
            ));
        }

        for (index, &id) in ids.iter().enumerate() {
            contestant::Entity::update_many()
                .col_expr(contestant::Column::Position, Expr::value(index as i32 + 1))
                .filter(contestant::Column::Id.eq(id))
                .exec(&txn)
                .await?;
        }

        let reordered = ContestantService::new(&txn).list_by_round(round_id, false).await?;
        txn.commit().await?;
        Ok(reordered)
    }

    /// Delete a contestant together with every vote cast for it.
    ///
    /// Both deletes share one transaction, so a failure in between cannot
    /// leave votes pointing at a missing contestant. The contestant row is
    /// locked first, so a concurrent cast waits and then fails with
    /// `NotFound`. Returns the number of votes removed.
    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let txn = self.conn.begin().await?;

        contestant::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Contestant not found".into()))?;

        let votes = vote::Entity::delete_many()
            .filter(vote::Column::ContestantId.eq(id))
            .exec(&txn)
            .await?;
        contestant::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(
            contestant_id = id,
            votes_deleted = votes.rows_affected,
            "Contestant deleted"
        );
        Ok(votes.rows_affected)
    }
}

async fn ensure_round_exists<C: ConnectionTrait>(conn: &C, round_id: i32) -> Result<(), AppError> {
    round::Entity::find_by_id(round_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Round not found".into()))?;
    Ok(())
}
