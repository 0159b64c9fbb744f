use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionSession, TransactionTrait,
};
use tracing::info;

use crate::entity::round;
use crate::error::AppError;
use crate::models::round::UpdateRoundRequest;
use crate::models::shared::normalize_optional_text;

/// Round lifecycle: creation, editing and the single-active-round transitions.
///
/// At most one round is active. `activate` clears every flag and sets the
/// target inside one transaction, so readers see either the old or the new
/// active round. Concurrent activations resolve last-writer-wins.
pub struct RoundService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> RoundService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// All rounds, highest round number first.
    pub async fn list(&self) -> Result<Vec<round::Model>, AppError> {
        Ok(round::Entity::find()
            .order_by_desc(round::Column::RoundNumber)
            .order_by_desc(round::Column::Id)
            .all(self.conn)
            .await?)
    }

    pub async fn find(&self, id: i32) -> Result<round::Model, AppError> {
        round::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Round not found".into()))
    }

    /// The active round, if any. Served by the `uq_round_single_active` index.
    pub async fn active(&self) -> Result<Option<round::Model>, AppError> {
        Ok(round::Entity::find()
            .filter(round::Column::IsActive.eq(true))
            .one(self.conn)
            .await?)
    }

    /// Create an inactive round. Duplicate round numbers are accepted.
    pub async fn create(
        &self,
        name: &str,
        description: Option<String>,
        round_number: i32,
    ) -> Result<round::Model, AppError> {
        let model = round::ActiveModel {
            name: Set(name.trim().to_string()),
            description: Set(normalize_optional_text(description)),
            round_number: Set(round_number),
            is_active: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let model = model.insert(self.conn).await?;
        info!(round_id = model.id, round_number = model.round_number, "Round created");
        Ok(model)
    }

    /// Apply a partial update. Activation state is not touched.
    pub async fn update(&self, id: i32, patch: UpdateRoundRequest) -> Result<round::Model, AppError> {
        let existing = self.find(id).await?;
        if patch == UpdateRoundRequest::default() {
            return Ok(existing);
        }

        let mut active: round::ActiveModel = existing.into();
        if let Some(name) = patch.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = patch.description {
            active.description = Set(normalize_optional_text(description));
        }
        if let Some(round_number) = patch.round_number {
            active.round_number = Set(round_number);
        }

        Ok(active.update(self.conn).await?)
    }

    /// Clear the active flag on every round.
    ///
    /// Unfiltered for the same reason as `activate`: an activation committed
    /// while this statement waits on row locks must not survive it.
    pub async fn deactivate_all(&self) -> Result<(), AppError> {
        round::Entity::update_many()
            .col_expr(round::Column::IsActive, Expr::value(false))
            .exec(self.conn)
            .await?;
        info!("All rounds deactivated");
        Ok(())
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> RoundService<'a, C> {
    /// Make `id` the only active round.
    pub async fn activate(&self, id: i32) -> Result<round::Model, AppError> {
        let txn = self.conn.begin().await?;

        let target = round::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Round not found".into()))?;

        // No WHERE clause: every row is locked and rewritten, so a concurrent
        // activation committed in between is cleared as well.
        round::Entity::update_many()
            .col_expr(round::Column::IsActive, Expr::value(false))
            .exec(&txn)
            .await?;
        round::Entity::update_many()
            .col_expr(round::Column::IsActive, Expr::value(true))
            .filter(round::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        info!(round_id = id, "Round activated");

        Ok(round::Model {
            is_active: true,
            ..target
        })
    }
}
