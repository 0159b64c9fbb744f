use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionSession, TransactionTrait,
};
use tracing::info;

use crate::entity::{role, role_permission, user, vote};
use crate::error::AppError;
use crate::models::user::{CreateUserRequest, normalize_email};
use crate::utils::hash;

/// User accounts: the judge roster and the administrators operating it.
pub struct Roster<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> Roster<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find(&self, id: i32) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Look up a user by email, ignoring case and surrounding whitespace.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(self.conn)
            .await?)
    }

    pub async fn permissions_for(&self, role_name: &str) -> Result<Vec<String>, AppError> {
        Ok(role_permission::Entity::find()
            .filter(role_permission::Column::Role.eq(role_name))
            .order_by_asc(role_permission::Column::Permission)
            .all(self.conn)
            .await?
            .into_iter()
            .map(|rp| rp.permission)
            .collect())
    }

    pub async fn create(&self, req: CreateUserRequest) -> Result<user::Model, AppError> {
        let password_hash = hash::hash_password(&req.password)
            .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

        let new_user = user::ActiveModel {
            name: Set(req.name.trim().to_string()),
            email: Set(normalize_email(&req.email)),
            password_hash: Set(password_hash),
            role: Set(req.role),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = new_user.insert(self.conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                tracing::debug!("Duplicate email caught by unique constraint on insert");
                AppError::EmailTaken
            }
            _ => AppError::from(e),
        })?;
        info!(user_id = model.id, role = %model.role, "User created");
        Ok(model)
    }

    /// All users ordered by name, optionally restricted to one role.
    pub async fn list(&self, role_name: Option<&str>) -> Result<Vec<user::Model>, AppError> {
        let mut select = user::Entity::find();
        if let Some(role_name) = role_name {
            select = select.filter(user::Column::Role.eq(role_name));
        }
        Ok(select
            .order_by_asc(user::Column::Name)
            .order_by_asc(user::Column::Id)
            .all(self.conn)
            .await?)
    }

    /// Size of the judge roster: the denominator of every approval percentage.
    pub async fn count_judges(&self) -> Result<u64, AppError> {
        Ok(user::Entity::find()
            .filter(user::Column::Role.eq(role::JUDGE))
            .count(self.conn)
            .await?)
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> Roster<'a, C> {
    /// Delete a user and every vote they cast, in one transaction.
    ///
    /// Tallies are computed against the current roster, so a departed judge's
    /// votes are removed with them. Returns the number of votes removed.
    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let txn = self.conn.begin().await?;

        user::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        let votes = vote::Entity::delete_many()
            .filter(vote::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        user::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(user_id = id, votes_deleted = votes.rows_affected, "User deleted");
        Ok(votes.rows_affected)
    }
}
