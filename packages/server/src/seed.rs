use chrono::Utc;
use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::{info, warn};

use crate::config::BootstrapConfig;
use crate::entity::{contestant, role, role_permission, user, vote};
use crate::models::user::{normalize_email, validate_email, validate_name, validate_password};
use crate::utils::hash;

/// Default role-permission mappings seeded on startup.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    (role::ADMIN, "round:manage"),
    (role::ADMIN, "contestant:manage"),
    (role::ADMIN, "vote:view_all"),
    (role::ADMIN, "vote:delete"),
    (role::ADMIN, "result:view"),
    (role::ADMIN, "user:manage"),
    (role::JUDGE, "vote:cast"),
];

/// Seed the `role` and `role_permission` tables with defaults.
pub async fn seed_role_permissions<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let mut roles_inserted = 0u32;
    for &name in role::ALL_ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        let result = role::Entity::insert(model)
            .on_conflict(
                OnConflict::column(role::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => roles_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if roles_inserted > 0 {
        info!("Seeded {} new roles", roles_inserted);
    }

    let mut perms_inserted = 0u32;
    for &(role, permission) in DEFAULT_MAPPINGS {
        let model = role_permission::ActiveModel {
            role: Set(role.to_string()),
            permission: Set(permission.to_string()),
            ..Default::default()
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => perms_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if perms_inserted > 0 {
        info!("Seeded {} new role-permission mappings", perms_inserted);
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't cover composite or partial indexes, so they
/// are created here on startup. The vote-pair and single-active-round indexes
/// are load-bearing and fail startup; the rest only speed up queries.
pub async fn ensure_indexes<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    // ON CONFLICT (user_id, contestant_id) in the vote upsert infers this index.
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("uq_vote_user_contestant")
        .table(vote::Entity)
        .col(vote::Column::UserId)
        .col(vote::Column::ContestantId)
        .to_string(PostgresQueryBuilder);
    db.execute_unprepared(&stmt).await?;
    info!("Ensured index uq_vote_user_contestant exists");

    // Partial indexes are not expressible through the builder. The syntax is
    // shared by PostgreSQL and SQLite.
    db.execute_unprepared(
        r#"CREATE UNIQUE INDEX IF NOT EXISTS "uq_round_single_active" ON "round" ("is_active") WHERE "is_active""#,
    )
    .await?;
    info!("Ensured index uq_round_single_active exists");

    let optional = [
        Index::create()
            .if_not_exists()
            .name("idx_contestant_visible")
            .table(contestant::Entity)
            .col(contestant::Column::IsVisibleToJudges)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_contestant_round_position")
            .table(contestant::Entity)
            .col(contestant::Column::RoundId)
            .col(contestant::Column::Position)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_vote_contestant")
            .table(vote::Entity)
            .col(vote::Column::ContestantId)
            .to_owned(),
    ];

    for stmt in optional {
        let sql = stmt.to_string(PostgresQueryBuilder);
        match db.execute_unprepared(&sql).await {
            Ok(_) => info!("Ensured index exists: {}", sql),
            Err(e) => warn!("Failed to create index ({}): {}", sql, e),
        }
    }

    Ok(())
}

/// Create the configured administrator if no admin account exists yet.
///
/// Returns `true` when a user was created.
pub async fn bootstrap_admin<C: ConnectionTrait>(
    db: &C,
    config: &BootstrapConfig,
) -> Result<bool, anyhow::Error> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(false);
    };

    let admin_exists = user::Entity::find()
        .filter(user::Column::Role.eq(role::ADMIN))
        .one(db)
        .await?
        .is_some();
    if admin_exists {
        return Ok(false);
    }

    let name = config
        .admin_name
        .clone()
        .unwrap_or_else(|| "Administrator".to_string());
    validate_name(&name, "Name").map_err(|e| anyhow::anyhow!("{e:?}"))?;
    validate_email(email).map_err(|e| anyhow::anyhow!("{e:?}"))?;
    validate_password(password).map_err(|e| anyhow::anyhow!("{e:?}"))?;

    let password_hash = hash::hash_password(password)?;
    let admin = user::ActiveModel {
        name: Set(name.trim().to_string()),
        email: Set(normalize_email(email)),
        password_hash: Set(password_hash),
        role: Set(role::ADMIN.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let admin = admin.insert(db).await?;
    info!(user_id = admin.id, email = %admin.email, "Bootstrapped administrator account");

    Ok(true)
}
