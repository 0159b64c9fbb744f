use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, SqlErr,
};

use spotlight_server::entity::round;
use spotlight_server::error::AppError;
use spotlight_server::models::round::UpdateRoundRequest;
use spotlight_server::services::RoundService;

use crate::common::{create_round, store};

async fn active_count(db: &sea_orm::DatabaseConnection) -> u64 {
    round::Entity::find()
        .filter(round::Column::IsActive.eq(true))
        .count(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn new_rounds_start_inactive() {
    let db = store().await;
    create_round(&db, "Heats", 1).await;

    assert!(RoundService::new(&db).active().await.unwrap().is_none());
    assert_eq!(active_count(&db).await, 0);
}

#[tokio::test]
async fn activating_a_round_deactivates_the_previous_one() {
    let db = store().await;
    let a = create_round(&db, "Heats", 1).await;
    let b = create_round(&db, "Final", 2).await;
    let rounds = RoundService::new(&db);

    rounds.activate(a).await.unwrap();
    let activated = rounds.activate(b).await.unwrap();

    assert!(activated.is_active);
    assert_eq!(rounds.active().await.unwrap().map(|r| r.id), Some(b));
    assert!(!rounds.find(a).await.unwrap().is_active);
    assert_eq!(active_count(&db).await, 1);
}

#[tokio::test]
async fn activating_the_active_round_again_is_harmless() {
    let db = store().await;
    let a = create_round(&db, "Heats", 1).await;
    let rounds = RoundService::new(&db);

    rounds.activate(a).await.unwrap();
    rounds.activate(a).await.unwrap();

    assert_eq!(rounds.active().await.unwrap().map(|r| r.id), Some(a));
    assert_eq!(active_count(&db).await, 1);
}

#[tokio::test]
async fn activating_a_missing_round_keeps_the_current_one() {
    let db = store().await;
    let a = create_round(&db, "Heats", 1).await;
    let rounds = RoundService::new(&db);
    rounds.activate(a).await.unwrap();

    let err = rounds.activate(9_999).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(rounds.active().await.unwrap().map(|r| r.id), Some(a));
}

#[tokio::test]
async fn deactivate_all_leaves_no_active_round() {
    let db = store().await;
    let a = create_round(&db, "Heats", 1).await;
    let rounds = RoundService::new(&db);
    rounds.activate(a).await.unwrap();

    rounds.deactivate_all().await.unwrap();
    rounds.deactivate_all().await.unwrap();

    assert!(rounds.active().await.unwrap().is_none());
}

/// Many queued activations, applied one transaction at a time by the single
/// pooled connection. Interleaved transactions are covered by the PostgreSQL
/// tests in `tests/integration/round.rs`.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn queued_activations_leave_exactly_one_active_round() {
    let db = store().await;
    let mut ids = Vec::new();
    for n in 1..=4 {
        ids.push(create_round(&db, &format!("Round {n}"), n).await);
    }

    let tasks = (0..20).map(|i| {
        let db = db.clone();
        let id = ids[i % ids.len()];
        tokio::spawn(async move { RoundService::new(&db).activate(id).await })
    });
    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    assert_eq!(active_count(&db).await, 1);
    let active = RoundService::new(&db).active().await.unwrap().unwrap();
    assert!(ids.contains(&active.id));
}

#[tokio::test]
async fn store_rejects_a_second_active_round() {
    let db = store().await;
    let a = create_round(&db, "Heats", 1).await;
    RoundService::new(&db).activate(a).await.unwrap();

    let err = round::ActiveModel {
        name: Set("Rogue".to_string()),
        description: Set(None),
        round_number: Set(2),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap_err();

    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn rounds_are_listed_by_descending_round_number() {
    let db = store().await;
    let first = create_round(&db, "Heats", 1).await;
    let third = create_round(&db, "Final", 3).await;
    let second = create_round(&db, "Semi", 2).await;

    let ids: Vec<i32> = RoundService::new(&db)
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();

    assert_eq!(ids, vec![third, second, first]);
}

#[tokio::test]
async fn duplicate_round_numbers_are_accepted() {
    let db = store().await;
    create_round(&db, "Heats A", 1).await;
    create_round(&db, "Heats B", 1).await;

    assert_eq!(RoundService::new(&db).list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_changes_fields_but_not_activation() {
    let db = store().await;
    let a = create_round(&db, "Heats", 1).await;
    let rounds = RoundService::new(&db);
    rounds.activate(a).await.unwrap();

    let updated = rounds
        .update(
            a,
            UpdateRoundRequest {
                name: Some("  Opening heats ".to_string()),
                description: Some(Some("Warm-up acts".to_string())),
                round_number: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Opening heats");
    assert_eq!(updated.description.as_deref(), Some("Warm-up acts"));
    assert_eq!(updated.round_number, 1);
    assert!(updated.is_active);

    let cleared = rounds
        .update(
            a,
            UpdateRoundRequest {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.description.is_none());
}
