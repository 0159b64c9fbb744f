use serde_json::{Value, json};

use crate::common::{TestApp, routes};

mod round_lifecycle {
    use super::*;

    #[tokio::test]
    async fn new_round_is_inactive_and_nothing_is_active() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ROUNDS,
                &json!({"name": "Heats", "description": "First pass", "round_number": 1}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["is_active"], false);
        assert_eq!(res.body["description"], "First pass");

        let active = app.get_with_token(routes::ACTIVE_ROUND, &admin).await;
        assert_eq!(active.status, 200);
        assert_eq!(active.body, Value::Null);
    }

    #[tokio::test]
    async fn activation_moves_the_single_active_flag() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let a = app.create_round(&admin, "Heats", 1).await;
        let b = app.create_round(&admin, "Final", 2).await;

        app.activate_round(&admin, a).await;
        let res = app
            .put_with_token(&routes::activate_round(b), &json!({}), &admin)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["is_active"], true);

        let active = app.get_with_token(routes::ACTIVE_ROUND, &admin).await;
        assert_eq!(active.id(), b);
        let a_now = app.get_with_token(&routes::round(a), &admin).await;
        assert_eq!(a_now.body["is_active"], false);
    }

    #[tokio::test]
    async fn concurrent_activations_leave_one_active_round() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let mut ids = Vec::new();
        for n in 1..=3 {
            ids.push(app.create_round(&admin, &format!("Round {n}"), n).await);
        }

        let requests = (0..12).map(|i| {
            let path = routes::activate_round(ids[i % ids.len()]);
            let admin = admin.clone();
            let app = &app;
            async move { app.put_with_token(&path, &json!({}), &admin).await }
        });
        for res in futures::future::join_all(requests).await {
            assert_eq!(res.status, 200, "{}", res.text);
        }

        let rounds = app.get_with_token(routes::ROUNDS, &admin).await;
        let active: Vec<&Value> = rounds
            .body
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| r["is_active"] == true)
            .collect();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn deactivate_clears_the_active_round() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let a = app.create_round(&admin, "Heats", 1).await;
        app.activate_round(&admin, a).await;

        let res = app
            .put_with_token(routes::DEACTIVATE_ROUNDS, &json!({}), &admin)
            .await;
        assert_eq!(res.status, 204, "{}", res.text);

        let active = app.get_with_token(routes::ACTIVE_ROUND, &admin).await;
        assert_eq!(active.body, Value::Null);
    }

    #[tokio::test]
    async fn activating_a_missing_round_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app
            .put_with_token(&routes::activate_round(777), &json!({}), &admin)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn judges_can_read_but_not_manage_rounds() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let (_, judge) = app.create_judge(&admin, "Rivera").await;
        let a = app.create_round(&admin, "Heats", 1).await;
        app.activate_round(&admin, a).await;

        let active = app.get_with_token(routes::ACTIVE_ROUND, &judge).await;
        assert_eq!(active.id(), a);

        let create = app
            .post_with_token(
                routes::ROUNDS,
                &json!({"name": "Rogue", "round_number": 9}),
                &judge,
            )
            .await;
        let activate = app
            .put_with_token(&routes::activate_round(a), &json!({}), &judge)
            .await;
        assert_eq!(create.status, 403);
        assert_eq!(activate.status, 403);
        assert_eq!(activate.body["code"], "PERMISSION_DENIED");
    }
}

mod round_editing {
    use super::*;

    #[tokio::test]
    async fn patch_updates_only_the_given_fields() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let a = app.create_round(&admin, "Heats", 1).await;

        let res = app
            .patch_with_token(&routes::round(a), &json!({"round_number": 4}), &admin)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"], "Heats");
        assert_eq!(res.body["round_number"], 4);
    }

    #[tokio::test]
    async fn invalid_round_fields_are_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let empty_name = app
            .post_with_token(
                routes::ROUNDS,
                &json!({"name": "  ", "round_number": 1}),
                &admin,
            )
            .await;
        let zero = app
            .post_with_token(
                routes::ROUNDS,
                &json!({"name": "Heats", "round_number": 0}),
                &admin,
            )
            .await;

        assert_eq!(empty_name.status, 400);
        assert_eq!(zero.status, 400);
        assert_eq!(zero.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_round_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app.get_with_token(&routes::round(4_242), &admin).await;

        assert_eq!(res.status, 404);
    }
}
