//! End-to-end tests for account management: the admin surface, profile
//! self-service, and the password reset flow.

mod common;

use axum::http::StatusCode;
use haulyard_core::models::account::Role;
use haulyard_core::notify::NotificationKind;
use haulyard_core::store::AccountStore;
use serde_json::json;
use uuid::Uuid;

use common::*;

#[tokio::test]
async fn admin_routes_reject_drivers() {
    let app = test_app();
    seed_account(
        &app.store,
        "Some Driver",
        "driver@example.com",
        "driver-pass",
        Role::Driver,
    )
    .await;
    let token = login_token(&app.router, "driver@example.com", "driver-pass").await;

    let response = send(&app.router, authed_request("GET", "/users", &token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "forbidden");

    let response = send(
        &app.router,
        authed_json_request(
            "POST",
            "/users",
            &token,
            json!({
                "name": "Sneaky",
                "email": "sneaky@example.com",
                "password": "whatever-pass",
                "role": "ADMIN",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_creates_and_lists_accounts() {
    let app = test_app();
    seed_account(
        &app.store,
        "Root Admin",
        "root@example.com",
        "root-pass",
        Role::Admin,
    )
    .await;
    let token = login_token(&app.router, "root@example.com", "root-pass").await;

    let response = send(
        &app.router,
        authed_json_request(
            "POST",
            "/users",
            &token,
            json!({
                "name": "Freight Driver",
                "email": "freight@example.com",
                "password": "freight-pass",
                "role": "DRIVER",
                "phone": "+15550111",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["role"], "DRIVER");
    // Admin-created accounts skip email verification.
    assert_eq!(created["isVerified"], true);

    let response = send(&app.router, authed_request("GET", "/users", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["total"], 2);

    let response = send(
        &app.router,
        authed_request("GET", "/users?role=DRIVER", &token),
    )
    .await;
    let listing = body_json(response).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["accounts"][0]["email"], "freight@example.com");

    let response = send(
        &app.router,
        authed_request("GET", "/users?searchTerm=freight", &token),
    )
    .await;
    let listing = body_json(response).await;
    assert_eq!(listing["total"], 1);

    // An unknown role filter is a validation error, not an empty page.
    let response = send(
        &app.router,
        authed_request("GET", "/users?role=DISPATCHER", &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "validation_error");
}

#[tokio::test]
async fn create_account_rejects_duplicates_and_invalid_input() {
    let app = test_app();
    seed_account(
        &app.store,
        "Root Admin",
        "root@example.com",
        "root-pass",
        Role::Admin,
    )
    .await;
    let token = login_token(&app.router, "root@example.com", "root-pass").await;

    let response = send(
        &app.router,
        authed_json_request(
            "POST",
            "/users",
            &token,
            json!({
                "name": "Existing",
                "email": "root@example.com",
                "password": "another-pass",
                "role": "DRIVER",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "conflict");

    let response = send(
        &app.router,
        authed_json_request(
            "POST",
            "/users",
            &token,
            json!({
                "name": "Short Pass",
                "email": "short@example.com",
                "password": "short",
                "role": "DRIVER",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "validation_error");
}

#[tokio::test]
async fn get_patch_and_missing_accounts() {
    let app = test_app();
    seed_account(
        &app.store,
        "Root Admin",
        "root@example.com",
        "root-pass",
        Role::Admin,
    )
    .await;
    let driver = seed_account(
        &app.store,
        "Patchable",
        "patchable@example.com",
        "patch-pass",
        Role::Driver,
    )
    .await;
    let token = login_token(&app.router, "root@example.com", "root-pass").await;

    let uri = format!("/users/{}", driver.id);
    let response = send(&app.router, authed_request("GET", &uri, &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Patchable");

    let response = send(
        &app.router,
        authed_json_request("PATCH", &uri, &token, json!({ "name": "Renamed" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["email"], "patchable@example.com");

    let response = send(
        &app.router,
        authed_json_request("PATCH", &uri, &token, json!({})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let missing = format!("/users/{}", Uuid::new_v4());
    let response = send(&app.router, authed_request("GET", &missing, &token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "not_found");
}

#[tokio::test]
async fn block_unblock_delete_notify_the_account() {
    let app = test_app();
    seed_account(
        &app.store,
        "Root Admin",
        "root@example.com",
        "root-pass",
        Role::Admin,
    )
    .await;
    let driver = seed_account(
        &app.store,
        "Lifecycle Driver",
        "lifecycle@example.com",
        "lc-pass",
        Role::Driver,
    )
    .await;
    let admin_token = login_token(&app.router, "root@example.com", "root-pass").await;
    let driver_token = login_token(&app.router, "lifecycle@example.com", "lc-pass").await;

    let block_uri = format!("/users/{}/block", driver.id);
    let response = send(&app.router, authed_request("POST", &block_uri, &admin_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["activeStatus"], "BLOCKED");

    // The driver's still-valid token is now refused.
    let response = send(&app.router, authed_request("GET", "/auth/me", &driver_token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "account_disabled");

    let unblock_uri = format!("/users/{}/unblock", driver.id);
    let response = send(
        &app.router,
        authed_request("POST", &unblock_uri, &admin_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["activeStatus"], "ACTIVE");

    let response = send(&app.router, authed_request("GET", "/auth/me", &driver_token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let delete_uri = format!("/users/{}", driver.id);
    let response = send(
        &app.router,
        authed_request("DELETE", &delete_uri, &admin_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["isDeleted"], true);

    let response = send(&app.router, authed_request("GET", "/auth/me", &driver_token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "account_deleted");

    let events = app.publisher.events.lock().unwrap();
    let channel = format!("notification_{}", driver.id);
    let titles: Vec<&str> = events
        .iter()
        .filter(|(c, _)| c == &channel)
        .map(|(_, e)| e.title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec!["Account blocked", "Account unblocked", "Account deleted"]
    );
    assert!(
        events
            .iter()
            .all(|(_, e)| e.kind == NotificationKind::System)
    );
}

#[tokio::test]
async fn list_hides_deleted_unless_requested() {
    let app = test_app();
    seed_account(
        &app.store,
        "Root Admin",
        "root@example.com",
        "root-pass",
        Role::Admin,
    )
    .await;
    let doomed = seed_account(
        &app.store,
        "Doomed",
        "doomed@example.com",
        "doom-pass",
        Role::Driver,
    )
    .await;
    let token = login_token(&app.router, "root@example.com", "root-pass").await;

    let delete_uri = format!("/users/{}", doomed.id);
    let response = send(&app.router, authed_request("DELETE", &delete_uri, &token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app.router, authed_request("GET", "/users", &token)).await;
    let listing = body_json(response).await;
    assert_eq!(listing["total"], 1);

    let response = send(
        &app.router,
        authed_request("GET", "/users?includeDeleted=true", &token),
    )
    .await;
    let listing = body_json(response).await;
    assert_eq!(listing["total"], 2);
}

#[tokio::test]
async fn profile_self_service_and_push_tokens() {
    let app = test_app();
    let driver = seed_account(
        &app.store,
        "Self Service",
        "selfservice@example.com",
        "ss-pass",
        Role::Driver,
    )
    .await;
    let token = login_token(&app.router, "selfservice@example.com", "ss-pass").await;

    let response = send(
        &app.router,
        authed_json_request(
            "PATCH",
            "/users/me",
            &token,
            json!({ "phone": "+15550123", "address": "12 Yard Rd" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["phone"], "+15550123");
    assert_eq!(body["address"], "12 Yard Rd");

    // Registering the same device token twice keeps a single entry.
    for _ in 0..2 {
        let response = send(
            &app.router,
            authed_json_request(
                "POST",
                "/users/me/push-tokens",
                &token,
                json!({ "token": "expo-token-1" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let stored = app
        .store
        .find_by_id(driver.id)
        .await
        .unwrap()
        .expect("account exists");
    assert_eq!(stored.push_tokens, vec!["expo-token-1"]);

    let response = send(
        &app.router,
        authed_json_request(
            "POST",
            "/users/me/push-tokens",
            &token,
            json!({ "token": "" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forgot_and_reset_password_flow() {
    let app = test_app();
    seed_account(
        &app.store,
        "Forgetful",
        "forgetful@example.com",
        "old-password",
        Role::Driver,
    )
    .await;

    // Known and unknown emails get the same answer.
    let mut bodies = Vec::new();
    for email in ["forgetful@example.com", "stranger@example.com"] {
        let response = send(
            &app.router,
            json_request("POST", "/users/forgot-password", json!({ "email": email })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        bodies.push(body_bytes(response).await);
    }
    assert_eq!(bodies[0], bodies[1]);
    assert!(app.mailer.last_code_for("stranger@example.com").is_none());

    let code = app
        .mailer
        .last_code_for("forgetful@example.com")
        .expect("reset code mailed");

    // A wrong code does not burn the real one.
    let wrong = if code == "000000" { "000001" } else { "000000" };
    let response = send(
        &app.router,
        json_request(
            "POST",
            "/users/reset-password",
            json!({
                "email": "forgetful@example.com",
                "otp": wrong,
                "newPassword": "brand-new-password",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/users/reset-password",
            json!({
                "email": "forgetful@example.com",
                "otp": code,
                "newPassword": "brand-new-password",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/auth/login",
            json!({ "email": "forgetful@example.com", "password": "old-password" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = login(&app.router, "forgetful@example.com", "brand-new-password").await;
    assert_eq!(body["user"]["email"], "forgetful@example.com");
}
