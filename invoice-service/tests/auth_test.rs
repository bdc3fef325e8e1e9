//! Authentication gate integration tests for invoice-service.

mod common;

use common::{TEST_ADMIN_USERNAME, TestApp};

#[tokio::test]
async fn login_with_valid_credentials_returns_token() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/auth/login", app.address))
        .json(&serde_json::json!({
            "username": TEST_ADMIN_USERNAME,
            "password": common::TEST_ADMIN_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["username"], TEST_ADMIN_USERNAME);
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/auth/login", app.address))
        .json(&serde_json::json!({
            "username": TEST_ADMIN_USERNAME,
            "password": "not-the-password",
        }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn login_with_blank_credentials_fails_validation() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/auth/login", app.address))
        .json(&serde_json::json!({ "username": "", "password": "" }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn invoice_routes_require_a_session() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/invoices", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let app = TestApp::spawn().await;
    let token = app.login().await;

    let response = app
        .client
        .post(format!("{}/auth/logout", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send logout request");
    assert_eq!(response.status(), 200);

    // The revoked token no longer opens the protected routes
    let response = app
        .client
        .get(format!("{}/invoices", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn company_info_is_served_to_authenticated_users() {
    let app = TestApp::spawn().await;

    // Unauthenticated access is rejected
    let response = app
        .client
        .get(format!("{}/company", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    let token = app.login().await;
    let response = app
        .client
        .get(format!("{}/company", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["company"]["name"], "Al Rayyan Furniture");
    assert_eq!(body["company"]["phone"], "00962798557397");
    assert_eq!(body["currency"], "JOD");
}

#[tokio::test]
async fn health_endpoints_are_open() {
    let app = TestApp::spawn().await;

    let health = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(health.status(), 200);

    let ready = app
        .client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(ready.status(), 200);

    let metrics = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(metrics.status(), 200);
}
