use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use pantry::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.environment = "test".to_string();
    config.general.database_path = "sqlite::memory:".to_string();
    config.auth.backdoor_enabled = true;
    config.observability.metrics_enabled = false;

    let state = pantry::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    pantry::api::router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn requests_without_identity_are_unauthorized() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "GET", "/api/v1/accounts/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_probes_need_no_auth() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "GET", "/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn account_lifecycle() {
    let app = spawn_app().await;

    // No account yet.
    let (status, _) = send(&app, "GET", "/api/v1/accounts/me", Some("auth0|john"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // PUT creates on first call.
    let (status, created) = send(
        &app,
        "PUT",
        "/api/v1/accounts/me",
        Some("auth0|john"),
        Some(json!({"firstName": "John", "lastName": "Doe"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["firstName"], "John");
    assert!(created["friendsCode"].is_string());
    assert!(created["householdId"].is_null());

    // Second PUT updates names and keeps the friends-code.
    let (status, updated) = send(
        &app,
        "PUT",
        "/api/v1/accounts/me",
        Some("auth0|john"),
        Some(json!({"firstName": "Johnny", "lastName": "Doe"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["firstName"], "Johnny");
    assert_eq!(updated["friendsCode"], created["friendsCode"]);

    let (status, _) = send(
        &app,
        "DELETE",
        "/api/v1/accounts/me",
        Some("auth0|john"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/api/v1/accounts/me", Some("auth0|john"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn household_lifecycle() {
    let app = spawn_app().await;

    send(
        &app,
        "PUT",
        "/api/v1/accounts/me",
        Some("auth0|john"),
        Some(json!({"firstName": "John", "lastName": "Doe"})),
    )
    .await;

    // No household yet.
    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/households/my",
        Some("auth0|john"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, household) = send(
        &app,
        "POST",
        "/api/v1/households",
        Some("auth0|john"),
        Some(json!({"name": "Test", "subscriptionType": "FREE"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(household["name"], "Test");
    assert_eq!(household["subscriptionType"], "FREE");

    // Founding a second household is rejected.
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/households",
        Some("auth0|john"),
        Some(json!({"name": "Another", "subscriptionType": "FREE"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, fetched) = send(
        &app,
        "GET",
        "/api/v1/households/my",
        Some("auth0|john"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], household["id"]);
    assert_eq!(fetched["subscriptionType"], "FREE");
}

#[tokio::test]
async fn devices_are_scoped_to_the_account() {
    let app = spawn_app().await;

    for user in ["auth0|john", "auth0|jane"] {
        send(
            &app,
            "PUT",
            "/api/v1/accounts/me",
            Some(user),
            Some(json!({"firstName": "Test", "lastName": "User"})),
        )
        .await;
    }

    let (status, device) = send(
        &app,
        "POST",
        "/api/v1/devices",
        Some("auth0|john"),
        Some(json!({
            "installationId": "install-1",
            "name": "John's phone",
            "model": "Pixel 9",
            "platform": "ANDROID"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(device["platform"], "ANDROID");

    // Jane cannot see or claim John's installation id.
    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/devices/install-1",
        Some("auth0|jane"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/devices",
        Some("auth0|jane"),
        Some(json!({
            "installationId": "install-1",
            "name": "Jane's phone",
            "platform": "IOS"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, devices) = send(&app, "GET", "/api/v1/devices", Some("auth0|john"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(devices.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "DELETE",
        "/api/v1/devices/install-1",
        Some("auth0|john"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn metadata_miss_is_not_found() {
    let app = spawn_app().await;

    send(
        &app,
        "PUT",
        "/api/v1/accounts/me",
        Some("auth0|john"),
        Some(json!({"firstName": "John", "lastName": "Doe"})),
    )
    .await;

    // Enrichment is disabled by default, so an unknown GTIN is a plain miss.
    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/metadatas/4012345678901",
        Some("auth0|john"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
