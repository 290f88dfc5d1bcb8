mod common;

use axum::http::StatusCode;
use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn test_register_login_and_me() {
    let app = spawn_app().await;

    let token = app.register("ada").await;

    let (status, me) = app.get("/api/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "ada");
    assert!(me["id"].as_str().is_some_and(|id| !id.is_empty()));

    let (status, body) = app
        .call(
            "POST",
            "/api/login",
            None,
            Some(json!({"username": "ada", "password": "correct horse"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let login_token = body["token"].as_str().unwrap();

    let (_, me_again) = app.get("/api/me", login_token).await;
    assert_eq!(me_again["id"], me["id"]);
}

#[tokio::test]
async fn test_register_validation_and_conflict() {
    let app = spawn_app().await;

    let (status, body) = app
        .call("POST", "/api/register", None, Some(json!({"username": "ada"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = app
        .call(
            "POST",
            "/api/register",
            None,
            Some(json!({"username": "  ", "password": "pw"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.register("ada").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/register",
            None,
            Some(json!({"username": "ada", "password": "another"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn test_login_failures() {
    let app = spawn_app().await;
    app.register("ada").await;

    let (status, _) = app
        .call("POST", "/api/login", None, Some(json!({"username": "ada"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(
            "POST",
            "/api/login",
            None,
            Some(json!({"username": "ada", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, _) = app
        .call(
            "POST",
            "/api/login",
            None,
            Some(json!({"username": "nobody", "password": "correct horse"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = spawn_app().await;

    for uri in ["/api/courses", "/api/assignments", "/api/notes", "/api/profile", "/api/me"] {
        let (status, body) = app.call("GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "Unauthorized");
    }

    let (status, _) = app.get("/api/courses", "garbage.token.value").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
