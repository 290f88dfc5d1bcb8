#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::path::PathBuf;
use studydesk::config::Config;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub root: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn test_config(root: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", root.join("studydesk-test.db").display());
    config.uploads.avatar_path = root.join("uploads").display().to_string();
    config.security.jwt_secret = Some("integration-test-secret".to_string());
    // Keep hashing fast in tests
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.observability.metrics_enabled = false;
    config
}

pub async fn spawn_app() -> TestApp {
    let root = scratch_dir("studydesk-test");
    let config = test_config(&root);

    let state = studydesk::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    TestApp {
        router: studydesk::api::router(state),
        root,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let (status, bytes) = self.send(request).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> StatusCode {
        self.call("DELETE", uri, Some(token), None).await.0
    }

    /// Registers `username` and returns its token.
    pub async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/api/register",
                None,
                Some(json!({"username": username, "password": "correct horse"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_course(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .post("/api/courses", token, json!({"name": name}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create course failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_assignment(&self, token: &str, course_id: &str, title: &str) -> String {
        let (status, body) = self
            .post(
                "/api/assignments",
                token,
                json!({"title": title, "deadline": "2024-05-01", "courseId": course_id}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create assignment failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}
