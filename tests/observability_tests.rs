mod common;

use axum::http::StatusCode;
use common::spawn_app;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::span;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

/// Collects the fields of every `request` span.
#[derive(Clone, Default)]
struct RequestSpans(Arc<Mutex<Vec<(String, String)>>>);

impl RequestSpans {
    fn values(&self, name: &str) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(field, _)| field == name)
            .map(|(_, value)| value.clone())
            .collect()
    }
}

struct Fields<'a>(&'a mut Vec<(String, String)>);

impl Visit for Fields<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
}

impl<S> tracing_subscriber::Layer<S> for RequestSpans
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, _id: &span::Id, _ctx: Context<'_, S>) {
        if attrs.metadata().name() == "request" {
            attrs.record(&mut Fields(&mut self.0.lock().unwrap()));
        }
    }

    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        if ctx.span(id).is_some_and(|span| span.name() == "request") {
            values.record(&mut Fields(&mut self.0.lock().unwrap()));
        }
    }
}

#[tokio::test]
async fn test_request_span_carries_route_and_user() {
    let spans = RequestSpans::default();
    let subscriber = tracing_subscriber::registry().with(spans.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = spawn_app().await;
    let token = app.register("ada").await;
    let (_, me) = app.get("/api/me", &token).await;
    let course = app.create_course(&token, "Algorithms").await;

    let (status, _) = app
        .put(
            &format!("/api/courses/{course}"),
            &token,
            json!({"name": "Graphs"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let routes = spans.values("route");
    assert!(routes.iter().any(|r| r == "/api/courses/{id}"), "{routes:?}");
    assert!(routes.iter().all(|r| !r.contains(&course)), "{routes:?}");

    let users = spans.values("user_id");
    let id = me["id"].as_str().unwrap();
    assert!(users.iter().any(|u| u == id), "{users:?}");
}
