//! End-to-end: engine, reconcilers and the reqwest transport against a mock
//! Mailtrap API.

use std::sync::Arc;

use mailtrap_core::config::{Endpoints, ProviderConfig};
use mailtrap_core::{AttributeMap, Engine, ProviderContext, TypeRegistry};
use mailtrap_http::HttpTransport;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine(server: &MockServer, default_account_id: i64) -> Engine {
    let config = ProviderConfig::new("test-token", default_account_id)
        .with_endpoints(Endpoints::uniform(server.uri()));
    let transport = HttpTransport::new(&config).expect("transport");

    let mut registry = TypeRegistry::new();
    mailtrap_resources::register(&mut registry);
    Engine::new(registry, ProviderContext::from_config(Arc::new(transport), &config))
}

fn attrs(value: Value) -> AttributeMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

#[tokio::test]
async fn project_create_and_delete_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/accounts/1/projects"))
        .and(header("Api-Token", "test-token"))
        .and(body_json(json!({"project": {"name": "alpha"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "name": "alpha",
            "share_links": {"admin": "https://mailtrap.io/a", "viewer": "https://mailtrap.io/v"},
            "permissions": ["can_read"],
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/accounts/1/projects/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine(&server, 1);

    let created = engine
        .create("mailtrap_project", None, &attrs(json!({"name": "alpha"})))
        .await;
    let state = created.state.expect("state after create");
    assert_eq!(state["share_links"]["admin"], "https://mailtrap.io/a");

    let deleted = engine.delete("mailtrap_project", Some(&state)).await;
    assert!(deleted.state.is_none());
    assert!(deleted.diagnostics.is_empty());
}

#[tokio::test]
async fn remote_error_envelope_reaches_diagnostics() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/accounts/1/inboxes/9"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Incorrect API token"})))
        .mount(&server)
        .await;

    let engine = engine(&server, 1);
    let prior = attrs(json!({"id": 9, "account_id": 1, "project_id": 3, "name": "staging"}));

    let response = engine.read("mailtrap_inbox", Some(&prior)).await;

    assert!(response.state.is_none());
    let diag = response.diagnostics.iter().next().unwrap();
    assert_eq!(diag.summary, "Client Error");
    assert_eq!(diag.detail, "API error (401): Incorrect API token");
}

#[tokio::test]
async fn sending_domain_delete_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let engine = engine(&server, 1);
    let prior = attrs(json!({"id": 5, "account_id": 1, "name": "example.com"}));

    let response = engine.delete("mailtrap_sending_domain", Some(&prior)).await;
    assert!(response.state.is_none());
    assert_eq!(response.diagnostics.len(), 1);
}
