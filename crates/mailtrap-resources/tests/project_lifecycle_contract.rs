//! Contract Test: Project and Inbox Lifecycle
//!
//! Constraints verified:
//! - Each lifecycle verb issues exactly one request with the expected path and envelope
//! - State after create/read/update is rebuilt from the remote response
//! - Server-generated share links survive planning unchanged
//! - A failed create leaves nothing tracked; a failed delete keeps the prior state
//! - Import seeds only identifiers and never talks to the remote
//! - Account scope comes from the resource, then the provider default

mod common;

use common::*;
use mailtrap_core::traits::Method;
use mailtrap_core::{PlanAction, Severity};
use serde_json::{Value, json};

fn project_body(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "share_links": {"admin": "A", "viewer": "V"},
        "permissions": ["can_read", "can_update"],
        "inboxes": [],
    })
}

#[tokio::test]
async fn create_posts_envelope_and_tracks_response() {
    let transport = ScriptedTransport::new();
    transport.respond(200, project_body(7, "alpha"));
    let engine = engine(transport.clone(), 42);

    let response = engine
        .create("mailtrap_project", None, &attrs(json!({"name": "alpha"})))
        .await;

    assert!(!response.has_error(), "{:?}", response.diagnostics);
    let state = response.state.expect("state after create");
    assert_eq!(state["id"], 7);
    assert_eq!(state["account_id"], 42);
    assert_eq!(state["share_links"], json!({"admin": "A", "viewer": "V"}));
    assert_eq!(state["permissions"], json!(["can_read", "can_update"]));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::Post);
    assert_eq!(calls[0].path, "/api/accounts/42/projects");
    assert_eq!(calls[0].body, Some(json!({"project": {"name": "alpha"}})));
}

#[tokio::test]
async fn resource_account_overrides_provider_default() {
    let transport = ScriptedTransport::new();
    transport.respond(200, project_body(7, "alpha"));
    let engine = engine(transport.clone(), 42);

    let response = engine
        .create(
            "mailtrap_project",
            None,
            &attrs(json!({"name": "alpha", "account_id": 9})),
        )
        .await;

    assert_eq!(response.state.unwrap()["account_id"], 9);
    assert_eq!(transport.calls()[0].path, "/api/accounts/9/projects");
}

#[tokio::test]
async fn missing_scope_fails_without_remote_call() {
    let transport = ScriptedTransport::new();
    let engine = engine(transport.clone(), 0);

    let response = engine
        .create("mailtrap_project", None, &attrs(json!({"name": "alpha"})))
        .await;

    assert!(response.state.is_none());
    let diag = response.diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.summary, "Missing Account ID");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn share_links_stay_known_across_plans() {
    let transport = ScriptedTransport::new();
    let engine = engine(transport.clone(), 1);

    let prior = attrs(json!({
        "id": 7,
        "account_id": 1,
        "name": "alpha",
        "share_links": {"admin": "A", "viewer": "V"},
        "permissions": ["can_read"],
    }));

    let same = engine.plan("mailtrap_project", Some(&prior), &attrs(json!({"name": "alpha"})));
    let plan = same.plan.expect("plan");
    assert_eq!(plan.action, PlanAction::NoOp);
    assert_eq!(plan.planned["share_links"], json!({"admin": "A", "viewer": "V"}));

    let renamed = engine.plan("mailtrap_project", Some(&prior), &attrs(json!({"name": "beta"})));
    let plan = renamed.plan.expect("plan");
    assert_eq!(plan.action, PlanAction::Update);
    assert_eq!(plan.planned["id"], 7);
    assert_eq!(plan.planned["share_links"], json!({"admin": "A", "viewer": "V"}));
    assert!(!plan.planned.contains_key("permissions"));

    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn update_patches_name_only() {
    let transport = ScriptedTransport::new();
    transport.respond(200, project_body(7, "beta"));
    let engine = engine(transport.clone(), 1);

    let prior = attrs(json!({
        "id": 7,
        "account_id": 3,
        "name": "alpha",
        "share_links": {"admin": "A", "viewer": "V"},
        "permissions": [],
    }));
    let planned = attrs(json!({
        "id": 7,
        "account_id": 3,
        "name": "beta",
        "share_links": {"admin": "A", "viewer": "V"},
    }));

    let response = engine.update("mailtrap_project", Some(&prior), &planned).await;

    let state = response.state.expect("state after update");
    assert_eq!(state["name"], "beta");
    assert_eq!(state["account_id"], 3);

    let calls = transport.calls();
    assert_eq!(calls[0].method, Method::Patch);
    assert_eq!(calls[0].path, "/api/accounts/3/projects/7");
    assert_eq!(calls[0].body, Some(json!({"project": {"name": "beta"}})));
}

#[tokio::test]
async fn create_failure_leaves_no_state() {
    let transport = ScriptedTransport::new();
    transport.respond(422, json!({"errors": {"name": ["is too short"]}}));
    let engine = engine(transport.clone(), 1);

    let response = engine
        .create("mailtrap_project", None, &attrs(json!({"name": "ab"})))
        .await;

    assert!(response.state.is_none());
    let diag = response.diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(diag.summary, "Client Error");
    assert!(diag.detail.contains("422"));
    assert!(diag.detail.contains("name: is too short"));
}

#[tokio::test]
async fn transport_failure_on_read_is_client_error() {
    let transport = ScriptedTransport::new();
    transport.fail("connection refused");
    let engine = engine(transport.clone(), 1);

    let prior = attrs(json!({"id": 7, "account_id": 1, "name": "alpha"}));
    let response = engine.read("mailtrap_project", Some(&prior)).await;

    assert!(response.state.is_none());
    assert_eq!(response.diagnostics.iter().next().unwrap().summary, "Client Error");
}

#[tokio::test]
async fn delete_failure_keeps_prior_state() {
    let transport = ScriptedTransport::new();
    transport.respond(403, json!({"error": "forbidden"}));
    let engine = engine(transport.clone(), 1);

    let prior = attrs(json!({"id": 7, "account_id": 1, "name": "alpha"}));
    let response = engine.delete("mailtrap_project", Some(&prior)).await;

    assert_eq!(response.state.as_ref(), Some(&prior));
    assert!(response.diagnostics.iter().next().unwrap().detail.contains("forbidden"));
}

#[tokio::test]
async fn delete_success_drops_state() {
    let transport = ScriptedTransport::new();
    transport.respond_raw(204, "");
    let engine = engine(transport.clone(), 1);

    let prior = attrs(json!({"id": 7, "account_id": 5, "name": "alpha"}));
    let response = engine.delete("mailtrap_project", Some(&prior)).await;

    assert!(response.state.is_none());
    assert!(response.diagnostics.is_empty());

    let calls = transport.calls();
    assert_eq!(calls[0].method, Method::Delete);
    assert_eq!(calls[0].path, "/api/accounts/5/projects/7");
}

#[tokio::test]
async fn import_seeds_identifiers_then_read_fills_the_rest() {
    let transport = ScriptedTransport::new();
    transport.respond(200, project_body(34, "imported"));
    let engine = engine(transport.clone(), 0);

    let seeded = engine.import("mailtrap_project", None, "12/34");
    let state = seeded.state.expect("seeded state");
    assert_eq!(state, attrs(json!({"account_id": 12, "id": 34})));
    assert_eq!(transport.call_count(), 0);

    let refreshed = engine.read("mailtrap_project", Some(&state)).await;
    let state = refreshed.state.expect("refreshed state");
    assert_eq!(state["name"], "imported");
    assert_eq!(state["account_id"], 12);
    assert_eq!(transport.calls()[0].path, "/api/accounts/12/projects/34");
}

#[tokio::test]
async fn malformed_import_ids_are_rejected() {
    let transport = ScriptedTransport::new();
    let engine = engine(transport.clone(), 1);

    for (id, summary) in [
        ("123", "Incorrect Import ID"),
        ("1/2/3", "Incorrect Import ID"),
        ("abc/5", "Invalid Account ID"),
        ("5/xyz", "Invalid Resource ID"),
        ("-5/34", "Invalid Account ID"),
        ("0/34", "Invalid Account ID"),
        ("5/0", "Invalid Resource ID"),
    ] {
        let response = engine.import("mailtrap_inbox", None, id);
        assert!(response.state.is_none(), "{id} must not seed state");
        assert_eq!(response.diagnostics.iter().next().unwrap().summary, summary, "{id}");
    }

    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn inbox_create_nests_under_project() {
    let transport = ScriptedTransport::new();
    transport.respond(
        200,
        json!({
            "id": 11,
            "name": "staging",
            "username": "u",
            "password": "p",
            "max_size": 50,
            "status": "active",
            "email_username": "staging",
            "email_username_enabled": true,
            "domain": "sandbox.smtp.mailtrap.io",
            "smtp_ports": [25, 465, 587, 2525],
            "pop3_ports": [1100, 9950],
            "permissions": ["can_read"],
        }),
    );
    let engine = engine(transport.clone(), 1);

    let response = engine
        .create(
            "mailtrap_inbox",
            None,
            &attrs(json!({"project_id": 3, "name": "staging", "email_username": "staging"})),
        )
        .await;

    let state = response.state.expect("state after create");
    assert_eq!(state["project_id"], 3);
    assert_eq!(state["smtp_ports"], json!([25, 465, 587, 2525]));
    assert_eq!(state["pop3_ports"], json!([1100, 9950]));
    assert_eq!(state["forward_from_email_address"], Value::Null);

    let calls = transport.calls();
    assert_eq!(calls[0].path, "/api/accounts/1/projects/3/inboxes");
    assert_eq!(
        calls[0].body,
        Some(json!({"inbox": {"name": "staging", "email_username": "staging"}}))
    );
}

#[tokio::test]
async fn inbox_project_change_requires_replacement() {
    let transport = ScriptedTransport::new();
    let engine = engine(transport, 1);

    let prior = attrs(json!({"id": 11, "account_id": 1, "project_id": 3, "name": "staging"}));
    let response = engine.plan(
        "mailtrap_inbox",
        Some(&prior),
        &attrs(json!({"project_id": 4, "name": "staging"})),
    );

    let plan = response.plan.expect("plan");
    assert_eq!(plan.action, PlanAction::Replace);
    assert_eq!(plan.requires_replace, vec!["project_id"]);
}

#[tokio::test]
async fn unknown_type_is_reported() {
    let transport = ScriptedTransport::new();
    let engine = engine(transport, 1);

    let response = engine.read("mailtrap_widget", Some(&attrs(json!({"id": 1})))).await;
    assert_eq!(response.diagnostics.iter().next().unwrap().summary, "Unknown Type");
}
