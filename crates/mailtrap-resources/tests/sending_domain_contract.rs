//! Contract Test: Sending Domain Lifecycle
//!
//! Constraints verified:
//! - Nested DNS records and status are tracked with explicit null priorities
//!   and empty categories kept as empty lists
//! - Update never calls a write endpoint; it refreshes instead
//! - Destroy makes no remote call and warns that the domain remains
//! - A malformed response after a successful create surfaces as a conversion error

mod common;

use common::*;
use mailtrap_core::Severity;
use mailtrap_core::traits::Method;
use serde_json::{Value, json};

fn domain_body() -> Value {
    json!({
        "id": 5,
        "name": "example.com",
        "cname": "abc.mailtrap.io",
        "status": null,
        "compliance_status": "pending",
        "dns_records": {
            "cname": [{
                "record_type": "CNAME",
                "hostname": "mail.example.com",
                "value": "target",
                "status": "pending",
            }],
            "mx": [],
            "txt": [],
        },
        "dns_status": {"cname": false, "mx": false, "txt": false},
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-01T10:00:00Z",
    })
}

#[tokio::test]
async fn create_read_update_delete_end_to_end() {
    let transport = ScriptedTransport::new();
    transport.respond(200, domain_body());
    transport.respond(200, domain_body());
    transport.respond(200, domain_body());
    let engine = engine(transport.clone(), 1);

    // Create
    let created = engine
        .create("mailtrap_sending_domain", None, &attrs(json!({"name": "example.com"})))
        .await;
    assert!(!created.has_error(), "{:?}", created.diagnostics);
    let state = created.state.expect("state after create");

    assert_eq!(state["id"], 5);
    assert_eq!(state["cname"], "abc.mailtrap.io");
    assert_eq!(state["status"], Value::Null);
    assert_eq!(
        state["dns_records"],
        json!({
            "cname": [{
                "priority": null,
                "record_type": "CNAME",
                "hostname": "mail.example.com",
                "value": "target",
                "status": "pending",
            }],
            "mx": [],
            "txt": [],
        })
    );
    assert_eq!(state["dns_status"], json!({"cname": false, "mx": false, "txt": false}));
    assert_eq!(state["created_at"], "2024-03-01T10:00:00Z");

    // Read
    let read = engine.read("mailtrap_sending_domain", Some(&state)).await;
    assert_eq!(read.state.as_ref(), Some(&state));

    // Update refreshes via GET
    let updated = engine.update("mailtrap_sending_domain", Some(&state), &state).await;
    assert_eq!(updated.state.as_ref(), Some(&state));

    // Delete
    let deleted = engine.delete("mailtrap_sending_domain", Some(&state)).await;
    assert!(deleted.state.is_none());
    assert!(!deleted.has_error());
    let warning = deleted.diagnostics.iter().next().expect("one warning");
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.summary, "Resource Not Deleted");
    assert!(warning.detail.contains("will remain in Mailtrap"));

    let calls = transport.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].method, Method::Post);
    assert_eq!(calls[0].path, "/api/accounts/1/sending_domains");
    assert_eq!(
        calls[0].body,
        Some(json!({"sending_domain": {"domain_name": "example.com"}}))
    );
    assert!(
        calls[1..]
            .iter()
            .all(|c| c.method == Method::Get && c.path == "/api/accounts/1/sending_domains/5")
    );
}

#[tokio::test]
async fn malformed_response_after_create_is_conversion_error() {
    let transport = ScriptedTransport::new();
    transport.respond(201, json!({"id": "five", "name": "example.com"}));
    let engine = engine(transport.clone(), 1);

    let response = engine
        .create("mailtrap_sending_domain", None, &attrs(json!({"name": "example.com"})))
        .await;

    assert!(response.state.is_none());
    let diag = response.diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(diag.summary, "Conversion Error");
    assert!(diag.detail.contains("failed to unmarshal response"));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn malformed_dns_record_in_state_is_conversion_error() {
    let transport = ScriptedTransport::new();
    let engine = engine(transport.clone(), 1);

    let prior = attrs(json!({
        "id": 5,
        "account_id": 1,
        "name": "example.com",
        "dns_records": {"cname": [{"record_type": "CNAME"}], "mx": [], "txt": []},
    }));

    let response = engine.read("mailtrap_sending_domain", Some(&prior)).await;
    assert_eq!(response.diagnostics.iter().next().unwrap().summary, "Conversion Error");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn empty_success_body_is_conversion_error() {
    let transport = ScriptedTransport::new();
    transport.respond_raw(200, "");
    let engine = engine(transport.clone(), 1);

    let response = engine
        .create("mailtrap_sending_domain", None, &attrs(json!({"name": "example.com"})))
        .await;

    assert!(response.state.is_none());
    let diag = response.diagnostics.iter().next().unwrap();
    assert_eq!(diag.summary, "Conversion Error");
    assert!(diag.detail.contains("sending domain"));
}
