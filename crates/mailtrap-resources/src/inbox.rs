//! `mailtrap_inbox`
//!
//! Created under a project (`/api/accounts/{a}/projects/{p}/inboxes`), then
//! addressed directly (`/api/accounts/{a}/inboxes/{id}`). Moving an inbox to
//! another project replaces it.

use mailtrap_core::schema::{AttributeSchema, AttributeType, ResourceSchema};
use mailtrap_core::{Field, ImportId, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api;
use crate::reconciler::{ResourceKind, required};

/// Resource schema
pub static INBOX_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "mailtrap_inbox",
    description: "Inbox resource",
    attributes: &[
        AttributeSchema::computed("id", AttributeType::Int64, "Inbox identifier").sticky(),
        AttributeSchema::optional_computed("account_id", AttributeType::Int64, "Account ID for the inbox")
            .sticky()
            .force_new(),
        AttributeSchema::required("project_id", AttributeType::Int64, "Project ID for the inbox").force_new(),
        AttributeSchema::required("name", AttributeType::String, "Inbox name"),
        AttributeSchema::computed("username", AttributeType::String, "SMTP username for the inbox").sticky(),
        AttributeSchema::computed("password", AttributeType::String, "SMTP password for the inbox")
            .sticky()
            .sensitive(),
        AttributeSchema::optional_computed(
            "email_username",
            AttributeType::String,
            "Email username part (before @) for the inbox email address",
        ),
        AttributeSchema::computed(
            "email_username_enabled",
            AttributeType::Bool,
            "Whether email username is enabled",
        )
        .sticky(),
        AttributeSchema::computed("domain", AttributeType::String, "Domain for SMTP").sticky(),
        AttributeSchema::computed("email_domain", AttributeType::String, "Email domain").sticky(),
        AttributeSchema::computed("pop3_domain", AttributeType::String, "POP3 domain").sticky(),
        AttributeSchema::computed("smtp_ports", AttributeType::Int64List, "Available SMTP ports").sticky(),
        AttributeSchema::computed("pop3_ports", AttributeType::Int64List, "Available POP3 ports").sticky(),
        AttributeSchema::computed("status", AttributeType::String, "Inbox status").sticky(),
        AttributeSchema::computed("max_size", AttributeType::Int64, "Maximum inbox size").sticky(),
        AttributeSchema::computed("sent_messages_count", AttributeType::Int64, "Number of sent messages"),
        AttributeSchema::computed(
            "forwarded_messages_count",
            AttributeType::Int64,
            "Number of forwarded messages",
        ),
        AttributeSchema::computed(
            "forward_from_email_address",
            AttributeType::String,
            "Email address used for forwarding",
        )
        .sticky(),
        AttributeSchema::computed(
            "permissions",
            AttributeType::StringList,
            "Permissions of the API token on the inbox",
        ),
    ],
};

/// Data source schema
pub static INBOX_LOOKUP_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "mailtrap_inbox",
    description: "Inbox data source",
    attributes: &[
        AttributeSchema::required("id", AttributeType::Int64, "Inbox identifier"),
        AttributeSchema::optional("account_id", AttributeType::Int64, "Account ID for the inbox"),
        AttributeSchema::computed("project_id", AttributeType::Int64, "Project ID for the inbox"),
        AttributeSchema::computed("name", AttributeType::String, "Inbox name"),
        AttributeSchema::computed("username", AttributeType::String, "SMTP username for the inbox"),
        AttributeSchema::computed("password", AttributeType::String, "SMTP password for the inbox").sensitive(),
        AttributeSchema::computed("email_username", AttributeType::String, "Email username"),
        AttributeSchema::computed(
            "email_username_enabled",
            AttributeType::Bool,
            "Whether email username is enabled",
        ),
        AttributeSchema::computed("domain", AttributeType::String, "Domain for SMTP"),
        AttributeSchema::computed("email_domain", AttributeType::String, "Email domain"),
        AttributeSchema::computed("pop3_domain", AttributeType::String, "POP3 domain"),
        AttributeSchema::computed("smtp_ports", AttributeType::Int64List, "Available SMTP ports"),
        AttributeSchema::computed("pop3_ports", AttributeType::Int64List, "Available POP3 ports"),
        AttributeSchema::computed("status", AttributeType::String, "Inbox status"),
        AttributeSchema::computed("max_size", AttributeType::Int64, "Maximum inbox size"),
        AttributeSchema::computed("sent_messages_count", AttributeType::Int64, "Number of sent messages"),
        AttributeSchema::computed(
            "forwarded_messages_count",
            AttributeType::Int64,
            "Number of forwarded messages",
        ),
        AttributeSchema::computed(
            "forward_from_email_address",
            AttributeType::String,
            "Email address used for forwarding",
        ),
        AttributeSchema::computed(
            "permissions",
            AttributeType::StringList,
            "Permissions of the API token on the inbox",
        ),
    ],
};

/// Inbox as tracked locally
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboxState {
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub id: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub account_id: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub project_id: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub username: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub password: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub email_username: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub email_username_enabled: Field<bool>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub domain: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub email_domain: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub pop3_domain: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub smtp_ports: Field<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub pop3_ports: Field<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub status: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub max_size: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub sent_messages_count: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub forwarded_messages_count: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub forward_from_email_address: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub permissions: Field<Vec<String>>,
}

/// Inbox kind
#[derive(Debug)]
pub struct InboxKind;

impl ResourceKind for InboxKind {
    type State = InboxState;
    type Remote = api::Inbox;

    const NOUN: &'static str = "inbox";

    fn schema() -> &'static ResourceSchema {
        &INBOX_SCHEMA
    }

    fn account_id(state: &InboxState) -> &Field<i64> {
        &state.account_id
    }

    fn id(state: &InboxState) -> &Field<i64> {
        &state.id
    }

    fn seed(import: ImportId) -> InboxState {
        InboxState {
            id: Field::Known(import.resource_id),
            account_id: Field::Known(import.account_id),
            ..Default::default()
        }
    }

    fn create_path(account_id: i64, planned: &InboxState) -> Result<String> {
        let project_id = required(&planned.project_id, "project_id")?;
        Ok(format!("/api/accounts/{account_id}/projects/{project_id}/inboxes"))
    }

    fn item_path(account_id: i64, id: i64) -> String {
        format!("/api/accounts/{account_id}/inboxes/{id}")
    }

    fn create_body(planned: &InboxState) -> Result<Value> {
        let body = api::InboxRequest {
            inbox: api::InboxBody {
                name: required(&planned.name, "name")?.clone(),
                email_username: planned.email_username.known().cloned(),
            },
        };
        Ok(serde_json::to_value(body)?)
    }

    fn refresh(state: &mut InboxState, remote: api::Inbox, account_id: i64) {
        state.id = Field::Known(remote.id);
        state.account_id = Field::Known(account_id);
        // Some responses omit the owning project
        if let Some(project_id) = remote.project_id {
            state.project_id = Field::Known(project_id);
        }
        state.name = Field::Known(remote.name);
        state.username = remote.username.into();
        state.password = remote.password.into();
        state.email_username = remote.email_username.into();
        state.email_username_enabled = Field::Known(remote.email_username_enabled);
        state.domain = remote.domain.into();
        state.email_domain = remote.email_domain.into();
        state.pop3_domain = remote.pop3_domain.into();
        state.smtp_ports = Field::Known(remote.smtp_ports);
        state.pop3_ports = Field::Known(remote.pop3_ports);
        state.status = remote.status.into();
        state.max_size = Field::Known(remote.max_size);
        state.sent_messages_count = Field::Known(remote.sent_messages_count);
        state.forwarded_messages_count = Field::Known(remote.forwarded_messages_count);
        state.forward_from_email_address = remote.forward_from_email_address.into();
        state.permissions = Field::Known(remote.permissions);
    }
}
