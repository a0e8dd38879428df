//! `mailtrap_project`
//!
//! Paths: `/api/accounts/{account_id}/projects[/{id}]`. Updates are PATCHed.
//! Share links are generated once by the server and reused on every plan.

use mailtrap_core::schema::{AttributeSchema, AttributeType, ResourceSchema};
use mailtrap_core::{Field, ImportId, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api;
use crate::codec::ShareLinks;
use crate::reconciler::{ResourceKind, required};

/// Resource schema
pub static PROJECT_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "mailtrap_project",
    description: "Project resource",
    attributes: &[
        AttributeSchema::computed("id", AttributeType::Int64, "Project identifier").sticky(),
        AttributeSchema::optional_computed("account_id", AttributeType::Int64, "Account ID for the project")
            .sticky()
            .force_new(),
        AttributeSchema::required(
            "name",
            AttributeType::String,
            "Project name (min 2 characters, max 100 characters)",
        )
        .length(2, 100),
        AttributeSchema::computed("share_links", AttributeType::Object, "Share links for the project").sticky(),
        AttributeSchema::computed(
            "permissions",
            AttributeType::StringList,
            "Permissions of the API token on the project",
        ),
    ],
};

/// Data source schema
pub static PROJECT_LOOKUP_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "mailtrap_project",
    description: "Project data source",
    attributes: &[
        AttributeSchema::required("id", AttributeType::Int64, "Project identifier"),
        AttributeSchema::optional("account_id", AttributeType::Int64, "Account ID for the project"),
        AttributeSchema::computed("name", AttributeType::String, "Project name"),
        AttributeSchema::computed("share_links", AttributeType::Object, "Share links for the project"),
        AttributeSchema::computed(
            "permissions",
            AttributeType::StringList,
            "Permissions of the API token on the project",
        ),
    ],
};

/// Project as tracked locally
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub id: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub account_id: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub share_links: Field<ShareLinks>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub permissions: Field<Vec<String>>,
}

/// Project kind
#[derive(Debug)]
pub struct ProjectKind;

impl ResourceKind for ProjectKind {
    type State = ProjectState;
    type Remote = api::Project;

    const NOUN: &'static str = "project";

    fn schema() -> &'static ResourceSchema {
        &PROJECT_SCHEMA
    }

    fn account_id(state: &ProjectState) -> &Field<i64> {
        &state.account_id
    }

    fn id(state: &ProjectState) -> &Field<i64> {
        &state.id
    }

    fn seed(import: ImportId) -> ProjectState {
        ProjectState {
            id: Field::Known(import.resource_id),
            account_id: Field::Known(import.account_id),
            ..Default::default()
        }
    }

    fn create_path(account_id: i64, _planned: &ProjectState) -> Result<String> {
        Ok(format!("/api/accounts/{account_id}/projects"))
    }

    fn item_path(account_id: i64, id: i64) -> String {
        format!("/api/accounts/{account_id}/projects/{id}")
    }

    fn create_body(planned: &ProjectState) -> Result<Value> {
        let body = api::ProjectRequest {
            project: api::ProjectBody {
                name: required(&planned.name, "name")?.clone(),
            },
        };
        Ok(serde_json::to_value(body)?)
    }

    fn refresh(state: &mut ProjectState, remote: api::Project, account_id: i64) {
        state.id = Field::Known(remote.id);
        state.account_id = Field::Known(account_id);
        state.name = Field::Known(remote.name);
        state.share_links = Field::Known(remote.share_links.into());
        state.permissions = Field::Known(remote.permissions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_body_envelope() {
        let planned = ProjectState {
            name: Field::Known("alpha".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ProjectKind::create_body(&planned).unwrap(),
            json!({"project": {"name": "alpha"}})
        );
    }

    #[test]
    fn test_create_body_requires_name() {
        assert!(ProjectKind::create_body(&ProjectState::default()).is_err());
    }

    #[test]
    fn test_name_length_is_validated() {
        let mut config = mailtrap_core::AttributeMap::new();
        config.insert("name".to_string(), json!("a"));
        let diags = PROJECT_SCHEMA.validate_config(&config);
        assert!(diags.has_error());

        config.insert("name".to_string(), json!("x".repeat(101)));
        assert!(PROJECT_SCHEMA.validate_config(&config).has_error());

        config.insert("name".to_string(), json!("ok"));
        assert!(PROJECT_SCHEMA.validate_config(&config).is_empty());
    }

    #[test]
    fn test_seed_only_sets_identifiers() {
        let state = ProjectKind::seed(ImportId {
            account_id: 12,
            resource_id: 34,
        });
        let attrs = mailtrap_core::to_attributes(&state).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["account_id"], 12);
        assert_eq!(attrs["id"], 34);
    }
}
