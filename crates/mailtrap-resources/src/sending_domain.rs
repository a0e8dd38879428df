//! `mailtrap_sending_domain`
//!
//! The API can create and read sending domains but neither change nor delete
//! them. Renaming a domain replaces it; destroying one drops it from state and
//! leaves it in Mailtrap.

use mailtrap_core::schema::{AttributeSchema, AttributeType, ResourceSchema};
use mailtrap_core::{Field, ImportId, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api;
use crate::codec::{self, DnsRecords, DnsStatus};
use crate::reconciler::{Capabilities, ResourceKind, required};

/// Resource schema
pub static SENDING_DOMAIN_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "mailtrap_sending_domain",
    description: "Sending domain resource",
    attributes: &[
        AttributeSchema::computed("id", AttributeType::Int64, "Sending domain identifier").sticky(),
        AttributeSchema::optional_computed(
            "account_id",
            AttributeType::Int64,
            "Account ID for the sending domain",
        )
        .sticky()
        .force_new(),
        AttributeSchema::required("name", AttributeType::String, "Domain name (e.g. example.com)").force_new(),
        AttributeSchema::computed("cname", AttributeType::String, "CNAME value for domain verification").sticky(),
        AttributeSchema::computed("status", AttributeType::String, "Domain verification status"),
        AttributeSchema::computed("compliance_status", AttributeType::String, "Domain compliance status"),
        AttributeSchema::computed(
            "dns_records",
            AttributeType::Object,
            "DNS records required for domain verification",
        ),
        AttributeSchema::computed("dns_status", AttributeType::Object, "DNS verification status per category"),
        AttributeSchema::computed("created_at", AttributeType::String, "Creation timestamp"),
        AttributeSchema::computed("updated_at", AttributeType::String, "Last update timestamp"),
    ],
};

/// Data source schema
pub static SENDING_DOMAIN_LOOKUP_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "mailtrap_sending_domain",
    description: "Sending domain data source",
    attributes: &[
        AttributeSchema::required("id", AttributeType::Int64, "Sending domain identifier"),
        AttributeSchema::optional("account_id", AttributeType::Int64, "Account ID for the sending domain"),
        AttributeSchema::computed("name", AttributeType::String, "Domain name"),
        AttributeSchema::computed("cname", AttributeType::String, "CNAME value for domain verification"),
        AttributeSchema::computed("status", AttributeType::String, "Domain verification status"),
        AttributeSchema::computed("compliance_status", AttributeType::String, "Domain compliance status"),
        AttributeSchema::computed(
            "dns_records",
            AttributeType::Object,
            "DNS records required for domain verification",
        ),
        AttributeSchema::computed("dns_status", AttributeType::Object, "DNS verification status per category"),
        AttributeSchema::computed("created_at", AttributeType::String, "Creation timestamp"),
        AttributeSchema::computed("updated_at", AttributeType::String, "Last update timestamp"),
    ],
};

/// Sending domain as tracked locally
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendingDomainState {
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub id: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub account_id: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub cname: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub status: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub compliance_status: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub dns_records: Field<DnsRecords>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub dns_status: Field<DnsStatus>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub created_at: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    pub updated_at: Field<String>,
}

/// Sending domain kind
#[derive(Debug)]
pub struct SendingDomainKind;

impl ResourceKind for SendingDomainKind {
    type State = SendingDomainState;
    type Remote = api::SendingDomain;

    const NOUN: &'static str = "sending domain";
    const CAPABILITIES: Capabilities = Capabilities {
        update: false,
        delete: false,
    };

    fn schema() -> &'static ResourceSchema {
        &SENDING_DOMAIN_SCHEMA
    }

    fn account_id(state: &SendingDomainState) -> &Field<i64> {
        &state.account_id
    }

    fn id(state: &SendingDomainState) -> &Field<i64> {
        &state.id
    }

    fn seed(import: ImportId) -> SendingDomainState {
        SendingDomainState {
            id: Field::Known(import.resource_id),
            account_id: Field::Known(import.account_id),
            ..Default::default()
        }
    }

    fn create_path(account_id: i64, _planned: &SendingDomainState) -> Result<String> {
        Ok(format!("/api/accounts/{account_id}/sending_domains"))
    }

    fn item_path(account_id: i64, id: i64) -> String {
        format!("/api/accounts/{account_id}/sending_domains/{id}")
    }

    fn create_body(planned: &SendingDomainState) -> Result<Value> {
        let body = api::SendingDomainRequest {
            sending_domain: api::SendingDomainBody {
                domain_name: required(&planned.name, "name")?.clone(),
            },
        };
        Ok(serde_json::to_value(body)?)
    }

    fn refresh(state: &mut SendingDomainState, remote: api::SendingDomain, account_id: i64) {
        state.id = Field::Known(remote.id);
        state.account_id = Field::Known(account_id);
        state.name = Field::Known(remote.name);
        state.cname = remote.cname.into();
        state.status = remote.status.into();
        state.compliance_status = remote.compliance_status.into();
        state.dns_records = Field::Known(remote.dns_records.into());
        state.dns_status = Field::Known(remote.dns_status.into());
        state.created_at = codec::timestamp(remote.created_at);
        state.updated_at = codec::timestamp(remote.updated_at);
    }
}
