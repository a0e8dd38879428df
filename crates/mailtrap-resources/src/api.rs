//! Wire models of the Mailtrap REST API
//!
//! Response fields other than `id` default when absent, matching how the API
//! omits empty values; a missing `id` or a type mismatch is a decode error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// `null` decodes like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `/api/accounts` entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub access_levels: Vec<i64>,
}

/// Project share links
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareLinks {
    #[serde(default, deserialize_with = "null_as_default")]
    pub admin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub viewer: String,
}

/// Project as returned by the API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub share_links: ShareLinks,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inboxes: Vec<Inbox>,
}

/// Inbox as returned by the API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Inbox {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_size: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub email_username: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_username_enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sent_messages_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub forwarded_messages_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub used: bool,
    #[serde(default)]
    pub forward_from_email_address: Option<String>,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub pop3_domain: Option<String>,
    #[serde(default)]
    pub email_domain: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub smtp_ports: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pop3_ports: Vec<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Vec<String>,
}

/// One DNS record required for domain verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    pub record_type: String,
    pub hostname: String,
    pub value: String,
    pub status: String,
}

/// DNS records grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecords {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cname: Vec<DnsRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mx: Vec<DnsRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub txt: Vec<DnsRecord>,
}

/// Verification status per record category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cname: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mx: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub txt: bool,
}

/// Sending domain as returned by the API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SendingDomain {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub cname: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub compliance_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dns_records: DnsRecords,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dns_status: DnsStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `{"project": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRequest {
    pub project: ProjectBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectBody {
    pub name: String,
}

/// `{"inbox": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct InboxRequest {
    pub inbox: InboxBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct InboxBody {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_username: Option<String>,
}

/// `{"sending_domain": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct SendingDomainRequest {
    pub sending_domain: SendingDomainBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendingDomainBody {
    pub domain_name: String,
}
