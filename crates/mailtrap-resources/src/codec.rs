//! Nested-structure codec
//!
//! Converts composite values between their remote shape ([`crate::api`]) and
//! the shape tracked in local state:
//!
//! - share links: `{admin, viewer}`, 1:1
//! - DNS records: three ordered lists of `{priority, record_type, hostname,
//!   value, status}`; an absent remote priority is an explicit `null` locally,
//!   never zero, and empty lists stay empty lists
//! - DNS status: three booleans, 1:1
//! - ports: ordered integer lists, order preserved
//! - timestamps: RFC 3339 strings
//!
//! Remote-to-local conversion is total once the response decoded. Decoding a
//! local attribute that has the wrong shape fails with
//! [`mailtrap_core::Error::Codec`] in [`mailtrap_core::from_attributes`].

use chrono::{DateTime, SecondsFormat, Utc};
use mailtrap_core::Field;
use serde::{Deserialize, Serialize};

use crate::api;

/// Share links as tracked locally
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLinks {
    pub admin: String,
    pub viewer: String,
}

impl From<api::ShareLinks> for ShareLinks {
    fn from(remote: api::ShareLinks) -> Self {
        Self {
            admin: remote.admin,
            viewer: remote.viewer,
        }
    }
}

/// One DNS record as tracked locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Always serialized; `null` when the remote omitted it
    pub priority: Option<i64>,
    pub record_type: String,
    pub hostname: String,
    pub value: String,
    pub status: String,
}

impl From<api::DnsRecord> for DnsRecord {
    fn from(remote: api::DnsRecord) -> Self {
        Self {
            priority: remote.priority,
            record_type: remote.record_type,
            hostname: remote.hostname,
            value: remote.value,
            status: remote.status,
        }
    }
}

impl From<DnsRecord> for api::DnsRecord {
    fn from(local: DnsRecord) -> Self {
        Self {
            priority: local.priority,
            record_type: local.record_type,
            hostname: local.hostname,
            value: local.value,
            status: local.status,
        }
    }
}

/// DNS records as tracked locally
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecords {
    pub cname: Vec<DnsRecord>,
    pub mx: Vec<DnsRecord>,
    pub txt: Vec<DnsRecord>,
}

impl From<api::DnsRecords> for DnsRecords {
    fn from(remote: api::DnsRecords) -> Self {
        Self {
            cname: remote.cname.into_iter().map(Into::into).collect(),
            mx: remote.mx.into_iter().map(Into::into).collect(),
            txt: remote.txt.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<DnsRecords> for api::DnsRecords {
    fn from(local: DnsRecords) -> Self {
        Self {
            cname: local.cname.into_iter().map(Into::into).collect(),
            mx: local.mx.into_iter().map(Into::into).collect(),
            txt: local.txt.into_iter().map(Into::into).collect(),
        }
    }
}

/// DNS verification status as tracked locally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsStatus {
    pub cname: bool,
    pub mx: bool,
    pub txt: bool,
}

impl From<api::DnsStatus> for DnsStatus {
    fn from(remote: api::DnsStatus) -> Self {
        Self {
            cname: remote.cname,
            mx: remote.mx,
            txt: remote.txt,
        }
    }
}

/// Known timestamp as RFC 3339, or null
pub fn timestamp(value: Option<DateTime<Utc>>) -> Field<String> {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .into()
}
