//! Account scope resolution and import identifiers
//!
//! Every resource lives under exactly one account. The effective account id
//! is the resource-level value when it is known and non-zero, otherwise the
//! provider-wide default.

use crate::Field;
use crate::error::{Error, Result};

/// Resolve the effective account id for an operation
pub fn resolve_account_id(resource_level: &Field<i64>, default_account_id: i64) -> Result<i64> {
    match resource_level.known() {
        Some(&id) if id > 0 => Ok(id),
        _ if default_account_id > 0 => Ok(default_account_id),
        _ => Err(Error::MissingScope),
    }
}

/// Parsed `"<account_id>/<resource_id>"` import identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportId {
    /// Account the resource belongs to
    pub account_id: i64,
    /// Remote id of the resource
    pub resource_id: i64,
}

impl ImportId {
    /// Parse an import identifier
    ///
    /// Exactly two `/`-separated positive base-10 integers are accepted.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split('/').collect();
        let [account, resource] = parts.as_slice() else {
            return Err(Error::invalid_import_id(
                "format",
                raw,
                format!("must have exactly two components, found {}", parts.len()),
            ));
        };

        let account_id = account.parse::<i64>().map_err(|e| {
            Error::invalid_import_id("account ID", raw, format!("could not be parsed: {e}"))
        })?;
        let resource_id = resource.parse::<i64>().map_err(|e| {
            Error::invalid_import_id("resource ID", raw, format!("could not be parsed: {e}"))
        })?;

        if account_id <= 0 {
            return Err(Error::invalid_import_id("account ID", raw, "must be a positive integer"));
        }
        if resource_id <= 0 {
            return Err(Error::invalid_import_id("resource ID", raw, "must be a positive integer"));
        }

        Ok(Self {
            account_id,
            resource_id,
        })
    }
}

impl std::str::FromStr for ImportId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ImportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.account_id, self.resource_id)
    }
}
