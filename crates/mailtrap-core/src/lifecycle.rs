//! Per-resource lifecycle state machine
//!
//! ```text
//! Unmanaged ──create──▶ Creating ──▶ Managed ◀──▶ Updating
//!     ▲  │                              │
//!     │  └──import──▶ Importing ──▶─────┘
//!     └────────────── Deleting ◀──delete─┘
//! ```
//!
//! The engine holds no state between calls, so the current state is derived
//! from whether the orchestrator supplied a prior state record.

use crate::error::{Error, Result};

/// Lifecycle verb requested by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create a new remote object
    Create,
    /// Refresh from the remote object
    Read,
    /// Apply declared changes in place
    Update,
    /// Remove the remote object
    Delete,
    /// Adopt an existing remote object
    Import,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Import => "import",
        })
    }
}

/// Lifecycle state of one resource instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Not tracked locally
    Unmanaged,
    /// Create in flight
    Creating,
    /// Tracked with known state
    Managed,
    /// Update in flight
    Updating,
    /// Delete in flight
    Deleting,
    /// Import in flight
    Importing,
}

impl Lifecycle {
    /// State implied by the presence of a prior state record
    pub fn from_prior(has_prior: bool) -> Self {
        if has_prior { Self::Managed } else { Self::Unmanaged }
    }

    /// Enter the in-flight state for `op`
    pub fn begin(self, op: Operation) -> Result<Self> {
        match (self, op) {
            (Self::Unmanaged, Operation::Create) => Ok(Self::Creating),
            (Self::Unmanaged, Operation::Import) => Ok(Self::Importing),
            (Self::Managed, Operation::Read) => Ok(Self::Managed),
            (Self::Managed, Operation::Update) => Ok(Self::Updating),
            (Self::Managed, Operation::Delete) => Ok(Self::Deleting),
            (Self::Unmanaged, _) => Err(Error::lifecycle(format!(
                "cannot {op} a resource without prior state"
            ))),
            (Self::Managed, _) => Err(Error::lifecycle(format!(
                "cannot {op} a resource that is already managed"
            ))),
            (state, _) => Err(Error::lifecycle(format!(
                "cannot {op} while another operation is in flight ({state:?})"
            ))),
        }
    }

    /// Leave the in-flight state
    pub fn finish(self, succeeded: bool) -> Self {
        match (self, succeeded) {
            (Self::Creating | Self::Importing, true) => Self::Managed,
            (Self::Creating | Self::Importing, false) => Self::Unmanaged,
            (Self::Deleting, true) => Self::Unmanaged,
            (Self::Deleting | Self::Updating | Self::Managed, _) => Self::Managed,
            (Self::Unmanaged, _) => Self::Unmanaged,
        }
    }
}
