//! Error types for the reconciliation engine
//!
//! Every failure a lifecycle operation can hit is one variant of [`Error`].
//! None of them are retried internally; the engine turns them into
//! diagnostics for the orchestrator (see [`Error::summary`]).

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the reconciliation engine
#[derive(Error, Debug)]
pub enum Error {
    /// Network or serialization failure before a response was obtained
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response from the remote service
    #[error("API error ({status}): {message}")]
    Remote {
        /// HTTP status code
        status: u16,
        /// Message extracted from the error envelope
        message: String,
    },

    /// Account id could not be resolved from the resource or the provider default
    #[error(
        "Account ID must be provided either in the resource configuration or provider configuration"
    )]
    MissingScope,

    /// Malformed import identifier
    #[error("Invalid import ID: {component} {reason} (got {value:?}, expected account_id/resource_id)")]
    InvalidImportId {
        /// Which part of the identifier failed ("format", "account ID", "resource ID")
        component: &'static str,
        /// The offending input
        value: String,
        /// Why it failed
        reason: String,
    },

    /// Shape conversion failure between remote and local representations
    #[error("Codec error: {0}")]
    Codec(String),

    /// Lookup among a listed collection yielded no match
    #[error("{0}")]
    NotFoundLocally(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Declared configuration rejected by the schema
    #[error("Invalid configuration: {0}")]
    InvalidPlan(String),

    /// Verb invoked in a lifecycle state that does not allow it
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Unknown resource or data source type name
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a remote error
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid import id error
    pub fn invalid_import_id(
        component: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidImportId {
            component,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a codec error
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFoundLocally(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid plan error
    pub fn invalid_plan(msg: impl Into<String>) -> Self {
        Self::InvalidPlan(msg.into())
    }

    /// Create a lifecycle error
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Short title used as the diagnostic summary
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Transport(_) | Self::Remote { .. } => "Client Error",
            Self::MissingScope => "Missing Account ID",
            Self::InvalidImportId { component, .. } => match *component {
                "account ID" => "Invalid Account ID",
                "resource ID" => "Invalid Resource ID",
                _ => "Incorrect Import ID",
            },
            Self::Codec(_) => "Conversion Error",
            Self::NotFoundLocally(_) => "Not Found",
            Self::Config(_) => "Provider Configuration Error",
            Self::InvalidPlan(_) => "Invalid Configuration",
            Self::Lifecycle(_) => "Invalid Lifecycle Transition",
            Self::UnknownType(_) => "Unknown Type",
            Self::Other(_) => "Error",
        }
    }

    /// HTTP status for remote errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
