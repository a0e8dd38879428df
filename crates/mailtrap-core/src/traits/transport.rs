// # Transport Trait
//
// Defines the single request/response exchange the reconcilers build on.
//
// ## Implementations
//
// - HTTP: `mailtrap-http` crate (reqwest)
// - Tests: scripted in-memory doubles
//
// ## Contract
//
// `execute(method, path, body?) -> (status, raw payload)`. A transport only
// fails with `Error::Transport` when no response was obtained; non-2xx
// responses are returned as-is and classified by `RemoteClient`.

use async_trait::async_trait;

/// HTTP method of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case method name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status and raw body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, verbatim
    pub body: String,
}

impl RawResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for transport implementations
///
/// # Thread Safety
///
/// Configuration (base endpoints, credential, timeout) is fixed at
/// construction; implementations are shared read-only across concurrent
/// operations on different resources.
///
/// # Single Attempt
///
/// One call is one round trip. Implementations must not retry, back off or
/// cache; a failed call fails the whole lifecycle operation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP method
    /// - `path`: absolute API path, e.g. `/api/accounts/1/projects`
    /// - `body`: JSON payload for POST/PATCH
    ///
    /// # Returns
    ///
    /// - `Ok(RawResponse)`: any response, successful or not
    /// - `Err(Error::Transport)`: no response was obtained
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<RawResponse, crate::Error>;
}
