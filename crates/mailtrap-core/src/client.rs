//! JSON request helpers on top of a [`Transport`]
//!
//! [`RemoteClient`] serializes payloads, classifies responses and decodes
//! successful bodies. Non-2xx bodies are resolved once into an
//! [`ErrorEnvelope`] and surfaced as [`Error::Remote`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::traits::{Method, RawResponse, Transport};

/// Shape of an error response body
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorEnvelope {
    /// `{"error": "..."}`
    Error(String),
    /// `{"message": "..."}`
    Message(String),
    /// `{"errors": <any>}`
    Errors(Value),
    /// None of the above; raw body
    Unparsed(String),
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorEnvelope {
    /// Classify an error response body
    pub fn parse(body: &str) -> Self {
        if let Ok(raw) = serde_json::from_str::<RawEnvelope>(body) {
            if let Some(error) = raw.error.filter(|s| !s.is_empty()) {
                return Self::Error(error);
            }
            if let Some(message) = raw.message.filter(|s| !s.is_empty()) {
                return Self::Message(message);
            }
            if let Some(errors) = raw.errors.filter(|v| !v.is_null()) {
                return Self::Errors(errors);
            }
        }
        Self::Unparsed(body.to_string())
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        match self {
            Self::Error(s) | Self::Message(s) | Self::Unparsed(s) => s.clone(),
            Self::Errors(v) => render_errors(v),
        }
    }
}

fn render_errors(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render_errors).collect::<Vec<_>>().join("; "),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}: {}", render_errors(v)))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Map a non-2xx response to [`Error::Remote`]
pub fn check_status(response: &RawResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    let envelope = ErrorEnvelope::parse(&response.body);
    Err(Error::remote(response.status, envelope.message()))
}

/// Turn a raw response into decoded data or a remote error
///
/// An empty success body is success with no data.
pub fn handle_response<T: DeserializeOwned>(response: RawResponse) -> Result<Option<T>> {
    check_status(&response)?;

    if response.body.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(|e| Error::codec(format!("failed to unmarshal response: {e}")))
}

/// JSON client shared by every reconciler
#[derive(Clone)]
pub struct RemoteClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient").finish_non_exhaustive()
    }
}

impl RemoteClient {
    /// Wrap a transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// GET `path`
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.send(Method::Get, path, None).await
    }

    /// POST `body` to `path`
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<Option<T>> {
        self.send(Method::Post, path, Some(body)).await
    }

    /// PATCH `body` to `path`
    pub async fn patch<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<Option<T>> {
        self.send(Method::Patch, path, Some(body)).await
    }

    /// DELETE `path`, discarding any response body
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.execute(Method::Delete, path, None).await?;
        check_status(&response)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<T>> {
        let response = self.execute(method, path, body).await?;
        handle_response(response)
    }

    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<RawResponse> {
        let response = self.transport.execute(method, path, body).await?;
        if !response.is_success() {
            tracing::debug!("{} {} failed with status {}", method, path, response.status);
        }
        Ok(response)
    }
}
