// # HTTP Transport
//
// This crate provides the reqwest-based `Transport` for the Mailtrap REST API.
//
// ## Request Shape
//
// - Base URL picked per path by `Endpoints::route` (management, bulk
//   sending or sandbox sending)
// - `Api-Token: <token>` on every request
// - `Content-Type: application/json` and `Accept: application/json`
// - Fixed per-request timeout from `ProviderConfig` (30 seconds by default)
//
// ## Responsibilities
//
// One call is one round trip. Status classification, error-envelope parsing
// and body decoding belong to `RemoteClient`; this crate only moves bytes.
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output

use async_trait::async_trait;
use mailtrap_core::config::{Endpoints, ProviderConfig};
use mailtrap_core::traits::{Method, RawResponse, Transport};
use mailtrap_core::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Header carrying the API token
pub const API_TOKEN_HEADER: &str = "Api-Token";

/// HTTP transport for the Mailtrap API
///
/// Configuration is fixed at construction; the transport is shared
/// read-only by every reconciler.
pub struct HttpTransport {
    /// API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API bases
    endpoints: Endpoints,

    /// Per-request timeout
    timeout: Duration,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_token", &"<REDACTED>")
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport from a resolved provider configuration
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the configuration is invalid
    /// - `Error::Transport` if the HTTP client cannot be built
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_token: config.api_token.clone(),
            endpoints: config.endpoints.clone(),
            timeout: config.timeout(),
            client,
        })
    }

    /// Full URL for a request path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.route(path).trim_end_matches('/'), path)
    }

    fn map_send_error(&self, method: Method, path: &str, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::transport(format!(
                "{method} {path} timed out after {}s",
                self.timeout.as_secs()
            ))
        } else {
            Error::transport(format!("{method} {path} failed: {err}"))
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<RawResponse> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(to_reqwest(method), &url)
            .header(API_TOKEN_HEADER, &self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_send_error(method, path, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response body: {e}")))?;

        tracing::debug!("{} {} -> {} ({} bytes)", method, path, status, body.len());
        Ok(RawResponse::new(status, body))
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}
