//! Configuration types for the reconciliation engine
//!
//! The orchestrator declares a provider block ([`ProviderSettings`]); it is
//! merged with the process environment into a [`ProviderConfig`] once at
//! startup and is read-only afterwards.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::schema::{AttributeSchema, AttributeType, ResourceSchema};

/// Management API base
pub const DEFAULT_BASE_URL: &str = "https://mailtrap.io";

/// Bulk/transactional sending API base
pub const BULK_SENDING_BASE_URL: &str = "https://send.api.mailtrap.io";

/// Sandbox sending API base
pub const SANDBOX_SENDING_BASE_URL: &str = "https://sandbox.api.mailtrap.io";

/// Default request timeout (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the API token
pub const ENV_API_TOKEN: &str = "MAILTRAP_API_TOKEN";

/// Environment variable holding the default account id
pub const ENV_ACCOUNT_ID: &str = "MAILTRAP_ACCOUNT_ID";

/// Environment variable overriding the management API base
pub const ENV_BASE_URL: &str = "MAILTRAP_BASE_URL";

const SEND_PATH: &str = "/api/send";
const BATCH_PATH: &str = "/api/batch";
const SANDBOX_PREFIX: &str = "/api/send/";

/// Schema of the provider block
pub static PROVIDER_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "mailtrap",
    description: "Interact with Mailtrap projects, inboxes and sending domains",
    attributes: &[
        AttributeSchema::optional(
            "api_token",
            AttributeType::String,
            "Mailtrap API token. Can also be set with the MAILTRAP_API_TOKEN environment variable.",
        )
        .sensitive(),
        AttributeSchema::optional(
            "account_id",
            AttributeType::Int64,
            "Default account ID for resources that do not set one. Can also be set with the \
             MAILTRAP_ACCOUNT_ID environment variable.",
        ),
    ],
};

/// The three physically distinct API bases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Default/management base
    #[serde(default = "default_base_url")]
    pub default: String,

    /// Base for `/api/send` and `/api/batch`
    #[serde(default = "default_bulk_sending_url")]
    pub bulk_sending: String,

    /// Base for `/api/send/{inbox_id}`
    #[serde(default = "default_sandbox_sending_url")]
    pub sandbox_sending: String,
}

impl Endpoints {
    /// Endpoints with every base pointing at the same URL (tests, proxies)
    pub fn uniform(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            default: base.clone(),
            bulk_sending: base.clone(),
            sandbox_sending: base,
        }
    }

    /// Pick the base URL for a request path
    ///
    /// `/api/send` and `/api/batch` (exact) go to the bulk sending base, any
    /// longer path under `/api/send/` goes to the sandbox base, everything
    /// else to the default base.
    pub fn route(&self, path: &str) -> &str {
        if path == SEND_PATH || path == BATCH_PATH {
            &self.bulk_sending
        } else if path.len() > SANDBOX_PREFIX.len() && path.starts_with(SANDBOX_PREFIX) {
            &self.sandbox_sending
        } else {
            &self.default
        }
    }

    /// Validate that every base is an http(s) URL
    pub fn validate(&self) -> Result<(), crate::Error> {
        for (name, url) in [
            ("default", &self.default),
            ("bulk_sending", &self.bulk_sending),
            ("sandbox_sending", &self.sandbox_sending),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "{name} endpoint must use HTTP or HTTPS scheme. Got: {url}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            default: default_base_url(),
            bulk_sending: default_bulk_sending_url(),
            sandbox_sending: default_sandbox_sending_url(),
        }
    }
}

/// Provider block as declared by the orchestrator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// API token (falls back to `MAILTRAP_API_TOKEN`)
    #[serde(default)]
    pub api_token: Option<String>,

    /// Default account id (falls back to `MAILTRAP_ACCOUNT_ID`)
    #[serde(default)]
    pub account_id: Option<i64>,
}

/// Resolved provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API token sent as the `Api-Token` header
    pub api_token: String,

    /// Shared default account id; 0 means "none"
    #[serde(default)]
    pub default_account_id: i64,

    /// API bases
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// The token never appears in Debug output
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &"<REDACTED>")
            .field("default_account_id", &self.default_account_id)
            .field("endpoints", &self.endpoints)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a configuration with default endpoints and timeout
    pub fn new(api_token: impl Into<String>, default_account_id: i64) -> Self {
        Self {
            api_token: api_token.into(),
            default_account_id,
            endpoints: Endpoints::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Merge a declared provider block with the environment
    ///
    /// Declared values win over environment values. `env` is a lookup
    /// function so callers can pass `std::env::var(..).ok()` or a fixture.
    pub fn resolve(
        settings: &ProviderSettings,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, crate::Error> {
        let api_token = settings
            .api_token
            .clone()
            .or_else(|| env(ENV_API_TOKEN))
            .unwrap_or_default();

        if api_token.is_empty() {
            return Err(crate::Error::config(format!(
                "Missing Mailtrap API Token: set api_token in the provider configuration \
                 or the {ENV_API_TOKEN} environment variable"
            )));
        }

        let env_account_id = match env(ENV_ACCOUNT_ID).filter(|s| !s.is_empty()) {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                crate::Error::config(format!(
                    "Invalid Account ID: the {ENV_ACCOUNT_ID} environment variable contains an invalid value: {raw}"
                ))
            })?,
            None => 0,
        };

        let mut config = Self::new(api_token, settings.account_id.unwrap_or(env_account_id));

        if let Some(base) = env(ENV_BASE_URL).filter(|s| !s.is_empty()) {
            config.endpoints.default = base;
        }

        config.validate()?;
        Ok(config)
    }

    /// Override the endpoints
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_token.is_empty() {
            return Err(crate::Error::config("API token cannot be empty"));
        }
        if self.default_account_id < 0 {
            return Err(crate::Error::config("Default account ID cannot be negative"));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Request timeout must be > 0"));
        }
        self.endpoints.validate()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_bulk_sending_url() -> String {
    BULK_SENDING_BASE_URL.to_string()
}

fn default_sandbox_sending_url() -> String {
    SANDBOX_SENDING_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_send_and_batch_route_to_bulk_base() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.route("/api/send"), BULK_SENDING_BASE_URL);
        assert_eq!(endpoints.route("/api/batch"), BULK_SENDING_BASE_URL);
    }

    #[test]
    fn test_send_prefix_routes_to_sandbox_base() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.route("/api/send/123"), SANDBOX_SENDING_BASE_URL);
        assert_eq!(endpoints.route("/api/send/123/batch"), SANDBOX_SENDING_BASE_URL);
    }

    #[test]
    fn test_other_paths_route_to_default_base() {
        let endpoints = Endpoints::default();
        for path in [
            "/api/accounts",
            "/api/accounts/1/projects",
            "/api/sendx",
            "/api/batch/1",
            "/api/send/",
            "/api",
            "/",
            "",
        ] {
            assert_eq!(endpoints.route(path), DEFAULT_BASE_URL, "path {path:?}");
        }
    }

    #[test]
    fn test_resolve_prefers_declared_values() {
        let env = env_from(&[(ENV_API_TOKEN, "env-token"), (ENV_ACCOUNT_ID, "7")]);
        let settings = ProviderSettings {
            api_token: Some("declared-token".to_string()),
            account_id: Some(42),
        };

        let config = ProviderConfig::resolve(&settings, env).unwrap();
        assert_eq!(config.api_token, "declared-token");
        assert_eq!(config.default_account_id, 42);
    }

    #[test]
    fn test_resolve_falls_back_to_env() {
        let env = env_from(&[
            (ENV_API_TOKEN, "env-token"),
            (ENV_ACCOUNT_ID, "7"),
            (ENV_BASE_URL, "http://localhost:9999"),
        ]);

        let config = ProviderConfig::resolve(&ProviderSettings::default(), env).unwrap();
        assert_eq!(config.api_token, "env-token");
        assert_eq!(config.default_account_id, 7);
        assert_eq!(config.endpoints.default, "http://localhost:9999");
        assert_eq!(config.endpoints.bulk_sending, BULK_SENDING_BASE_URL);
    }

    #[test]
    fn test_resolve_missing_token() {
        let err = ProviderConfig::resolve(&ProviderSettings::default(), env_from(&[])).unwrap_err();
        assert!(err.to_string().contains("Missing Mailtrap API Token"));
    }

    #[test]
    fn test_resolve_invalid_env_account_id() {
        let env = env_from(&[(ENV_API_TOKEN, "t"), (ENV_ACCOUNT_ID, "abc")]);
        let err = ProviderConfig::resolve(&ProviderSettings::default(), env).unwrap_err();
        assert!(err.to_string().contains("Invalid Account ID"));
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let config = ProviderConfig::new("secret_token_12345", 1);
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("ProviderConfig"));
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let config = ProviderConfig::new("t", 0).with_endpoints(Endpoints::uniform("ftp://x"));
        assert!(config.validate().is_err());
    }
}
