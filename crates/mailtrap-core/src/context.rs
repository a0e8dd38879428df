//! Provider-wide context threaded into every reconciler
//!
//! Holds the shared client and the default account id. Both are fixed once
//! the provider is configured and only ever read afterwards.

use std::sync::Arc;

use crate::client::RemoteClient;
use crate::config::ProviderConfig;
use crate::error::Result;
use crate::field::Field;
use crate::scope::resolve_account_id;
use crate::traits::Transport;

/// Shared client plus default scope
#[derive(Debug, Clone)]
pub struct ProviderContext {
    client: RemoteClient,
    default_account_id: i64,
}

impl ProviderContext {
    /// Create a context from an explicit client and default account id
    pub fn new(client: RemoteClient, default_account_id: i64) -> Self {
        Self {
            client,
            default_account_id,
        }
    }

    /// Create a context for `transport` using the defaults of `config`
    pub fn from_config(transport: Arc<dyn Transport>, config: &ProviderConfig) -> Self {
        Self::new(RemoteClient::new(transport), config.default_account_id)
    }

    /// Shared client
    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    /// Default account id (0 when unset)
    pub fn default_account_id(&self) -> i64 {
        self.default_account_id
    }

    /// Resolve the effective account id of a resource
    pub fn account_id(&self, resource_level: &Field<i64>) -> Result<i64> {
        resolve_account_id(resource_level, self.default_account_id)
    }
}
