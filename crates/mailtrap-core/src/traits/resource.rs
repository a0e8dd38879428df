// # Resource and Data Source Traits
//
// Defines the lifecycle contract every managed resource type implements and
// the read-only contract of data sources.
//
// ## Implementations
//
// - Project, inbox, sending domain: `mailtrap-resources` crate
// - Account/project/inbox/sending-domain lookups: `mailtrap-resources` crate
//
// ## Usage
//
// ```rust,ignore
// use mailtrap_core::Resource;
//
// let state = resource.create(&planned).await?;
// let refreshed = resource.read(&state).await?;
// let warnings = resource.delete(&refreshed).await?;
// ```

use async_trait::async_trait;

use crate::attributes::AttributeMap;
use crate::context::ProviderContext;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::schema::ResourceSchema;

/// Trait for managed resource types
///
/// All state travels in and out through the arguments; implementations keep
/// nothing between calls, so one instance may serve concurrent operations on
/// different resource instances.
///
/// # Single Round Trip
///
/// Each lifecycle method issues at most one remote call. Failures are
/// returned as-is; the engine turns them into diagnostics and decides what
/// state the orchestrator keeps.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Static schema of this resource type
    fn schema(&self) -> &'static ResourceSchema;

    /// Type name, e.g. `mailtrap_project`
    fn type_name(&self) -> &'static str {
        self.schema().type_name
    }

    /// Create the remote object described by `planned`
    ///
    /// # Returns
    ///
    /// - `Ok(AttributeMap)`: full state built from the remote response
    /// - `Err(Error)`: nothing may be tracked locally
    async fn create(&self, planned: &AttributeMap) -> Result<AttributeMap>;

    /// Refresh `prior` from the remote object
    ///
    /// Caller-declared scope identifiers are kept from `prior`; every other
    /// attribute is overwritten.
    async fn read(&self, prior: &AttributeMap) -> Result<AttributeMap>;

    /// Apply the user-authoritative attributes of `planned`
    async fn update(&self, planned: &AttributeMap, prior: &AttributeMap) -> Result<AttributeMap>;

    /// Delete the remote object
    ///
    /// # Returns
    ///
    /// - `Ok(Diagnostics)`: local tracking may be dropped; may carry warnings
    /// - `Err(Error)`: the remote object still exists
    async fn delete(&self, prior: &AttributeMap) -> Result<Diagnostics>;

    /// Seed identifier attributes from an `account_id/resource_id` string
    ///
    /// No remote call; the orchestrator follows up with [`Resource::read`].
    fn import(&self, id: &str) -> Result<AttributeMap>;
}

/// Trait for read-only data sources
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Static schema of this data source
    fn schema(&self) -> &'static ResourceSchema;

    /// Look up the remote object identified by `config`
    async fn read(&self, config: &AttributeMap) -> Result<AttributeMap>;
}

/// Helper trait for constructing resources bound to a provider context
pub trait ResourceFactory: Send + Sync {
    /// Schema of the resources this factory builds
    fn schema(&self) -> &'static ResourceSchema;

    /// Create a resource instance
    fn create(&self, context: &ProviderContext) -> Box<dyn Resource>;
}

/// Helper trait for constructing data sources bound to a provider context
pub trait DataSourceFactory: Send + Sync {
    /// Schema of the data sources this factory builds
    fn schema(&self) -> &'static ResourceSchema;

    /// Create a data source instance
    fn create(&self, context: &ProviderContext) -> Box<dyn DataSource>;
}
