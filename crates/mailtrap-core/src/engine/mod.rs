//! Orchestrator-facing engine
//!
//! The Engine is responsible for:
//! - Exposing the static schemas once at startup
//! - Validating and planning declared configuration
//! - Dispatching lifecycle verbs to the registered resource types
//! - Turning every failure into diagnostics
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   verb + records   ┌──────────┐   Box<dyn Resource>   ┌──────────────┐
//! │ Orchestrator │───────────────────▶│  Engine  │──────────────────────▶│  Reconciler  │
//! └──────────────┘◀───────────────────└──────────┘                       └──────────────┘
//!                   Response { state,        │                                  │
//!                   diagnostics }            ▼                                  ▼
//!                                     ┌──────────────┐                  ┌──────────────┐
//!                                     │ TypeRegistry │                  │ RemoteClient │
//!                                     └──────────────┘                  └──────────────┘
//! ```
//!
//! ## Partial Success
//!
//! | verb   | on success          | on failure      |
//! |--------|---------------------|-----------------|
//! | create | new state           | no state        |
//! | read   | refreshed state     | no new state    |
//! | update | refreshed state     | no new state    |
//! | delete | no state (+warnings)| prior state     |
//! | import | seeded identifiers  | no state        |

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::attributes::AttributeMap;
use crate::config::PROVIDER_SCHEMA;
use crate::context::ProviderContext;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::lifecycle::{Lifecycle, Operation};
use crate::registry::TypeRegistry;
use crate::schema::{Plan, ResourceSchema};

/// Result of a lifecycle verb
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// State the orchestrator should track afterwards; `None` means none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<AttributeMap>,

    /// Errors and warnings
    #[serde(default, skip_serializing_if = "Diagnostics::is_empty")]
    pub diagnostics: Diagnostics,
}

impl Response {
    fn with_state(state: AttributeMap) -> Self {
        Self {
            state: Some(state),
            diagnostics: Diagnostics::new(),
        }
    }

    /// `true` if any diagnostic is an error
    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}

/// Result of planning
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanResponse {
    /// The plan, absent when the configuration was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,

    /// Errors and warnings
    #[serde(skip_serializing_if = "Diagnostics::is_empty")]
    pub diagnostics: Diagnostics,
}

/// Every schema the provider exposes
#[derive(Debug, Clone, Serialize)]
pub struct SchemaSet {
    /// Provider block
    pub provider: &'static ResourceSchema,
    /// Managed resource types
    pub resources: Vec<&'static ResourceSchema>,
    /// Read-only data sources
    pub data_sources: Vec<&'static ResourceSchema>,
}

/// Core reconciliation engine
///
/// Holds no per-resource state; every verb receives the records it needs and
/// returns the records the orchestrator should keep. Verbs for distinct
/// resource instances may run concurrently.
#[derive(Debug)]
pub struct Engine {
    /// Resource and data source factories
    registry: TypeRegistry,

    /// Shared client and default scope
    context: ProviderContext,
}

impl Engine {
    /// Create a new engine
    pub fn new(registry: TypeRegistry, context: ProviderContext) -> Self {
        Self { registry, context }
    }

    /// Registered types
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Static schemas of the provider, resources and data sources
    pub fn schemas(&self) -> SchemaSet {
        SchemaSet {
            provider: &PROVIDER_SCHEMA,
            resources: self.registry.resource_schemas(),
            data_sources: self.registry.data_source_schemas(),
        }
    }

    /// Validate a declared resource configuration
    pub fn validate(&self, type_name: &str, config: &AttributeMap) -> Diagnostics {
        match self.registry.resource_schema(type_name) {
            Some(schema) => schema.validate_config(config),
            None => Error::UnknownType(format!("resource type {type_name}")).into(),
        }
    }

    /// Validate a declared data source configuration
    pub fn validate_data_source(&self, type_name: &str, config: &AttributeMap) -> Diagnostics {
        match self.registry.data_source_schema(type_name) {
            Some(schema) => schema.validate_config(config),
            None => Error::UnknownType(format!("data source type {type_name}")).into(),
        }
    }

    /// Plan a declared configuration against the prior state
    pub fn plan(
        &self,
        type_name: &str,
        prior: Option<&AttributeMap>,
        config: &AttributeMap,
    ) -> PlanResponse {
        let Some(schema) = self.registry.resource_schema(type_name) else {
            return PlanResponse {
                plan: None,
                diagnostics: Error::UnknownType(format!("resource type {type_name}")).into(),
            };
        };

        let diagnostics = schema.validate_planned(config);
        if diagnostics.has_error() {
            return PlanResponse {
                plan: None,
                diagnostics,
            };
        }

        match schema.plan(prior, config) {
            Ok(plan) => {
                debug!("Planned {:?} for {}", plan.action, type_name);
                PlanResponse {
                    plan: Some(plan),
                    diagnostics,
                }
            }
            Err(err) => PlanResponse {
                plan: None,
                diagnostics: err.into(),
            },
        }
    }

    /// Create a remote object
    pub async fn create(
        &self,
        type_name: &str,
        prior: Option<&AttributeMap>,
        planned: &AttributeMap,
    ) -> Response {
        let outcome = self.try_create(type_name, prior, planned).await;
        self.settle(type_name, Operation::Create, outcome, None)
    }

    /// Refresh tracked state from the remote object
    pub async fn read(&self, type_name: &str, prior: Option<&AttributeMap>) -> Response {
        let outcome = self.try_read(type_name, prior).await;
        self.settle(type_name, Operation::Read, outcome, None)
    }

    /// Apply a planned in-place update
    pub async fn update(
        &self,
        type_name: &str,
        prior: Option<&AttributeMap>,
        planned: &AttributeMap,
    ) -> Response {
        let outcome = self.try_update(type_name, prior, planned).await;
        self.settle(type_name, Operation::Update, outcome, None)
    }

    /// Delete a remote object; prior state is returned on failure
    pub async fn delete(&self, type_name: &str, prior: Option<&AttributeMap>) -> Response {
        let outcome = self.try_delete(type_name, prior).await;
        self.settle(type_name, Operation::Delete, outcome, prior)
    }

    /// Adopt an existing remote object from an import identifier
    pub fn import(&self, type_name: &str, prior: Option<&AttributeMap>, id: &str) -> Response {
        let outcome = self.try_import(type_name, prior, id);
        self.settle(type_name, Operation::Import, outcome, None)
    }

    /// Look up a remote object through a data source
    pub async fn read_data_source(&self, type_name: &str, config: &AttributeMap) -> Response {
        let outcome = self.try_read_data_source(type_name, config).await;
        match outcome {
            Ok(state) => {
                info!("Data source {} read", type_name);
                Response::with_state(state)
            }
            Err(err) => {
                error!("Data source {} read failed: {}", type_name, err);
                Response {
                    state: None,
                    diagnostics: err.into(),
                }
            }
        }
    }

    async fn try_create(
        &self,
        type_name: &str,
        prior: Option<&AttributeMap>,
        planned: &AttributeMap,
    ) -> Result<Response> {
        let lifecycle = Self::begin(prior, Operation::Create)?;
        let resource = self.registry.create_resource(type_name, &self.context)?;

        let result = resource.create(planned).await;
        Self::finish(type_name, lifecycle, result.is_ok());
        Ok(Response::with_state(result?))
    }

    async fn try_read(&self, type_name: &str, prior: Option<&AttributeMap>) -> Result<Response> {
        let lifecycle = Self::begin(prior, Operation::Read)?;
        let prior = Self::require_prior(prior)?;
        let resource = self.registry.create_resource(type_name, &self.context)?;

        let result = resource.read(prior).await;
        Self::finish(type_name, lifecycle, result.is_ok());
        Ok(Response::with_state(result?))
    }

    async fn try_update(
        &self,
        type_name: &str,
        prior: Option<&AttributeMap>,
        planned: &AttributeMap,
    ) -> Result<Response> {
        let lifecycle = Self::begin(prior, Operation::Update)?;
        let prior = Self::require_prior(prior)?;
        let resource = self.registry.create_resource(type_name, &self.context)?;

        let result = resource.update(planned, prior).await;
        Self::finish(type_name, lifecycle, result.is_ok());
        Ok(Response::with_state(result?))
    }

    async fn try_delete(&self, type_name: &str, prior: Option<&AttributeMap>) -> Result<Response> {
        let lifecycle = Self::begin(prior, Operation::Delete)?;
        let prior = Self::require_prior(prior)?;
        let resource = self.registry.create_resource(type_name, &self.context)?;

        let result = resource.delete(prior).await;
        Self::finish(type_name, lifecycle, result.is_ok());
        Ok(Response {
            state: None,
            diagnostics: result?,
        })
    }

    fn try_import(&self, type_name: &str, prior: Option<&AttributeMap>, id: &str) -> Result<Response> {
        let lifecycle = Self::begin(prior, Operation::Import)?;
        let resource = self.registry.create_resource(type_name, &self.context)?;

        let result = resource.import(id);
        Self::finish(type_name, lifecycle, result.is_ok());
        Ok(Response::with_state(result?))
    }

    async fn try_read_data_source(&self, type_name: &str, config: &AttributeMap) -> Result<AttributeMap> {
        let source = self.registry.create_data_source(type_name, &self.context)?;
        source.schema().validate_config(config).into_result()?;
        source.read(config).await
    }

    fn begin(prior: Option<&AttributeMap>, op: Operation) -> Result<Lifecycle> {
        Lifecycle::from_prior(prior.is_some()).begin(op)
    }

    fn require_prior(prior: Option<&AttributeMap>) -> Result<&AttributeMap> {
        prior.ok_or_else(|| Error::lifecycle("prior state is required"))
    }

    fn finish(type_name: &str, lifecycle: Lifecycle, succeeded: bool) {
        let next = lifecycle.finish(succeeded);
        debug!("{}: {:?} -> {:?}", type_name, lifecycle, next);
    }

    fn settle(
        &self,
        type_name: &str,
        op: Operation,
        outcome: Result<Response>,
        fallback: Option<&AttributeMap>,
    ) -> Response {
        match outcome {
            Ok(response) => {
                info!("{} {} completed", type_name, op);
                response
            }
            Err(err) => {
                error!("{} {} failed: {}", type_name, op, err);
                Response {
                    state: fallback.cloned(),
                    diagnostics: err.into(),
                }
            }
        }
    }
}
