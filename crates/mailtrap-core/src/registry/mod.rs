//! Plugin-based type registry
//!
//! The registry maps resource and data source type names to factory objects,
//! avoiding hardcoded dispatch on type names. It is filled once at startup
//! and only read afterwards.
//!
//! ## Registration
//!
//! Implementations register themselves during initialization:
//!
//! ```rust,ignore
//! # use mailtrap_core::registry::TypeRegistry;
//!
//! // In the mailtrap-resources crate
//! pub fn register(registry: &mut TypeRegistry) {
//!     registry.register_resource(Box::new(ProjectFactory));
//!     registry.register_data_source(Box::new(AccountFactory));
//! }
//! ```

use std::collections::BTreeMap;

use crate::context::ProviderContext;
use crate::error::{Error, Result};
use crate::schema::ResourceSchema;
use crate::traits::{DataSource, DataSourceFactory, Resource, ResourceFactory};

/// Registry of resource and data source factories, keyed by type name
#[derive(Default)]
pub struct TypeRegistry {
    /// Registered resource factories
    resources: BTreeMap<&'static str, Box<dyn ResourceFactory>>,

    /// Registered data source factories
    data_sources: BTreeMap<&'static str, Box<dyn DataSourceFactory>>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource factory under its schema's type name
    ///
    /// A later registration for the same name replaces the earlier one.
    pub fn register_resource(&mut self, factory: Box<dyn ResourceFactory>) {
        let name = factory.schema().type_name;
        if self.resources.insert(name, factory).is_some() {
            tracing::warn!("Resource type {} registered twice; keeping the latest", name);
        }
    }

    /// Register a data source factory under its schema's type name
    pub fn register_data_source(&mut self, factory: Box<dyn DataSourceFactory>) {
        let name = factory.schema().type_name;
        if self.data_sources.insert(name, factory).is_some() {
            tracing::warn!("Data source type {} registered twice; keeping the latest", name);
        }
    }

    /// Create a resource bound to `context`
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Resource>)`: Created resource instance
    /// - `Err(Error::UnknownType)`: If the type is not registered
    pub fn create_resource(
        &self,
        type_name: &str,
        context: &ProviderContext,
    ) -> Result<Box<dyn Resource>> {
        self.resources
            .get(type_name)
            .map(|factory| factory.create(context))
            .ok_or_else(|| Error::UnknownType(format!("resource type {type_name}")))
    }

    /// Create a data source bound to `context`
    pub fn create_data_source(
        &self,
        type_name: &str,
        context: &ProviderContext,
    ) -> Result<Box<dyn DataSource>> {
        self.data_sources
            .get(type_name)
            .map(|factory| factory.create(context))
            .ok_or_else(|| Error::UnknownType(format!("data source type {type_name}")))
    }

    /// Schema of a registered resource type
    pub fn resource_schema(&self, type_name: &str) -> Option<&'static ResourceSchema> {
        self.resources.get(type_name).map(|f| f.schema())
    }

    /// Schema of a registered data source type
    pub fn data_source_schema(&self, type_name: &str) -> Option<&'static ResourceSchema> {
        self.data_sources.get(type_name).map(|f| f.schema())
    }

    /// Schemas of all resource types, ordered by name
    pub fn resource_schemas(&self) -> Vec<&'static ResourceSchema> {
        self.resources.values().map(|f| f.schema()).collect()
    }

    /// Schemas of all data source types, ordered by name
    pub fn data_source_schemas(&self) -> Vec<&'static ResourceSchema> {
        self.data_sources.values().map(|f| f.schema()).collect()
    }

    /// List all registered resource types
    pub fn list_resources(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    /// List all registered data source types
    pub fn list_data_sources(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }

    /// Check if a resource type is registered
    pub fn has_resource(&self, type_name: &str) -> bool {
        self.resources.contains_key(type_name)
    }

    /// Check if a data source type is registered
    pub fn has_data_source(&self, type_name: &str) -> bool {
        self.data_sources.contains_key(type_name)
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("resources", &self.list_resources())
            .field("data_sources", &self.list_data_sources())
            .finish()
    }
}
