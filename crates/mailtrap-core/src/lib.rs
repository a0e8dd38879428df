// # mailtrap-core
//
// Core library for declaratively managed Mailtrap resources.
//
// ## Architecture Overview
//
// This library reconciles a declared configuration against remote objects:
// - **Transport**: Trait for one authenticated request/response exchange
// - **RemoteClient**: JSON helpers and error-envelope classification on top of a transport
// - **ResourceSchema**: Static attribute tables that drive validation and planning
// - **Resource / DataSource**: Traits for lifecycle operations and lookups
// - **TypeRegistry**: Plugin-based registry of resource and data source types
// - **Engine**: Orchestrator-facing dispatcher that turns failures into diagnostics
//
// ## Design Principles
//
// 1. **Stateless Operations**: All state travels in and out through each call
// 2. **Single Round Trip**: One lifecycle call issues at most one remote request
// 3. **Plugin-Based**: Resource types are registered, no dispatch on type names
// 4. **Explicit Context**: Client and default account id are threaded in, never global

pub mod attributes;
pub mod client;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod field;
pub mod lifecycle;
pub mod registry;
pub mod schema;
pub mod scope;
pub mod traits;

// Re-export core types for convenience
pub use attributes::{AttributeMap, from_attributes, to_attributes};
pub use client::{ErrorEnvelope, RemoteClient};
pub use config::{Endpoints, ProviderConfig, ProviderSettings};
pub use context::ProviderContext;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use engine::{Engine, PlanResponse, Response, SchemaSet};
pub use error::{Error, Result};
pub use field::Field;
pub use lifecycle::{Lifecycle, Operation};
pub use registry::TypeRegistry;
pub use schema::{AttributeSchema, AttributeType, FieldClass, Plan, PlanAction, ResourceSchema};
pub use scope::{ImportId, resolve_account_id};
pub use traits::{DataSource, Resource, Transport};
