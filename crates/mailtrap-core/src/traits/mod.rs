//! Core traits for the reconciliation engine
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Transport`]: One authenticated request/response exchange
//! - [`Resource`]: Lifecycle operations of one managed resource type
//! - [`DataSource`]: Read-only lookups

pub mod resource;
pub mod transport;

pub use resource::{DataSource, DataSourceFactory, Resource, ResourceFactory};
pub use transport::{Method, RawResponse, Transport};
