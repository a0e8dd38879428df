// # Mailtrap Resources
//
// Resource and data source types managed through the Mailtrap REST API.
//
// ## Resources
//
// - `mailtrap_project`: create, read, update (name), delete
// - `mailtrap_inbox`: created under a project; create, read, update (name,
//   email username), delete
// - `mailtrap_sending_domain`: create and read only; destroy drops local
//   tracking with a warning and leaves the domain in Mailtrap
//
// ## Data Sources
//
// - `mailtrap_account`: picks one entry from the account list by id
// - `mailtrap_project`, `mailtrap_inbox`, `mailtrap_sending_domain`: read one
//   object by id
//
// ## Constraints
//
// - One remote call per lifecycle operation, no retries
// - No state kept between calls; everything travels through the attribute maps
// - Account scope resolved per call: resource-level id first, then the
//   provider default
//
// ## Usage
//
// ```rust,ignore
// let mut registry = mailtrap_core::TypeRegistry::new();
// mailtrap_resources::register(&mut registry);
// ```

pub mod api;
pub mod codec;
pub mod data_source;
pub mod inbox;
pub mod project;
pub mod reconciler;
pub mod sending_domain;

use mailtrap_core::TypeRegistry;

pub use data_source::{AccountDataSource, AccountDataSourceFactory, Lookup, LookupFactory, LookupKind};
pub use inbox::{InboxKind, InboxState};
pub use project::{ProjectKind, ProjectState};
pub use reconciler::{Capabilities, Reconciler, ReconcilerFactory, ResourceKind};
pub use sending_domain::{SendingDomainKind, SendingDomainState};

/// Register every Mailtrap resource and data source type
///
/// # Example
///
/// ```rust
/// use mailtrap_core::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// mailtrap_resources::register(&mut registry);
/// assert!(registry.has_resource("mailtrap_project"));
/// assert!(registry.has_data_source("mailtrap_account"));
/// ```
pub fn register(registry: &mut TypeRegistry) {
    registry.register_resource(Box::new(ReconcilerFactory::<ProjectKind>::new()));
    registry.register_resource(Box::new(ReconcilerFactory::<InboxKind>::new()));
    registry.register_resource(Box::new(ReconcilerFactory::<SendingDomainKind>::new()));

    registry.register_data_source(Box::new(AccountDataSourceFactory));
    registry.register_data_source(Box::new(LookupFactory::<ProjectKind>::new()));
    registry.register_data_source(Box::new(LookupFactory::<InboxKind>::new()));
    registry.register_data_source(Box::new(LookupFactory::<SendingDomainKind>::new()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_types() {
        let mut registry = TypeRegistry::new();
        register(&mut registry);

        assert_eq!(
            registry.list_resources(),
            vec!["mailtrap_inbox", "mailtrap_project", "mailtrap_sending_domain"]
        );
        assert_eq!(
            registry.list_data_sources(),
            vec![
                "mailtrap_account",
                "mailtrap_inbox",
                "mailtrap_project",
                "mailtrap_sending_domain"
            ]
        );
    }
}
