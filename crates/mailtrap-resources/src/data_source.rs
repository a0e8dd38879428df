//! Read-only lookups
//!
//! Project, inbox and sending-domain lookups share the read path of their
//! resource kind: `id` is required, `account_id` falls back to the provider
//! default, and the remote object is folded into state the same way. The
//! account lookup lists every account the token can see and picks one by id.

use std::marker::PhantomData;

use async_trait::async_trait;
use mailtrap_core::schema::{AttributeSchema, AttributeType, ResourceSchema};
use mailtrap_core::traits::{DataSource, DataSourceFactory};
use mailtrap_core::{
    AttributeMap, Error, Field, ProviderContext, Result, from_attributes, to_attributes,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api;
use crate::inbox::{INBOX_LOOKUP_SCHEMA, InboxKind};
use crate::project::{PROJECT_LOOKUP_SCHEMA, ProjectKind};
use crate::reconciler::{ResourceKind, expect_body, required};
use crate::sending_domain::{SENDING_DOMAIN_LOOKUP_SCHEMA, SendingDomainKind};

/// Resource kinds that can also be looked up by id
pub trait LookupKind: ResourceKind {
    /// Data source schema
    fn lookup_schema() -> &'static ResourceSchema;
}

impl LookupKind for ProjectKind {
    fn lookup_schema() -> &'static ResourceSchema {
        &PROJECT_LOOKUP_SCHEMA
    }
}

impl LookupKind for InboxKind {
    fn lookup_schema() -> &'static ResourceSchema {
        &INBOX_LOOKUP_SCHEMA
    }
}

impl LookupKind for SendingDomainKind {
    fn lookup_schema() -> &'static ResourceSchema {
        &SENDING_DOMAIN_LOOKUP_SCHEMA
    }
}

/// Lookup of one object by account and id
pub struct Lookup<K: LookupKind> {
    context: ProviderContext,
    _kind: PhantomData<fn() -> K>,
}

impl<K: LookupKind> Lookup<K> {
    /// Create a lookup bound to `context`
    pub fn new(context: ProviderContext) -> Self {
        Self {
            context,
            _kind: PhantomData,
        }
    }
}

impl<K: LookupKind> std::fmt::Debug for Lookup<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lookup").field("kind", &K::NOUN).finish()
    }
}

#[async_trait]
impl<K: LookupKind> DataSource for Lookup<K> {
    fn schema(&self) -> &'static ResourceSchema {
        K::lookup_schema()
    }

    async fn read(&self, config: &AttributeMap) -> Result<AttributeMap> {
        let mut state: K::State = from_attributes(config)?;
        let account_id = self.context.account_id(K::account_id(&state))?;
        let id = *required(K::id(&state), "id")?;

        debug!("Looking up {} {} in account {}", K::NOUN, id, account_id);
        let remote = self
            .context
            .client()
            .get::<K::Remote>(&K::item_path(account_id, id))
            .await?;

        K::refresh(&mut state, expect_body(remote, K::NOUN)?, account_id);
        to_attributes(&state)
    }
}

/// Factory registering a [`Lookup`] for `K`
pub struct LookupFactory<K: LookupKind>(PhantomData<fn() -> K>);

impl<K: LookupKind> LookupFactory<K> {
    /// Create the factory
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K: LookupKind> Default for LookupFactory<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: LookupKind> DataSourceFactory for LookupFactory<K> {
    fn schema(&self) -> &'static ResourceSchema {
        K::lookup_schema()
    }

    fn create(&self, context: &ProviderContext) -> Box<dyn DataSource> {
        Box::new(Lookup::<K>::new(context.clone()))
    }
}

/// Account data source schema
pub static ACCOUNT_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "mailtrap_account",
    description: "Account data source",
    attributes: &[
        AttributeSchema::required("id", AttributeType::Int64, "Account identifier"),
        AttributeSchema::computed("name", AttributeType::String, "Account name"),
        AttributeSchema::computed(
            "access_levels",
            AttributeType::Int64List,
            "Access levels of the API token on the account",
        ),
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct AccountState {
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    id: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_unknown")]
    access_levels: Field<Vec<i64>>,
}

/// `mailtrap_account`: one entry of the account list
#[derive(Debug)]
pub struct AccountDataSource {
    context: ProviderContext,
}

impl AccountDataSource {
    /// Create the data source bound to `context`
    pub fn new(context: ProviderContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl DataSource for AccountDataSource {
    fn schema(&self) -> &'static ResourceSchema {
        &ACCOUNT_SCHEMA
    }

    async fn read(&self, config: &AttributeMap) -> Result<AttributeMap> {
        let state: AccountState = from_attributes(config)?;
        let id = *required(&state.id, "id")?;

        let accounts = self
            .context
            .client()
            .get::<Vec<api::Account>>("/api/accounts")
            .await?
            .unwrap_or_default();
        debug!("Listed {} accounts", accounts.len());

        let account = accounts
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::not_found(format!("Account Not Found: account with ID {id} not found")))?;

        to_attributes(&AccountState {
            id: Field::Known(account.id),
            name: Field::Known(account.name),
            access_levels: Field::Known(account.access_levels),
        })
    }
}

/// Factory for [`AccountDataSource`]
#[derive(Debug, Default)]
pub struct AccountDataSourceFactory;

impl DataSourceFactory for AccountDataSourceFactory {
    fn schema(&self) -> &'static ResourceSchema {
        &ACCOUNT_SCHEMA
    }

    fn create(&self, context: &ProviderContext) -> Box<dyn DataSource> {
        Box::new(AccountDataSource::new(context.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_schemas_require_id() {
        for schema in [
            &ACCOUNT_SCHEMA,
            &PROJECT_LOOKUP_SCHEMA,
            &INBOX_LOOKUP_SCHEMA,
            &SENDING_DOMAIN_LOOKUP_SCHEMA,
        ] {
            let inputs: Vec<_> = schema.inputs().collect();
            assert!(inputs.contains(&"id"), "{} must take an id", schema.type_name);
            assert!(schema.attribute("id").is_some_and(|a| a.class == mailtrap_core::FieldClass::Required));
        }
    }

    #[test]
    fn test_lookup_and_resource_share_type_names() {
        assert_eq!(ProjectKind::lookup_schema().type_name, ProjectKind::schema().type_name);
        assert_eq!(InboxKind::lookup_schema().type_name, InboxKind::schema().type_name);
        assert_eq!(
            SendingDomainKind::lookup_schema().type_name,
            SendingDomainKind::schema().type_name
        );
    }
}
