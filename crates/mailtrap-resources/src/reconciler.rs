//! Generic reconciler
//!
//! The lifecycle logic is the same for every resource type; what differs is
//! captured by [`ResourceKind`]: paths, payload envelopes, and how a remote
//! object is folded into local state. [`Reconciler`] implements
//! [`mailtrap_core::Resource`] for any kind.
//!
//! ## Lifecycle
//!
//! - *Create*: resolve the account, POST the create envelope, rebuild state
//!   from the response with the resolved account id
//! - *Read*: GET by the prior account id and remote id
//! - *Update*: PATCH the input attributes only, rebuild state from the
//!   response; kinds without an update endpoint re-read instead
//! - *Delete*: DELETE by account id and remote id; kinds without a delete
//!   endpoint make no call and warn that the object remains remotely
//! - *Import*: parse `account_id/resource_id` and seed the two identifiers

use std::marker::PhantomData;

use async_trait::async_trait;
use mailtrap_core::schema::{FieldClass, ResourceSchema};
use mailtrap_core::traits::{Resource, ResourceFactory};
use mailtrap_core::{
    AttributeMap, Diagnostics, Error, Field, ImportId, ProviderContext, Result, from_attributes,
    to_attributes,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Remote operations a resource type supports beyond create and read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The API can change the object in place
    pub update: bool,
    /// The API can delete the object
    pub delete: bool,
}

impl Capabilities {
    /// Update and delete both supported
    pub const FULL: Self = Self {
        update: true,
        delete: true,
    };
}

/// What distinguishes one resource type from another
pub trait ResourceKind: Send + Sync + 'static {
    /// Local state model; every member is a [`Field`]
    type State: Serialize + DeserializeOwned + Send + Sync;

    /// Remote representation returned by create, read and update
    type Remote: DeserializeOwned + Send;

    /// Noun used in log lines and messages, e.g. "project"
    const NOUN: &'static str;

    /// Supported remote operations
    const CAPABILITIES: Capabilities = Capabilities::FULL;

    /// Resource schema
    fn schema() -> &'static ResourceSchema;

    /// Declared or tracked account id
    fn account_id(state: &Self::State) -> &Field<i64>;

    /// Remote id
    fn id(state: &Self::State) -> &Field<i64>;

    /// State holding only the identifiers of an import
    fn seed(import: ImportId) -> Self::State;

    /// Path the create envelope is posted to
    fn create_path(account_id: i64, planned: &Self::State) -> Result<String>;

    /// Path of one object
    fn item_path(account_id: i64, id: i64) -> String;

    /// Create envelope built from input attributes
    fn create_body(planned: &Self::State) -> Result<Value>;

    /// Update envelope built from input attributes
    fn update_body(planned: &Self::State) -> Result<Value> {
        Self::create_body(planned)
    }

    /// Overwrite `state` from a remote object; sets `account_id` to the
    /// effective scope
    fn refresh(state: &mut Self::State, remote: Self::Remote, account_id: i64);
}

/// Known value of an input, or an error naming it
pub fn required<'a, T>(field: &'a Field<T>, attribute: &str) -> Result<&'a T> {
    field
        .known()
        .ok_or_else(|| Error::invalid_plan(format!("{attribute} must be known before apply")))
}

/// Reject records whose required inputs are still unknown or null
pub fn check_required(schema: &ResourceSchema, attrs: &AttributeMap) -> Result<()> {
    for attr in schema.attributes.iter().filter(|a| a.class == FieldClass::Required) {
        if attrs.get(attr.name).is_none_or(Value::is_null) {
            return Err(Error::invalid_plan(format!(
                "{} is required for {} but is unknown",
                attr.name, schema.type_name
            )));
        }
    }
    Ok(())
}

/// Decode a successful response that must carry a body
pub fn expect_body<T>(remote: Option<T>, noun: &str) -> Result<T> {
    remote.ok_or_else(|| Error::codec(format!("empty response body for {noun}")))
}

/// Lifecycle operations for one resource kind
pub struct Reconciler<K: ResourceKind> {
    context: ProviderContext,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> Reconciler<K> {
    /// Create a reconciler bound to `context`
    pub fn new(context: ProviderContext) -> Self {
        Self {
            context,
            _kind: PhantomData,
        }
    }

    fn tracked(prior: &K::State) -> Result<(i64, i64)> {
        let account_id = *required(K::account_id(prior), "account_id")?;
        let id = *required(K::id(prior), "id")?;
        Ok((account_id, id))
    }

    async fn fetch(&self, mut state: K::State, account_id: i64, id: i64) -> Result<AttributeMap> {
        let remote = self
            .context
            .client()
            .get::<K::Remote>(&K::item_path(account_id, id))
            .await?;
        K::refresh(&mut state, expect_body(remote, K::NOUN)?, account_id);
        to_attributes(&state)
    }
}

impl<K: ResourceKind> std::fmt::Debug for Reconciler<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").field("kind", &K::NOUN).finish()
    }
}

#[async_trait]
impl<K: ResourceKind> Resource for Reconciler<K> {
    fn schema(&self) -> &'static ResourceSchema {
        K::schema()
    }

    async fn create(&self, planned: &AttributeMap) -> Result<AttributeMap> {
        check_required(K::schema(), planned)?;
        let mut state: K::State = from_attributes(planned)?;
        let account_id = self.context.account_id(K::account_id(&state))?;

        let path = K::create_path(account_id, &state)?;
        let remote = self
            .context
            .client()
            .post::<K::Remote>(&path, K::create_body(&state)?)
            .await?;

        K::refresh(&mut state, expect_body(remote, K::NOUN)?, account_id);
        let attrs = to_attributes(&state)?;
        let id = attrs.get("id").cloned().unwrap_or_default();
        info!("Created {} {} in account {}", K::NOUN, id, account_id);
        Ok(attrs)
    }

    async fn read(&self, prior: &AttributeMap) -> Result<AttributeMap> {
        let state: K::State = from_attributes(prior)?;
        let account_id = self.context.account_id(K::account_id(&state))?;
        let id = *required(K::id(&state), "id")?;

        debug!("Reading {} {} in account {}", K::NOUN, id, account_id);
        self.fetch(state, account_id, id).await
    }

    async fn update(&self, planned: &AttributeMap, prior: &AttributeMap) -> Result<AttributeMap> {
        if !K::CAPABILITIES.update {
            warn!("{} has no update endpoint; refreshing from the remote object instead", K::NOUN);
            return self.read(prior).await;
        }

        check_required(K::schema(), planned)?;
        let (prior_account_id, id) = Self::tracked(&from_attributes::<K::State>(prior)?)?;
        let mut state: K::State = from_attributes(planned)?;
        let account_id = match K::account_id(&state).known() {
            Some(&declared) if declared > 0 => declared,
            _ => prior_account_id,
        };

        let remote = self
            .context
            .client()
            .patch::<K::Remote>(&K::item_path(account_id, id), K::update_body(&state)?)
            .await?;

        K::refresh(&mut state, expect_body(remote, K::NOUN)?, account_id);
        info!("Updated {} {} in account {}", K::NOUN, id, account_id);
        to_attributes(&state)
    }

    async fn delete(&self, prior: &AttributeMap) -> Result<Diagnostics> {
        let mut diagnostics = Diagnostics::new();

        if !K::CAPABILITIES.delete {
            let detail = format!(
                "{}s cannot be deleted via API. The {} will be removed from state but will remain in Mailtrap.",
                capitalize(K::NOUN),
                K::NOUN
            );
            warn!("{}", detail);
            diagnostics.push_warning("Resource Not Deleted", detail);
            return Ok(diagnostics);
        }

        let (account_id, id) = Self::tracked(&from_attributes::<K::State>(prior)?)?;
        self.context
            .client()
            .delete(&K::item_path(account_id, id))
            .await?;

        info!("Deleted {} {} in account {}", K::NOUN, id, account_id);
        Ok(diagnostics)
    }

    fn import(&self, id: &str) -> Result<AttributeMap> {
        let import = ImportId::parse(id)?;
        debug!("Importing {} {}", K::NOUN, import);
        to_attributes(&K::seed(import))
    }
}

fn capitalize(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Factory registering a [`Reconciler`] for `K`
pub struct ReconcilerFactory<K: ResourceKind>(PhantomData<fn() -> K>);

impl<K: ResourceKind> ReconcilerFactory<K> {
    /// Create the factory
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K: ResourceKind> Default for ReconcilerFactory<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ResourceKind> ResourceFactory for ReconcilerFactory<K> {
    fn schema(&self) -> &'static ResourceSchema {
        K::schema()
    }

    fn create(&self, context: &ProviderContext) -> Box<dyn Resource> {
        Box::new(Reconciler::<K>::new(context.clone()))
    }
}
