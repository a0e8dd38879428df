//! Test doubles and common utilities for reconciliation contract tests
//!
//! The scripted transport answers requests from a queue and records every
//! call, so tests can assert both the resulting state and the exact remote
//! traffic.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mailtrap_core::traits::{Method, RawResponse, Transport};
use mailtrap_core::{AttributeMap, Engine, Error, ProviderContext, RemoteClient, Result, TypeRegistry};
use serde_json::Value;

/// One recorded request
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// A transport that replays canned responses in order
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response with a JSON body
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.respond_raw(status, body.to_string())
    }

    /// Queue a response with a verbatim body
    pub fn respond_raw(&self, status: u16, body: impl Into<String>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, body)));
        self
    }

    /// Queue a transport failure
    pub fn fail(&self, message: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(Error::transport(message)));
        self
    }

    /// Requests issued so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<RawResponse> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::transport(format!("no scripted response for {method} {path}"))))
    }
}

/// Engine with every Mailtrap type registered, talking to `transport`
pub fn engine(transport: Arc<ScriptedTransport>, default_account_id: i64) -> Engine {
    let mut registry = TypeRegistry::new();
    mailtrap_resources::register(&mut registry);

    let context = ProviderContext::new(RemoteClient::new(transport), default_account_id);
    Engine::new(registry, context)
}

/// Build an attribute map from a JSON object literal
pub fn attrs(value: Value) -> AttributeMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
