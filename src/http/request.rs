//! Outgoing request configuration and the request interceptor.

use std::collections::HashMap;

use reqwest::Method;
use serde_json::Value;

use crate::credentials::{resolve_token, CredentialStore};

/// How the response body should be materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    /// UTF-8 text, including JSON.
    #[default]
    Text,
    /// Raw bytes, for downloads.
    Binary,
}

/// A single outgoing call, before credential injection.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    /// Path relative to the client's base address.
    pub path: String,
    pub headers: Option<HashMap<String, String>>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub response_kind: ResponseKind,
}

impl RequestConfig {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: None,
            query: Vec::new(),
            body: None,
            response_kind: ResponseKind::Text,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_response_kind(mut self, kind: ResponseKind) -> Self {
        self.response_kind = kind;
        self
    }
}

/// Request interceptor: injects the bearer token.
///
/// Guarantees `headers` is present afterwards. The `Authorization` entry is
/// written only when a token resolved, so callers must not assume the key
/// exists. Reads the credential store, never writes it.
pub fn attach_authorization(config: &mut RequestConfig, store: &dyn CredentialStore) {
    let headers = config.headers.get_or_insert_with(HashMap::new);
    if let Some(token) = resolve_token(store) {
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
    }
}

/// Response success passthrough. Identity; exists so the pipeline treats
/// success and failure symmetrically.
pub fn pass_through<T>(response: T) -> T {
    response
}
