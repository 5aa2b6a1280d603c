//! Configured API client and the interceptor pipeline around each call.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::credentials::CredentialStore;
use crate::session::invalidate_session;
use crate::ui::{Navigator, Notifier};

use super::failure::Failure;
use super::request::{attach_authorization, pass_through, RequestConfig, ResponseKind};

/// Default transport timeout, matching the admin application's client.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default retry budget. Carried on the built client for callers that run
/// their own retry loop; this crate performs no automatic retries.
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Client factory input. All settings are fixed for the lifetime of the
/// client built from them.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub retry_count: u32,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_count: DEFAULT_RETRY_COUNT,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Builds a client bound to this configuration and the injected
    /// capabilities.
    pub fn build(
        self,
        store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<ApiClient> {
        let client = Client::builder()
            .user_agent("kadmin-client")
            .timeout(Duration::from_millis(self.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ApiClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            retry_count: self.retry_count,
            store,
            notifier,
            navigator,
        })
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Text(String),
    Binary(Vec<u8>),
}

impl ApiResponse {
    /// Text body, if the request asked for one.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Binary(_) => None,
        }
    }

    /// Deserializes a text body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let text = self.text().context("Response body is not text")?;
        serde_json::from_str(text).context("Failed to parse JSON response")
    }
}

/// API client running every call through the interceptor pipeline.
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry_count: u32,
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured retry budget. Not consumed by this client; exposed
    /// for callers that implement retries themselves.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Runs one call through the full pipeline: credential injection,
    /// transport, success passthrough or failure classification. After its
    /// side effects have run, the original failure is returned to the
    /// caller unchanged.
    #[tracing::instrument(skip(self, config), fields(path = %config.path))]
    pub async fn send(&self, mut config: RequestConfig) -> Result<ApiResponse, Failure> {
        attach_authorization(&mut config, self.store.as_ref());
        match self.dispatch(config).await {
            Ok(response) => Ok(pass_through(response)),
            Err(failure) => {
                self.observe_failure(&failure);
                Err(failure)
            }
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, Failure> {
        self.send(RequestConfig::new(Method::GET, path)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResponse, Failure> {
        self.send(RequestConfig::new(Method::POST, path).with_body(body))
            .await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, Failure> {
        self.send(RequestConfig::new(Method::PUT, path).with_body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, Failure> {
        self.send(RequestConfig::new(Method::DELETE, path)).await
    }

    /// Single transport round trip, with every outcome folded into either a
    /// response or one of the three failure tags.
    async fn dispatch(&self, config: RequestConfig) -> Result<ApiResponse, Failure> {
        let url = Url::parse(&format!("{}{}", self.base_url, config.path))
            .map_err(|e| Failure::Request {
                message: e.to_string(),
            })?;
        debug!("{} {}", config.method, url);

        let mut headers = HeaderMap::new();
        if let Some(entries) = &config.headers {
            for (name, value) in entries {
                let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                    Failure::Request {
                        message: e.to_string(),
                    }
                })?;
                let mut value = HeaderValue::from_str(value).map_err(|e| Failure::Request {
                    message: e.to_string(),
                })?;
                if name == AUTHORIZATION {
                    value.set_sensitive(true);
                }
                headers.insert(name, value);
            }
        }

        let mut builder = self
            .client
            .request(config.method.clone(), url)
            .headers(headers);
        if !config.query.is_empty() {
            builder = builder.query(&config.query);
        }
        if let Some(body) = &config.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(from_send_error)?;

        let status = response.status().as_u16();
        if response.status().is_success() {
            let body = match config.response_kind {
                ResponseKind::Text => {
                    let text = response.text().await.map_err(|e| Failure::Network {
                        message: e.to_string(),
                    })?;
                    ResponseBody::Text(text)
                }
                ResponseKind::Binary => {
                    let bytes = response.bytes().await.map_err(|e| Failure::Network {
                        message: e.to_string(),
                    })?;
                    ResponseBody::Binary(bytes.to_vec())
                }
            };
            Ok(ApiResponse { status, body })
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Failure::Status { status, body })
        }
    }

    /// Response error classifier side effects: at most one notification per
    /// failure, plus session teardown on authentication loss. Unclassified
    /// statuses get neither.
    fn observe_failure(&self, failure: &Failure) {
        if let Some(message) = failure.user_message() {
            self.notifier.notify(&message);
        }
        if failure.kind().invalidates_session() {
            invalidate_session(self.store.as_ref(), self.navigator.as_ref());
        }
    }
}

/// Splits reqwest send errors into the two no-response tags: errors from
/// request construction versus errors after the request went out.
fn from_send_error(error: reqwest::Error) -> Failure {
    if error.is_builder() {
        Failure::Request {
            message: error.to_string(),
        }
    } else {
        Failure::Network {
            message: error.to_string(),
        }
    }
}
