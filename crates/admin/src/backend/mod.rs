//! Store backend REST client.
//!
//! Every page of the admin panel is a view over the store backend, which owns
//! the business rules (inventory, payments, order transitions). This module
//! is the only place that talks to it.
//!
//! # Architecture
//!
//! - [`ApiClient`] owns the HTTP client, the API base URL and the shared
//!   [`QueryCache`]. It is cheap to clone and lives in application state.
//! - [`ApiSession`] binds the client to one admin's [`TokenStore`] and attaches
//!   `Authorization: Bearer <token>` to every call.
//! - A `401` triggers exactly one token refresh followed by exactly one retry
//!   of the original request. If the refresh fails the stored tokens are
//!   cleared and the call fails with [`BackendError::SessionExpired`].
//!
//! # Example
//!
//! ```rust,ignore
//! let client = ApiClient::new(&config.backend, config.cache)?;
//! let api = client.session(session);
//! let orders = api.list_orders(&OrdersQuery::default()).await?;
//! ```

mod admins;
mod auth;
pub mod cache;
mod categories;
mod dashboard;
mod orders;
mod products;
pub mod tokens;
pub mod types;
mod users;

pub use cache::{QueryCache, QueryKey};
pub use products::BulkTemplate;
pub use tokens::{AuthTokens, MemoryTokenStore, TokenStore};

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::{BackendConfig, CacheConfig};
use types::Envelope;

/// Path prefix of every backend endpoint.
const API_PREFIX: &str = "/api/v1";

/// Timeout for the readiness probe.
const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when talking to the store backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Still unauthorized after refreshing the access token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The admin lacks permission for this operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// No usable refresh token, or the refresh was rejected.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Failed to build a request or parse a response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Reading or writing the token store failed.
    #[error("Token store error: {0}")]
    TokenStore(String),
}

impl BackendError {
    /// Message the backend supplied for this failure, if any.
    ///
    /// This is what gets shown to the admin in error notifications.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. }
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Unauthorized(message) => Some(message.as_str()).filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// The backend's message, or `fallback` when it gave none.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.user_message().unwrap_or(fallback).to_string()
    }

    /// Whether the admin has to log in again.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

/// A file forwarded to the backend in a multipart request.
#[derive(Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Request body. Kept as data so the request can be rebuilt for a retry.
#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart {
        fields: Vec<(&'static str, String)>,
        files: Vec<(&'static str, UploadFile)>,
    },
}

/// A backend call, described independently of any token.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    payload: Payload,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            payload: Payload::Empty,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub(crate) fn query(mut self, params: Vec<(&'static str, String)>) -> Self {
        self.query.extend(params);
        self
    }

    pub(crate) fn json<B: Serialize>(mut self, body: &B) -> Result<Self, BackendError> {
        let value = serde_json::to_value(body)
            .map_err(|e| BackendError::Parse(format!("Failed to encode request: {e}")))?;
        self.payload = Payload::Json(value);
        Ok(self)
    }

    pub(crate) fn multipart(
        mut self,
        fields: Vec<(&'static str, String)>,
        files: Vec<(&'static str, UploadFile)>,
    ) -> Self {
        self.payload = Payload::Multipart { fields, files };
        self
    }
}

/// Store backend API client.
///
/// Holds no credentials; pair it with a [`TokenStore`] via [`ApiClient::session`].
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    origin: Url,
    api_base: String,
    cache: QueryCache,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig, cache: CacheConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let api_base = format!("{}{API_PREFIX}", config.url.as_str().trim_end_matches('/'));

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                origin: config.url.clone(),
                api_base,
                cache: QueryCache::new(cache),
            }),
        })
    }

    /// The shared query cache.
    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    /// Base URL every endpoint path is appended to (ends in `/api/v1`).
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.inner.api_base
    }

    /// Bind this client to a token store.
    #[must_use]
    pub fn session<S: TokenStore>(&self, store: S) -> ApiSession<S> {
        ApiSession {
            client: self.clone(),
            store,
        }
    }

    /// Whether the backend answers HTTP at all.
    ///
    /// Any status counts as reachable; only transport failures do not.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> bool {
        match self
            .inner
            .http
            .get(self.inner.origin.clone())
            .timeout(PING_TIMEOUT)
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Backend readiness check failed");
                false
            }
        }
    }

    fn endpoint(&self, request: &ApiRequest) -> Result<Url, BackendError> {
        let mut url = Url::parse(&format!("{}{}", self.inner.api_base, request.path))
            .map_err(|e| BackendError::Parse(format!("Invalid endpoint {}: {e}", request.path)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    /// Send a request once, with the given access token.
    async fn dispatch(
        &self,
        request: &ApiRequest,
        access_token: Option<&str>,
    ) -> Result<reqwest::Response, BackendError> {
        let url = self.endpoint(request)?;
        let mut builder = self.inner.http.request(request.method.clone(), url);

        if let Some(token) = access_token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Multipart { fields, files } => builder.multipart(build_form(fields, files)?),
        };

        Ok(builder.send().await?)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_base", &self.inner.api_base)
            .finish_non_exhaustive()
    }
}

/// An [`ApiClient`] acting on behalf of one admin.
pub struct ApiSession<S> {
    client: ApiClient,
    store: S,
}

impl<S: TokenStore> ApiSession<S> {
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        self.client.cache()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Send a request, refreshing the access token once on `401`.
    ///
    /// Returns the response only if it is a success status.
    pub(crate) async fn send(&self, request: &ApiRequest) -> Result<reqwest::Response, BackendError> {
        let tokens = self.store.load_tokens().await;
        let access_token = tokens.as_ref().map(|t| t.access_token.as_str());

        let response = self.client.dispatch(request, access_token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return ensure_success(response).await;
        }

        let Some(tokens) = tokens.filter(|t| !t.refresh_token.is_empty()) else {
            tracing::info!(path = %request.path, "Unauthorized with no refresh token");
            self.store.clear_tokens().await;
            return Err(BackendError::SessionExpired);
        };

        let access_token = match self.client.refresh(&tokens.refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, path = %request.path, "Access token refresh failed");
                self.store.clear_tokens().await;
                return Err(BackendError::SessionExpired);
            }
        };

        let refreshed = AuthTokens {
            access_token,
            refresh_token: tokens.refresh_token,
        };
        self.store.save_tokens(&refreshed).await?;
        tracing::debug!(path = %request.path, "Access token refreshed, retrying request");

        let retry = self
            .client
            .dispatch(request, Some(&refreshed.access_token))
            .await?;
        ensure_success(retry).await
    }

    /// Send a request and parse a bare JSON body.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, BackendError> {
        let response = self.send(&request).await?;
        parse_json(response).await
    }

    /// Send a request and unwrap the `data` field of an enveloped body.
    pub(crate) async fn fetch_data<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, BackendError> {
        Ok(self.fetch::<Envelope<T>>(request).await?.data)
    }

    /// Send a request whose response body is not needed.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Result<(), BackendError> {
        self.send(&request).await?;
        Ok(())
    }
}

impl<S> std::fmt::Debug for ApiSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSession")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

fn build_form(
    fields: &[(&'static str, String)],
    files: &[(&'static str, UploadFile)],
) -> Result<reqwest::multipart::Form, BackendError> {
    let mut form = reqwest::multipart::Form::new();
    for (name, value) in fields {
        form = form.text(*name, value.clone());
    }
    for (name, file) in files {
        let mut part =
            reqwest::multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        form = form.part(*name, part);
    }
    Ok(form)
}

/// Pass successful responses through, convert the rest into errors.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(parse_error(response).await)
    }
}

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| BackendError::Parse(format!("Failed to parse response: {e}")))
}

/// Parse an error response from the backend.
async fn parse_error(response: reqwest::Response) -> BackendError {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return BackendError::RateLimited(retry_after);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });

    match status {
        StatusCode::UNAUTHORIZED => BackendError::Unauthorized(message),
        StatusCode::FORBIDDEN => BackendError::Forbidden(message),
        StatusCode::NOT_FOUND => BackendError::NotFound(message),
        _ => BackendError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Extract a human-readable message from an error body.
///
/// Prefers `detail` (a string, or a list of validation errors with `msg`),
/// then `message`, then the raw text when it is not JSON.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return Some(trimmed.chars().take(300).collect());
    };

    match json.get("detail") {
        Some(serde_json::Value::String(detail)) => return Some(detail.clone()),
        Some(serde_json::Value::Array(errors)) => {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }

    json.get("message")
        .and_then(serde_json::Value::as_str)
        .map(String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(r#"{"detail":"Order cannot be shipped","message":"x"}"#).as_deref(),
            Some("Order cannot be shipped")
        );
        assert_eq!(
            error_message(r#"{"success":false,"message":"User not found"}"#).as_deref(),
            Some("User not found")
        );
    }

    #[test]
    fn test_error_message_joins_validation_errors() {
        let body = r#"{"detail":[{"loc":["body","reason"],"msg":"field required"},
                                 {"loc":["body","amount"],"msg":"must be positive"}]}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("field required; must be positive")
        );
    }

    #[test]
    fn test_error_message_plain_text_and_empty() {
        assert_eq!(error_message("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message("   "), None);
        assert_eq!(error_message(r#"{"error":"nope"}"#), None);
    }

    #[test]
    fn test_user_message_only_for_backend_supplied_errors() {
        let api = BackendError::Api {
            status: 400,
            message: "Insufficient stock".to_string(),
        };
        assert_eq!(api.message_or("Failed to ship order"), "Insufficient stock");
        assert_eq!(
            BackendError::SessionExpired.message_or("Failed to ship order"),
            "Failed to ship order"
        );
        assert!(BackendError::SessionExpired.is_session_expired());
    }

    #[test]
    fn test_endpoint_appends_query() {
        let config = BackendConfig {
            url: Url::parse("http://localhost:8000/").unwrap(),
            timeout: Duration::from_secs(5),
        };
        let client = ApiClient::new(&config, CacheConfig::default()).unwrap();
        assert_eq!(client.api_base(), "http://localhost:8000/api/v1");

        let request = ApiRequest::put("/admins/a1/deactivate")
            .query(vec![("reason", "left the company".to_string())]);
        let url = client.endpoint(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/admins/a1/deactivate?reason=left+the+company"
        );

        let bare = client.endpoint(&ApiRequest::get("/dashboard/stats")).unwrap();
        assert_eq!(bare.query(), None);
    }
}
