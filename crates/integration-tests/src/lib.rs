//! Integration tests for Storedesk.
//!
//! Every test runs the admin in-process against a [`wiremock`] server that
//! stands in for the store backend, so no external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storedesk-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `backend_client` - Token refresh, envelopes and error mapping in the REST client
//! - `admin_pages` - Login flow, orders and customers through the full router
//! - `catalog_pages` - Products, categories and admin settings through the full router

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, Response, StatusCode, header};
use serde_json::{Value, json};
use storedesk_admin::backend::{ApiClient, ApiSession, AuthTokens, MemoryTokenStore};
use storedesk_admin::config::{AdminConfig, BackendConfig, CacheConfig};
use storedesk_admin::routes;
use storedesk_admin::state::AppState;
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Largest response body the tests read.
const MAX_BODY: usize = 4 * 1024 * 1024;

/// Backend settings pointing at the mock server.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid URL.
#[must_use]
pub fn backend_config(server: &MockServer) -> BackendConfig {
    BackendConfig {
        url: Url::parse(&server.uri()).expect("mock server URI"),
        timeout: Duration::from_secs(5),
    }
}

/// Full admin configuration for an in-process server.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid URL.
#[must_use]
pub fn admin_config(server: &MockServer) -> AdminConfig {
    AdminConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost:3001".to_string(),
        backend: backend_config(server),
        cache: CacheConfig::default(),
        session_hours: 1,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}

/// Backend client with its own empty cache.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&backend_config(server), CacheConfig::default()).expect("backend client")
}

/// Client session holding the given token pair.
#[must_use]
pub fn session_with(
    server: &MockServer,
    access_token: &str,
    refresh_token: &str,
) -> ApiSession<MemoryTokenStore> {
    client(server).session(MemoryTokenStore::with_tokens(AuthTokens {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
    }))
}

/// The admin router wired to the mock backend.
///
/// # Panics
///
/// Panics if the backend client cannot be built.
#[must_use]
pub fn app(server: &MockServer) -> Router {
    let state = AppState::new(admin_config(server)).expect("app state");
    routes::app(state)
}

/// Send one request through the router.
///
/// # Panics
///
/// Panics if the router fails, which an axum router never does.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router is infallible")
}

/// Read a response body as text.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), MAX_BODY)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// The `name=value` part of the session cookie a response sets, if any.
#[must_use]
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter(|cookie| cookie.starts_with(storedesk_admin::middleware::SESSION_COOKIE_NAME))
        .find_map(|cookie| cookie.split(';').next().map(str::to_string))
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
}

/// A `GET` request, with the session cookie when given.
///
/// # Panics
///
/// Panics if the URI is invalid.
#[must_use]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

/// A urlencoded form `POST`, with the session cookie when given.
///
/// # Panics
///
/// Panics if the URI is invalid.
#[must_use]
pub fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).expect("request")
}

/// Accept `ops` / `secret` at the backend login endpoint.
pub async fn mount_login(server: &MockServer, is_super_admin: bool) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({"username": "ops", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("ops", is_super_admin)))
        .mount(server)
        .await;
}

/// Log in through the form and return the session cookie.
///
/// # Panics
///
/// Panics if the login does not redirect to `next` with a session cookie.
pub async fn log_in(app: &Router, next: &str) -> String {
    let form = format!("username=ops&password=secret&next={}", next.replace('/', "%2F"));
    let response = send(app, post_form("/auth/login", &form, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response.headers()), Some(next));
    session_cookie(response.headers()).expect("session cookie after login")
}

/// Number of `<tr>` rows inside the first `<tbody>` of a page.
#[must_use]
pub fn table_rows(html: &str) -> usize {
    html.split_once("<tbody>")
        .and_then(|(_, rest)| rest.split_once("</tbody>"))
        .map_or(0, |(rows, _)| rows.matches("<tr").count())
}

/// `POST /auth/login` response body for the given admin.
#[must_use]
pub fn login_body(username: &str, is_super_admin: bool) -> Value {
    json!({
        "access_token": "access-1",
        "refresh_token": "refresh-1",
        "token_type": "bearer",
        "admin_info": {
            "id": "a-1",
            "username": username,
            "email": format!("{username}@example.com"),
            "first_name": "Ada",
            "last_name": "Okafor",
            "department": "Operations",
            "is_super_admin": is_super_admin
        }
    })
}

/// One order as the backend lists it.
#[must_use]
pub fn order_json(id: &str, number: &str, status: &str, payment_status: &str) -> Value {
    json!({
        "id": id,
        "order_number": number,
        "status": status,
        "payment_status": payment_status,
        "customer_email": "buyer@example.com",
        "customer_name": "Chidi Buyer",
        "customer_phone": "+2348000000000",
        "subtotal": "10000.00",
        "tax_amount": "750.00",
        "shipping_amount": "1500.00",
        "discount_amount": "0",
        "total_amount": "12250.00",
        "currency": "NGN",
        "created_at": "2024-05-02T10:15:00Z",
        "updated_at": "2024-05-02T10:15:00Z"
    })
}
