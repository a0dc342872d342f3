//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Backend reachability check
//!
//! GET  /                                - Redirect to /dashboard
//! GET  /auth/login                      - Login form
//! POST /auth/login                      - Log in with username and password
//! POST /auth/logout                     - Log out
//! GET  /unauthorized                    - Access denied page
//!
//! GET  /dashboard                       - Stats, recent products, low stock
//! POST /dashboard/refresh               - Drop cached dashboard data
//! GET  /analytics                       - Revenue trend and status breakdown
//!
//! GET  /orders                          - Filterable, paginated order list
//! POST /orders/release-expired          - Cancel orders with expired reservations
//! GET  /orders/{id}                     - Order detail
//! GET  /orders/{id}/ship                - Ship form          POST - ship
//! POST /orders/{id}/deliver             - Mark as delivered
//! GET  /orders/{id}/cancel              - Cancel form        POST - cancel
//! GET  /orders/{id}/refund              - Refund form        POST - refund
//!
//! GET  /products                        - Product list       POST - create
//! GET  /products/new                    - Create form
//! GET  /products/bulk                   - Bulk upload page   POST - upload
//! GET  /products/bulk/template          - Download spreadsheet template
//! GET  /products/{id}                   - Product detail
//! GET  /products/{id}/edit              - Edit form          POST - update
//! POST /products/{id}/delete            - Delete product
//! POST /products/{id}/images            - Add images
//! POST /products/{id}/images/{pid}/delete - Remove an image
//!
//! GET  /categories                      - Category list and tree   POST - create
//! GET  /categories/{id}                 - Detail with subcategories and products
//! GET  /categories/{id}/edit            - Edit form          POST - update
//! POST /categories/{id}/delete          - Delete category
//! POST /categories/{id}/image           - Upload image
//! GET  /categories/{id}/subcategories   - New subcategory form   POST - create
//! GET  /subcategories/{id}/edit         - Edit form          POST - update
//! POST /subcategories/{id}/delete       - Delete subcategory
//!
//! GET  /customers                       - Customer list
//! GET  /customers/{id}                  - Customer detail with order stats
//! POST /customers/{id}/status           - Enable/disable (super admin)
//!
//! GET  /settings                        - Admin accounts
//! POST /settings/admins                 - Create admin (super admin)
//! POST /settings/admins/{id}/role       - Change role (super admin)
//! POST /settings/admins/{id}/deactivate - Deactivate (super admin)
//! POST /settings/admins/{id}/reactivate - Reactivate (super admin)
//!
//! GET  /profile                         - Logged-in admin's profile
//! ```

pub mod analytics;
pub mod auth;
pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod profile;
pub mod settings;
pub mod unauthorized;
mod uploads;

use askama::Template;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    response::{Html, Redirect},
    routing::get,
};
use tower_http::services::ServeDir;
use tower_sessions::Session;

use crate::backend::BackendError;
use crate::error::AppError;
use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::models::{CurrentAdmin, Flash, push_flash, take_flashes};
use crate::state::AppState;

/// Largest accepted request body (product images, bulk spreadsheets).
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Directory served under `/static`.
const STATIC_DIR: &str = "crates/admin/static";

/// Build the page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .merge(auth::router())
        .merge(unauthorized::router())
        .merge(dashboard::router())
        .merge(analytics::router())
        .merge(orders::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(customers::router())
        .merge(settings::router())
        .merge(profile::router())
}

/// The complete application: health checks, pages, static files, sessions
/// and security middleware. Tracing and Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .merge(health::router())
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

// =============================================================================
// Shared view types
// =============================================================================

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
    pub role: &'static str,
    pub is_super_admin: bool,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.display_name(),
            email: admin.email.clone(),
            role: admin.role_label(),
            is_super_admin: admin.is_super_admin,
        }
    }
}

/// What every authenticated page renders around its content.
#[derive(Debug, Clone)]
pub struct Layout {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flashes: Vec<Flash>,
}

impl Layout {
    /// Build the layout, consuming pending flash notifications.
    pub async fn new(admin: &CurrentAdmin, session: &Session, current_path: &str) -> Self {
        Self {
            admin_user: AdminUserView::from(admin),
            current_path: current_path.to_string(),
            flashes: take_flashes(session).await,
        }
    }

    /// Whether the nav entry for `section` is the current page.
    #[must_use]
    pub fn is_active(&self, section: &str) -> bool {
        self.current_path == section || self.current_path.starts_with(&format!("{section}/"))
    }
}

// =============================================================================
// Handler helpers
// =============================================================================

/// Render a template, mapping render failures to a 500.
pub(crate) fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| {
        tracing::error!(error = %e, "Template render error");
        AppError::Internal(format!("Template render error: {e}"))
    })
}

/// Report a failed mutation as an error notification.
///
/// An expired session is propagated instead so the admin is sent to login.
pub(crate) async fn flash_failure(
    session: &Session,
    err: BackendError,
    fallback: &str,
) -> Result<(), AppError> {
    if err.is_session_expired() {
        return Err(err.into());
    }
    tracing::warn!(error = %err, "{fallback}");
    push_flash(session, Flash::error(err.message_or(fallback))).await;
    Ok(())
}

/// Error lines for a form re-rendered after the backend rejected it.
///
/// An expired session is propagated instead so the admin is sent to login.
pub(crate) fn form_errors(err: BackendError, fallback: &str) -> Result<Vec<String>, AppError> {
    if err.is_session_expired() {
        return Err(err.into());
    }
    tracing::warn!(error = %err, "{fallback}");
    Ok(vec![err.message_or(fallback)])
}

/// Report a mutation result: success message, or the backend's reason.
pub(crate) async fn flash_result<T>(
    session: &Session,
    result: Result<T, BackendError>,
    success: &str,
    fallback: &str,
) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => {
            push_flash(session, Flash::success(success)).await;
            Ok(Some(value))
        }
        Err(e) => flash_failure(session, e, fallback).await.map(|()| None),
    }
}

/// Secondary page data: a failed load is logged and rendered as empty.
pub(crate) fn degrade<T: Default>(
    result: Result<T, BackendError>,
    what: &str,
) -> Result<T, AppError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_session_expired() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load {what}");
            Ok(T::default())
        }
    }
}

/// `return_to` when it names a page of this app, else `fallback`.
pub(crate) fn local_path(return_to: Option<&str>, fallback: &str) -> String {
    match return_to.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

/// Trimmed form text, `None` when blank.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// HTML checkbox value: present and not `false`/`off`.
pub(crate) fn checked(value: Option<&str>) -> bool {
    value.is_some_and(|v| !matches!(v.trim(), "" | "false" | "off" | "0"))
}

/// Parse an optional filter, treating blank and `all*` as no filter.
pub(crate) fn parse_filter<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.starts_with("all"))
        .and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use storedesk_core::{AdminId, OrderStatus};

    use super::*;

    #[test]
    fn test_layout_active_section() {
        let admin = CurrentAdmin {
            id: AdminId::new("a-1"),
            username: "ops".to_string(),
            email: "ops@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            department: "Operations".to_string(),
            is_super_admin: false,
        };
        let layout = Layout {
            admin_user: AdminUserView::from(&admin),
            current_path: "/orders/o-1".to_string(),
            flashes: Vec::new(),
        };
        assert!(layout.is_active("/orders"));
        assert!(!layout.is_active("/order"));
        assert_eq!(layout.admin_user.name, "Ada Obi");
        assert_eq!(layout.admin_user.role, "Admin");
    }

    #[test]
    fn test_form_helpers() {
        assert_eq!(non_empty(Some("  DHL ".to_string())).as_deref(), Some("DHL"));
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert!(checked(Some("on")));
        assert!(checked(Some("true")));
        assert!(!checked(Some("false")));
        assert!(!checked(None));
    }

    #[test]
    fn test_local_path_rejects_other_hosts() {
        assert_eq!(local_path(Some("/orders?page=2"), "/x"), "/orders?page=2");
        assert_eq!(local_path(Some("//evil.example"), "/x"), "/x");
        assert_eq!(local_path(Some("https://evil.example"), "/x"), "/x");
        assert_eq!(local_path(Some("/\t/evil.example"), "/x"), "/x");
        assert_eq!(local_path(Some("/\r\n/evil.example"), "/x"), "/x");
        assert_eq!(local_path(None, "/x"), "/x");
    }

    #[test]
    fn test_parse_filter_ignores_all() {
        assert_eq!(parse_filter::<OrderStatus>(Some("shipped")), Some(OrderStatus::Shipped));
        assert_eq!(parse_filter::<OrderStatus>(Some("all")), None);
        assert_eq!(parse_filter::<OrderStatus>(Some("all_status")), None);
        assert_eq!(parse_filter::<OrderStatus>(Some("")), None);
        assert_eq!(parse_filter::<OrderStatus>(Some("bogus")), None);
    }
}
