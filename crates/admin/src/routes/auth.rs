//! Authentication route handlers for admin.
//!
//! Username/password login against the store backend. The token pair and
//! admin profile it returns are kept in the session.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::AuthTokens;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalAdmin, clear_auth, set_current_admin};
use crate::models::{CurrentAdmin, Flash, push_flash};
use crate::state::AppState;

use super::render;

/// Where a successful login lands when no `next` is given.
const DEFAULT_LANDING: &str = "/dashboard";

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub error: Option<String>,
    pub username: String,
    pub next: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Login form input.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
#[instrument(skip_all)]
async fn login_page(
    OptionalAdmin(admin): OptionalAdmin,
    Query(query): Query<LoginQuery>,
) -> Result<Response, AppError> {
    if admin.is_some() {
        return Ok(Redirect::to(&safe_next(query.next.as_deref())).into_response());
    }

    let template = LoginPageTemplate {
        error: None,
        username: String::new(),
        next: query.next.unwrap_or_default(),
    };
    Ok(render(&template)?.into_response())
}

/// Log in with username and password.
///
/// POST /auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim().to_string();
    let next = form.next.unwrap_or_default();

    if username.is_empty() || form.password.is_empty() {
        return login_failed("Username and password are required", username, next);
    }

    match state.backend().login(&username, &form.password).await {
        Ok(login) => {
            let tokens = AuthTokens {
                access_token: login.access_token,
                refresh_token: login.refresh_token,
            };
            let admin = CurrentAdmin::from(login.admin_info);
            set_current_admin(&session, &admin, &tokens).await?;

            tracing::info!(admin_id = %admin.id, "Admin logged in");
            push_flash(
                &session,
                Flash::success(format!("Welcome back, {}", admin.display_name())),
            )
            .await;

            Ok(Redirect::to(&safe_next(Some(&next))).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, username = %username, "Login failed");
            login_failed(
                &e.message_or("Invalid username or password"),
                username,
                next,
            )
        }
    }
}

fn login_failed(message: &str, username: String, next: String) -> Result<Response, AppError> {
    let template = LoginPageTemplate {
        error: Some(message.to_string()),
        username,
        next,
    };
    Ok((StatusCode::UNAUTHORIZED, render(&template)?).into_response())
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_auth(&session).await?;
    Ok(Redirect::to("/auth/login"))
}

/// Post-login target: `next` when it is a local page, else the dashboard.
fn safe_next(next: Option<&str>) -> String {
    let path = super::local_path(next, DEFAULT_LANDING);
    if path.starts_with("/auth/") {
        DEFAULT_LANDING.to_string()
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_accepts_local_paths() {
        assert_eq!(safe_next(Some("/orders?status=shipped")), "/orders?status=shipped");
        assert_eq!(safe_next(Some("/products/p-1")), "/products/p-1");
    }

    #[test]
    fn test_safe_next_rejects_other_hosts_and_auth_pages() {
        assert_eq!(safe_next(Some("https://evil.example")), DEFAULT_LANDING);
        assert_eq!(safe_next(Some("//evil.example")), DEFAULT_LANDING);
        assert_eq!(safe_next(Some("/\\evil.example")), DEFAULT_LANDING);
        assert_eq!(safe_next(Some("/\t/evil.example")), DEFAULT_LANDING);
        assert_eq!(safe_next(Some("/\n/evil.example")), DEFAULT_LANDING);
        assert_eq!(safe_next(Some("/auth/logout")), DEFAULT_LANDING);
        assert_eq!(safe_next(Some("")), DEFAULT_LANDING);
        assert_eq!(safe_next(None), DEFAULT_LANDING);
    }

    #[test]
    fn test_login_page_keeps_username_and_error() {
        let template = LoginPageTemplate {
            error: Some("Invalid username or password".to_string()),
            username: "ops".to_string(),
            next: "/orders".to_string(),
        };
        let html = template.render().unwrap_or_default();
        assert!(html.contains("Invalid username or password"));
        assert!(html.contains(r#"value="ops""#));
        assert!(html.contains(r#"name="next" value="/orders""#));
    }
}
