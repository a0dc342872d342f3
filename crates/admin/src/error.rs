//! Handler errors and how they are shown to the admin.
//!
//! Most backend failures during a mutation are turned into flash
//! notifications by the handlers. What reaches [`AppError`] is a page that
//! could not be built at all, rendered here as a small standalone error page.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::backend::BackendError;
use crate::routes::unauthorized::forbidden_page;

#[derive(Debug, Error)]
pub enum AppError {
    /// Store backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request the browser should not have sent (bad multipart body).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Template or session failure inside the panel itself.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("Session error: {err}"))
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    status: u16,
    title: &'a str,
    message: &'a str,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Backend(BackendError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Backend(BackendError::Forbidden(_)) => StatusCode::FORBIDDEN,
            Self::Backend(BackendError::Unauthorized(_) | BackendError::SessionExpired) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Backend(BackendError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown on the error page. Internal details never leave the server.
    fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "Something went wrong while building this page.".to_string(),
            Self::Backend(BackendError::RateLimited(secs)) => {
                format!("The store backend is busy. Try again in {secs} seconds.")
            }
            Self::Backend(e) => e.message_or("The store backend could not complete the request."),
            Self::NotFound(what) => format!("{what} was not found."),
            Self::BadRequest(reason) => reason.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            // The token store is already cleared by the time this surfaces
            Self::Backend(BackendError::SessionExpired) => {
                tracing::info!("Backend session expired, redirecting to login");
                return Redirect::to("/auth/login").into_response();
            }
            Self::Backend(BackendError::Forbidden(reason)) => {
                tracing::warn!(reason = %reason, "Backend refused the admin");
                return forbidden_page();
            }
            _ => {}
        }

        let status = self.status();
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Admin page failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Admin page error");
        }

        let message = self.public_message();
        let page = ErrorPage {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error"),
            message: &message,
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Error page render failed");
                (status, message).into_response()
            }
        }
    }
}

/// Attach the logged-in admin to Sentry events.
pub fn set_sentry_user(admin_id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| scope.set_user(None));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    async fn page(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_backend_message_shown_on_gateway_errors() {
        let (status, body) = page(
            BackendError::Api {
                status: 500,
                message: "Inventory service unavailable".to_string(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("Inventory service unavailable"));
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) = page(AppError::Internal("template x.html missing".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("x.html"));
    }

    #[tokio::test]
    async fn test_not_found_and_rate_limit() {
        let (status, _) = page(BackendError::NotFound("Order not found".to_string()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = page(BackendError::RateLimited(30).into()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert!(body.contains("30 seconds"));
    }

    #[test]
    fn test_forbidden_uses_access_denied_page() {
        let response = AppError::from(BackendError::Forbidden("Super admin only".to_string()))
            .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_expired_session_redirects_to_login() {
        let response = AppError::from(BackendError::SessionExpired).into_response();
        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some("/auth/login")
        );
    }

    #[tokio::test]
    async fn test_rejected_retry_is_an_error_page() {
        let (status, body) =
            page(BackendError::Unauthorized("Token revoked".to_string()).into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Token revoked"));
    }
}
