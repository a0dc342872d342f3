//! Authentication extractors for the admin panel.
//!
//! A request is authenticated when the session holds both the admin's profile
//! and a backend token pair. The extractors hand handlers an [`ApiSession`]
//! bound to that session, so backend calls carry the admin's token and token
//! refreshes are written straight back into the session.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, Uri, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::backend::{ApiSession, AuthTokens, TokenStore};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{CurrentAdmin, session_keys};
use crate::routes::unauthorized::forbidden_page;
use crate::state::AppState;

/// Extractor that requires a logged-in admin.
///
/// If the admin is not logged in, redirects to the login page for HTML
/// requests, or returns 401 Unauthorized for `/api/` requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAdmin { admin, api, .. }: RequireAdmin) -> Result<Html<String>, AppError> {
///     let stats = api.dashboard_stats().await?;
///     // ...
/// }
/// ```
pub struct RequireAdmin {
    pub admin: CurrentAdmin,
    pub api: ApiSession<Session>,
    pub session: Session,
}

/// Extractor that requires a logged-in super admin.
///
/// Logged-in admins without super admin rights get a 403 page.
pub struct RequireSuperAdmin {
    pub admin: CurrentAdmin,
    pub api: ApiSession<Session>,
    pub session: Session,
}

/// Extractor that optionally gets the current admin.
pub struct OptionalAdmin(pub Option<CurrentAdmin>);

/// Error returned when authentication or authorization fails.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests), remembering where to return.
    RedirectToLogin { next: String },
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Logged in but not a super admin.
    Forbidden,
}

impl AuthRejection {
    fn not_logged_in(uri: &Uri) -> Self {
        if uri.path().starts_with("/api/") {
            Self::Unauthorized
        } else {
            Self::RedirectToLogin {
                next: uri
                    .path_and_query()
                    .map_or_else(|| uri.path().to_string(), ToString::to_string),
            }
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => {
                let target = if next == "/" || next.starts_with("/auth/") {
                    "/auth/login".to_string()
                } else {
                    format!("/auth/login?next={}", urlencoding::encode(&next))
                };
                Redirect::to(&target).into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => forbidden_page(),
        }
    }
}

async fn current_admin(session: &Session) -> Option<CurrentAdmin> {
    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthorized)?;

        let admin = match current_admin(&session).await {
            Some(admin) if session.load_tokens().await.is_some() => admin,
            _ => return Err(AuthRejection::not_logged_in(&parts.uri)),
        };

        set_sentry_user(admin.id.as_str(), Some(&admin.email));

        Ok(Self {
            api: state.backend().session(session.clone()),
            admin,
            session,
        })
    }
}

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAdmin {
            admin,
            api,
            session,
        } = RequireAdmin::from_request_parts(parts, state).await?;

        if !admin.is_super_admin {
            tracing::warn!(admin_id = %admin.id, path = %parts.uri.path(), "Super admin access denied");
            return Err(AuthRejection::Forbidden);
        }

        Ok(Self {
            admin,
            api,
            session,
        })
    }
}

impl<S> FromRequestParts<S> for OptionalAdmin
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => current_admin(session).await,
            None => None,
        };

        Ok(Self(admin))
    }
}

/// Store a successful login in the session.
///
/// The session ID is cycled first so a pre-login session cannot be fixated.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
    tokens: &AuthTokens,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::AUTH_TOKENS, tokens).await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Forget everything about the logged-in admin (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub async fn clear_auth(session: &Session) -> Result<(), tower_sessions::session::Error> {
    clear_sentry_user();
    session.flush().await
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    fn location(rejection: AuthRejection) -> Option<String> {
        rejection
            .into_response()
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    #[test]
    fn test_html_requests_redirect_with_next() {
        let uri: Uri = "/orders?status=shipped".parse().unwrap_or_default();
        let rejection = AuthRejection::not_logged_in(&uri);
        assert_eq!(
            location(rejection).as_deref(),
            Some("/auth/login?next=%2Forders%3Fstatus%3Dshipped")
        );
    }

    #[test]
    fn test_root_redirects_without_next() {
        let uri: Uri = "/".parse().unwrap_or_default();
        assert_eq!(
            location(AuthRejection::not_logged_in(&uri)).as_deref(),
            Some("/auth/login")
        );
    }

    #[test]
    fn test_api_requests_get_401() {
        let uri: Uri = "/api/orders".parse().unwrap_or_default();
        let response = AuthRejection::not_logged_in(&uri).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_renders_403() {
        assert_eq!(
            AuthRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
