//! Access denied page.

use askama::Template;
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::state::AppState;

#[derive(Template)]
#[template(path = "unauthorized.html")]
pub struct UnauthorizedTemplate;

pub fn router() -> Router<AppState> {
    Router::new().route("/unauthorized", get(show))
}

/// GET /unauthorized
async fn show() -> Response {
    forbidden_page()
}

/// 403 response with the access denied page.
#[must_use]
pub fn forbidden_page() -> Response {
    let body = UnauthorizedTemplate.render().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Template render error");
        String::from("Access denied")
    });
    (StatusCode::FORBIDDEN, Html(body)).into_response()
}
