//! Profile page for the logged-in admin.

use askama::Template;
use axum::{Router, response::Html, routing::get};

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::{Layout, render};

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(show))
}

/// GET /profile
async fn show(RequireAdmin { admin, session, .. }: RequireAdmin) -> Result<Html<String>, AppError> {
    let template = ProfileTemplate {
        layout: Layout::new(&admin, &session, "/profile").await,
        username: admin.username,
        email: admin.email,
        first_name: admin.first_name,
        last_name: admin.last_name,
        department: admin.department,
    };
    render(&template)
}
