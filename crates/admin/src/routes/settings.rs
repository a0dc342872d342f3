//! Admin management routes.
//!
//! Every admin can see the team; only super admins can create admins, change
//! roles, deactivate or reactivate accounts.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query},
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use storedesk_core::{AdminId, Email, Page};
use tracing::instrument;

use crate::{
    backend::types::{Admin, AdminsQuery, CreateAdmin},
    components::{Pager, page_href},
    error::AppError,
    filters,
    middleware::{RequireAdmin, RequireSuperAdmin},
    models::{Flash, push_flash},
    routes::{Layout, checked, flash_result, local_path, non_empty, render},
    state::AppState,
};

/// Admins shown per page. The backend returns the whole team at once.
pub const PER_PAGE: u32 = 5;

// =============================================================================
// Views
// =============================================================================

/// Query parameters for the admins list.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsQuery {
    pub page: Option<u32>,
    pub include_deactivated: Option<String>,
}

/// Admin row for the team table.
#[derive(Debug, Clone)]
pub struct AdminRowView {
    pub username: String,
    pub email: String,
    pub department: String,
    pub job_title: String,
    pub role_label: &'static str,
    pub is_super_admin: bool,
    pub is_active: bool,
    pub is_self: bool,
    pub created_at: String,
    pub last_login: Option<String>,
    pub deactivated_at: Option<String>,
    pub deactivation_reason: Option<String>,
    pub role_href: String,
    pub deactivate_href: String,
    pub reactivate_href: String,
}

impl AdminRowView {
    fn new(admin: &Admin, viewer: &AdminId) -> Self {
        let base = format!("/settings/admins/{}", admin.id);
        Self {
            username: admin.username.clone(),
            email: admin.email.clone(),
            department: admin.department.clone(),
            job_title: admin.job_title.clone(),
            role_label: if admin.is_super_admin {
                "Super Admin"
            } else {
                "Admin"
            },
            is_super_admin: admin.is_super_admin,
            is_active: admin.is_active,
            is_self: &admin.id == viewer,
            created_at: admin.created_at.clone(),
            last_login: non_empty(admin.last_admin_login.clone()),
            deactivated_at: non_empty(admin.deactivated_at.clone()),
            deactivation_reason: non_empty(admin.deactivation_reason.clone()),
            role_href: format!("{base}/role"),
            deactivate_href: format!("{base}/deactivate"),
            reactivate_href: format!("{base}/reactivate"),
        }
    }
}

/// Settings page template.
#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub layout: Layout,
    pub admins: Vec<AdminRowView>,
    pub pager: Pager,
    pub include_deactivated: bool,
    pub can_manage: bool,
    pub return_to: String,
}

// =============================================================================
// Inputs
// =============================================================================

/// Input for creating an admin.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct CreateAdminInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub department: String,
    pub job_title: String,
}

impl std::fmt::Debug for CreateAdminInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAdminInput")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl CreateAdminInput {
    /// Backend body, or every problem with the form.
    ///
    /// # Errors
    ///
    /// Returns the problems in field order.
    pub fn validate(self) -> Result<CreateAdmin, Vec<String>> {
        let mut errors = Vec::new();
        let mut required = |value: &str, label: &str| {
            let value = value.trim().to_string();
            if value.is_empty() {
                errors.push(format!("{label} is required"));
            }
            value
        };

        let username = required(&self.username, "Username");
        let email = required(&self.email, "Email");
        let department = required(&self.department, "Department");
        let job_title = required(&self.job_title, "Job title");
        if self.password.is_empty() {
            errors.push("Password is required".to_string());
        }

        let email = if email.is_empty() {
            email
        } else {
            match Email::parse(&email) {
                Ok(email) => email.into_inner(),
                Err(_) => {
                    errors.push("Enter a valid email address".to_string());
                    email
                }
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(CreateAdmin {
            username,
            email,
            password: self.password,
            department,
            job_title,
        })
    }
}

/// Input for changing an admin's role.
#[derive(Debug, Deserialize)]
pub struct RoleInput {
    pub is_super_admin: Option<String>,
    pub return_to: Option<String>,
}

/// Input for deactivating an admin.
#[derive(Debug, Deserialize)]
pub struct DeactivateInput {
    pub reason: Option<String>,
    pub return_to: Option<String>,
}

/// Input for reactivating an admin.
#[derive(Debug, Deserialize)]
pub struct ReactivateInput {
    pub restore_super_admin: Option<String>,
    pub return_to: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(index))
        .route("/settings/admins", post(create_admin))
        .route("/settings/admins/{id}/role", post(update_role))
        .route("/settings/admins/{id}/deactivate", post(deactivate))
        .route("/settings/admins/{id}/reactivate", post(reactivate))
}

/// Settings page handler.
#[instrument(skip(admin, api, session))]
pub async fn index(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Query(query): Query<SettingsQuery>,
) -> Result<Html<String>, AppError> {
    let include_deactivated = checked(query.include_deactivated.as_deref());
    let admins = api
        .list_admins(
            &admin.id,
            AdminsQuery {
                include_deactivated: Some(include_deactivated),
                include_self: Some(true),
            },
        )
        .await?;

    let page = Page::from_total(admins.len() as u64, query.page.unwrap_or(1), PER_PAGE);
    let rows: Vec<AdminRowView> = admins
        .get(page.slice_range(admins.len()))
        .unwrap_or_default()
        .iter()
        .map(|a| AdminRowView::new(a, &admin.id))
        .collect();

    let params = [(
        "include_deactivated",
        if include_deactivated { "true" } else { "" }.to_string(),
    )];

    let template = SettingsTemplate {
        layout: Layout::new(&admin, &session, "/settings").await,
        admins: rows,
        pager: Pager::new(&page, "/settings", &params, "admins"),
        include_deactivated,
        can_manage: admin.is_super_admin,
        return_to: page_href("/settings", &params, page.page),
    };
    render(&template)
}

/// POST /settings/admins
#[instrument(skip_all)]
pub async fn create_admin(
    RequireSuperAdmin { api, session, .. }: RequireSuperAdmin,
    Form(input): Form<CreateAdminInput>,
) -> Result<Redirect, AppError> {
    match input.validate() {
        Err(errors) => {
            for error in errors {
                push_flash(&session, Flash::error(error)).await;
            }
        }
        Ok(body) => {
            let result = api.create_admin(&body).await;
            if let Some(created) =
                flash_result(&session, result, "Admin created successfully", "Failed to create admin")
                    .await?
            {
                tracing::info!(admin_id = %created.id, username = %created.username, "Admin created");
            }
        }
    }
    Ok(Redirect::to("/settings"))
}

/// POST /settings/admins/{id}/role
#[instrument(skip(admin, api, session, input))]
pub async fn update_role(
    RequireSuperAdmin {
        admin,
        api,
        session,
    }: RequireSuperAdmin,
    Path(id): Path<String>,
    Form(input): Form<RoleInput>,
) -> Result<Redirect, AppError> {
    let target = AdminId::new(id);
    let back = local_path(input.return_to.as_deref(), "/settings");

    if target == admin.id {
        push_flash(&session, Flash::error("You cannot change your own role")).await;
        return Ok(Redirect::to(&back));
    }

    let result = api
        .update_admin_role(&target, checked(input.is_super_admin.as_deref()))
        .await;
    flash_result(
        &session,
        result,
        "Admin role updated successfully",
        "Failed to update admin role",
    )
    .await?;
    Ok(Redirect::to(&back))
}

/// POST /settings/admins/{id}/deactivate
#[instrument(skip(admin, api, session, input))]
pub async fn deactivate(
    RequireSuperAdmin {
        admin,
        api,
        session,
    }: RequireSuperAdmin,
    Path(id): Path<String>,
    Form(input): Form<DeactivateInput>,
) -> Result<Redirect, AppError> {
    let target = AdminId::new(id);
    let back = local_path(input.return_to.as_deref(), "/settings");

    if target == admin.id {
        push_flash(&session, Flash::error("You cannot deactivate your own account")).await;
        return Ok(Redirect::to(&back));
    }
    let Some(reason) = non_empty(input.reason) else {
        push_flash(&session, Flash::error("Deactivation reason is required")).await;
        return Ok(Redirect::to(&back));
    };

    let result = api.deactivate_admin(&target, &reason).await;
    flash_result(
        &session,
        result,
        "Admin deactivated successfully",
        "Failed to deactivate admin",
    )
    .await?;
    Ok(Redirect::to(&back))
}

/// POST /settings/admins/{id}/reactivate
#[instrument(skip(api, session, input))]
pub async fn reactivate(
    RequireSuperAdmin { api, session, .. }: RequireSuperAdmin,
    Path(id): Path<String>,
    Form(input): Form<ReactivateInput>,
) -> Result<Redirect, AppError> {
    let back = local_path(input.return_to.as_deref(), "/settings");
    let result = api
        .reactivate_admin(
            &AdminId::new(id),
            checked(input.restore_super_admin.as_deref()),
        )
        .await;
    flash_result(
        &session,
        result,
        "Admin reactivated successfully",
        "Failed to reactivate admin",
    )
    .await?;
    Ok(Redirect::to(&back))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input() -> CreateAdminInput {
        CreateAdminInput {
            username: "ops".to_string(),
            email: "ops@example.com".to_string(),
            password: "s3cret-pass".to_string(),
            department: "Operations".to_string(),
            job_title: "Lead".to_string(),
        }
    }

    #[test]
    fn test_create_admin_requires_every_field() {
        let errors = CreateAdminInput::default().validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Username is required",
                "Email is required",
                "Department is required",
                "Job title is required",
                "Password is required",
            ]
        );
    }

    #[test]
    fn test_create_admin_rejects_bad_email() {
        let errors = CreateAdminInput {
            email: "not-an-email".to_string(),
            ..input()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors, vec!["Enter a valid email address"]);
    }

    #[test]
    fn test_create_admin_trims_fields() {
        let body = CreateAdminInput {
            username: "  ops ".to_string(),
            ..input()
        }
        .validate()
        .unwrap();
        assert_eq!(body.username, "ops");
        assert_eq!(body.password, "s3cret-pass");
    }

    #[test]
    fn test_admin_row_marks_self_and_links() {
        let admin: Admin = serde_json::from_str(
            r#"{"id":"a1","username":"ops","email":"ops@example.com","is_super_admin":true}"#,
        )
        .unwrap();

        let row = AdminRowView::new(&admin, &AdminId::new("a1"));
        assert!(row.is_self);
        assert!(row.is_active);
        assert_eq!(row.role_label, "Super Admin");
        assert_eq!(row.deactivate_href, "/settings/admins/a1/deactivate");

        let other = AdminRowView::new(&admin, &AdminId::new("a2"));
        assert!(!other.is_self);
    }
}
