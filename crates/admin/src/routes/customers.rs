//! Customer account route handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query},
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use storedesk_core::{Money, OrderStatus, Page, UserId};
use tracing::instrument;

use crate::{
    backend::types::{OrderStats, User, UserDetails, UsersQuery},
    components::Pager,
    error::AppError,
    filters,
    middleware::{RequireAdmin, RequireSuperAdmin},
    routes::{Layout, checked, flash_result, local_path, non_empty, render},
    state::AppState,
};

/// Customers shown per list page.
pub const PER_PAGE: u32 = 5;

/// Query parameters for the customers list.
#[derive(Debug, Default, Deserialize)]
pub struct CustomersQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
}

/// Customer row for the list table.
#[derive(Debug, Clone)]
pub struct CustomerView {
    pub href: String,
    pub status_href: String,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<&User> for CustomerView {
    fn from(user: &User) -> Self {
        let href = format!("/customers/{}", user.id);
        Self {
            status_href: format!("{href}/status"),
            href,
            username: user.username.clone(),
            email: user.email.clone(),
            is_active: user.is_active,
            created_at: user.created_at.clone(),
        }
    }
}

/// One order status count in a customer's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownRow {
    pub label: String,
    pub badge_class: &'static str,
    pub count: u64,
}

/// Order history for registered or guest checkouts.
#[derive(Debug, Clone)]
pub struct OrderStatsView {
    pub title: &'static str,
    pub total_orders: u64,
    pub total_spent: String,
    pub last_order_date: Option<String>,
    pub breakdown: Vec<BreakdownRow>,
}

impl OrderStatsView {
    fn new(title: &'static str, stats: &OrderStats) -> Self {
        Self {
            title,
            total_orders: stats.total_orders,
            total_spent: Money::ngn(stats.total_spent).format(),
            last_order_date: non_empty(stats.last_order_date.clone()),
            breakdown: stats
                .order_breakdown
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(status, count)| match status.parse::<OrderStatus>() {
                    Ok(known) => BreakdownRow {
                        label: known.label().to_string(),
                        badge_class: known.badge_class(),
                        count: *count,
                    },
                    Err(_) => BreakdownRow {
                        label: status.replace('_', " "),
                        badge_class: "badge",
                        count: *count,
                    },
                })
                .collect(),
        }
    }
}

/// Customer detail view.
#[derive(Debug, Clone)]
pub struct CustomerDetailView {
    pub customer: CustomerView,
    pub updated_at: String,
    pub registered: OrderStatsView,
    pub guest: OrderStatsView,
}

impl From<&UserDetails> for CustomerDetailView {
    fn from(details: &UserDetails) -> Self {
        Self {
            customer: CustomerView::from(&details.user),
            updated_at: details.user.updated_at.clone(),
            registered: OrderStatsView::new("Registered Orders", &details.order_stats.registered),
            guest: OrderStatsView::new("Guest Orders", &details.order_stats.guest),
        }
    }
}

/// Customers list page template.
#[derive(Template)]
#[template(path = "customers/index.html")]
pub struct CustomersIndexTemplate {
    pub layout: Layout,
    pub customers: Vec<CustomerView>,
    pub pager: Pager,
    pub search_value: String,
    pub return_to: String,
}

/// Customer detail page template.
#[derive(Template)]
#[template(path = "customers/show.html")]
pub struct CustomerShowTemplate {
    pub layout: Layout,
    pub detail: CustomerDetailView,
}

/// Input for enabling or disabling an account.
#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub is_active: Option<String>,
    pub return_to: Option<String>,
}

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(index))
        .route("/customers/{id}", get(show))
        .route("/customers/{id}/status", post(update_status))
}

/// Customers list page handler.
///
/// Only storefront accounts are listed; admins live under settings.
#[instrument(skip(admin, api, session))]
pub async fn index(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Query(query): Query<CustomersQuery>,
) -> Result<Html<String>, AppError> {
    let search = non_empty(query.search);
    let page_number = query.page.unwrap_or(1).max(1);
    let users = api
        .list_users(&UsersQuery {
            page: Some(page_number),
            per_page: Some(PER_PAGE),
            search: search.clone(),
            is_admin: Some(false),
        })
        .await?;

    let page = Page::new(users.page.max(1), PER_PAGE, users.total, users.pages);
    let search_value = search.unwrap_or_default();
    let params = [("search", search_value.clone())];
    let pager = Pager::new(&page, "/customers", &params, "customers");
    let return_to = crate::components::page_href("/customers", &params, page.page);

    let template = CustomersIndexTemplate {
        layout: Layout::new(&admin, &session, "/customers").await,
        customers: users.items.iter().map(CustomerView::from).collect(),
        pager,
        search_value,
        return_to,
    };
    render(&template)
}

/// Customer detail page handler.
#[instrument(skip(admin, api, session))]
pub async fn show(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let details = api.get_user(&UserId::new(id)).await?;

    let template = CustomerShowTemplate {
        layout: Layout::new(&admin, &session, "/customers").await,
        detail: CustomerDetailView::from(&details),
    };
    render(&template)
}

/// Enable or disable a customer account. Super admins only.
///
/// POST /customers/{id}/status
#[instrument(skip(api, session, input))]
pub async fn update_status(
    RequireSuperAdmin { api, session, .. }: RequireSuperAdmin,
    Path(id): Path<String>,
    Form(input): Form<StatusInput>,
) -> Result<Redirect, AppError> {
    let is_active = checked(input.is_active.as_deref());
    let result = api
        .update_user_status(&UserId::new(id.as_str()), is_active)
        .await;
    flash_result(
        &session,
        result,
        "User status updated successfully",
        "Failed to update user status",
    )
    .await?;

    Ok(Redirect::to(&local_path(
        input.return_to.as_deref(),
        &format!("/customers/{id}"),
    )))
}
