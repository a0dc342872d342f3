//! Orders list page handler.

use askama::Template;
use axum::{extract::Query, response::Html};
use storedesk_core::{ORDER_PAGE_SIZES, OrderStatus, Page, PaymentStatus};
use tracing::instrument;

use crate::{
    components::{FilterOption, Pager, page_href},
    error::AppError,
    filters,
    middleware::RequireAdmin,
    routes::{Layout, render},
};

use super::types::{OrderRowView, OrdersListQuery};

/// Orders list page template.
#[derive(Template)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderRowView>,
    pub pager: Pager,
    pub search_value: String,
    pub status_options: Vec<FilterOption>,
    pub payment_options: Vec<FilterOption>,
    pub per_page_options: Vec<FilterOption>,
    pub is_filtered: bool,
    /// Current list URL, so row actions can come back to it.
    pub return_to: String,
}

/// Orders list page handler.
#[instrument(skip_all)]
pub async fn index(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Query(query): Query<OrdersListQuery>,
) -> Result<Html<String>, AppError> {
    let backend_query = query.to_backend();
    let result = api.list_orders(&backend_query).await?;

    let pagination = result.pagination;
    let page = Page::new(
        if pagination.page == 0 { backend_query.page } else { pagination.page },
        if pagination.per_page == 0 { backend_query.per_page } else { pagination.per_page },
        pagination.total,
        pagination.pages,
    );
    let params = query.filter_params();

    let status_current = backend_query.status.map(|s| s.as_str()).unwrap_or_default();
    let payment_current = backend_query
        .payment_status
        .map(|s| s.as_str())
        .unwrap_or_default();

    let template = OrdersIndexTemplate {
        layout: Layout::new(&admin, &session, "/orders").await,
        orders: result.orders.iter().map(OrderRowView::from).collect(),
        pager: Pager::new(&page, "/orders", &params, "orders"),
        search_value: backend_query.search.clone().unwrap_or_default(),
        status_options: FilterOption::list(
            std::iter::once(("all", "All statuses"))
                .chain(OrderStatus::FILTERABLE.map(|s| (s.as_str(), s.label()))),
            if status_current.is_empty() { "all" } else { status_current },
        ),
        payment_options: FilterOption::list(
            std::iter::once(("all", "All payments"))
                .chain(PaymentStatus::FILTERABLE.map(|s| (s.as_str(), s.label()))),
            if payment_current.is_empty() { "all" } else { payment_current },
        ),
        per_page_options: FilterOption::list(
            ORDER_PAGE_SIZES.map(|size| (size.to_string(), format!("{size} per page"))),
            &backend_query.per_page.to_string(),
        ),
        is_filtered: query.is_filtered(),
        return_to: page_href("/orders", &params, page.page),
    };
    render(&template)
}
