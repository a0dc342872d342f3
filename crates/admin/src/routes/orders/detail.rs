//! Order detail page handler.

use askama::Template;
use axum::{extract::Path, response::Html};
use storedesk_core::OrderId;
use tracing::instrument;

use crate::{
    error::AppError,
    filters,
    middleware::RequireAdmin,
    routes::{Layout, render},
};

use super::types::OrderDetailView;

/// Order detail page template.
#[derive(Template)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub layout: Layout,
    pub order: OrderDetailView,
}

/// Order detail page handler.
#[instrument(skip(admin, api, session))]
pub async fn show(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let details = api.get_order(&OrderId::new(id)).await?;

    let template = OrderShowTemplate {
        layout: Layout::new(&admin, &session, "/orders").await,
        order: OrderDetailView::from(&details),
    };
    render(&template)
}
