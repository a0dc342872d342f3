//! Dashboard route handler.

use askama::Template;
use axum::{
    Router,
    response::{Html, Redirect},
    routing::{get, post},
};
use storedesk_core::{Money, format_compact_thousands, format_percent_change};
use tracing::instrument;

use crate::backend::types::{DashboardStats, LowStockProduct, RecentProduct};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{Flash, push_flash};
use crate::state::AppState;

use super::{Layout, degrade, render};

/// Rows shown in the low-stock panel.
pub(crate) const LOW_STOCK_LIMIT: u32 = 5;

/// One headline number with its period-over-period change.
#[derive(Debug, Clone)]
pub struct StatTile {
    pub label: &'static str,
    pub value: String,
    pub change: String,
    pub change_class: &'static str,
}

impl StatTile {
    fn new(label: &'static str, value: String, change: f64) -> Self {
        Self {
            label,
            value,
            change: format_percent_change(change),
            change_class: change_class(change),
        }
    }
}

fn change_class(change: f64) -> &'static str {
    if change > 0.0 {
        "change change-up"
    } else if change < 0.0 {
        "change change-down"
    } else {
        "change"
    }
}

/// The four dashboard tiles.
#[must_use]
pub fn stat_tiles(stats: &DashboardStats) -> Vec<StatTile> {
    let (orders_value, orders_change) =
        match (stats.completed_orders_today, stats.total_orders_today) {
            (Some(completed), Some(total)) => (
                format!("{completed} / {total}"),
                stats
                    .completed_orders_change_percent
                    .unwrap_or(stats.orders_change_percent),
            ),
            _ => (stats.orders_today.to_string(), stats.orders_change_percent),
        };

    vec![
        StatTile::new(
            "Total Products",
            stats.total_products.to_string(),
            stats.products_change_percent,
        ),
        StatTile::new("Orders Today", orders_value, orders_change),
        StatTile::new(
            "Total Customers",
            stats.total_customers.to_string(),
            stats.customers_change_percent,
        ),
        StatTile::new(
            "Revenue This Month",
            format_compact_thousands(stats.revenue_this_month),
            stats.revenue_change_percent,
        ),
    ]
}

/// Recent product row.
#[derive(Debug, Clone)]
pub struct RecentProductView {
    pub href: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: i64,
    pub status: String,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<&RecentProduct> for RecentProductView {
    fn from(product: &RecentProduct) -> Self {
        Self {
            href: format!("/products/{}", product.id),
            name: product.name.clone(),
            category: product.category.clone(),
            price: Money::ngn(product.price).format(),
            stock: product.stock,
            status: product.status.replace('_', " "),
            image_url: product.image_url.clone(),
            created_at: product.created_at.clone(),
        }
    }
}

/// Low stock row.
#[derive(Debug, Clone)]
pub struct LowStockView {
    pub href: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub stock_available: i64,
    pub threshold: i64,
    pub is_out: bool,
}

impl From<&LowStockProduct> for LowStockView {
    fn from(product: &LowStockProduct) -> Self {
        Self {
            href: format!("/products/{}", product.id),
            name: product.name.clone(),
            sku: product.sku.clone(),
            category: product.category_name.clone(),
            stock_available: product.stock_available,
            threshold: product.low_stock_threshold,
            is_out: product.stock_available <= 0,
        }
    }
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub tiles: Vec<StatTile>,
    pub recent_products: Vec<RecentProductView>,
    pub low_stock: Vec<LowStockView>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(index))
        .route("/dashboard/refresh", post(refresh))
}

/// Dashboard page handler.
#[instrument(skip_all)]
async fn index(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
) -> Result<Html<String>, AppError> {
    let (stats_result, low_stock_result) =
        tokio::join!(api.dashboard_stats(), api.low_stock_products(LOW_STOCK_LIMIT));

    let stats = stats_result?;
    let low_stock = degrade(low_stock_result, "low stock products")?;

    let template = DashboardTemplate {
        layout: Layout::new(&admin, &session, "/dashboard").await,
        tiles: stat_tiles(&stats),
        recent_products: stats.recent_products.iter().map(RecentProductView::from).collect(),
        low_stock: low_stock.iter().map(LowStockView::from).collect(),
    };
    render(&template)
}

/// Drop cached dashboard data and reload.
///
/// POST /dashboard/refresh
async fn refresh(RequireAdmin { api, session, .. }: RequireAdmin) -> Redirect {
    api.refresh_dashboard();
    push_flash(&session, Flash::info("Dashboard refreshed")).await;
    Redirect::to("/dashboard")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_tiles_prefer_completed_over_total_orders() {
        let stats = DashboardStats {
            total_products: 120,
            orders_today: 9,
            orders_change_percent: 3.0,
            completed_orders_today: Some(4),
            total_orders_today: Some(9),
            completed_orders_change_percent: Some(-2.5),
            revenue_this_month: Decimal::new(1_234_500, 2),
            revenue_change_percent: 12.0,
            ..DashboardStats::default()
        };

        let tiles = stat_tiles(&stats);
        assert_eq!(tiles[1].value, "4 / 9");
        assert_eq!(tiles[1].change, "-2.5%");
        assert_eq!(tiles[1].change_class, "change change-down");
        assert_eq!(tiles[3].value, "₦12.3K");
        assert_eq!(tiles[3].change, "+12%");
        assert_eq!(tiles[0].change, "0%");
        assert_eq!(tiles[0].change_class, "change");
    }

    #[test]
    fn test_tiles_fall_back_to_orders_today() {
        let stats = DashboardStats {
            orders_today: 7,
            orders_change_percent: 1.5,
            ..DashboardStats::default()
        };
        let tiles = stat_tiles(&stats);
        assert_eq!(tiles[1].value, "7");
        assert_eq!(tiles[1].change, "+1.5%");
    }

    #[test]
    fn test_low_stock_view_flags_out_of_stock() {
        let product: LowStockProduct = serde_json::from_str(
            r#"{"id":"p-1","name":"Kettle","sku":"KT-1","stock_available":0,"low_stock_threshold":5}"#,
        )
        .unwrap();
        let view = LowStockView::from(&product);
        assert!(view.is_out);
        assert_eq!(view.href, "/products/p-1");
    }
}
