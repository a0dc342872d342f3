//! Analytics route handlers.
//!
//! Revenue trend over a selectable range plus the order status breakdown.

use askama::Template;
use axum::{Router, extract::Query, response::Html, routing::get};
use rust_decimal::Decimal;
use serde::Deserialize;
use storedesk_core::{Money, OrderStatus};
use tracing::instrument;

use crate::backend::types::{OrderStatusBreakdown, RevenuePoint};
use crate::components::FilterOption;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::dashboard::{LOW_STOCK_LIMIT, LowStockView, StatTile, stat_tiles};
use super::{Layout, degrade, render};

// =============================================================================
// Query Parameters
// =============================================================================

/// Selectable trend ranges, in days.
pub const RANGE_DAYS: [u32; 3] = [7, 30, 90];

const DEFAULT_RANGE: u32 = 30;

/// Query parameters for the analytics page.
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<u32>,
}

impl AnalyticsQuery {
    /// Requested range, snapped to the nearest offered choice.
    #[must_use]
    pub fn days(&self) -> u32 {
        let Some(requested) = self.days else {
            return DEFAULT_RANGE;
        };
        RANGE_DAYS
            .into_iter()
            .min_by_key(|choice| choice.abs_diff(requested))
            .unwrap_or(DEFAULT_RANGE)
    }
}

// =============================================================================
// View Types
// =============================================================================

/// One day of the revenue trend.
#[derive(Debug, Clone)]
pub struct TrendRow {
    pub date: String,
    pub order_count: u64,
    pub revenue: String,
}

impl From<&RevenuePoint> for TrendRow {
    fn from(point: &RevenuePoint) -> Self {
        Self {
            date: point.date.clone(),
            order_count: point.order_count,
            revenue: Money::ngn(point.total_revenue).format(),
        }
    }
}

/// Totals across the selected range.
#[derive(Debug, Clone)]
pub struct TrendSummary {
    pub orders: u64,
    pub revenue: String,
    pub average_order: String,
}

impl TrendSummary {
    fn from_points(points: &[RevenuePoint]) -> Self {
        let orders: u64 = points.iter().map(|p| p.order_count).sum();
        let revenue: Decimal = points.iter().map(|p| p.total_revenue).sum();
        let average = if orders == 0 {
            Decimal::ZERO
        } else {
            revenue / Decimal::from(orders)
        };
        Self {
            orders,
            revenue: Money::ngn(revenue).format(),
            average_order: Money::ngn(average).format(),
        }
    }
}

/// Order status row with its share of all orders.
#[derive(Debug, Clone)]
pub struct StatusShare {
    pub label: String,
    pub badge_class: &'static str,
    pub count: u64,
    pub percent: String,
    /// `percent` without the sign, for the progress bar.
    pub bar_value: String,
}

/// Status breakdown rows, largest first.
#[must_use]
pub fn status_shares(breakdown: &OrderStatusBreakdown) -> Vec<StatusShare> {
    let total: u64 = breakdown.values().sum();
    let mut shares: Vec<StatusShare> = breakdown
        .iter()
        .map(|(status, count)| {
            let parsed = status.parse::<OrderStatus>().unwrap_or(OrderStatus::Unknown);
            let label = if parsed == OrderStatus::Unknown {
                status.replace('_', " ")
            } else {
                parsed.label().to_string()
            };
            let percent = if total == 0 {
                Decimal::ZERO
            } else {
                (Decimal::from(*count) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(1)
            };
            StatusShare {
                label,
                badge_class: parsed.badge_class(),
                count: *count,
                percent: format!("{percent:.1}%"),
                bar_value: format!("{percent:.1}"),
            }
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// Analytics page template.
#[derive(Template)]
#[template(path = "analytics.html")]
pub struct AnalyticsTemplate {
    pub layout: Layout,
    pub days: u32,
    pub ranges: Vec<FilterOption>,
    pub tiles: Vec<StatTile>,
    pub summary: TrendSummary,
    pub trend: Vec<TrendRow>,
    pub statuses: Vec<StatusShare>,
    pub low_stock: Vec<LowStockView>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/analytics", get(index))
}

/// Analytics page handler.
#[instrument(skip_all)]
async fn index(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Html<String>, AppError> {
    let days = query.days();

    let (stats_result, trend_result, breakdown_result, low_stock_result) = tokio::join!(
        api.dashboard_stats(),
        api.revenue_trend(days),
        api.order_status_breakdown(),
        api.low_stock_products(LOW_STOCK_LIMIT),
    );

    let stats = stats_result?;
    let trend = trend_result?;
    let breakdown = degrade(breakdown_result, "order status breakdown")?;
    let low_stock = degrade(low_stock_result, "low stock products")?;

    let template = AnalyticsTemplate {
        layout: Layout::new(&admin, &session, "/analytics").await,
        days,
        ranges: FilterOption::list(
            RANGE_DAYS.map(|d| (d.to_string(), format!("Last {d} days"))),
            &days.to_string(),
        ),
        tiles: stat_tiles(&stats),
        summary: TrendSummary::from_points(&trend),
        trend: trend.iter().map(TrendRow::from).collect(),
        statuses: status_shares(&breakdown),
        low_stock: low_stock.iter().map(LowStockView::from).collect(),
    };
    render(&template)
}
