use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storedesk_core::ProductId;

/// Headline numbers for the dashboard tiles.
///
/// Newer backends report completed and total orders separately; older ones
/// only send `orders_today`. Every field defaults so either parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_products: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub products_change_percent: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub orders_today: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub orders_change_percent: f64,
    #[serde(default)]
    pub completed_orders_today: Option<u64>,
    #[serde(default)]
    pub total_orders_today: Option<u64>,
    #[serde(default)]
    pub completed_orders_change_percent: Option<f64>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_customers: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub customers_change_percent: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub revenue_this_month: Decimal,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub revenue_change_percent: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub recent_products: Vec<RecentProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub stock: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub order_count: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_revenue: Decimal,
}

/// Order counts keyed by status string.
pub type OrderStatusBreakdown = BTreeMap<String, u64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub sku: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub stock_available: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub low_stock_threshold: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub category_name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub price: Decimal,
}
