//! Dashboard and analytics reads (`/dashboard`).

use tracing::instrument;

use super::cache::keys;
use super::types::{DashboardStats, LowStockProduct, OrderStatusBreakdown, RevenuePoint};
use super::{ApiRequest, ApiSession, BackendError, TokenStore};

impl<S: TokenStore> ApiSession<S> {
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, BackendError> {
        self.cache()
            .get_or_fetch(&keys::dashboard_stats(), || {
                self.fetch_data(ApiRequest::get("/dashboard/stats"))
            })
            .await
    }

    /// Daily order count and revenue for the last `days` days.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn revenue_trend(&self, days: u32) -> Result<Vec<RevenuePoint>, BackendError> {
        self.cache()
            .get_or_fetch(&keys::revenue_trend(days), || {
                self.fetch_data(
                    ApiRequest::get("/dashboard/revenue-trend")
                        .query(vec![("days", days.to_string())]),
                )
            })
            .await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn order_status_breakdown(&self) -> Result<OrderStatusBreakdown, BackendError> {
        self.cache()
            .get_or_fetch(&keys::order_status_breakdown(), || {
                self.fetch_data(ApiRequest::get("/dashboard/order-status-breakdown"))
            })
            .await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn low_stock_products(&self, limit: u32) -> Result<Vec<LowStockProduct>, BackendError> {
        self.cache()
            .get_or_fetch(&keys::low_stock(limit), || {
                self.fetch_data(
                    ApiRequest::get("/dashboard/low-stock-products")
                        .query(vec![("limit", limit.to_string())]),
                )
            })
            .await
    }

    /// Forget cached dashboard data so the next read hits the backend.
    pub fn refresh_dashboard(&self) {
        self.cache().invalidate_prefix(&keys::dashboard());
    }
}
