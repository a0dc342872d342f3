//! Order listing and fulfilment actions (`/orders`).
//!
//! Ship, deliver, cancel and refund are validated by the backend. On success
//! the order lists and that order's detail are invalidated.

use storedesk_core::OrderId;
use tracing::instrument;

use super::cache::keys;
use super::types::{
    CancelOrder, MaybeEnveloped, OrderDetails, OrdersPage, OrdersQuery, RefundOrder,
    ReleaseExpired, ShipOrder,
};
use super::{ApiRequest, ApiSession, BackendError, TokenStore};

impl<S: TokenStore> ApiSession<S> {
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: &OrdersQuery) -> Result<OrdersPage, BackendError> {
        self.cache()
            .get_or_fetch(&keys::orders_list(query), || {
                self.fetch_data(ApiRequest::get("/orders").query(query.params()))
            })
            .await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such order exists.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &OrderId) -> Result<OrderDetails, BackendError> {
        self.cache()
            .get_or_fetch(&keys::order_detail(id), || async {
                let body: MaybeEnveloped<OrderDetails> =
                    self.fetch(ApiRequest::get(format!("/orders/{id}"))).await?;
                Ok(body.into_inner())
            })
            .await
    }

    /// # Errors
    ///
    /// Returns error if the order cannot be shipped or the request fails.
    #[instrument(skip(self))]
    pub async fn ship_order(&self, id: &OrderId, ship: &ShipOrder) -> Result<(), BackendError> {
        self.execute(ApiRequest::put(format!("/orders/{id}/ship")).json(ship)?)
            .await?;
        self.invalidate_order(id);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the order cannot be delivered or the request fails.
    #[instrument(skip(self))]
    pub async fn deliver_order(&self, id: &OrderId) -> Result<(), BackendError> {
        self.execute(ApiRequest::put(format!("/orders/{id}/deliver")))
            .await?;
        self.invalidate_order(id);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the order cannot be cancelled or the request fails.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: &OrderId, cancel: &CancelOrder) -> Result<(), BackendError> {
        self.execute(ApiRequest::put(format!("/orders/{id}/cancel")).json(cancel)?)
            .await?;
        self.invalidate_order(id);
        Ok(())
    }

    /// Refund an order, fully or by `amount`.
    ///
    /// # Errors
    ///
    /// Returns error if the order cannot be refunded or the request fails.
    #[instrument(skip(self))]
    pub async fn refund_order(&self, id: &OrderId, refund: &RefundOrder) -> Result<(), BackendError> {
        self.execute(ApiRequest::post(format!("/orders/{id}/refund")).json(refund)?)
            .await?;
        self.invalidate_order(id);
        Ok(())
    }

    /// Cancel orders whose stock reservations have expired.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn release_expired_orders(&self) -> Result<ReleaseExpired, BackendError> {
        let report: ReleaseExpired = self
            .fetch(ApiRequest::post("/orders/release-expired"))
            .await?;
        tracing::info!(
            cancelled = report.cancelled_count,
            failed = report.failed_count,
            "Released expired order reservations"
        );
        self.cache().invalidate_prefix(&keys::orders_lists());
        Ok(report)
    }

    fn invalidate_order(&self, id: &OrderId) {
        self.cache()
            .invalidate_all_of([&keys::orders_lists(), &keys::order_detail(id)]);
    }
}
