//! Orders management route handlers.
//!
//! This module contains handlers for order listing, the detail view and the
//! ship, deliver, cancel and refund actions.

mod actions;
mod detail;
mod list;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub use types::{ActionView, OrderDetailView, OrderRowView, OrdersListQuery};

pub use list::{OrdersIndexTemplate, index};

pub use detail::{OrderShowTemplate, show};

pub use actions::{
    ActionForm, CancelInput, DeliverInput, OrderActionTemplate, RefundInput, ShipInput, cancel,
    cancel_form, deliver, refund, refund_form, release_expired, ship, ship_form,
};

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(index))
        .route("/orders/release-expired", post(release_expired))
        .route("/orders/{id}", get(show))
        .route("/orders/{id}/ship", get(ship_form).post(ship))
        .route("/orders/{id}/deliver", post(deliver))
        .route("/orders/{id}/cancel", get(cancel_form).post(cancel))
        .route("/orders/{id}/refund", get(refund_form).post(refund))
}
