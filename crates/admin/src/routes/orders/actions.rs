//! Single order action handlers.
//!
//! Ship, cancel and refund each have a confirmation form page. Submitting it
//! calls the backend and redirects with a notification: back to the order on
//! success, back to the form on failure.

use std::str::FromStr;

use askama::Template;
use axum::{
    Form,
    extract::Path,
    response::{Html, Redirect},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use storedesk_core::OrderId;
use tracing::instrument;

use crate::{
    backend::types::{CancelOrder, RefundOrder, ShipOrder},
    error::AppError,
    filters,
    middleware::RequireAdmin,
    models::{Flash, push_flash},
    routes::{Layout, flash_failure, flash_result, local_path, non_empty, render},
};

use super::types::OrderDetailView;

// =============================================================================
// Input Types
// =============================================================================

/// Input for shipping an order.
#[derive(Debug, Deserialize)]
pub struct ShipInput {
    pub shipping_method: Option<String>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
}

impl ShipInput {
    /// Backend body, or the reason the form is invalid.
    pub fn validate(self) -> Result<ShipOrder, &'static str> {
        let shipping_method =
            non_empty(self.shipping_method).ok_or("Shipping method is required")?;
        Ok(ShipOrder {
            tracking_number: non_empty(self.tracking_number),
            shipping_method,
            notes: non_empty(self.notes),
        })
    }
}

/// Input for cancelling an order.
#[derive(Debug, Deserialize)]
pub struct CancelInput {
    pub reason: Option<String>,
}

impl CancelInput {
    pub fn validate(self) -> Result<CancelOrder, &'static str> {
        let reason = non_empty(self.reason).ok_or("Cancellation reason is required")?;
        Ok(CancelOrder { reason })
    }
}

/// Input for refunding an order.
#[derive(Debug, Deserialize)]
pub struct RefundInput {
    pub reason: Option<String>,
    /// Partial refund amount; the full total when empty.
    pub amount: Option<String>,
}

impl RefundInput {
    pub fn validate(self) -> Result<RefundOrder, &'static str> {
        let reason = non_empty(self.reason).ok_or("Refund reason is required")?;
        let amount = match non_empty(self.amount) {
            None => None,
            Some(raw) => match Decimal::from_str(&raw) {
                Ok(amount) if amount > Decimal::ZERO => Some(amount),
                _ => return Err("Refund amount must be a positive number"),
            },
        };
        Ok(RefundOrder { reason, amount })
    }
}

/// Input for marking an order delivered from the list or detail page.
#[derive(Debug, Deserialize)]
pub struct DeliverInput {
    pub return_to: Option<String>,
}

// =============================================================================
// Form Pages
// =============================================================================

/// Which action form to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionForm {
    Ship,
    Cancel,
    Refund,
}

impl ActionForm {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Ship => "Ship Order",
            Self::Cancel => "Cancel Order",
            Self::Refund => "Refund Order",
        }
    }

    #[must_use]
    pub const fn submit_label(self) -> &'static str {
        match self {
            Self::Ship => "Ship Order",
            Self::Cancel => "Cancel Order",
            Self::Refund => "Issue Refund",
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Ship => "ship",
            Self::Cancel => "cancel",
            Self::Refund => "refund",
        }
    }

    #[must_use]
    pub fn is_ship(self) -> bool {
        self == Self::Ship
    }

    #[must_use]
    pub fn is_refund(self) -> bool {
        self == Self::Refund
    }
}

/// Confirmation form for ship, cancel or refund.
#[derive(Template)]
#[template(path = "orders/action.html")]
pub struct OrderActionTemplate {
    pub layout: Layout,
    pub form: ActionForm,
    pub order: OrderDetailView,
}

async fn action_form(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    id: String,
    form: ActionForm,
) -> Result<Html<String>, AppError> {
    let details = api.get_order(&OrderId::new(id)).await?;
    let template = OrderActionTemplate {
        layout: Layout::new(&admin, &session, "/orders").await,
        form,
        order: OrderDetailView::from(&details),
    };
    render(&template)
}

/// GET /orders/{id}/ship
#[instrument(skip(auth))]
pub async fn ship_form(auth: RequireAdmin, Path(id): Path<String>) -> Result<Html<String>, AppError> {
    action_form(auth, id, ActionForm::Ship).await
}

/// GET /orders/{id}/cancel
#[instrument(skip(auth))]
pub async fn cancel_form(
    auth: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    action_form(auth, id, ActionForm::Cancel).await
}

/// GET /orders/{id}/refund
#[instrument(skip(auth))]
pub async fn refund_form(
    auth: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    action_form(auth, id, ActionForm::Refund).await
}

// =============================================================================
// Mutations
// =============================================================================

fn order_page(id: &str) -> String {
    format!("/orders/{id}")
}

fn form_page(id: &str, form: ActionForm) -> String {
    format!("/orders/{id}/{}", form.segment())
}

/// POST /orders/{id}/ship
#[instrument(skip(api, session, input))]
pub async fn ship(
    RequireAdmin { api, session, .. }: RequireAdmin,
    Path(id): Path<String>,
    Form(input): Form<ShipInput>,
) -> Result<Redirect, AppError> {
    let body = match input.validate() {
        Ok(body) => body,
        Err(message) => {
            push_flash(&session, Flash::error(message)).await;
            return Ok(Redirect::to(&form_page(&id, ActionForm::Ship)));
        }
    };

    let result = api.ship_order(&OrderId::new(id.as_str()), &body).await;
    let shipped = flash_result(
        &session,
        result,
        "Order shipped successfully",
        "Failed to ship order",
    )
    .await?;

    Ok(Redirect::to(&if shipped.is_some() {
        order_page(&id)
    } else {
        form_page(&id, ActionForm::Ship)
    }))
}

/// POST /orders/{id}/deliver
#[instrument(skip(api, session, input))]
pub async fn deliver(
    RequireAdmin { api, session, .. }: RequireAdmin,
    Path(id): Path<String>,
    Form(input): Form<DeliverInput>,
) -> Result<Redirect, AppError> {
    let result = api.deliver_order(&OrderId::new(id.as_str())).await;
    flash_result(
        &session,
        result,
        "Order marked as delivered",
        "Failed to deliver order",
    )
    .await?;

    Ok(Redirect::to(&local_path(
        input.return_to.as_deref(),
        &order_page(&id),
    )))
}

/// POST /orders/{id}/cancel
#[instrument(skip(api, session, input))]
pub async fn cancel(
    RequireAdmin { api, session, .. }: RequireAdmin,
    Path(id): Path<String>,
    Form(input): Form<CancelInput>,
) -> Result<Redirect, AppError> {
    let body = match input.validate() {
        Ok(body) => body,
        Err(message) => {
            push_flash(&session, Flash::error(message)).await;
            return Ok(Redirect::to(&form_page(&id, ActionForm::Cancel)));
        }
    };

    let result = api.cancel_order(&OrderId::new(id.as_str()), &body).await;
    let cancelled = flash_result(
        &session,
        result,
        "Order cancelled successfully",
        "Failed to cancel order",
    )
    .await?;

    Ok(Redirect::to(&if cancelled.is_some() {
        order_page(&id)
    } else {
        form_page(&id, ActionForm::Cancel)
    }))
}

/// POST /orders/{id}/refund
#[instrument(skip(api, session, input))]
pub async fn refund(
    RequireAdmin { api, session, .. }: RequireAdmin,
    Path(id): Path<String>,
    Form(input): Form<RefundInput>,
) -> Result<Redirect, AppError> {
    let body = match input.validate() {
        Ok(body) => body,
        Err(message) => {
            push_flash(&session, Flash::error(message)).await;
            return Ok(Redirect::to(&form_page(&id, ActionForm::Refund)));
        }
    };

    let result = api.refund_order(&OrderId::new(id.as_str()), &body).await;
    let refunded = flash_result(
        &session,
        result,
        "Order refunded successfully",
        "Failed to refund order",
    )
    .await?;

    Ok(Redirect::to(&if refunded.is_some() {
        order_page(&id)
    } else {
        form_page(&id, ActionForm::Refund)
    }))
}

/// Cancel every order whose stock reservation has expired.
///
/// POST /orders/release-expired
#[instrument(skip_all)]
pub async fn release_expired(
    RequireAdmin { api, session, .. }: RequireAdmin,
) -> Result<Redirect, AppError> {
    match api.release_expired_orders().await {
        Ok(report) => {
            push_flash(
                &session,
                Flash::success(format!(
                    "Released {} expired reservations",
                    report.cancelled_count
                )),
            )
            .await;
            if report.failed_count > 0 {
                push_flash(
                    &session,
                    Flash::error(format!(
                        "{} expired reservations could not be released",
                        report.failed_count
                    )),
                )
                .await;
            }
        }
        Err(e) => flash_failure(&session, e, "Failed to release expired reservations").await?,
    }
    Ok(Redirect::to("/orders"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_requires_method_and_drops_empty_optionals() {
        let missing = ShipInput {
            shipping_method: Some("  ".to_string()),
            tracking_number: Some("TRK".to_string()),
            notes: None,
        };
        assert_eq!(missing.validate().err(), Some("Shipping method is required"));

        let body = ShipInput {
            shipping_method: Some("DHL".to_string()),
            tracking_number: Some(String::new()),
            notes: Some(" fragile ".to_string()),
        }
        .validate()
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(body.shipping_method, "DHL");
        assert_eq!(body.tracking_number, None);
        assert_eq!(body.notes.as_deref(), Some("fragile"));
    }

    #[test]
    fn test_cancel_requires_reason() {
        assert!(CancelInput { reason: None }.validate().is_err());
        assert!(
            CancelInput {
                reason: Some("customer request".to_string())
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn test_refund_amount_must_be_positive() {
        let input = |amount: &str| RefundInput {
            reason: Some("damaged".to_string()),
            amount: Some(amount.to_string()),
        };

        assert_eq!(
            input("12.50").validate().ok().and_then(|r| r.amount),
            Some(Decimal::new(1250, 2))
        );
        assert_eq!(input("").validate().ok().and_then(|r| r.amount), None);
        assert!(input("0").validate().is_err());
        assert!(input("-3").validate().is_err());
        assert!(input("ten").validate().is_err());
        assert!(
            RefundInput {
                reason: None,
                amount: None
            }
            .validate()
            .is_err()
        );
    }
}
