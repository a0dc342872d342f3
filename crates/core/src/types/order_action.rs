//! Which order actions the admin panel offers for a given order.
//!
//! The backend performs and validates every transition. This policy only
//! decides which buttons are rendered from the last status the panel saw.

use serde::{Deserialize, Serialize};

use super::status::{OrderStatus, PaymentStatus};

/// An action an admin can take on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    View,
    Ship,
    Deliver,
    Cancel,
    Refund,
}

impl OrderAction {
    /// All actions, in the order buttons are rendered.
    pub const ALL: [Self; 5] = [
        Self::View,
        Self::Ship,
        Self::Deliver,
        Self::Cancel,
        Self::Refund,
    ];

    /// Whether this action is offered for an order in the given state.
    #[must_use]
    pub const fn is_available(self, status: OrderStatus, payment: PaymentStatus) -> bool {
        match self {
            Self::View => true,
            Self::Ship | Self::Cancel => matches!(status, OrderStatus::Processing),
            Self::Deliver => matches!(status, OrderStatus::Shipped),
            Self::Refund => {
                matches!(payment, PaymentStatus::Completed)
                    && !matches!(
                        status,
                        OrderStatus::Cancelled
                            | OrderStatus::Refunded
                            | OrderStatus::PartiallyRefunded
                            | OrderStatus::Failed
                    )
            }
        }
    }

    /// Path segment of the action's form, relative to `/orders/{id}`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::View => "",
            Self::Ship => "/ship",
            Self::Deliver => "/deliver",
            Self::Cancel => "/cancel",
            Self::Refund => "/refund",
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::View => "View",
            Self::Ship => "Ship",
            Self::Deliver => "Mark as Delivered",
            Self::Cancel => "Cancel",
            Self::Refund => "Refund",
        }
    }
}

/// Actions offered for an order, in render order.
#[must_use]
pub fn available_actions(status: OrderStatus, payment: PaymentStatus) -> Vec<OrderAction> {
    OrderAction::ALL
        .into_iter()
        .filter(|action| action.is_available(status, payment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_order_can_ship_and_cancel() {
        let actions = available_actions(OrderStatus::Processing, PaymentStatus::Pending);
        assert_eq!(
            actions,
            vec![OrderAction::View, OrderAction::Ship, OrderAction::Cancel]
        );
    }

    #[test]
    fn test_shipped_order_can_only_be_delivered() {
        let actions = available_actions(OrderStatus::Shipped, PaymentStatus::Pending);
        assert_eq!(actions, vec![OrderAction::View, OrderAction::Deliver]);
    }

    #[test]
    fn test_pending_order_only_viewable() {
        assert_eq!(
            available_actions(OrderStatus::Pending, PaymentStatus::Pending),
            vec![OrderAction::View]
        );
        assert_eq!(
            available_actions(OrderStatus::Unknown, PaymentStatus::Unknown),
            vec![OrderAction::View]
        );
    }

    #[test]
    fn test_refund_requires_completed_payment() {
        assert!(OrderAction::Refund.is_available(OrderStatus::Delivered, PaymentStatus::Completed));
        assert!(OrderAction::Refund.is_available(OrderStatus::Processing, PaymentStatus::Completed));
        assert!(!OrderAction::Refund.is_available(OrderStatus::Delivered, PaymentStatus::Pending));
    }

    #[test]
    fn test_refund_hidden_for_closed_orders() {
        for status in [
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
            OrderStatus::PartiallyRefunded,
            OrderStatus::Failed,
        ] {
            assert!(!OrderAction::Refund.is_available(status, PaymentStatus::Completed));
        }
    }

    #[test]
    fn test_delivered_order_is_not_shippable_or_cancellable() {
        let actions = available_actions(OrderStatus::Delivered, PaymentStatus::Completed);
        assert!(!actions.contains(&OrderAction::Ship));
        assert!(!actions.contains(&OrderAction::Cancel));
        assert!(!actions.contains(&OrderAction::Deliver));
    }
}
