//! Status enums mirrored from the store backend.
//!
//! The backend owns every lifecycle; these enums only exist so the admin
//! panel can render badges and decide which actions to offer. Any value the
//! backend adds later deserializes to `Unknown` instead of failing the page.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Shipped,
    Delivered,
    Cancelled,
    Failed,
    Refunded,
    PartiallyRefunded,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Statuses offered in the orders filter, in display order.
    pub const FILTERABLE: [Self; 9] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Failed,
        Self::Refunded,
        Self::PartiallyRefunded,
    ];

    /// Wire value used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
            Self::PartiallyRefunded => "partially_refunded",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Failed => "Failed",
            Self::Refunded => "Refunded",
            Self::PartiallyRefunded => "Partially Refunded",
            Self::Unknown => "Unknown",
        }
    }

    /// CSS class for the status badge.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Pending => "badge badge-warning",
            Self::Processing => "badge badge-info",
            Self::Completed => "badge badge-success",
            Self::Shipped => "badge badge-shipped",
            Self::Delivered => "badge badge-delivered",
            Self::Cancelled | Self::Unknown => "badge badge-muted",
            Self::Failed => "badge badge-error",
            Self::Refunded | Self::PartiallyRefunded => "badge badge-refunded",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::FILTERABLE
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
    PartiallyRefunded,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// Statuses offered in the payment filter, in display order.
    pub const FILTERABLE: [Self; 5] = [
        Self::Pending,
        Self::Completed,
        Self::Failed,
        Self::Refunded,
        Self::PartiallyRefunded,
    ];

    /// Wire value used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
            Self::PartiallyRefunded => "partially_refunded",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Refunded => "Refunded",
            Self::PartiallyRefunded => "Partially Refunded",
            Self::Unknown => "Unknown",
        }
    }

    /// CSS class for the payment badge.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Pending => "badge badge-warning",
            Self::Completed => "badge badge-success",
            Self::Failed => "badge badge-error",
            Self::Refunded | Self::PartiallyRefunded => "badge badge-refunded",
            Self::Unknown => "badge badge-muted",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::FILTERABLE
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid payment status: {s}"))
    }
}

/// Catalog availability of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Available,
    ComingSoon,
    Discontinued,
    OutOfStock,
}

impl ProductStatus {
    /// All statuses, in display order.
    pub const ALL: [Self; 4] = [
        Self::Available,
        Self::ComingSoon,
        Self::Discontinued,
        Self::OutOfStock,
    ];

    /// Wire value used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::ComingSoon => "coming_soon",
            Self::Discontinued => "discontinued",
            Self::OutOfStock => "out_of_stock",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::ComingSoon => "Coming Soon",
            Self::Discontinued => "Discontinued",
            Self::OutOfStock => "Out of Stock",
        }
    }

    /// CSS class for the status badge.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Available => "badge badge-success",
            Self::ComingSoon => "badge badge-info",
            Self::Discontinued => "badge badge-muted",
            Self::OutOfStock => "badge badge-error",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid product status: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_values() {
        let status: OrderStatus = serde_json::from_str("\"partially_refunded\"").unwrap();
        assert_eq!(status, OrderStatus::PartiallyRefunded);
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"processing\""
        );
    }

    #[test]
    fn test_unknown_statuses_do_not_fail() {
        let status: OrderStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown);

        let payment: PaymentStatus = serde_json::from_str("\"authorized\"").unwrap();
        assert_eq!(payment, PaymentStatus::Unknown);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!(
            "shipped".parse::<OrderStatus>().unwrap(),
            OrderStatus::Shipped
        );
        assert!("unknown".parse::<OrderStatus>().is_err());
        assert!("".parse::<PaymentStatus>().is_err());
        assert_eq!(
            "coming_soon".parse::<ProductStatus>().unwrap(),
            ProductStatus::ComingSoon
        );
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for status in OrderStatus::FILTERABLE {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        for status in ProductStatus::ALL {
            assert_eq!(status.to_string().parse::<ProductStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_refund_statuses_share_badge() {
        assert_eq!(
            OrderStatus::Refunded.badge_class(),
            OrderStatus::PartiallyRefunded.badge_class()
        );
    }
}
