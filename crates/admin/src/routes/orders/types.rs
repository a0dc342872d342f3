//! Type definitions and conversions for order views.

use rust_decimal::Decimal;
use serde::Deserialize;
use storedesk_core::{ORDER_PAGE_SIZES, OrderAction, OrderStatus, PaymentStatus, available_actions};

use crate::backend::types::{Order, OrderDetails, OrderItem, OrdersQuery, ShippingAddress};
use crate::routes::{non_empty, parse_filter};

/// Page size used when none (or an unsupported one) is requested.
pub const DEFAULT_PER_PAGE: u32 = 10;

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for the orders list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Order status, or `all`/empty for every status.
    pub status: Option<String>,
    /// Payment status, or `all`/empty for every status.
    pub payment_status: Option<String>,
    /// Free-text search across order number and customer.
    pub search: Option<String>,
}

impl OrdersListQuery {
    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page
            .filter(|size| ORDER_PAGE_SIZES.contains(size))
            .unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Backend query for these filters.
    #[must_use]
    pub fn to_backend(&self) -> OrdersQuery {
        OrdersQuery {
            page: self.page.unwrap_or(1).max(1),
            per_page: self.per_page(),
            status: parse_filter(self.status.as_deref()),
            payment_status: parse_filter(self.payment_status.as_deref()),
            search: non_empty(self.search.clone()),
        }
    }

    /// Active filters, for pagination links and form state.
    #[must_use]
    pub fn filter_params(&self) -> Vec<(&'static str, String)> {
        let backend = self.to_backend();
        vec![
            ("status", backend.status.map(|s| s.as_str().to_string()).unwrap_or_default()),
            (
                "payment_status",
                backend.payment_status.map(|s| s.as_str().to_string()).unwrap_or_default(),
            ),
            ("search", backend.search.unwrap_or_default()),
            ("per_page", backend.per_page.to_string()),
        ]
    }

    /// Whether any filter narrows the list.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        let backend = self.to_backend();
        backend.status.is_some() || backend.payment_status.is_some() || backend.search.is_some()
    }
}

// =============================================================================
// View Types
// =============================================================================

/// A button or link for one order action.
#[derive(Debug, Clone)]
pub struct ActionView {
    pub label: &'static str,
    pub href: String,
    /// Submitted as a POST form instead of followed as a link.
    pub is_post: bool,
    pub class: &'static str,
}

impl ActionView {
    fn new(order_id: &str, action: OrderAction) -> Self {
        Self {
            label: action.label(),
            href: format!("/orders/{order_id}{}", action.path()),
            is_post: matches!(action, OrderAction::Deliver),
            class: match action {
                OrderAction::View => "btn btn-sm",
                OrderAction::Ship | OrderAction::Deliver => "btn btn-sm btn-primary",
                OrderAction::Cancel | OrderAction::Refund => "btn btn-sm btn-danger",
            },
        }
    }
}

/// Actions offered for an order, as buttons.
#[must_use]
pub fn action_views(order_id: &str, status: OrderStatus, payment: PaymentStatus) -> Vec<ActionView> {
    available_actions(status, payment)
        .into_iter()
        .map(|action| ActionView::new(order_id, action))
        .collect()
}

/// Order row for the list table.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub href: String,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub status_label: &'static str,
    pub status_badge: &'static str,
    pub payment_label: &'static str,
    pub payment_badge: &'static str,
    pub total: String,
    pub created_at: String,
    pub actions: Vec<ActionView>,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        let id = order.id.as_str();
        Self {
            href: format!("/orders/{id}"),
            order_number: order.order_number.clone(),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            status_label: order.status.label(),
            status_badge: order.status.badge_class(),
            payment_label: order.payment_status.label(),
            payment_badge: order.payment_status.badge_class(),
            total: order.money(order.total_amount).format(),
            created_at: order.created_at.clone(),
            actions: action_views(id, order.status, order.payment_status)
                .into_iter()
                // The row itself links to the detail page.
                .filter(|action| action.label != OrderAction::View.label())
                .collect(),
        }
    }
}

/// Line item row.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub product_href: String,
    pub name: String,
    pub sku: String,
    pub quantity: u32,
    pub unit_price: String,
    pub total_price: String,
    /// Selected variant attributes, e.g. "color: red, size: M".
    pub attributes: String,
}

impl OrderItemView {
    fn new(item: &OrderItem, order: &Order) -> Self {
        let attributes = item
            .product_attributes
            .as_ref()
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|(key, value)| match value {
                        serde_json::Value::String(s) => format!("{key}: {s}"),
                        other => format!("{key}: {other}"),
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        Self {
            product_href: format!("/products/{}", item.product_id),
            name: item.product_name.clone(),
            sku: item.product_sku.clone(),
            quantity: item.quantity,
            unit_price: order.money(item.unit_price).format(),
            total_price: order.money(item.total_price).format(),
            attributes,
        }
    }
}

/// Shipping address as display lines, blank parts skipped.
#[must_use]
pub fn address_lines(address: &ShippingAddress) -> Vec<String> {
    let region = [address.city.as_str(), address.state.as_str()]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let country = [
        address.country.as_str(),
        address.postal_code.as_deref().unwrap_or_default(),
    ]
    .into_iter()
    .filter(|part| !part.trim().is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    [address.street.clone(), region, country]
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Order detail view.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub id: String,
    pub order_number: String,
    pub status_label: &'static str,
    pub status_badge: &'static str,
    pub payment_label: &'static str,
    pub payment_badge: &'static str,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub address_lines: Vec<String>,
    pub address_phone: String,
    pub tracking_number: Option<String>,
    pub shipping_method: Option<String>,
    pub items: Vec<OrderItemView>,
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    /// Only shown when the order carries a discount.
    pub discount: Option<String>,
    pub total: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub actions: Vec<ActionView>,
}

impl From<&OrderDetails> for OrderDetailView {
    fn from(details: &OrderDetails) -> Self {
        let order = &details.order;
        let id = order.id.as_str();

        Self {
            id: id.to_string(),
            order_number: order.order_number.clone(),
            status_label: order.status.label(),
            status_badge: order.status.badge_class(),
            payment_label: order.payment_status.label(),
            payment_badge: order.payment_status.badge_class(),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            customer_phone: order.customer_phone.clone(),
            address_lines: address_lines(&details.shipping_address),
            address_phone: details.shipping_address.phone.clone(),
            tracking_number: non_empty(order.tracking_number.clone()),
            shipping_method: non_empty(order.shipping_method.clone()),
            items: details
                .items
                .iter()
                .map(|item| OrderItemView::new(item, order))
                .collect(),
            subtotal: order.money(order.subtotal).format(),
            tax: order.money(order.tax_amount).format(),
            shipping: order.money(order.shipping_amount).format(),
            discount: (order.discount_amount > Decimal::ZERO)
                .then(|| format!("-{}", order.money(order.discount_amount).format())),
            total: order.money(order.total_amount).format(),
            notes: non_empty(details.notes.clone()),
            created_at: order.created_at.clone(),
            updated_at: order.updated_at.clone(),
            actions: action_views(id, order.status, order.payment_status)
                .into_iter()
                .filter(|action| action.label != OrderAction::View.label())
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn details(status: &str, payment: &str, discount: f64) -> OrderDetails {
        serde_json::from_value(serde_json::json!({
            "id": "o-1", "order_number": "ORD-0001", "status": status,
            "payment_status": payment, "customer_email": "ada@example.com",
            "customer_name": "Ada", "subtotal": 100, "tax_amount": 7.5,
            "shipping_amount": 10, "discount_amount": discount, "total_amount": 117.5,
            "created_at": "2024-05-01T10:00:00",
            "shipping_address": {"street": "1 Marina", "city": "Lagos", "state": "",
                "country": "NG", "postal_code": "101001"},
            "items": [{"product_id": "p-1", "product_name": "Kettle", "quantity": 2,
                "unit_price": 50, "total_price": 100,
                "product_attributes": {"color": "red"}}]
        }))
        .unwrap()
    }

    #[test]
    fn test_query_defaults_and_unsupported_page_size() {
        let query = OrdersListQuery {
            per_page: Some(15),
            status: Some("all".to_string()),
            search: Some("  ".to_string()),
            ..OrdersListQuery::default()
        };
        let backend = query.to_backend();
        assert_eq!(backend.page, 1);
        assert_eq!(backend.per_page, DEFAULT_PER_PAGE);
        assert_eq!(backend.status, None);
        assert_eq!(backend.search, None);
        assert!(!query.is_filtered());
    }

    #[test]
    fn test_query_filters_carry_into_params() {
        let query = OrdersListQuery {
            page: Some(3),
            per_page: Some(50),
            status: Some("shipped".to_string()),
            payment_status: Some("completed".to_string()),
            search: Some("ada".to_string()),
        };
        assert!(query.is_filtered());
        assert_eq!(
            query.filter_params(),
            vec![
                ("status", "shipped".to_string()),
                ("payment_status", "completed".to_string()),
                ("search", "ada".to_string()),
                ("per_page", "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_detail_view_hides_zero_discount() {
        let view = OrderDetailView::from(&details("processing", "pending", 0.0));
        assert!(view.discount.is_none());
        assert_eq!(view.total, "₦117.50");
        assert_eq!(view.address_lines, vec!["1 Marina", "Lagos", "NG 101001"]);
        assert_eq!(view.items[0].attributes, "color: red");

        let labels: Vec<&str> = view.actions.iter().map(|a| a.label).collect();
        assert_eq!(labels, vec!["Ship", "Cancel"]);
    }

    #[test]
    fn test_detail_view_shows_discount_and_deliver() {
        let view = OrderDetailView::from(&details("shipped", "completed", 5.0));
        assert_eq!(view.discount.as_deref(), Some("-₦5.00"));

        let deliver = view.actions.iter().find(|a| a.label == "Mark as Delivered").unwrap();
        assert!(deliver.is_post);
        assert_eq!(deliver.href, "/orders/o-1/deliver");
        assert!(view.actions.iter().any(|a| a.label == "Refund"));
    }
}
