use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storedesk_core::{DEFAULT_CURRENCY, Money, OrderId, OrderStatus, PaymentStatus, ProductId};

/// An order row as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub payment_status: PaymentStatus,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub customer_email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub customer_phone: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub subtotal: Decimal,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tax_amount: Decimal,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub shipping_amount: Decimal,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub discount_amount: Decimal,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub shipping_method: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub updated_at: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Order {
    /// An amount in this order's currency.
    #[must_use]
    pub fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, self.currency.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub street: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub country: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub product_sku: String,
    pub quantity: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub unit_price: Decimal,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_price: Decimal,
    #[serde(default)]
    pub product_attributes: Option<serde_json::Map<String, serde_json::Value>>,
}

/// `GET /orders/{id}`: the order with address, items and notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub shipping_address: ShippingAddress,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OrdersPagination {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub page: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub per_page: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersPage {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub orders: Vec<Order>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub pagination: OrdersPagination,
}

/// Filters for the orders list. `None` and empty strings are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdersQuery {
    pub page: u32,
    pub per_page: u32,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub search: Option<String>,
}

impl OrdersQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("per_page", self.per_page.max(1).to_string()),
        ];
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(payment) = self.payment_status {
            params.push(("payment_status", payment.as_str().to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    pub shipping_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelOrder {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefundOrder {
    pub reason: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseExpired {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub cancelled_count: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub cancelled_orders: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub failed_count: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub timestamp: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_details_flattens_order_fields() {
        let json = r#"{
            "id": "o-1", "order_number": "ORD-0001", "status": "shipped",
            "payment_status": "completed", "customer_email": "ada@example.com",
            "customer_name": "Ada", "customer_phone": "0800", "subtotal": 100,
            "tax_amount": 7.5, "shipping_amount": 10, "discount_amount": 0,
            "total_amount": 117.5, "currency": "NGN", "tracking_number": "TRK1",
            "shipping_method": "DHL", "created_at": "2024-05-01T10:00:00",
            "updated_at": "2024-05-02T10:00:00",
            "shipping_address": {"street": "1 Marina", "city": "Lagos", "state": "LA",
                "country": "NG", "postal_code": null, "phone": "0800"},
            "items": [{"product_id": "p-1", "product_name": "Kettle", "product_sku": "KT-1",
                "quantity": 2, "unit_price": 50, "total_price": 100, "product_attributes": null}],
            "notes": null
        }"#;

        let details: OrderDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.order.status, OrderStatus::Shipped);
        assert_eq!(details.items.len(), 1);
        assert_eq!(details.shipping_address.city, "Lagos");
        assert_eq!(details.order.money(details.order.total_amount).format(), "₦117.50");
    }

    #[test]
    fn test_orders_query_skips_empty_filters() {
        let query = OrdersQuery {
            page: 2,
            per_page: 20,
            status: Some(OrderStatus::Processing),
            payment_status: None,
            search: Some(String::new()),
        };
        let params = query.params();
        assert_eq!(
            params,
            vec![
                ("page", "2".to_string()),
                ("per_page", "20".to_string()),
                ("status", "processing".to_string()),
            ]
        );
    }

    #[test]
    fn test_ship_order_omits_missing_optionals() {
        let body = ShipOrder {
            tracking_number: None,
            shipping_method: "GIG Logistics".to_string(),
            notes: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"shipping_method":"GIG Logistics"}"#
        );
    }
}
