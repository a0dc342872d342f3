use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storedesk_core::UserId;

/// A storefront user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_super_admin: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub updated_at: String,
}

/// Order history summary for one kind of checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderStats {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_orders: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_spent: Decimal,
    #[serde(default)]
    pub last_order_date: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub order_breakdown: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserOrderStats {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub registered: OrderStats,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub guest: OrderStats,
}

/// `GET /users/{id}`: the user plus order statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetails {
    #[serde(flatten)]
    pub user: User,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub order_stats: UserOrderStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersPage {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub items: Vec<User>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub per_page: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub pages: u32,
}

const fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub is_admin: Option<bool>,
}

impl UsersQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page.filter(|p| *p > 0) {
            params.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page.filter(|p| *p > 0) {
            params.push(("per_page", per_page.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(is_admin) = self.is_admin {
            params.push(("is_admin", is_admin.to_string()));
        }
        params
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateUserStatus {
    pub is_active: bool,
}
