use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storedesk_core::{CategoryId, Money, ProductId, ProductStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    pub public_id: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_primary: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub alt_text: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub sku: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub price: Decimal,
    #[serde(default)]
    pub cost_price: Option<Decimal>,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub profit_margin: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub discount_percentage: f64,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub status: ProductStatus,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub show_discount: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub stock_available: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub stock_reserved: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_low_stock: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_out_of_stock: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub updated_at: String,
}

impl Product {
    /// The image flagged primary, else the first image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.first())
    }

    #[must_use]
    pub fn price_money(&self) -> Money {
        Money::ngn(self.price)
    }
}

/// Paginated product listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsPage {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub data: Vec<Product>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub page: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub per_page: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub pages: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductsQuery {
    pub page: u32,
    pub per_page: u32,
    pub category_id: Option<CategoryId>,
    pub brand: Option<String>,
    pub status: Option<ProductStatus>,
    pub is_featured: Option<bool>,
    pub search: Option<String>,
    pub include_inactive: bool,
}

impl ProductsQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("per_page", self.per_page.max(1).to_string()),
        ];
        if let Some(category) = &self.category_id {
            params.push(("category_id", category.to_string()));
        }
        if let Some(brand) = self.brand.as_deref().filter(|b| !b.is_empty()) {
            params.push(("brand", brand.to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(featured) = self.is_featured {
            params.push(("is_featured", featured.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        params.push(("include_inactive", self.include_inactive.to_string()));
        params
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductStats {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_products: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub active_products: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub inactive_products: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub featured_products: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub out_of_stock: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub low_stock: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub uncategorized: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_value: Decimal,
}

/// Product fields submitted as multipart form data on create and update.
///
/// Optional fields left `None` are not sent, so an update only touches the
/// fields the admin filled in. The three flags are always sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: Option<String>,
    pub category_id: Option<CategoryId>,
    pub brand: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub compare_at_price: Option<Decimal>,
    pub description: Option<String>,
    pub status: Option<ProductStatus>,
    pub tags: Option<String>,
    pub initial_stock: Option<u32>,
    pub is_active: bool,
    pub is_featured: bool,
    pub show_discount: bool,
}

impl ProductForm {
    pub(crate) fn fields(&self) -> Vec<(&'static str, String)> {
        fn text(value: Option<&str>) -> Option<String> {
            value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
        }

        let optional = [
            ("name", text(self.name.as_deref())),
            ("category_id", self.category_id.as_ref().map(ToString::to_string)),
            ("brand", text(self.brand.as_deref())),
            ("price", self.price.map(|p| p.to_string())),
            ("cost_price", self.cost_price.map(|p| p.to_string())),
            ("compare_at_price", self.compare_at_price.map(|p| p.to_string())),
            ("description", text(self.description.as_deref())),
            ("status", self.status.map(|s| s.as_str().to_string())),
            ("tags", text(self.tags.as_deref())),
            ("initial_stock", self.initial_stock.map(|s| s.to_string())),
        ];

        let mut fields: Vec<(&'static str, String)> = optional
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect();
        fields.push(("is_active", self.is_active.to_string()));
        fields.push(("is_featured", self.is_featured.to_string()));
        fields.push(("show_discount", self.show_discount.to_string()));
        fields
    }
}
