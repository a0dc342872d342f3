//! Type definitions and conversions for product views.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use storedesk_core::{CategoryId, Money, ProductStatus};

use crate::backend::types::{
    CategoryTree, Product, ProductForm, ProductStats, ProductsQuery, flatten_tree,
};
use crate::components::FilterOption;
use crate::routes::{checked, non_empty, parse_filter, uploads::MultipartForm};

/// Products shown per list page.
pub const PER_PAGE: u32 = 20;

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for the products list.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsListQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
    /// Product status, or `all_status` for every status.
    pub status: Option<String>,
    pub category_id: Option<String>,
    pub brand: Option<String>,
    /// `true`, `false`, or empty for both.
    pub featured: Option<String>,
    pub include_inactive: Option<String>,
}

impl ProductsListQuery {
    /// Backend query for these filters.
    #[must_use]
    pub fn to_backend(&self) -> ProductsQuery {
        ProductsQuery {
            page: self.page.unwrap_or(1).max(1),
            per_page: PER_PAGE,
            category_id: non_empty(self.category_id.clone()).map(CategoryId::new),
            brand: non_empty(self.brand.clone()),
            status: parse_filter(self.status.as_deref()),
            is_featured: match self.featured.as_deref().map(str::trim) {
                Some("true") => Some(true),
                Some("false") => Some(false),
                _ => None,
            },
            search: non_empty(self.search.clone()),
            include_inactive: checked(self.include_inactive.as_deref()),
        }
    }

    /// Active filters, for pagination links.
    #[must_use]
    pub fn filter_params(&self) -> Vec<(&'static str, String)> {
        let backend = self.to_backend();
        vec![
            ("search", backend.search.unwrap_or_default()),
            ("status", backend.status.map(|s| s.as_str().to_string()).unwrap_or_default()),
            (
                "category_id",
                backend.category_id.map(String::from).unwrap_or_default(),
            ),
            ("brand", backend.brand.unwrap_or_default()),
            (
                "featured",
                backend.is_featured.map(|f| f.to_string()).unwrap_or_default(),
            ),
            (
                "include_inactive",
                if backend.include_inactive { "true" } else { "" }.to_string(),
            ),
        ]
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Stats card above the product list.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

#[must_use]
pub fn stat_cards(stats: &ProductStats) -> Vec<StatCard> {
    vec![
        StatCard {
            label: "Total Products",
            value: stats.total_products.to_string(),
        },
        StatCard {
            label: "Active",
            value: stats.active_products.to_string(),
        },
        StatCard {
            label: "Featured",
            value: stats.featured_products.to_string(),
        },
        StatCard {
            label: "Low Stock",
            value: stats.low_stock.to_string(),
        },
        StatCard {
            label: "Out of Stock",
            value: stats.out_of_stock.to_string(),
        },
        StatCard {
            label: "Inventory Value",
            value: Money::ngn(stats.total_value).format(),
        },
    ]
}

fn stock_class(product: &Product) -> &'static str {
    if product.is_out_of_stock || product.stock_available <= 0 {
        "stock stock-out"
    } else if product.is_low_stock {
        "stock stock-low"
    } else {
        "stock"
    }
}

/// Product row for the list table.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub href: String,
    pub edit_href: String,
    pub delete_href: String,
    pub name: String,
    pub sku: String,
    pub image_url: Option<String>,
    pub category: String,
    pub price: String,
    pub stock: i64,
    pub stock_class: &'static str,
    pub status_label: &'static str,
    pub status_badge: &'static str,
    pub is_active: bool,
    pub is_featured: bool,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        let href = format!("/products/{}", product.id);
        Self {
            edit_href: format!("{href}/edit"),
            delete_href: format!("{href}/delete"),
            href,
            name: product.name.clone(),
            sku: product.sku.clone(),
            image_url: product.primary_image().map(|img| img.url.clone()),
            category: product
                .category_name
                .clone()
                .unwrap_or_else(|| "Uncategorized".to_string()),
            price: product.price_money().format(),
            stock: product.stock_available,
            stock_class: stock_class(product),
            status_label: product.status.label(),
            status_badge: product.status.badge_class(),
            is_active: product.is_active,
            is_featured: product.is_featured,
        }
    }
}

/// Product image with its delete action.
#[derive(Debug, Clone)]
pub struct ProductImageView {
    pub url: String,
    pub alt: String,
    pub is_primary: bool,
    pub delete_href: String,
}

/// Product detail view.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub slug: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub category_href: Option<String>,
    pub description: Option<String>,
    pub price: String,
    pub cost_price: Option<String>,
    pub compare_at_price: Option<String>,
    pub profit_margin: String,
    pub discount_percentage: String,
    pub status_label: &'static str,
    pub status_badge: &'static str,
    pub is_active: bool,
    pub is_featured: bool,
    pub show_discount: bool,
    pub stock_available: i64,
    pub stock_reserved: i64,
    pub stock_class: &'static str,
    pub images: Vec<ProductImageView>,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        let id = product.id.as_str();
        let mut images = product.images.clone();
        images.sort_by_key(|img| img.sort_order);

        Self {
            id: id.to_string(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            slug: product.slug.clone(),
            brand: non_empty(product.brand.clone()),
            category: non_empty(product.category_name.clone()),
            category_href: product.category_id.as_ref().map(|c| format!("/categories/{c}")),
            description: non_empty(product.description.clone()),
            price: product.price_money().format(),
            cost_price: product.cost_price.map(|p| Money::ngn(p).format()),
            compare_at_price: product.compare_at_price.map(|p| Money::ngn(p).format()),
            profit_margin: format!("{:.1}%", product.profit_margin),
            discount_percentage: format!("{:.0}%", product.discount_percentage),
            status_label: product.status.label(),
            status_badge: product.status.badge_class(),
            is_active: product.is_active,
            is_featured: product.is_featured,
            show_discount: product.show_discount,
            stock_available: product.stock_available,
            stock_reserved: product.stock_reserved,
            stock_class: stock_class(product),
            images: images
                .iter()
                .map(|img| ProductImageView {
                    url: img.url.clone(),
                    alt: if img.alt_text.is_empty() {
                        product.name.clone()
                    } else {
                        img.alt_text.clone()
                    },
                    is_primary: img.is_primary,
                    delete_href: format!(
                        "/products/{id}/images/{}/delete",
                        urlencoding::encode(&img.public_id)
                    ),
                })
                .collect(),
            tags: product
                .tags
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(String::from)
                .collect(),
            created_at: product.created_at.clone(),
            updated_at: product.updated_at.clone(),
        }
    }
}

// =============================================================================
// Form
// =============================================================================

/// Product form contents as typed, for re-rendering after a failed submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ProductFormValues {
    pub name: String,
    pub category_id: String,
    pub brand: String,
    pub price: String,
    pub cost_price: String,
    pub compare_at_price: String,
    pub description: String,
    pub status: String,
    pub tags: String,
    pub initial_stock: String,
    pub is_active: bool,
    pub is_featured: bool,
    pub show_discount: bool,
}

impl ProductFormValues {
    /// Blank form for a new product.
    #[must_use]
    pub fn new_product() -> Self {
        Self {
            status: ProductStatus::Available.as_str().to_string(),
            initial_stock: "0".to_string(),
            is_active: true,
            ..Self::default()
        }
    }

    /// Form prefilled from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category_id: product.category_id.clone().map(String::from).unwrap_or_default(),
            brand: product.brand.clone().unwrap_or_default(),
            price: product.price.to_string(),
            cost_price: product.cost_price.map(|p| p.to_string()).unwrap_or_default(),
            compare_at_price: product
                .compare_at_price
                .map(|p| p.to_string())
                .unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
            status: product.status.as_str().to_string(),
            tags: product.tags.clone().unwrap_or_default(),
            initial_stock: String::new(),
            is_active: product.is_active,
            is_featured: product.is_featured,
            show_discount: product.show_discount,
        }
    }

    pub(crate) fn from_multipart(form: &MultipartForm) -> Self {
        let text = |name: &str| form.text(name).unwrap_or_default();
        Self {
            name: text("name"),
            category_id: text("category_id"),
            brand: text("brand"),
            price: text("price"),
            cost_price: text("cost_price"),
            compare_at_price: text("compare_at_price"),
            description: text("description"),
            status: text("status"),
            tags: text("tags"),
            initial_stock: text("initial_stock"),
            is_active: form.flag("is_active"),
            is_featured: form.flag("is_featured"),
            show_discount: form.flag("show_discount"),
        }
    }

    /// Check the form and build the backend submission.
    ///
    /// Initial stock is only sent when creating.
    ///
    /// # Errors
    ///
    /// Returns every problem found, in field order.
    pub fn validate(&self, is_create: bool) -> Result<ProductForm, Vec<String>> {
        let mut errors = Vec::new();

        let name = non_empty(Some(self.name.clone()));
        if name.is_none() {
            errors.push("Product name is required".to_string());
        }
        let category_id = non_empty(Some(self.category_id.clone())).map(CategoryId::new);
        if category_id.is_none() {
            errors.push("Category is required".to_string());
        }
        let price = amount(&self.price, "Price", &mut errors);
        if price.is_none() && self.price.trim().is_empty() {
            errors.push("Price is required".to_string());
        }
        let cost_price = amount(&self.cost_price, "Cost price", &mut errors);
        let compare_at_price = amount(&self.compare_at_price, "Compare-at price", &mut errors);

        let initial_stock = if is_create {
            match self.initial_stock.trim() {
                "" => None,
                raw => match raw.parse::<u32>() {
                    Ok(stock) => Some(stock),
                    Err(_) => {
                        errors.push("Initial stock must be a whole number of 0 or more".to_string());
                        None
                    }
                },
            }
        } else {
            None
        };

        let status = match self.status.trim() {
            "" => None,
            raw => match ProductStatus::from_str(raw) {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.push("Unknown product status".to_string());
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProductForm {
            name,
            category_id,
            brand: non_empty(Some(self.brand.clone())),
            price,
            cost_price,
            compare_at_price,
            description: non_empty(Some(self.description.clone())),
            status,
            tags: non_empty(Some(self.tags.clone())),
            initial_stock,
            is_active: self.is_active,
            is_featured: self.is_featured,
            show_discount: self.show_discount,
        })
    }
}

/// Parse an optional money field, recording an error when it is not a
/// decimal of 0 or more.
fn amount(raw: &str, label: &str, errors: &mut Vec<String>) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match Decimal::from_str(raw) {
        Ok(value) if value >= Decimal::ZERO => Some(value),
        _ => {
            errors.push(format!("{label} must be a number of 0 or more"));
            None
        }
    }
}

/// Category `<select>` options from the tree, indented by depth.
#[must_use]
pub fn category_options(tree: &[CategoryTree], selected: &str, blank_label: &str) -> Vec<FilterOption> {
    std::iter::once(FilterOption::new("", blank_label, selected))
        .chain(
            flatten_tree(tree)
                .into_iter()
                .map(|option| FilterOption::new(option.id.into_inner(), option.label, selected)),
        )
        .collect()
}

/// Status `<select>` options.
#[must_use]
pub fn status_options(selected: &str) -> Vec<FilterOption> {
    FilterOption::list(ProductStatus::ALL.map(|s| (s.as_str(), s.label())), selected)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid() -> ProductFormValues {
        ProductFormValues {
            name: "Desk Lamp".to_string(),
            category_id: "c-1".to_string(),
            price: "19.99".to_string(),
            ..ProductFormValues::new_product()
        }
    }

    #[test]
    fn test_valid_create_form() {
        let form = valid().validate(true).unwrap();
        assert_eq!(form.name.as_deref(), Some("Desk Lamp"));
        assert_eq!(form.price, Some(Decimal::new(1999, 2)));
        assert_eq!(form.initial_stock, Some(0));
        assert_eq!(form.status, Some(ProductStatus::Available));
        assert!(form.is_active);
    }

    #[test]
    fn test_required_fields() {
        let errors = ProductFormValues::default().validate(true).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Product name is required",
                "Category is required",
                "Price is required",
            ]
        );
    }

    #[test]
    fn test_amounts_must_be_non_negative_decimals() {
        let values = ProductFormValues {
            price: "-1".to_string(),
            cost_price: "abc".to_string(),
            compare_at_price: "0".to_string(),
            initial_stock: "2.5".to_string(),
            ..valid()
        };
        let errors = values.validate(true).unwrap_err();
        assert!(errors.contains(&"Price must be a number of 0 or more".to_string()));
        assert!(errors.contains(&"Cost price must be a number of 0 or more".to_string()));
        assert!(!errors.iter().any(|e| e.starts_with("Compare-at")));
        assert!(errors.iter().any(|e| e.starts_with("Initial stock")));
    }

    #[test]
    fn test_update_ignores_initial_stock() {
        let values = ProductFormValues {
            initial_stock: "not a number".to_string(),
            ..valid()
        };
        assert_eq!(values.validate(false).unwrap().initial_stock, None);
    }

    #[test]
    fn test_list_query_filters() {
        let query = ProductsListQuery {
            status: Some("all_status".to_string()),
            featured: Some("true".to_string()),
            include_inactive: Some("true".to_string()),
            brand: Some(" ".to_string()),
            ..ProductsListQuery::default()
        };
        let backend = query.to_backend();
        assert_eq!(backend.status, None);
        assert_eq!(backend.is_featured, Some(true));
        assert!(backend.include_inactive);
        assert_eq!(backend.brand, None);
        assert_eq!(backend.per_page, PER_PAGE);
        assert!(
            query
                .filter_params()
                .contains(&("include_inactive", "true".to_string()))
        );
    }

    #[test]
    fn test_detail_view_tags_and_image_links() {
        let product: Product = serde_json::from_str(
            r#"{"id":"p-1","name":"Mug","tags":"kitchen, ceramic,,","profit_margin":25.34,
                "images":[{"url":"b.jpg","public_id":"shop/b 1","sort_order":2},
                          {"url":"a.jpg","public_id":"shop/a","sort_order":1,"is_primary":true}]}"#,
        )
        .unwrap();
        let view = ProductDetailView::from(&product);
        assert_eq!(view.tags, vec!["kitchen", "ceramic"]);
        assert_eq!(view.images[0].url, "a.jpg");
        assert_eq!(view.images[1].delete_href, "/products/p-1/images/shop%2Fb%201/delete");
        assert_eq!(view.profit_margin, "25.3%");
        assert_eq!(view.category, None);
    }
}
