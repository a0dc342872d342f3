//! Type definitions and conversions for category views.

use serde::Deserialize;

use crate::backend::types::{Category, CategoryTree, CreateCategory, UpdateCategory};
use crate::routes::{checked, non_empty, uploads::MultipartForm};

/// Categories shown per list page.
pub const PER_PAGE: u32 = 10;

/// Products shown per page on a category's detail page.
pub const PRODUCTS_PER_PAGE: u32 = 10;

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for the categories list.
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesListQuery {
    pub page: Option<u32>,
    pub include_inactive: Option<String>,
}

impl CategoriesListQuery {
    #[must_use]
    pub fn include_inactive(&self) -> bool {
        checked(self.include_inactive.as_deref())
    }
}

/// Query parameters for a category's detail page.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryDetailQuery {
    pub page: Option<u32>,
    pub include_subcategories: Option<String>,
}

impl CategoryDetailQuery {
    /// Subcategory products are included unless explicitly turned off.
    #[must_use]
    pub fn include_subcategories(&self) -> bool {
        self.include_subcategories
            .as_deref()
            .is_none_or(|v| checked(Some(v)))
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Category row for the list table and the subcategory table.
#[derive(Debug, Clone)]
pub struct CategoryRowView {
    pub href: String,
    pub edit_href: String,
    pub delete_href: String,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub level: u32,
    pub product_count: u64,
    pub subcategory_count: u64,
    pub is_active: bool,
    pub is_featured: bool,
}

impl CategoryRowView {
    /// Row for a top-level category, managed under `/categories`.
    #[must_use]
    pub fn category(category: &Category) -> Self {
        let href = format!("/categories/{}", category.id);
        Self::build(category, href.clone(), format!("{href}/edit"), format!("{href}/delete"))
    }

    /// Row for a subcategory, edited and deleted under `/subcategories`.
    #[must_use]
    pub fn subcategory(category: &Category) -> Self {
        let manage = format!("/subcategories/{}", category.id);
        Self::build(
            category,
            format!("/categories/{}", category.id),
            format!("{manage}/edit"),
            format!("{manage}/delete"),
        )
    }

    fn build(category: &Category, href: String, edit_href: String, delete_href: String) -> Self {
        Self {
            href,
            edit_href,
            delete_href,
            name: category.name.clone(),
            slug: category.slug.clone(),
            image_url: category.image_url.clone(),
            level: category.level,
            product_count: category.total_products.unwrap_or(category.product_count),
            subcategory_count: category
                .subcategory_count
                .unwrap_or(category.subcategories.len() as u64),
            is_active: category.is_active,
            is_featured: category.is_featured,
        }
    }
}

/// Deepest level with its own indentation class.
const MAX_TREE_DEPTH: usize = 4;

/// One line of the category tree, indented by depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRowView {
    pub href: String,
    pub name: String,
    pub depth: usize,
    pub product_count: u64,
    pub is_featured: bool,
}

/// Flatten the tree depth-first for display.
#[must_use]
pub fn tree_rows(tree: &[CategoryTree]) -> Vec<TreeRowView> {
    fn walk(nodes: &[CategoryTree], depth: usize, out: &mut Vec<TreeRowView>) {
        for node in nodes {
            out.push(TreeRowView {
                href: format!("/categories/{}", node.id),
                name: node.name.clone(),
                depth: depth.min(MAX_TREE_DEPTH),
                product_count: node.product_count,
                is_featured: node.is_featured,
            });
            walk(&node.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(tree, 0, &mut out);
    out
}

/// Category detail view.
#[derive(Debug, Clone)]
pub struct CategoryDetailView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<String>,
    pub parent_href: Option<String>,
    pub is_subcategory: bool,
    pub edit_href: String,
    pub delete_href: String,
    pub level: u32,
    pub sort_order: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub direct_products: u64,
    pub total_products: u64,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Category> for CategoryDetailView {
    fn from(category: &Category) -> Self {
        let id = category.id.to_string();
        let is_subcategory = category.parent_id.is_some();
        let manage = if is_subcategory {
            format!("/subcategories/{id}")
        } else {
            format!("/categories/{id}")
        };

        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: non_empty(category.description.clone()),
            image_url: category.image_url.clone(),
            parent_id: category.parent_id.as_ref().map(ToString::to_string),
            parent_href: category.parent_id.as_ref().map(|p| format!("/categories/{p}")),
            is_subcategory,
            edit_href: format!("{manage}/edit"),
            delete_href: format!("{manage}/delete"),
            level: category.level,
            sort_order: category.sort_order,
            is_active: category.is_active,
            is_featured: category.is_featured,
            direct_products: category.direct_products.unwrap_or(category.product_count),
            total_products: category.total_products.unwrap_or(category.product_count),
            meta_title: non_empty(category.meta_title.clone()),
            meta_description: non_empty(category.meta_description.clone()),
            meta_keywords: non_empty(category.meta_keywords.clone()),
            created_at: category.created_at.clone(),
            updated_at: category.updated_at.clone(),
            id,
        }
    }
}

// =============================================================================
// Form
// =============================================================================

/// Category form contents as typed.
///
/// Shared by categories and subcategories; `is_active` only appears on the
/// edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
    pub sort_order: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub is_featured: Option<String>,
    pub is_active: Option<String>,
}

impl CategoryInput {
    /// Form prefilled from an existing category.
    #[must_use]
    pub fn from_category(category: &Category) -> Self {
        let flag = |on: bool| on.then(|| "true".to_string());
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            sort_order: category.sort_order.to_string(),
            meta_title: category.meta_title.clone().unwrap_or_default(),
            meta_description: category.meta_description.clone().unwrap_or_default(),
            meta_keywords: category.meta_keywords.clone().unwrap_or_default(),
            is_featured: flag(category.is_featured),
            is_active: flag(category.is_active),
        }
    }

    /// Blank form for a new category.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            sort_order: "0".to_string(),
            is_active: Some("true".to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn from_multipart(form: &MultipartForm) -> Self {
        let text = |name: &str| form.text(name).unwrap_or_default();
        Self {
            name: text("name"),
            description: text("description"),
            sort_order: text("sort_order"),
            meta_title: text("meta_title"),
            meta_description: text("meta_description"),
            meta_keywords: text("meta_keywords"),
            is_featured: form.flag("is_featured").then(|| "true".to_string()),
            is_active: form.flag("is_active").then(|| "true".to_string()),
        }
    }

    #[must_use]
    pub fn featured(&self) -> bool {
        checked(self.is_featured.as_deref())
    }

    #[must_use]
    pub fn active(&self) -> bool {
        checked(self.is_active.as_deref())
    }

    fn check(&self) -> Result<(String, Option<i32>), Vec<String>> {
        let mut errors = Vec::new();

        let name = non_empty(Some(self.name.clone()));
        if name.is_none() {
            errors.push("Category name is required".to_string());
        }
        let sort_order = match self.sort_order.trim() {
            "" => None,
            raw => match raw.parse::<i32>() {
                Ok(order) => Some(order),
                Err(_) => {
                    errors.push("Sort order must be a whole number".to_string());
                    None
                }
            },
        };

        match name {
            Some(name) if errors.is_empty() => Ok((name, sort_order)),
            _ => Err(errors),
        }
    }

    /// Body for creating a category or subcategory.
    ///
    /// # Errors
    ///
    /// Returns every problem found, in field order.
    pub fn to_create(&self) -> Result<CreateCategory, Vec<String>> {
        let (name, sort_order) = self.check()?;
        Ok(CreateCategory {
            name,
            description: non_empty(Some(self.description.clone())),
            image_url: None,
            sort_order,
            meta_title: non_empty(Some(self.meta_title.clone())),
            meta_description: non_empty(Some(self.meta_description.clone())),
            meta_keywords: non_empty(Some(self.meta_keywords.clone())),
            is_featured: Some(self.featured()),
        })
    }

    /// Body for updating a category or subcategory.
    ///
    /// Text fields are always sent so they can be cleared.
    ///
    /// # Errors
    ///
    /// Returns every problem found, in field order.
    pub fn to_update(&self) -> Result<UpdateCategory, Vec<String>> {
        let (name, sort_order) = self.check()?;
        Ok(UpdateCategory {
            name: Some(name),
            description: Some(self.description.trim().to_string()),
            sort_order,
            is_active: Some(self.active()),
            is_featured: Some(self.featured()),
            meta_title: Some(self.meta_title.trim().to_string()),
            meta_description: Some(self.meta_description.trim().to_string()),
            meta_keywords: Some(self.meta_keywords.trim().to_string()),
            ..UpdateCategory::default()
        })
    }
}

/// Input for deleting a subcategory; the parent page is where to go next.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteSubcategoryInput {
    pub parent_id: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn category(json: &str) -> Category {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rows_link_subcategories_to_their_own_routes() {
        let kettles = category(
            r#"{"id":"c2","name":"Kettles","parent_id":"c1","level":1,"product_count":4,"total_products":6}"#,
        );

        let row = CategoryRowView::subcategory(&kettles);
        assert_eq!(row.href, "/categories/c2");
        assert_eq!(row.edit_href, "/subcategories/c2/edit");
        assert_eq!(row.delete_href, "/subcategories/c2/delete");
        assert_eq!(row.product_count, 6);

        let detail = CategoryDetailView::from(&kettles);
        assert!(detail.is_subcategory);
        assert_eq!(detail.parent_href.as_deref(), Some("/categories/c1"));
        assert_eq!(detail.edit_href, "/subcategories/c2/edit");
        assert_eq!(detail.direct_products, 4);
    }

    #[test]
    fn test_tree_rows_indent_by_depth() {
        let tree: Vec<CategoryTree> = serde_json::from_str(
            r#"[{"id":"c1","name":"Kitchen","children":[{"id":"c2","name":"Kettles"}]}]"#,
        )
        .unwrap();
        let rows = tree_rows(&tree);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[1].href, "/categories/c2");
    }

    #[test]
    fn test_name_required_and_sort_order_numeric() {
        let input = CategoryInput {
            name: "  ".to_string(),
            sort_order: "first".to_string(),
            ..CategoryInput::default()
        };
        assert_eq!(
            input.to_create().unwrap_err(),
            vec![
                "Category name is required".to_string(),
                "Sort order must be a whole number".to_string()
            ]
        );
    }

    #[test]
    fn test_create_omits_blank_optionals() {
        let input = CategoryInput {
            name: " Kitchen ".to_string(),
            description: String::new(),
            sort_order: "3".to_string(),
            is_featured: Some("on".to_string()),
            ..CategoryInput::default()
        };
        let body = input.to_create().unwrap();
        assert_eq!(body.name, "Kitchen");
        assert_eq!(body.description, None);
        assert_eq!(body.sort_order, Some(3));
        assert_eq!(body.is_featured, Some(true));
    }

    #[test]
    fn test_update_sends_active_flag_and_clears_text() {
        let mut input = CategoryInput::from_category(&category(
            r#"{"id":"c1","name":"Kitchen","description":"Pots","is_active":true}"#,
        ));
        input.description = String::new();
        input.is_active = None;

        let body = input.to_update().unwrap();
        assert_eq!(body.is_active, Some(false));
        assert_eq!(body.description.as_deref(), Some(""));
        assert_eq!(body.parent_id, None);
    }

    #[test]
    fn test_detail_query_includes_subcategories_by_default() {
        assert!(CategoryDetailQuery::default().include_subcategories());
        let off = CategoryDetailQuery {
            page: None,
            include_subcategories: Some("false".to_string()),
        };
        assert!(!off.include_subcategories());
    }
}
