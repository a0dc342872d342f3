use serde::{Deserialize, Serialize};
use storedesk_core::CategoryId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub level: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub sort_order: i32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_featured: bool,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub product_count: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub updated_at: String,
    #[serde(default)]
    pub direct_products: Option<u64>,
    #[serde(default)]
    pub total_products: Option<u64>,
    #[serde(default)]
    pub subcategory_count: Option<u64>,
    #[serde(default)]
    pub is_leaf: Option<bool>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub subcategories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesPage {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub data: Vec<Category>,
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
pub struct CategoryTree {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub level: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub product_count: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub children: Vec<CategoryTree>,
}

/// One entry of a flattened category tree, for `<select>` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub id: CategoryId,
    pub label: String,
    pub depth: usize,
}

/// Flatten a tree depth-first, indenting labels by depth.
#[must_use]
pub fn flatten_tree(nodes: &[CategoryTree]) -> Vec<CategoryOption> {
    fn walk(nodes: &[CategoryTree], depth: usize, out: &mut Vec<CategoryOption>) {
        for node in nodes {
            out.push(CategoryOption {
                id: node.id.clone(),
                label: format!("{}{}", "\u{2014} ".repeat(depth), node.name),
                depth,
            });
            walk(&node.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(nodes, 0, &mut out);
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoriesQuery {
    pub page: u32,
    pub per_page: u32,
    pub include_inactive: bool,
}

impl CategoriesQuery {
    pub(crate) fn params(self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.max(1).to_string()),
            ("per_page", self.per_page.max(1).to_string()),
            ("include_inactive", self.include_inactive.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryProductsQuery {
    pub include_subcategories: bool,
    pub page: u32,
    pub per_page: u32,
}

impl CategoryProductsQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("include_subcategories", self.include_subcategories.to_string()),
            ("page", self.page.max(1).to_string()),
            ("per_page", self.per_page.max(1).to_string()),
        ]
    }
}

/// Body for creating a category or subcategory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}

/// Partial update for a category or subcategory. `None` fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryImage {
    pub image_url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_tree_is_depth_first() {
        let json = r#"[
            {"id":"c1","name":"Kitchen","children":[
                {"id":"c2","name":"Kettles","children":[]},
                {"id":"c3","name":"Pans","children":[{"id":"c4","name":"Woks"}]}
            ]},
            {"id":"c5","name":"Garden"}
        ]"#;
        let tree: Vec<CategoryTree> = serde_json::from_str(json).unwrap();
        let flat = flatten_tree(&tree);

        let ids: Vec<&str> = flat.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3", "c4", "c5"]);
        assert_eq!(flat[3].depth, 2);
        assert_eq!(flat[3].label, "\u{2014} \u{2014} Woks");
        assert_eq!(flat[4].label, "Garden");
    }

    #[test]
    fn test_update_category_sends_only_set_fields() {
        let update = UpdateCategory {
            is_active: Some(false),
            ..UpdateCategory::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"is_active":false}"#
        );
    }
}
