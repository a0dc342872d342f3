//! Products list page handler.

use askama::Template;
use axum::{extract::Query, response::Html};
use storedesk_core::{Page, ProductStatus};
use tracing::instrument;

use crate::{
    components::{FilterOption, Pager},
    error::AppError,
    filters,
    middleware::RequireAdmin,
    routes::{Layout, degrade, render},
};

use super::types::{
    PER_PAGE, ProductRowView, ProductsListQuery, StatCard, category_options, stat_cards,
};

/// Products list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub stats: Vec<StatCard>,
    pub products: Vec<ProductRowView>,
    pub pager: Pager,
    pub search_value: String,
    pub brand_value: String,
    pub status_options: Vec<FilterOption>,
    pub category_options: Vec<FilterOption>,
    pub featured_options: Vec<FilterOption>,
    pub include_inactive: bool,
}

/// Products list page handler.
#[instrument(skip(admin, api, session))]
pub async fn index(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Query(query): Query<ProductsListQuery>,
) -> Result<Html<String>, AppError> {
    let backend_query = query.to_backend();

    let (products_result, stats_result, tree_result) = tokio::join!(
        api.list_products(&backend_query),
        api.product_stats(),
        api.category_tree(),
    );
    let products = products_result?;
    let stats = degrade(stats_result, "product stats")?;
    let tree = degrade(tree_result, "category tree")?;

    let page = Page::new(
        if products.page == 0 { backend_query.page } else { products.page },
        if products.per_page == 0 { PER_PAGE } else { products.per_page },
        products.total,
        products.pages,
    );
    let params = query.filter_params();

    let status_current = backend_query
        .status
        .map_or("all_status", ProductStatus::as_str);
    let category_current = backend_query
        .category_id
        .as_ref()
        .map(|c| c.as_str().to_string())
        .unwrap_or_default();
    let featured_current = backend_query
        .is_featured
        .map(|f| f.to_string())
        .unwrap_or_default();

    let template = ProductsIndexTemplate {
        layout: Layout::new(&admin, &session, "/products").await,
        stats: stat_cards(&stats),
        products: products.data.iter().map(ProductRowView::from).collect(),
        pager: Pager::new(&page, "/products", &params, "products"),
        search_value: backend_query.search.clone().unwrap_or_default(),
        brand_value: backend_query.brand.clone().unwrap_or_default(),
        status_options: FilterOption::list(
            std::iter::once(("all_status", "All statuses"))
                .chain(ProductStatus::ALL.map(|s| (s.as_str(), s.label()))),
            status_current,
        ),
        category_options: category_options(&tree, &category_current, "All categories"),
        featured_options: FilterOption::list(
            [("", "Featured and regular"), ("true", "Featured only"), ("false", "Not featured")],
            &featured_current,
        ),
        include_inactive: backend_query.include_inactive,
    };
    render(&template)
}
