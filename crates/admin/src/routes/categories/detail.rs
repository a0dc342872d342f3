//! Category detail page, deletion and image upload.

use askama::Template;
use axum::{
    extract::{Multipart, Path, Query},
    response::{Html, Redirect},
};
use storedesk_core::{CategoryId, Page};
use tracing::instrument;

use crate::{
    backend::types::CategoryProductsQuery,
    components::Pager,
    error::AppError,
    filters,
    middleware::RequireAdmin,
    models::{Flash, push_flash},
    routes::{Layout, degrade, flash_result, products::ProductRowView, render, uploads::MultipartForm},
};

use super::types::{
    CategoryDetailQuery, CategoryDetailView, CategoryInput, CategoryRowView, PRODUCTS_PER_PAGE,
};

/// Category detail page template.
#[derive(Template)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub layout: Layout,
    pub category: CategoryDetailView,
    pub subcategories: Vec<CategoryRowView>,
    pub products: Vec<ProductRowView>,
    pub pager: Pager,
    pub include_subcategories: bool,
    pub new_subcategory: CategoryInput,
}

/// Category detail page handler.
///
/// Subcategories and products are secondary: if either fails to load the
/// page still renders with that section empty.
#[instrument(skip(admin, api, session))]
pub async fn show(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Path(id): Path<String>,
    Query(query): Query<CategoryDetailQuery>,
) -> Result<Html<String>, AppError> {
    let category_id = CategoryId::new(id.as_str());
    let products_query = CategoryProductsQuery {
        include_subcategories: query.include_subcategories(),
        page: query.page.unwrap_or(1).max(1),
        per_page: PRODUCTS_PER_PAGE,
    };

    let (category_result, subcategories_result, products_result) = tokio::join!(
        api.get_category(&category_id),
        api.list_subcategories(&category_id, true),
        api.category_products(&category_id, &products_query),
    );
    let category = category_result?;
    let subcategories = degrade(subcategories_result, "subcategories")?;
    let products = match products_result {
        Ok(products) => Some(products),
        Err(e) if e.is_session_expired() => return Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load category products");
            None
        }
    };

    let (product_rows, page) = products.map_or_else(
        || (Vec::new(), Page::new(1, PRODUCTS_PER_PAGE, 0, 0)),
        |p| {
            (
                p.data.iter().map(ProductRowView::from).collect(),
                Page::new(
                    if p.page == 0 { products_query.page } else { p.page },
                    PRODUCTS_PER_PAGE,
                    p.total,
                    p.pages,
                ),
            )
        },
    );
    let params = [(
        "include_subcategories",
        if products_query.include_subcategories { "" } else { "false" }.to_string(),
    )];
    let base = format!("/categories/{id}");

    let template = CategoryShowTemplate {
        layout: Layout::new(&admin, &session, "/categories").await,
        category: CategoryDetailView::from(&category),
        subcategories: subcategories.iter().map(CategoryRowView::subcategory).collect(),
        products: product_rows,
        pager: Pager::new(&page, &base, &params, "products"),
        include_subcategories: products_query.include_subcategories,
        new_subcategory: CategoryInput::blank(),
    };
    render(&template)
}

/// POST /categories/{id}/delete
#[instrument(skip(api, session))]
pub async fn delete(
    RequireAdmin { api, session, .. }: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let result = api.delete_category(&CategoryId::new(id.as_str())).await;
    let deleted = flash_result(
        &session,
        result,
        "Category deleted successfully",
        "Failed to delete category",
    )
    .await?;

    Ok(Redirect::to(&if deleted.is_some() {
        "/categories".to_string()
    } else {
        format!("/categories/{id}")
    }))
}

/// POST /categories/{id}/image
#[instrument(skip(api, session, multipart))]
pub async fn upload_image(
    RequireAdmin { api, session, .. }: RequireAdmin,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut form = MultipartForm::read(multipart).await?;

    match form.take_file("image") {
        None => push_flash(&session, Flash::error("Choose an image to upload")).await,
        Some(image) => {
            let result = api
                .upload_category_image(&CategoryId::new(id.as_str()), image)
                .await;
            flash_result(
                &session,
                result,
                "Category image updated",
                "Failed to upload category image",
            )
            .await?;
        }
    }

    Ok(Redirect::to(&format!("/categories/{id}")))
}
