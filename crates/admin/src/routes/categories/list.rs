//! Categories list page and category creation.

use askama::Template;
use axum::{
    extract::{Multipart, Query},
    response::{Html, Redirect},
};
use storedesk_core::Page;
use tracing::instrument;

use crate::{
    backend::types::CategoriesQuery,
    components::Pager,
    error::AppError,
    filters,
    middleware::RequireAdmin,
    models::{Flash, push_flash},
    routes::{Layout, degrade, flash_failure, render, uploads::MultipartForm},
};

use super::types::{
    CategoriesListQuery, CategoryInput, CategoryRowView, PER_PAGE, TreeRowView, tree_rows,
};

/// Categories list page template.
#[derive(Template)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryRowView>,
    pub tree: Vec<TreeRowView>,
    pub pager: Pager,
    pub include_inactive: bool,
    pub new_category: CategoryInput,
}

/// Categories list page handler.
#[instrument(skip(admin, api, session))]
pub async fn index(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Query(query): Query<CategoriesListQuery>,
) -> Result<Html<String>, AppError> {
    let backend_query = CategoriesQuery {
        page: query.page.unwrap_or(1).max(1),
        per_page: PER_PAGE,
        include_inactive: query.include_inactive(),
    };

    let (list_result, tree_result) =
        tokio::join!(api.list_categories(backend_query), api.category_tree());
    let categories = list_result?;
    let tree = degrade(tree_result, "category tree")?;

    let page = Page::new(
        if categories.page == 0 { backend_query.page } else { categories.page },
        PER_PAGE,
        categories.total,
        categories.pages,
    );
    let params = [(
        "include_inactive",
        if backend_query.include_inactive { "true" } else { "" }.to_string(),
    )];

    let template = CategoriesIndexTemplate {
        layout: Layout::new(&admin, &session, "/categories").await,
        categories: categories.data.iter().map(CategoryRowView::category).collect(),
        tree: tree_rows(&tree),
        pager: Pager::new(&page, "/categories", &params, "categories"),
        include_inactive: backend_query.include_inactive,
        new_category: CategoryInput::blank(),
    };
    render(&template)
}

/// Create a top-level category, then attach its image if one was chosen.
///
/// POST /categories
#[instrument(skip_all)]
pub async fn create(
    RequireAdmin { api, session, .. }: RequireAdmin,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut form = MultipartForm::read(multipart).await?;
    let input = CategoryInput::from_multipart(&form);

    let body = match input.to_create() {
        Ok(body) => body,
        Err(errors) => {
            for error in errors {
                push_flash(&session, Flash::error(error)).await;
            }
            return Ok(Redirect::to("/categories"));
        }
    };

    let created = match api.create_category(&body).await {
        Ok(created) => created,
        Err(e) => {
            flash_failure(&session, e, "Failed to create category").await?;
            return Ok(Redirect::to("/categories"));
        }
    };
    push_flash(&session, Flash::success("Category created successfully")).await;

    if let Some(image) = form.take_file("image")
        && let Err(e) = api.upload_category_image(&created.id, image).await
    {
        flash_failure(&session, e, "Failed to upload category image").await?;
    }

    Ok(Redirect::to(&format!("/categories/{}", created.id)))
}
