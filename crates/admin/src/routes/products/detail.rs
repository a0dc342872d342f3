//! Product detail page, deletion and image management.

use askama::Template;
use axum::{
    extract::{Multipart, Path},
    response::{Html, Redirect},
};
use storedesk_core::ProductId;
use tracing::instrument;

use crate::{
    error::AppError,
    filters,
    middleware::RequireAdmin,
    models::{Flash, push_flash},
    routes::{Layout, flash_result, render, uploads::MultipartForm},
};

use super::types::ProductDetailView;

/// Product detail page template.
#[derive(Template)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductDetailView,
}

/// Product detail page handler.
#[instrument(skip(admin, api, session))]
pub async fn show(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let product = api.get_product(&ProductId::new(id)).await?;

    let template = ProductShowTemplate {
        layout: Layout::new(&admin, &session, "/products").await,
        product: ProductDetailView::from(&product),
    };
    render(&template)
}

/// POST /products/{id}/delete
#[instrument(skip(api, session))]
pub async fn delete(
    RequireAdmin { api, session, .. }: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let result = api.delete_product(&ProductId::new(id.as_str())).await;
    let deleted = flash_result(
        &session,
        result,
        "Product deleted successfully",
        "Failed to delete product",
    )
    .await?;

    Ok(Redirect::to(&if deleted.is_some() {
        "/products".to_string()
    } else {
        format!("/products/{id}")
    }))
}

/// POST /products/{id}/images
#[instrument(skip(api, session, multipart))]
pub async fn add_images(
    RequireAdmin { api, session, .. }: RequireAdmin,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut form = MultipartForm::read(multipart).await?;
    let images = form.take_files("images");

    if images.is_empty() {
        push_flash(&session, Flash::error("Choose at least one image to upload")).await;
    } else {
        let count = images.len();
        let result = api
            .add_product_images(&ProductId::new(id.as_str()), images)
            .await;
        flash_result(
            &session,
            result,
            &format!("Uploaded {count} image(s)"),
            "Failed to upload images",
        )
        .await?;
    }

    Ok(Redirect::to(&format!("/products/{id}")))
}

/// POST /products/{id}/images/{public_id}/delete
#[instrument(skip(api, session))]
pub async fn delete_image(
    RequireAdmin { api, session, .. }: RequireAdmin,
    Path((id, public_id)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    let result = api
        .delete_product_image(&ProductId::new(id.as_str()), &public_id)
        .await;
    flash_result(
        &session,
        result,
        "Image deleted successfully",
        "Failed to delete image",
    )
    .await?;

    Ok(Redirect::to(&format!("/products/{id}")))
}
