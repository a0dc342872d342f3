//! Product catalog route handlers.
//!
//! Listing with filters and stats, create and edit forms with image upload,
//! the detail page with image management, and bulk spreadsheet upload.

mod bulk;
mod detail;
mod form;
mod list;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub use types::{
    ProductDetailView, ProductFormValues, ProductImageView, ProductRowView, ProductsListQuery,
    StatCard,
};

pub use list::{ProductsIndexTemplate, index};

pub use form::{ProductFormTemplate, create, edit_form, new_form, update};

pub use detail::{ProductShowTemplate, add_images, delete, delete_image, show};

pub use bulk::{BulkResultView, BulkUploadTemplate, bulk_page, bulk_template, bulk_upload};

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(index).post(create))
        .route("/products/new", get(new_form))
        .route("/products/bulk", get(bulk_page).post(bulk_upload))
        .route("/products/bulk/template", get(bulk_template))
        .route("/products/{id}", get(show))
        .route("/products/{id}/edit", get(edit_form).post(update))
        .route("/products/{id}/delete", post(delete))
        .route("/products/{id}/images", post(add_images))
        .route("/products/{id}/images/{public_id}/delete", post(delete_image))
}
