//! Category route handlers.
//!
//! This module contains handlers for the category list and tree, the detail
//! page, editing, image upload and subcategory management.

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
    CategoriesListQuery, CategoryDetailView, CategoryInput, CategoryRowView, TreeRowView,
};

pub use list::{CategoriesIndexTemplate, create, index};

pub use detail::{CategoryShowTemplate, delete, show, upload_image};

pub use form::{
    CategoryFormTemplate, create_subcategory, delete_subcategory, edit_form,
    edit_subcategory_form, new_subcategory_form, update, update_subcategory,
};

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(index).post(create))
        .route("/categories/{id}", get(show))
        .route("/categories/{id}/edit", get(edit_form).post(update))
        .route("/categories/{id}/delete", post(delete))
        .route("/categories/{id}/image", post(upload_image))
        .route(
            "/categories/{id}/subcategories",
            get(new_subcategory_form).post(create_subcategory),
        )
        .route(
            "/subcategories/{id}/edit",
            get(edit_subcategory_form).post(update_subcategory),
        )
        .route("/subcategories/{id}/delete", post(delete_subcategory))
}
