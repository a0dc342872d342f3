//! Create and edit product handlers.
//!
//! Both forms are multipart so images can be attached. A rejected submit
//! re-renders the form with what was typed and the reasons.

use askama::Template;
use axum::{
    extract::{Multipart, Path},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use storedesk_core::ProductId;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    backend::ApiSession,
    components::FilterOption,
    error::AppError,
    filters,
    middleware::RequireAdmin,
    models::{CurrentAdmin, Flash, push_flash},
    routes::{Layout, degrade, form_errors, render, uploads::MultipartForm},
};

use super::types::{ProductFormValues, category_options, status_options};

/// Create/edit product form template.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub layout: Layout,
    pub title: String,
    pub action: String,
    pub cancel_href: String,
    pub is_create: bool,
    pub values: ProductFormValues,
    pub category_options: Vec<FilterOption>,
    pub status_options: Vec<FilterOption>,
    pub errors: Vec<String>,
}

/// Where a form submits, and what it is called.
struct FormTarget {
    title: String,
    action: String,
    cancel_href: String,
    is_create: bool,
}

impl FormTarget {
    fn create() -> Self {
        Self {
            title: "New Product".to_string(),
            action: "/products".to_string(),
            cancel_href: "/products".to_string(),
            is_create: true,
        }
    }

    fn edit(id: &str, name: &str) -> Self {
        Self {
            title: format!("Edit {name}"),
            action: format!("/products/{id}/edit"),
            cancel_href: format!("/products/{id}"),
            is_create: false,
        }
    }
}

async fn render_form(
    admin: &CurrentAdmin,
    api: &ApiSession<Session>,
    session: &Session,
    target: FormTarget,
    values: ProductFormValues,
    errors: Vec<String>,
) -> Result<Response, AppError> {
    let tree = degrade(api.category_tree().await, "category tree")?;
    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    let template = ProductFormTemplate {
        layout: Layout::new(admin, session, "/products").await,
        title: target.title,
        action: target.action,
        cancel_href: target.cancel_href,
        is_create: target.is_create,
        category_options: category_options(&tree, &values.category_id, "Select a category"),
        status_options: status_options(&values.status),
        values,
        errors,
    };
    Ok((status, render(&template)?).into_response())
}

/// GET /products/new
#[instrument(skip_all)]
pub async fn new_form(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
) -> Result<Response, AppError> {
    render_form(
        &admin,
        &api,
        &session,
        FormTarget::create(),
        ProductFormValues::new_product(),
        Vec::new(),
    )
    .await
}

/// POST /products
#[instrument(skip_all)]
pub async fn create(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = MultipartForm::read(multipart).await?;
    let values = ProductFormValues::from_multipart(&form);

    let submission = match values.validate(true) {
        Ok(submission) => submission,
        Err(errors) => {
            return render_form(&admin, &api, &session, FormTarget::create(), values, errors).await;
        }
    };

    match api.create_product(&submission, form.take_files("images")).await {
        Ok(product) => {
            push_flash(&session, Flash::success("Product created successfully")).await;
            Ok(Redirect::to(&format!("/products/{}", product.id)).into_response())
        }
        Err(e) => {
            let errors = form_errors(e, "Failed to create product")?;
            render_form(&admin, &api, &session, FormTarget::create(), values, errors).await
        }
    }
}

/// GET /products/{id}/edit
#[instrument(skip(admin, api, session))]
pub async fn edit_form(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let product = api.get_product(&ProductId::new(id.as_str())).await?;
    render_form(
        &admin,
        &api,
        &session,
        FormTarget::edit(&id, &product.name),
        ProductFormValues::from_product(&product),
        Vec::new(),
    )
    .await
}

/// POST /products/{id}/edit
#[instrument(skip(admin, api, session, multipart))]
pub async fn update(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = MultipartForm::read(multipart).await?;
    let values = ProductFormValues::from_multipart(&form);
    let shown_name = values.name.clone();

    let submission = match values.validate(false) {
        Ok(submission) => submission,
        Err(errors) => {
            let target = FormTarget::edit(&id, &shown_name);
            return render_form(&admin, &api, &session, target, values, errors).await;
        }
    };

    let product_id = ProductId::new(id.as_str());
    match api
        .update_product(&product_id, &submission, form.take_files("images"))
        .await
    {
        Ok(_) => {
            push_flash(&session, Flash::success("Product updated successfully")).await;
            Ok(Redirect::to(&format!("/products/{id}")).into_response())
        }
        Err(e) => {
            let errors = form_errors(e, "Failed to update product")?;
            let target = FormTarget::edit(&id, &shown_name);
            render_form(&admin, &api, &session, target, values, errors).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;

    #[test]
    fn test_form_targets() {
        let create = FormTarget::create();
        assert!(create.is_create);
        assert_eq!(create.action, "/products");

        let edit = FormTarget::edit("p-1", "Mug");
        assert!(!edit.is_create);
        assert_eq!(edit.action, "/products/p-1/edit");
        assert_eq!(edit.cancel_href, "/products/p-1");
        assert_eq!(edit.title, "Edit Mug");
    }

    #[test]
    fn test_form_errors_keep_backend_reason() {
        let errors = form_errors(
            BackendError::Api {
                status: 400,
                message: "SKU already exists".to_string(),
            },
            "Failed to create product",
        );
        assert_eq!(errors.ok(), Some(vec!["SKU already exists".to_string()]));

        assert!(form_errors(BackendError::SessionExpired, "Failed").is_err());
    }
}
