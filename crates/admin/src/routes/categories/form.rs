//! Category edit form and subcategory management.
//!
//! Subcategories are created from their parent's page and edited or deleted
//! through `/subcategories/{id}`. A rejected edit re-renders the form.

use askama::Template;
use axum::{
    Form,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use storedesk_core::CategoryId;
use tracing::instrument;

use crate::{
    backend::cache::keys,
    error::AppError,
    filters,
    middleware::RequireAdmin,
    models::{CurrentAdmin, Flash, push_flash},
    routes::{Layout, flash_result, form_errors, render},
};

use super::types::{CategoryInput, DeleteSubcategoryInput};

/// Edit category / new and edit subcategory form.
#[derive(Template)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub layout: Layout,
    pub title: String,
    pub action: String,
    pub cancel_href: String,
    pub show_active: bool,
    pub values: CategoryInput,
    pub errors: Vec<String>,
}

/// Where a category form submits, and what it is called.
struct FormTarget {
    title: String,
    action: String,
    cancel_href: String,
    show_active: bool,
}

impl FormTarget {
    fn edit_category(id: &str, name: &str) -> Self {
        Self {
            title: format!("Edit {name}"),
            action: format!("/categories/{id}/edit"),
            cancel_href: format!("/categories/{id}"),
            show_active: true,
        }
    }

    fn new_subcategory(parent: &str) -> Self {
        Self {
            title: "New Subcategory".to_string(),
            action: format!("/categories/{parent}/subcategories"),
            cancel_href: format!("/categories/{parent}"),
            show_active: false,
        }
    }

    fn edit_subcategory(id: &str, name: &str) -> Self {
        Self {
            title: format!("Edit {name}"),
            action: format!("/subcategories/{id}/edit"),
            cancel_href: format!("/categories/{id}"),
            show_active: true,
        }
    }
}

async fn render_form(
    admin: &CurrentAdmin,
    session: &tower_sessions::Session,
    target: FormTarget,
    values: CategoryInput,
    errors: Vec<String>,
) -> Result<Response, AppError> {
    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    let template = CategoryFormTemplate {
        layout: Layout::new(admin, session, "/categories").await,
        title: target.title,
        action: target.action,
        cancel_href: target.cancel_href,
        show_active: target.show_active,
        values,
        errors,
    };
    Ok((status, render(&template)?).into_response())
}

// =============================================================================
// Categories
// =============================================================================

/// GET /categories/{id}/edit
#[instrument(skip(admin, api, session))]
pub async fn edit_form(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let category = api.get_category(&CategoryId::new(id.as_str())).await?;
    render_form(
        &admin,
        &session,
        FormTarget::edit_category(&id, &category.name),
        CategoryInput::from_category(&category),
        Vec::new(),
    )
    .await
}

/// POST /categories/{id}/edit
#[instrument(skip(admin, api, session, input))]
pub async fn update(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Path(id): Path<String>,
    Form(input): Form<CategoryInput>,
) -> Result<Response, AppError> {
    let target = FormTarget::edit_category(&id, &input.name);
    let body = match input.to_update() {
        Ok(body) => body,
        Err(errors) => return render_form(&admin, &session, target, input, errors).await,
    };

    match api.update_category(&CategoryId::new(id.as_str()), &body).await {
        Ok(_) => {
            push_flash(&session, Flash::success("Category updated successfully")).await;
            Ok(Redirect::to(&format!("/categories/{id}")).into_response())
        }
        Err(e) => {
            let errors = form_errors(e, "Failed to update category")?;
            render_form(&admin, &session, target, input, errors).await
        }
    }
}

// =============================================================================
// Subcategories
// =============================================================================

/// GET /categories/{id}/subcategories
#[instrument(skip(admin, session))]
pub async fn new_subcategory_form(
    RequireAdmin { admin, session, .. }: RequireAdmin,
    Path(parent): Path<String>,
) -> Result<Response, AppError> {
    render_form(
        &admin,
        &session,
        FormTarget::new_subcategory(&parent),
        CategoryInput::blank(),
        Vec::new(),
    )
    .await
}

/// POST /categories/{id}/subcategories
#[instrument(skip(admin, api, session, input))]
pub async fn create_subcategory(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Path(parent): Path<String>,
    Form(input): Form<CategoryInput>,
) -> Result<Response, AppError> {
    let target = FormTarget::new_subcategory(&parent);
    let body = match input.to_create() {
        Ok(body) => body,
        Err(errors) => return render_form(&admin, &session, target, input, errors).await,
    };

    let parent_id = CategoryId::new(parent.as_str());
    match api.create_subcategory(&parent_id, &body).await {
        Ok(_) => {
            api.cache().invalidate_prefix(&keys::category_detail(&parent_id));
            push_flash(&session, Flash::success("Subcategory created successfully")).await;
            Ok(Redirect::to(&format!("/categories/{parent}")).into_response())
        }
        Err(e) => {
            let errors = form_errors(e, "Failed to create subcategory")?;
            render_form(&admin, &session, target, input, errors).await
        }
    }
}

/// GET /subcategories/{id}/edit
#[instrument(skip(admin, api, session))]
pub async fn edit_subcategory_form(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let subcategory = api.get_subcategory(&CategoryId::new(id.as_str())).await?;
    render_form(
        &admin,
        &session,
        FormTarget::edit_subcategory(&id, &subcategory.name),
        CategoryInput::from_category(&subcategory),
        Vec::new(),
    )
    .await
}

/// POST /subcategories/{id}/edit
#[instrument(skip(admin, api, session, input))]
pub async fn update_subcategory(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    Path(id): Path<String>,
    Form(input): Form<CategoryInput>,
) -> Result<Response, AppError> {
    let target = FormTarget::edit_subcategory(&id, &input.name);
    let body = match input.to_update() {
        Ok(body) => body,
        Err(errors) => return render_form(&admin, &session, target, input, errors).await,
    };

    match api
        .update_subcategory(&CategoryId::new(id.as_str()), &body)
        .await
    {
        Ok(updated) => {
            if let Some(parent) = &updated.parent_id {
                api.cache().invalidate_all_of([
                    &keys::category_detail(parent),
                    &keys::subcategories(parent),
                ]);
            }
            push_flash(&session, Flash::success("Subcategory updated successfully")).await;
            Ok(Redirect::to(&format!("/categories/{id}")).into_response())
        }
        Err(e) => {
            let errors = form_errors(e, "Failed to update subcategory")?;
            render_form(&admin, &session, target, input, errors).await
        }
    }
}

/// POST /subcategories/{id}/delete
#[instrument(skip(api, session, input))]
pub async fn delete_subcategory(
    RequireAdmin { api, session, .. }: RequireAdmin,
    Path(id): Path<String>,
    Form(input): Form<DeleteSubcategoryInput>,
) -> Result<Redirect, AppError> {
    let parent = input
        .parent_id
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .map(CategoryId::new);

    let result = api.delete_subcategory(&CategoryId::new(id.as_str())).await;
    let deleted = flash_result(
        &session,
        result,
        "Subcategory deleted successfully",
        "Failed to delete subcategory",
    )
    .await?;

    if deleted.is_none() {
        return Ok(Redirect::to(&format!("/categories/{id}")));
    }
    Ok(Redirect::to(&match parent {
        Some(parent) => {
            api.cache().invalidate_all_of([
                &keys::category_detail(&parent),
                &keys::subcategories(&parent),
            ]);
            format!("/categories/{parent}")
        }
        None => "/categories".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcategory_targets() {
        let new = FormTarget::new_subcategory("c1");
        assert_eq!(new.action, "/categories/c1/subcategories");
        assert!(!new.show_active);

        let edit = FormTarget::edit_subcategory("c2", "Kettles");
        assert_eq!(edit.action, "/subcategories/c2/edit");
        assert_eq!(edit.cancel_href, "/categories/c2");
        assert!(edit.show_active);
    }
}
