//! Bulk product upload from a spreadsheet.
//!
//! The backend validates every row; this page only forwards the file and
//! shows what came back.

use askama::Template;
use axum::{
    extract::Multipart,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use tracing::instrument;

use crate::{
    backend::types::OperationReport,
    error::AppError,
    filters,
    middleware::RequireAdmin,
    models::{Flash, push_flash},
    routes::{Layout, flash_failure, render, uploads::MultipartForm},
};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Outcome of an upload, as shown below the form.
#[derive(Debug, Clone, Default)]
pub struct BulkResultView {
    pub message: String,
    pub succeeded: bool,
    pub rows: Vec<(String, String)>,
    pub errors: Vec<String>,
}

impl From<&OperationReport> for BulkResultView {
    fn from(report: &OperationReport) -> Self {
        let errors = report.errors();
        Self {
            message: report
                .message
                .clone()
                .unwrap_or_else(|| "Bulk upload finished".to_string()),
            succeeded: report.success.unwrap_or(true) && errors.is_empty(),
            rows: report.summary_rows(),
            errors,
        }
    }
}

/// Bulk upload page template.
#[derive(Template)]
#[template(path = "products/bulk.html")]
pub struct BulkUploadTemplate {
    pub layout: Layout,
    pub result: Option<BulkResultView>,
}

/// GET /products/bulk
#[instrument(skip_all)]
pub async fn bulk_page(
    RequireAdmin {
        admin, session, ..
    }: RequireAdmin,
) -> Result<Html<String>, AppError> {
    let template = BulkUploadTemplate {
        layout: Layout::new(&admin, &session, "/products").await,
        result: None,
    };
    render(&template)
}

/// GET /products/bulk/template
#[instrument(skip_all)]
pub async fn bulk_template(RequireAdmin { api, .. }: RequireAdmin) -> Result<Response, AppError> {
    let template = api.bulk_template().await?;
    let content_type = template
        .content_type
        .unwrap_or_else(|| XLSX_CONTENT_TYPE.to_string());
    let disposition = attachment(&template.file_name);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        template.bytes,
    )
        .into_response())
}

/// POST /products/bulk
#[instrument(skip_all)]
pub async fn bulk_upload(
    RequireAdmin {
        admin,
        api,
        session,
    }: RequireAdmin,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let mut form = MultipartForm::read(multipart).await?;

    let result = match form.take_file("file") {
        None => {
            push_flash(&session, Flash::error("Choose a spreadsheet to upload")).await;
            None
        }
        Some(file) => {
            tracing::info!(file_name = %file.file_name, size = file.bytes.len(), "Bulk product upload");
            match api.bulk_upload_products(file).await {
                Ok(report) => {
                    let view = BulkResultView::from(&report);
                    let flash = if view.succeeded {
                        Flash::success(view.message.clone())
                    } else {
                        Flash::error(view.message.clone())
                    };
                    push_flash(&session, flash).await;
                    Some(view)
                }
                Err(e) => {
                    flash_failure(&session, e, "Failed to upload products").await?;
                    None
                }
            }
        }
    };

    let template = BulkUploadTemplate {
        layout: Layout::new(&admin, &session, "/products").await,
        result,
    };
    render(&template)
}

/// `Content-Disposition` value for a download, keeping only filename-safe characters.
fn attachment(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
        .collect();
    let safe = safe.trim();
    let name = if safe.is_empty() {
        "products_template.xlsx"
    } else {
        safe
    };
    format!("attachment; filename=\"{name}\"")
}
