//! Product catalogue (`/admin/products`).
//!
//! Create and update are multipart so images travel with the form fields.

use storedesk_core::ProductId;
use tracing::instrument;

use super::cache::keys;
use super::types::{OperationReport, Product, ProductForm, ProductStats, ProductsPage, ProductsQuery};
use super::{ApiRequest, ApiSession, BackendError, TokenStore, UploadFile};

const FALLBACK_TEMPLATE_NAME: &str = "template.xlsx";

/// The bulk upload spreadsheet template as served by the backend.
#[derive(Clone)]
pub struct BulkTemplate {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for BulkTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkTemplate")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl<S: TokenStore> ApiSession<S> {
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductsQuery) -> Result<ProductsPage, BackendError> {
        self.cache()
            .get_or_fetch(&keys::products_list(query), || {
                self.fetch(ApiRequest::get("/admin/products").query(query.params()))
            })
            .await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such product exists.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, BackendError> {
        self.cache()
            .get_or_fetch(&keys::product_detail(id), || {
                self.fetch(ApiRequest::get(format!("/admin/products/{id}")))
            })
            .await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn product_stats(&self) -> Result<ProductStats, BackendError> {
        self.cache()
            .get_or_fetch(&keys::products_stats(), || {
                self.fetch(ApiRequest::get("/admin/products/stats/overview"))
            })
            .await
    }

    /// # Errors
    ///
    /// Returns error if the backend rejects the product or the request fails.
    #[instrument(skip(self, form, images), fields(images = images.len()))]
    pub async fn create_product(
        &self,
        form: &ProductForm,
        images: Vec<UploadFile>,
    ) -> Result<Product, BackendError> {
        let product: Product = self
            .fetch(ApiRequest::post("/admin/products").multipart(form.fields(), image_parts(images)))
            .await?;
        tracing::info!(product_id = %product.id, "Product created");
        self.cache()
            .invalidate_all_of([&keys::products_lists(), &keys::products_stats()]);
        Ok(product)
    }

    /// Update the fields that are set in `form`, adding any new images.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the update or the request fails.
    #[instrument(skip(self, form, images), fields(images = images.len()))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        form: &ProductForm,
        images: Vec<UploadFile>,
    ) -> Result<Product, BackendError> {
        let product: Product = self
            .fetch(
                ApiRequest::put(format!("/admin/products/{id}"))
                    .multipart(form.fields(), image_parts(images)),
            )
            .await?;
        self.cache().invalidate_all_of([
            &keys::products_lists(),
            &keys::product_detail(id),
            &keys::products_stats(),
        ]);
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError> {
        self.execute(ApiRequest::delete(format!("/admin/products/{id}")))
            .await?;
        self.cache()
            .invalidate_all_of([&keys::products_lists(), &keys::products_stats()]);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, images), fields(images = images.len()))]
    pub async fn add_product_images(
        &self,
        id: &ProductId,
        images: Vec<UploadFile>,
    ) -> Result<(), BackendError> {
        self.execute(
            ApiRequest::put(format!("/admin/products/{id}/images"))
                .multipart(Vec::new(), image_parts(images)),
        )
        .await?;
        self.invalidate_product_images(id);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn delete_product_image(
        &self,
        id: &ProductId,
        public_id: &str,
    ) -> Result<(), BackendError> {
        let public_id = urlencoding::encode(public_id);
        self.execute(ApiRequest::delete(format!(
            "/admin/products/{id}/images/{public_id}"
        )))
        .await?;
        self.invalidate_product_images(id);
        Ok(())
    }

    /// Download the spreadsheet template for bulk uploads.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn bulk_template(&self) -> Result<BulkTemplate, BackendError> {
        let response = self
            .send(&ApiRequest::get("/admin/products/bulk/template"))
            .await?;

        let header = |name: reqwest::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        let file_name = header(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| attachment_filename(&value))
            .unwrap_or_else(|| FALLBACK_TEMPLATE_NAME.to_string());
        let content_type = header(reqwest::header::CONTENT_TYPE);
        let bytes = response.bytes().await?.to_vec();

        Ok(BulkTemplate {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Upload a filled-in template. The backend validates every row.
    ///
    /// # Errors
    ///
    /// Returns error if the file is rejected or the request fails.
    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    pub async fn bulk_upload_products(&self, file: UploadFile) -> Result<OperationReport, BackendError> {
        let report: OperationReport = self
            .fetch(ApiRequest::post("/admin/products/bulk/upload").multipart(Vec::new(), vec![("file", file)]))
            .await?;
        self.cache()
            .invalidate_all_of([&keys::products_lists(), &keys::products_stats()]);
        Ok(report)
    }

    fn invalidate_product_images(&self, id: &ProductId) {
        self.cache()
            .invalidate_all_of([&keys::products_lists(), &keys::product_detail(id)]);
    }
}

fn image_parts(images: Vec<UploadFile>) -> Vec<(&'static str, UploadFile)> {
    images.into_iter().map(|image| ("images", image)).collect()
}

/// File name from a `Content-Disposition` header value.
fn attachment_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').trim().to_string())
        .filter(|name| !name.is_empty())
}
