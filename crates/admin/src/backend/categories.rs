//! Categories and subcategories (`/admin/categories`, `/admin/subcategories`).

use storedesk_core::CategoryId;
use tracing::instrument;

use super::cache::keys;
use super::types::{
    CategoriesPage, CategoriesQuery, Category, CategoryImage, CategoryProductsQuery, CategoryTree,
    CreateCategory, ProductsPage, UpdateCategory,
};
use super::{ApiRequest, ApiSession, BackendError, TokenStore, UploadFile};

impl<S: TokenStore> ApiSession<S> {
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self, query: CategoriesQuery) -> Result<CategoriesPage, BackendError> {
        self.cache()
            .get_or_fetch(&keys::categories_list(query), || {
                self.fetch(ApiRequest::get("/admin/categories").query(query.params()))
            })
            .await
    }

    /// The full category hierarchy.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn category_tree(&self) -> Result<Vec<CategoryTree>, BackendError> {
        self.cache()
            .get_or_fetch(&keys::categories_tree(), || {
                self.fetch(ApiRequest::get("/admin/categories/tree"))
            })
            .await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such category exists.
    #[instrument(skip(self))]
    pub async fn get_category(&self, id: &CategoryId) -> Result<Category, BackendError> {
        self.cache()
            .get_or_fetch(&keys::category_detail(id), || {
                self.fetch(ApiRequest::get(format!("/admin/categories/{id}")))
            })
            .await
    }

    /// # Errors
    ///
    /// Returns error if the backend rejects the category or the request fails.
    #[instrument(skip(self, category), fields(name = %category.name))]
    pub async fn create_category(&self, category: &CreateCategory) -> Result<Category, BackendError> {
        let created: Category = self
            .fetch(ApiRequest::post("/admin/categories").json(category)?)
            .await?;
        self.cache()
            .invalidate_all_of([&keys::categories_lists(), &keys::categories_tree()]);
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns error if the backend rejects the update or the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        update: &UpdateCategory,
    ) -> Result<Category, BackendError> {
        let updated: Category = self
            .fetch(ApiRequest::put(format!("/admin/categories/{id}")).json(update)?)
            .await?;
        self.cache().invalidate_all_of([
            &keys::categories_lists(),
            &keys::categories_tree(),
            &keys::category_detail(id),
        ]);
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns error if the category still has products or the request fails.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), BackendError> {
        self.execute(ApiRequest::delete(format!("/admin/categories/{id}")))
            .await?;
        self.cache()
            .invalidate_all_of([&keys::categories_lists(), &keys::categories_tree()]);
        Ok(())
    }

    /// Upload a category image and return its hosted URL.
    ///
    /// # Errors
    ///
    /// Returns error if the upload is rejected or the request fails.
    #[instrument(skip(self, image), fields(file_name = %image.file_name))]
    pub async fn upload_category_image(
        &self,
        id: &CategoryId,
        image: UploadFile,
    ) -> Result<String, BackendError> {
        let uploaded: CategoryImage = self
            .fetch(
                ApiRequest::post(format!("/admin/categories/{id}/upload-image"))
                    .multipart(Vec::new(), vec![("image", image)]),
            )
            .await?;
        self.cache()
            .invalidate_all_of([&keys::category_detail(id), &keys::categories_lists()]);
        Ok(uploaded.image_url)
    }

    /// Products in a category, optionally including its subcategories.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn category_products(
        &self,
        id: &CategoryId,
        query: &CategoryProductsQuery,
    ) -> Result<ProductsPage, BackendError> {
        self.cache()
            .get_or_fetch(&keys::category_products(id, query), || {
                self.fetch(
                    ApiRequest::get(format!("/admin/categories/{id}/products"))
                        .query(query.params()),
                )
            })
            .await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_subcategories(
        &self,
        parent: &CategoryId,
        include_inactive: bool,
    ) -> Result<Vec<Category>, BackendError> {
        self.cache()
            .get_or_fetch(&keys::subcategories_list(parent, include_inactive), || {
                self.fetch(
                    ApiRequest::get(format!("/admin/categories/{parent}/subcategories"))
                        .query(vec![("include_inactive", include_inactive.to_string())]),
                )
            })
            .await
    }

    /// # Errors
    ///
    /// Returns error if the backend rejects the subcategory or the request fails.
    #[instrument(skip(self, category), fields(name = %category.name))]
    pub async fn create_subcategory(
        &self,
        parent: &CategoryId,
        category: &CreateCategory,
    ) -> Result<Category, BackendError> {
        let created: Category = self
            .fetch(
                ApiRequest::post(format!("/admin/categories/{parent}/subcategories"))
                    .json(category)?,
            )
            .await?;
        self.cache().invalidate_all_of([
            &keys::subcategories(parent),
            &keys::categories_tree(),
            &keys::categories_lists(),
        ]);
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such subcategory exists.
    #[instrument(skip(self))]
    pub async fn get_subcategory(&self, id: &CategoryId) -> Result<Category, BackendError> {
        self.cache()
            .get_or_fetch(&keys::category_detail(id), || {
                self.fetch(ApiRequest::get(format!("/admin/subcategories/{id}")))
            })
            .await
    }

    /// # Errors
    ///
    /// Returns error if the backend rejects the update or the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_subcategory(
        &self,
        id: &CategoryId,
        update: &UpdateCategory,
    ) -> Result<Category, BackendError> {
        let updated: Category = self
            .fetch(ApiRequest::put(format!("/admin/subcategories/{id}")).json(update)?)
            .await?;
        self.cache().invalidate_all_of([
            &keys::category_detail(id),
            &keys::categories_tree(),
            &keys::categories_lists(),
        ]);
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn delete_subcategory(&self, id: &CategoryId) -> Result<(), BackendError> {
        self.execute(ApiRequest::delete(format!("/admin/subcategories/{id}")))
            .await?;
        self.cache()
            .invalidate_all_of([&keys::categories_tree(), &keys::categories_lists()]);
        Ok(())
    }
}
