//! Admin account management (`/admins`).

use storedesk_core::AdminId;
use tracing::instrument;

use super::cache::keys;
use super::types::{Admin, AdminsQuery, CreateAdmin, UpdateAdminRole};
use super::{ApiRequest, ApiSession, BackendError, TokenStore};

impl<S: TokenStore> ApiSession<S> {
    /// List admins as seen by `viewer`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_admins(
        &self,
        viewer: &AdminId,
        query: AdminsQuery,
    ) -> Result<Vec<Admin>, BackendError> {
        self.cache()
            .get_or_fetch(&keys::admins_list(viewer, query), || {
                self.fetch_data(ApiRequest::get("/admins").query(query.params()))
            })
            .await
    }

    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such admin exists.
    #[instrument(skip(self))]
    pub async fn get_admin(&self, id: &AdminId) -> Result<Admin, BackendError> {
        self.cache()
            .get_or_fetch(&keys::admin_detail(id), || {
                self.fetch_data(ApiRequest::get(format!("/admins/{id}")))
            })
            .await
    }

    /// Create a new admin account.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the account (duplicate username,
    /// caller not a super admin) or the request fails.
    #[instrument(skip(self, admin), fields(username = %admin.username))]
    pub async fn create_admin(&self, admin: &CreateAdmin) -> Result<Admin, BackendError> {
        let created: Admin = self
            .fetch_data(ApiRequest::post("/admins/create-admin").json(admin)?)
            .await?;
        self.cache().invalidate_prefix(&keys::admins());
        Ok(created)
    }

    /// Grant or revoke super admin rights.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn update_admin_role(
        &self,
        id: &AdminId,
        is_super_admin: bool,
    ) -> Result<(), BackendError> {
        self.execute(
            ApiRequest::put(format!("/admins/{id}/role")).json(&UpdateAdminRole { is_super_admin })?,
        )
        .await?;
        self.cache().invalidate_prefix(&keys::admins());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn deactivate_admin(&self, id: &AdminId, reason: &str) -> Result<(), BackendError> {
        self.execute(
            ApiRequest::put(format!("/admins/{id}/deactivate"))
                .query(vec![("reason", reason.to_string())]),
        )
        .await?;
        self.cache().invalidate_prefix(&keys::admins());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn reactivate_admin(
        &self,
        id: &AdminId,
        restore_super_admin: bool,
    ) -> Result<(), BackendError> {
        self.execute(
            ApiRequest::put(format!("/admins/{id}/reactivate"))
                .query(vec![("restore_super_admin", restore_super_admin.to_string())]),
        )
        .await?;
        self.cache().invalidate_prefix(&keys::admins());
        Ok(())
    }
}
