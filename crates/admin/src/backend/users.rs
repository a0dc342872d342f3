//! Customer accounts (`/users`).

use storedesk_core::UserId;
use tracing::instrument;

use super::cache::keys;
use super::types::{UpdateUserStatus, UserDetails, UsersPage, UsersQuery};
use super::{ApiRequest, ApiSession, BackendError, TokenStore};

impl<S: TokenStore> ApiSession<S> {
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_users(&self, query: &UsersQuery) -> Result<UsersPage, BackendError> {
        self.cache()
            .get_or_fetch(&keys::users_list(query), || {
                self.fetch_data(ApiRequest::get("/users").query(query.params()))
            })
            .await
    }

    /// A user with registered and guest order statistics.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such user exists.
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &UserId) -> Result<UserDetails, BackendError> {
        self.cache()
            .get_or_fetch(&keys::user_detail(id), || {
                self.fetch_data(ApiRequest::get(format!("/users/{id}")))
            })
            .await
    }

    /// Enable or disable a user account.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn update_user_status(&self, id: &UserId, is_active: bool) -> Result<(), BackendError> {
        self.execute(
            ApiRequest::put(format!("/users/{id}/status")).json(&UpdateUserStatus { is_active })?,
        )
        .await?;
        self.cache().invalidate_prefix(&keys::users());
        Ok(())
    }
}
