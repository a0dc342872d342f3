//! Login and token refresh. These are the only calls made without a bearer token.

use tracing::instrument;

use super::types::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
use super::{ApiClient, ApiRequest, BackendError, ensure_success, parse_json};

impl ApiClient {
    /// Exchange admin credentials for a token pair.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unauthorized` for bad credentials, or another
    /// error if the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, BackendError> {
        let request = ApiRequest::post("/auth/login").json(&LoginRequest { username, password })?;
        let response = ensure_success(self.dispatch(&request, None).await?).await?;
        let login: LoginResponse = parse_json(response).await?;

        tracing::info!(admin_id = %login.admin_info.id, "Admin logged in");
        Ok(login)
    }

    /// Obtain a new access token.
    ///
    /// # Errors
    ///
    /// Returns error if the refresh token is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, BackendError> {
        let request = ApiRequest::post("/auth/refresh").json(&RefreshRequest { refresh_token })?;
        let response = ensure_success(self.dispatch(&request, None).await?).await?;
        let refreshed: RefreshResponse = parse_json(response).await?;
        Ok(refreshed.access_token)
    }
}
