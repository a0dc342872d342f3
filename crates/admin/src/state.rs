//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{ApiClient, BackendError};
use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backend: ApiClient,
}

impl AppState {
    /// Create application state with a backend client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the backend HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, BackendError> {
        let backend = ApiClient::new(&config.backend, config.cache)?;
        Ok(Self::with_backend(config, backend))
    }

    #[must_use]
    pub fn with_backend(config: AdminConfig, backend: ApiClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn backend(&self) -> &ApiClient {
        &self.inner.backend
    }
}
