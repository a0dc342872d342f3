//! Where an admin's backend tokens live between requests.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_sessions::Session;

use super::BackendError;
use crate::models::session_keys;

/// Access and refresh token pair issued by `/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Storage for the tokens of one logged-in admin.
pub trait TokenStore: Send + Sync {
    /// Current tokens, if logged in.
    fn load_tokens(&self) -> impl Future<Output = Option<AuthTokens>> + Send;

    /// Replace the stored tokens.
    fn save_tokens(&self, tokens: &AuthTokens) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Forget all authentication state.
    fn clear_tokens(&self) -> impl Future<Output = ()> + Send;
}

impl TokenStore for Session {
    async fn load_tokens(&self) -> Option<AuthTokens> {
        match self.get::<AuthTokens>(session_keys::AUTH_TOKENS).await {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read auth tokens from session");
                None
            }
        }
    }

    async fn save_tokens(&self, tokens: &AuthTokens) -> Result<(), BackendError> {
        self.insert(session_keys::AUTH_TOKENS, tokens)
            .await
            .map_err(|e| BackendError::TokenStore(e.to_string()))
    }

    async fn clear_tokens(&self) {
        for key in [session_keys::AUTH_TOKENS, session_keys::CURRENT_ADMIN] {
            if let Err(e) = self.remove_value(key).await {
                tracing::warn!(error = %e, key, "Failed to clear session value");
            }
        }
    }
}

/// In-memory token store for the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<Option<AuthTokens>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Some(tokens))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load_tokens(&self) -> Option<AuthTokens> {
        self.tokens.read().await.clone()
    }

    async fn save_tokens(&self, tokens: &AuthTokens) -> Result<(), BackendError> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear_tokens(&self) {
        *self.tokens.write().await = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tokens() -> AuthTokens {
        AuthTokens {
            access_token: "access-abc".to_string(),
            refresh_token: "refresh-xyz".to_string(),
        }
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let debug_output = format!("{:?}", tokens());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("access-abc"));
        assert!(!debug_output.contains("refresh-xyz"));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip_and_clear() {
        let store = MemoryTokenStore::new();
        assert!(store.load_tokens().await.is_none());

        store.save_tokens(&tokens()).await.unwrap();
        assert_eq!(store.load_tokens().await, Some(tokens()));

        let shared = store.clone();
        shared.clear_tokens().await;
        assert!(store.load_tokens().await.is_none());
    }
}
