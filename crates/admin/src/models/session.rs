//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state and one-shot
//! notifications.

use serde::{Deserialize, Serialize};
use storedesk_core::AdminId;
use tower_sessions::Session;

use crate::backend::types::AdminInfo;

/// Session-stored admin identity, as reported by the backend at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: AdminId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub is_super_admin: bool,
}

impl CurrentAdmin {
    /// Full name, falling back to the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Role label shown in the header and profile.
    #[must_use]
    pub const fn role_label(&self) -> &'static str {
        if self.is_super_admin {
            "Super Admin"
        } else {
            "Admin"
        }
    }
}

impl From<AdminInfo> for CurrentAdmin {
    fn from(info: AdminInfo) -> Self {
        Self {
            id: info.id,
            username: info.username,
            email: info.email,
            first_name: info.first_name,
            last_name: info.last_name,
            department: info.department,
            is_super_admin: info.is_super_admin,
        }
    }
}

/// Severity of a flash notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

impl FlashLevel {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "flash flash-success",
            Self::Error => "flash flash-error",
            Self::Info => "flash flash-info",
        }
    }
}

/// A notification shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        self.level.css_class()
    }
}

/// Queue a notification for the next page.
///
/// Failures are logged; losing a notification never fails the request.
pub async fn push_flash(session: &Session, flash: Flash) {
    let mut pending: Vec<Flash> = session
        .get(keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    pending.push(flash);

    if let Err(e) = session.insert(keys::FLASH, pending).await {
        tracing::warn!(error = %e, "Failed to store flash message");
    }
}

/// Drain pending notifications.
pub async fn take_flashes(session: &Session) -> Vec<Flash> {
    match session.remove::<Vec<Flash>>(keys::FLASH).await {
        Ok(flashes) => flashes.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash messages");
            Vec::new()
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the backend access and refresh tokens.
    pub const AUTH_TOKENS: &str = "auth_tokens";

    /// Key for pending flash notifications.
    pub const FLASH: &str = "flash";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_flashes_are_drained_once() {
        let session = session();
        push_flash(&session, Flash::success("Order shipped successfully")).await;
        push_flash(&session, Flash::error("Failed to cancel order")).await;

        let flashes = take_flashes(&session).await;
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].level, FlashLevel::Success);
        assert_eq!(flashes[1].message, "Failed to cancel order");

        assert!(take_flashes(&session).await.is_empty());
    }

    #[test]
    fn test_current_admin_from_login_info() {
        let info: AdminInfo = serde_json::from_str(
            r#"{"id":"a-1","username":"ops","email":"ops@example.com","is_super_admin":true}"#,
        )
        .unwrap();
        let admin = CurrentAdmin::from(info);
        assert_eq!(admin.display_name(), "ops");
        assert_eq!(admin.role_label(), "Super Admin");
    }
}
