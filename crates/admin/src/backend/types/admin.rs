use serde::{Deserialize, Serialize};
use storedesk_core::{AdminId, UserId};

/// An admin account as listed by `/admins`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: AdminId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub username: String,
    pub email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_super_admin: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub department: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub job_title: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub created_at: String,
    #[serde(default)]
    pub last_admin_login: Option<String>,
    #[serde(default)]
    pub deactivated_at: Option<String>,
    #[serde(default)]
    pub deactivation_reason: Option<String>,
}

const fn default_true() -> bool {
    true
}

/// Body of `POST /admins/create-admin`.
#[derive(Serialize)]
pub struct CreateAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
    pub department: String,
    pub job_title: String,
}

impl std::fmt::Debug for CreateAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("department", &self.department)
            .field("job_title", &self.job_title)
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateAdminRole {
    pub is_super_admin: bool,
}

/// Query parameters for listing admins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminsQuery {
    pub include_deactivated: Option<bool>,
    pub include_self: Option<bool>,
}

impl AdminsQuery {
    pub(crate) fn params(self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(v) = self.include_deactivated {
            params.push(("include_deactivated", v.to_string()));
        }
        if let Some(v) = self.include_self {
            params.push(("include_self", v.to_string()));
        }
        params
    }
}
