//! Command implementations.
//!
//! Every command logs in with `STOREDESK_USERNAME` / `STOREDESK_PASSWORD`
//! and keeps the resulting tokens in memory for the life of the process.

pub mod admins;
pub mod orders;
pub mod products;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use storedesk_admin::backend::types::AdminInfo;
use storedesk_admin::backend::{ApiClient, ApiSession, AuthTokens, BackendError, MemoryTokenStore};
use storedesk_admin::config::{BackendConfig, CacheConfig, ConfigError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn required_env(name: &'static str) -> Result<String, CliError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(CliError::MissingEnvVar(name))
}

/// Read a secret from the environment.
pub(crate) fn required_secret(name: &'static str) -> Result<SecretString, CliError> {
    required_env(name).map(SecretString::from)
}

/// Log in and return an authenticated session with the admin it belongs to.
pub(crate) async fn connect() -> Result<(ApiSession<MemoryTokenStore>, AdminInfo), CliError> {
    dotenvy::dotenv().ok();

    let backend = BackendConfig::from_env()?;
    let username = required_env("STOREDESK_USERNAME")?;
    let password = required_secret("STOREDESK_PASSWORD")?;

    let client = ApiClient::new(&backend, CacheConfig::default())?;
    tracing::info!(backend = %backend.url, username = %username, "Logging in");
    let login = client.login(&username, password.expose_secret()).await?;

    let store = MemoryTokenStore::with_tokens(AuthTokens {
        access_token: login.access_token,
        refresh_token: login.refresh_token,
    });
    Ok((client.session(store), login.admin_info))
}

/// Log in and print who the credentials belong to.
pub async fn whoami() -> Result<(), CliError> {
    let (_, admin) = connect().await?;
    let role = if admin.is_super_admin {
        "super admin"
    } else {
        "admin"
    };
    println!("{} <{}> ({role})", admin.display_name(), admin.email);
    if !admin.department.is_empty() {
        println!("Department: {}", admin.department);
    }
    Ok(())
}
