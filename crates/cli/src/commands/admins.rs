//! Admin account commands.

use secrecy::ExposeSecret;
use storedesk_admin::backend::types::{AdminsQuery, CreateAdmin};
use storedesk_core::Email;

use super::{CliError, connect, required_secret};

/// Print every admin visible to the logged-in account.
pub async fn list(include_deactivated: bool) -> Result<(), CliError> {
    let (api, me) = connect().await?;
    let admins = api
        .list_admins(
            &me.id,
            AdminsQuery {
                include_deactivated: Some(include_deactivated),
                include_self: Some(true),
            },
        )
        .await?;

    if admins.is_empty() {
        println!("No admins found");
        return Ok(());
    }

    for admin in &admins {
        let role = if admin.is_super_admin {
            "super admin"
        } else {
            "admin"
        };
        let status = if admin.is_active {
            "active"
        } else {
            "deactivated"
        };
        println!(
            "{:<20} {:<32} {:<12} {:<12} {}",
            admin.username, admin.email, role, status, admin.department
        );
    }
    Ok(())
}

/// Create an admin account.
pub async fn create(
    username: String,
    email: String,
    department: String,
    job_title: String,
) -> Result<(), CliError> {
    let password = required_secret("STOREDESK_NEW_ADMIN_PASSWORD")?;

    let email = Email::parse(&email)
        .map_err(|e| CliError::Invalid(e.to_string()))?
        .into_inner();

    let (api, me) = connect().await?;
    if !me.is_super_admin {
        return Err(CliError::Invalid(
            "Only super admins can create admin accounts".to_string(),
        ));
    }

    let created = api
        .create_admin(&CreateAdmin {
            username,
            email,
            password: password.expose_secret().to_string(),
            department,
            job_title,
        })
        .await?;

    tracing::info!(admin_id = %created.id, "Admin created");
    println!("Created admin {} <{}>", created.username, created.email);
    Ok(())
}
