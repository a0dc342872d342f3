//! Storedesk CLI - operator tools that talk to the store backend.
//!
//! # Usage
//!
//! ```bash
//! # Check the configured credentials
//! storedesk whoami
//!
//! # Release stock held by unpaid orders past their reservation window
//! storedesk orders release-expired
//!
//! # Download the bulk product upload template
//! storedesk products template -o products_template.xlsx
//!
//! # List or create admins (super admin credentials required to create)
//! storedesk admins list --include-deactivated
//! storedesk admins create -u jdoe -e jdoe@example.com -d Operations -j "Ops Lead"
//! ```
//!
//! # Environment Variables
//!
//! - `STOREDESK_BACKEND_URL` - Backend origin
//! - `STOREDESK_USERNAME` / `STOREDESK_PASSWORD` - Admin credentials
//! - `STOREDESK_NEW_ADMIN_PASSWORD` - Password for `admins create`

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "storedesk")]
#[command(author, version, about = "Storedesk operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print the admin the credentials belong to
    Whoami,
    /// Order maintenance
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Product catalog tools
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage admin accounts
    Admins {
        #[command(subcommand)]
        action: AdminsAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Cancel unpaid orders whose stock reservation has expired
    ReleaseExpired,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// Download the bulk upload spreadsheet template
    Template {
        /// Where to write the file (default: the name the backend suggests)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AdminsAction {
    /// List admin accounts
    List {
        /// Include deactivated admins
        #[arg(long)]
        include_deactivated: bool,
    },
    /// Create an admin account
    ///
    /// The password is read from `STOREDESK_NEW_ADMIN_PASSWORD`.
    Create {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        department: String,

        #[arg(short, long)]
        job_title: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storedesk_cli=info,storedesk_admin=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Whoami => commands::whoami().await?,
        Commands::Orders { action } => match action {
            OrdersAction::ReleaseExpired => commands::orders::release_expired().await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::Template { output } => {
                commands::products::download_template(output).await?;
            }
        },
        Commands::Admins { action } => match action {
            AdminsAction::List {
                include_deactivated,
            } => commands::admins::list(include_deactivated).await?,
            AdminsAction::Create {
                username,
                email,
                department,
                job_title,
            } => {
                commands::admins::create(username, email, department, job_title).await?;
            }
        },
    }
    Ok(())
}
