//! Product catalog commands.

use std::path::{Path, PathBuf};

use super::{CliError, connect};

/// Download the bulk upload template to `output`, or to the file name the
/// backend suggests in the current directory.
pub async fn download_template(output: Option<PathBuf>) -> Result<(), CliError> {
    let (api, _) = connect().await?;
    let template = api.bulk_template().await?;

    let path = output.unwrap_or_else(|| default_path(&template.file_name));
    tokio::fs::write(&path, &template.bytes).await?;

    println!("Wrote {} bytes to {}", template.bytes.len(), path.display());
    Ok(())
}

/// A file name in the current directory, ignoring any directories the
/// backend may have included.
fn default_path(suggested: &str) -> PathBuf {
    Path::new(suggested)
        .file_name()
        .map_or_else(|| PathBuf::from("products_template.xlsx"), PathBuf::from)
}
