//! Order maintenance commands.

use super::{CliError, connect};

/// Release stock held by expired unpaid orders.
pub async fn release_expired() -> Result<(), CliError> {
    let (api, _) = connect().await?;
    let report = api.release_expired_orders().await?;

    println!("Released {} expired reservations", report.cancelled_count);
    for order in &report.cancelled_orders {
        println!("  cancelled {order}");
    }
    if report.failed_count > 0 {
        tracing::warn!(failed = report.failed_count, "Some orders could not be released");
    }
    Ok(())
}
