//! Database connectivity diagnostic tool.
//!
//! This binary resolves MySQL credentials from AWS Secrets Manager, opens
//! one connection, and prints the server identity and table list.
//!
//! # Security Guarantees
//! - Read-only diagnostic queries only
//! - Password masked in output unless `--reveal-password` is given
//! - Secret payloads never logged

use clap::Parser;
use dbprobe::Cli;
use dbprobe_core::{AwsSecretStore, MySqlConnector, Result, init_logging, run_probe};
use tracing::{error, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.global.verbose, cli.global.quiet)?;

    let settings = cli.run_settings();
    if settings.reveal_password {
        warn!("Password will be printed in plaintext");
    }

    let store = AwsSecretStore::connect(&settings.region).await;
    let mut stdout = std::io::stdout();

    run_probe(&store, &MySqlConnector, &settings, &mut stdout)
        .await
        .map_err(|e| {
            error!(category = %e.category(), "Diagnostic run failed: {}", e);
            e
        })?;

    Ok(())
}
