//! Library module for dbprobe
//!
//! Exposes the command-line definition for testing purposes.
//! The main binary functionality is in main.rs.

use clap::{Args, Parser};
use dbprobe_core::RunSettings;

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "dbprobe")]
#[command(about = "Print MySQL diagnostics using credentials from AWS Secrets Manager")]
#[command(version)]
#[command(long_about = "
dbprobe - one-shot database connectivity check

Fetches a JSON credential bundle (host, port, username, password, dbname)
from AWS Secrets Manager, connects to MySQL, and prints:
- the connection configuration (password masked)
- server version, current user, and selected database
- the tables in the selected database

AWS credentials come from the standard provider chain.

EXAMPLES:
  dbprobe
  SECRET_NAME=prod-db-credentials AWS_REGION=us-east-1 dbprobe
  dbprobe --secret-name prod-db-credentials --region us-east-1 -v
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Secret holding the credential bundle
    #[arg(
        long,
        env = "SECRET_NAME",
        default_value = "invitime-dev-db-credentials",
        help = "Name or ARN of the secret holding the credential bundle"
    )]
    pub secret_name: String,

    /// Secret store region
    #[arg(
        long,
        env = "AWS_REGION",
        default_value = "ap-northeast-2",
        help = "AWS region of the secret"
    )]
    pub region: String,

    /// Print the plaintext password
    #[arg(
        long,
        help = "Print the plaintext password in the configuration line (unsafe on shared terminals)"
    )]
    pub reveal_password: bool,
}

/// Flags shared by every invocation
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all logs except errors")]
    pub quiet: bool,
}

impl Cli {
    /// Settings for this run.
    pub fn run_settings(&self) -> RunSettings {
        RunSettings::new(self.secret_name.clone(), self.region.clone())
            .with_reveal_password(self.reveal_password)
    }
}
