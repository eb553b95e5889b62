//! Diagnostic session traits and the diagnostic run.
//!
//! # Module Structure
//! - `mysql`: MySQL session over a single sqlx connection (feature `mysql`)
//! - `tests`: run-order and release tests against a recording session
//!
//! # Resource Guarantees
//! A run opens exactly one connection and closes it on every path that got
//! as far as opening it, including after a failed query.

#[cfg(feature = "mysql")]
pub mod mysql;


use crate::Result;
use crate::config::ConnectionConfig;
use crate::error::ProbeError;
use crate::output::{format_config_line, format_identity_line, format_tables_line};
use crate::secrets::{SecretMap, SecretStore, resolve_secret};
use crate::settings::RunSettings;
use async_trait::async_trait;
use std::io::Write;

/// Query returning server version, authenticated user, and selected database.
pub const IDENTITY_QUERY: &str = "SELECT VERSION(), CURRENT_USER(), DATABASE()";
/// Query listing tables in the selected database.
pub const TABLES_QUERY: &str = "SHOW TABLES";

/// Result row of [`IDENTITY_QUERY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    /// Server version string, e.g. `8.0.34`
    pub version: String,
    /// Account the server authenticated us as, e.g. `app@%`
    pub current_user: String,
    /// Selected database; `None` when no schema is selected
    pub database: Option<String>,
}

/// Everything a successful run printed after connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    /// Server identity row
    pub identity: ServerIdentity,
    /// Table names in server order
    pub tables: Vec<String>,
}

/// An open database connection running the fixed diagnostic queries.
///
/// # Security
/// - Only read-only statements are issued
/// - Implementations never include credentials in errors
#[async_trait]
pub trait DiagnosticSession: Send {
    /// Runs [`IDENTITY_QUERY`].
    ///
    /// # Errors
    /// Returns `QueryExecution` if the query fails or returns no row
    async fn server_identity(&mut self) -> Result<ServerIdentity>;

    /// Runs [`TABLES_QUERY`] and returns the first column of each row.
    ///
    /// # Errors
    /// Returns `QueryExecution` if the query fails (e.g. insufficient privileges)
    async fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Releases the connection.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Opens diagnostic sessions.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Opens one connection using `config`.
    ///
    /// # Errors
    /// Returns `Connection` if the server is unreachable or rejects the login
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DiagnosticSession>>;
}

/// Runs the diagnostic session for a resolved credential bundle.
///
/// Writes the configuration, identity, and table lines to `out` in that
/// order. A bundle missing a required field fails before the connector is
/// called.
///
/// # Errors
/// - `MissingField` / `InvalidField` if the bundle cannot be mapped
/// - `Connection` if the connection cannot be opened
/// - `QueryExecution` if either query fails (the connection is closed first)
/// - `Io` if writing to `out` fails
pub async fn run_diagnostics<W: Write>(
    connector: &dyn SessionConnector,
    secret: &SecretMap,
    settings: &RunSettings,
    out: &mut W,
) -> Result<DiagnosticReport> {
    let config = ConnectionConfig::from_secret(secret)?;
    write_line(out, &format_config_line(&config, settings.reveal_password))?;

    tracing::info!(target_db = %config, "Connecting to database");
    let mut session = connector.connect(&config).await?;
    tracing::debug!("Connection established");

    let outcome = query_and_print(session.as_mut(), out).await;
    let closed = session.close().await;
    tracing::debug!(clean = closed.is_ok(), "Connection released");

    match (outcome, closed) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(_), Err(close_error)) => Err(close_error),
        (Err(query_error), Ok(())) => Err(query_error),
        (Err(query_error), Err(close_error)) => {
            tracing::warn!(error = %close_error, "Failed to close connection after query error");
            Err(query_error)
        }
    }
}

/// Resolves the secret named in `settings`, then runs the diagnostic session.
pub async fn run_probe<W: Write>(
    store: &dyn SecretStore,
    connector: &dyn SessionConnector,
    settings: &RunSettings,
    out: &mut W,
) -> Result<DiagnosticReport> {
    let secret = resolve_secret(store, settings).await?;
    let report = run_diagnostics(connector, &secret, settings, out).await?;

    tracing::info!(tables = report.tables.len(), "Diagnostic run completed");
    Ok(report)
}

async fn query_and_print<W: Write>(
    session: &mut dyn DiagnosticSession,
    out: &mut W,
) -> Result<DiagnosticReport> {
    let identity = session.server_identity().await?;
    write_line(out, &format_identity_line(&identity))?;

    let tables = session.list_tables().await?;
    write_line(out, &format_tables_line(&tables))?;

    Ok(DiagnosticReport { identity, tables })
}

fn write_line<W: Write>(out: &mut W, line: &str) -> Result<()> {
    writeln!(out, "{}", line)
        .and_then(|()| out.flush())
        .map_err(|e| ProbeError::Io {
            context: "Failed to write diagnostic output".to_string(),
            source: e,
        })
}
