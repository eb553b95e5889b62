//! MySQL diagnostic session over a single sqlx connection.
//!
//! # Security Features
//! - Connect options are built field by field, so the password never sits
//!   in a URL that could reach a log line
//! - Only `SELECT` and `SHOW` statements are issued
//! - Error contexts name the target as `host:port/database` only

use super::{DiagnosticSession, IDENTITY_QUERY, ServerIdentity, SessionConnector, TABLES_QUERY};
use crate::Result;
use crate::config::ConnectionConfig;
use crate::error::ProbeError;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Row};

/// Opens [`MySqlSession`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

#[async_trait]
impl SessionConnector for MySqlConnector {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DiagnosticSession>> {
        let session = MySqlSession::connect(config).await?;
        Ok(Box::new(session))
    }
}

/// Builds sqlx connect options from a connection configuration.
///
/// Driver defaults (TLS preference, timeouts, charset) are left untouched.
pub fn connect_options(config: &ConnectionConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(config.password.expose())
        .database(&config.database)
}

/// One open MySQL connection.
pub struct MySqlSession {
    conn: MySqlConnection,
    target: String,
}

impl std::fmt::Debug for MySqlSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSession")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl MySqlSession {
    /// Opens a connection to the configured server and database.
    ///
    /// # Errors
    /// Returns `Connection` if the server is unreachable, the host or port is
    /// invalid, or the login is rejected
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let target = config.to_string();

        let conn = MySqlConnection::connect_with(&connect_options(config))
            .await
            .map_err(|e| ProbeError::Connection {
                context: format!("Failed to connect to MySQL at {}", target),
                source: Box::new(e),
            })?;

        tracing::debug!(target_db = %target, "MySQL connection opened");
        Ok(Self { conn, target })
    }
}

#[async_trait]
impl DiagnosticSession for MySqlSession {
    async fn server_identity(&mut self) -> Result<ServerIdentity> {
        let row = sqlx::query(IDENTITY_QUERY)
            .fetch_one(&mut self.conn)
            .await
            .map_err(|e| ProbeError::query_failed("Failed to query server identity", e))?;

        let version: String = row
            .try_get(0)
            .map_err(|e| ProbeError::query_failed("Failed to read VERSION()", e))?;
        let current_user: String = row
            .try_get(1)
            .map_err(|e| ProbeError::query_failed("Failed to read CURRENT_USER()", e))?;
        let database: Option<String> = row
            .try_get(2)
            .map_err(|e| ProbeError::query_failed("Failed to read DATABASE()", e))?;

        Ok(ServerIdentity {
            version,
            current_user,
            database,
        })
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows = sqlx::query(TABLES_QUERY)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| ProbeError::query_failed("Failed to list tables", e))?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row
                .try_get(0)
                .map_err(|e| ProbeError::query_failed("Failed to read table name", e))?;
            tables.push(name);
        }

        tracing::debug!(count = tables.len(), "Tables listed");
        Ok(tables)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let Self { conn, target } = *self;
        conn.close().await.map_err(|e| ProbeError::Connection {
            context: format!("Failed to close MySQL connection to {}", target),
            source: Box::new(e),
        })
    }
}
