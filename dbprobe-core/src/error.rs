//! Error types with credential sanitization.
//!
//! Every error that can leave this crate maps to one of four categories:
//! secret access, secret format, connection, or query. Messages never carry
//! passwords, secret payloads, or connection URLs.

use thiserror::Error;

/// Main error type for dbprobe operations.
///
/// # Security
/// All error messages are sanitized to prevent credential leakage. Source
/// errors from the secret store and database driver are kept for `Debug`
/// chains but are never built from credential values.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Credentials used to reach the secret store were rejected
    #[error("Secret store authentication failed: {context}")]
    Authentication {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The named secret does not exist in the store
    #[error("Secret not found: {secret_name}")]
    SecretNotFound { secret_name: String },

    /// Secret store unreachable or returned a service error
    #[error("Secret store request failed: {context}")]
    SecretAccess {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Secret payload is not decodable JSON
    #[error("Secret payload is malformed: {context}")]
    SecretFormat { context: String },

    /// Credential bundle is missing a required key
    #[error("Secret is missing required field '{field}'")]
    MissingField { field: String },

    /// Credential bundle has a value of the wrong shape
    #[error("Secret field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    /// Database connection failed (credentials sanitized)
    #[error("Database connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Diagnostic query failed after the connection was established
    #[error("Query execution failed: {context}")]
    QueryExecution {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Local configuration or setup error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Writing diagnostic output failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results with ProbeError
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Coarse failure category, one per stage of a diagnostic run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Secret store unreachable, unauthorized, or secret missing
    SecretAccess,
    /// Secret payload could not be decoded or mapped to a configuration
    SecretFormat,
    /// Database unreachable or authentication rejected
    Connection,
    /// Query failed on an open connection
    Query,
    /// Local setup failure (logging, stdout)
    Local,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SecretAccess => "SecretAccessError",
            Self::SecretFormat => "SecretFormatError",
            Self::Connection => "ConnectionError",
            Self::Query => "QueryError",
            Self::Local => "LocalError",
        };
        f.write_str(name)
    }
}

impl ProbeError {
    /// Returns the failure category this error belongs to.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication { .. } | Self::SecretNotFound { .. } | Self::SecretAccess { .. } => {
                ErrorCategory::SecretAccess
            }
            Self::SecretFormat { .. } | Self::MissingField { .. } | Self::InvalidField { .. } => {
                ErrorCategory::SecretFormat
            }
            Self::Connection { .. } => ErrorCategory::Connection,
            Self::QueryExecution { .. } => ErrorCategory::Query,
            Self::Configuration { .. } | Self::Io { .. } => ErrorCategory::Local,
        }
    }

    /// Creates a connection error with sanitized context
    pub fn connection_failed<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: "Database connection failed".to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a query execution error with context
    pub fn query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::QueryExecution {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a secret store access error with context
    pub fn secret_access<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::SecretAccess {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a secret format error
    pub fn secret_format(context: impl Into<String>) -> Self {
        Self::SecretFormat {
            context: context.into(),
        }
    }

    /// Creates a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid field error
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
