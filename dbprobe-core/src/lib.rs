//! Core library for dbprobe.
//!
//! dbprobe resolves database credentials from a secret store, opens one
//! database connection, and prints the server identity and table list.
//! This crate holds everything except the command-line surface.
//!
//! # Security Guarantees
//! - Passwords are zeroized on drop and masked in all output by default
//! - Secret payloads are never logged
//! - Only read-only diagnostic queries are issued
//!
//! # Architecture
//! - `secrets`: `SecretStore` trait, payload decoding, AWS backend
//! - `config`: `ConnectionConfig` built from a credential bundle
//! - `diagnostics`: `SessionConnector` / `DiagnosticSession` traits, the
//!   diagnostic run, MySQL backend
//! - `output`: exact stdout line formats

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod output;
pub mod secrets;
pub mod security;
pub mod settings;

// Re-export commonly used types
pub use config::ConnectionConfig;
pub use diagnostics::{
    DiagnosticReport, DiagnosticSession, ServerIdentity, SessionConnector, run_diagnostics,
    run_probe,
};
pub use error::{ErrorCategory, ProbeError, Result};
pub use logging::init_logging;
pub use secrets::{SecretMap, SecretPayload, SecretStore, decode_secret_payload, resolve_secret};
pub use settings::RunSettings;

#[cfg(feature = "aws")]
pub use secrets::aws::AwsSecretStore;

#[cfg(feature = "mysql")]
pub use diagnostics::mysql::{MySqlConnector, MySqlSession};
