//! Database connection configuration.
//!
//! This module provides the `ConnectionConfig` struct built from a resolved
//! credential bundle.

use crate::error::ProbeError;
use crate::secrets::SecretMap;
use crate::security::Password;
use serde::Deserialize;
use serde_json::Value;

/// MySQL default port, used when the bundle carries no `port`.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Secret keys that must be present in every credential bundle.
pub const REQUIRED_SECRET_FIELDS: [&str; 4] = ["host", "username", "password", "dbname"];

/// Configuration for the single diagnostic connection.
///
/// # Security
/// The password is held in a zeroizing [`Password`]; `Debug` and `Display`
/// never include it.
///
/// # Example
/// ```rust
/// use dbprobe_core::config::ConnectionConfig;
/// use dbprobe_core::secrets::decode_secret_payload;
/// use dbprobe_core::secrets::SecretPayload;
///
/// let secret = decode_secret_payload(SecretPayload::Text(
///     r#"{"host":"db.local","username":"app","password":"s3cret","dbname":"appdb"}"#.to_string(),
/// ))?;
/// let config = ConnectionConfig::from_secret(&secret)?;
///
/// assert_eq!(config.port, 3306);
/// assert_eq!(config.to_string(), "db.local:3306/appdb");
/// # Ok::<(), dbprobe_core::ProbeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Database host address (secret field `host`)
    pub host: String,
    /// Database port (secret field `port`, default 3306)
    pub port: u16,
    /// Login user (secret field `username`)
    pub user: String,
    /// Login password (secret field `password`)
    pub password: Password,
    /// Database selected on connect (secret field `dbname`)
    pub database: String,
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
        // Intentionally omit user and never include credentials
    }
}

/// Port as it may appear in a bundle: `3306`, `3306.0`, or `"3306"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ConnectionConfig {
    /// Builds a configuration from a resolved credential bundle.
    ///
    /// # Errors
    /// - `MissingField` if `host`, `username`, `password`, or `dbname` is absent
    /// - `InvalidField` if a required field is not a string, or `port` is not
    ///   a whole number (integer, integral float, or integer string) in
    ///   `1..=65535`
    pub fn from_secret(secret: &SecretMap) -> crate::Result<Self> {
        // Report the first absent key before looking at value shapes
        if let Some(missing) = REQUIRED_SECRET_FIELDS
            .iter()
            .find(|field| !secret.contains_key(**field))
        {
            return Err(ProbeError::missing_field(*missing));
        }

        let port = match secret.get("port") {
            Some(value) => parse_port(value)?,
            None => DEFAULT_MYSQL_PORT,
        };

        Ok(Self {
            host: required_str(secret, "host")?,
            port,
            user: required_str(secret, "username")?,
            password: Password::new(required_str(secret, "password")?),
            database: required_str(secret, "dbname")?,
        })
    }
}

fn required_str(secret: &SecretMap, field: &str) -> crate::Result<String> {
    match secret.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ProbeError::invalid_field(field, "expected a string")),
        None => Err(ProbeError::missing_field(field)),
    }
}

fn parse_port(value: &Value) -> crate::Result<u16> {
    let raw = match serde_json::from_value::<PortValue>(value.clone()) {
        Ok(PortValue::Integer(n)) => n,
        // Whole-number floats only; JSON has no NaN or infinity
        #[allow(clippy::cast_possible_truncation)]
        Ok(PortValue::Float(n)) if n.fract() == 0.0 => n as i64,
        Ok(PortValue::Float(_)) => {
            return Err(ProbeError::invalid_field("port", "expected an integer"));
        }
        Ok(PortValue::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| ProbeError::invalid_field("port", "expected an integer"))?,
        Err(_) => return Err(ProbeError::invalid_field("port", "expected an integer")),
    };

    u16::try_from(raw)
        .ok()
        .filter(|port| *port > 0)
        .ok_or_else(|| ProbeError::invalid_field("port", "must be between 1 and 65535"))
}
