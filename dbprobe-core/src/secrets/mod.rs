//! Secret store access and credential bundle decoding.
//!
//! # Module Structure
//! - `aws`: AWS Secrets Manager backend (feature `aws`)
//!
//! A store returns one of two payload encodings per secret version: plain
//! text or base64 binary. Both are decoded here into the same JSON object.

#[cfg(feature = "aws")]
pub mod aws;

use crate::Result;
use crate::error::ProbeError;
use crate::settings::RunSettings;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decoded credential bundle: a JSON object keyed by field name.
pub type SecretMap = serde_json::Map<String, serde_json::Value>;

/// Raw value of one secret version as returned by the store.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretPayload {
    /// `SecretString`: serialized JSON text
    Text(String),
    /// `SecretBinary`: base64 text of serialized JSON, or the decoded bytes
    Binary(Vec<u8>),
    /// Neither field was present in the response
    Empty,
}

impl std::fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Payloads hold credentials; only the shape is printable
        match self {
            Self::Text(text) => write!(f, "Text(<{} bytes>)", text.len()),
            Self::Binary(bytes) => write!(f, "Binary(<{} bytes>)", bytes.len()),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

/// Source of credential bundles.
///
/// # Object Safety
/// This trait is object-safe, allowing for dynamic dispatch through
/// `Box<dyn SecretStore>` or `&dyn SecretStore`.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetches the current value of the named secret.
    ///
    /// # Errors
    /// - `Authentication` if the store rejects the caller's credentials
    /// - `SecretNotFound` if the secret does not exist
    /// - `SecretAccess` for any other store or transport failure
    async fn get_secret_value(&self, secret_name: &str) -> Result<SecretPayload>;
}

/// Decodes a secret payload into a credential bundle.
///
/// # Errors
/// Returns `SecretFormat` if the payload is empty, is not valid JSON (plain
/// or base64-wrapped), or is JSON but not an object.
///
/// # Example
/// ```rust
/// use dbprobe_core::secrets::{SecretPayload, decode_secret_payload};
///
/// let map = decode_secret_payload(SecretPayload::Binary(b"eyJob3N0IjoiZGIifQ==".to_vec()))?;
/// assert_eq!(map["host"], "db");
/// # Ok::<(), dbprobe_core::ProbeError>(())
/// ```
pub fn decode_secret_payload(payload: SecretPayload) -> Result<SecretMap> {
    match payload {
        SecretPayload::Text(text) => parse_secret_json(text.as_bytes(), "SecretString"),
        SecretPayload::Binary(bytes) => match STANDARD.decode(bytes.trim_ascii()) {
            Ok(decoded) => parse_secret_json(&decoded, "SecretBinary"),
            // The AWS SDK hands back bytes it already base64-decoded
            Err(_) => parse_secret_json(&bytes, "SecretBinary"),
        },
        SecretPayload::Empty => Err(ProbeError::secret_format(
            "response has neither SecretString nor SecretBinary",
        )),
    }
}

/// Fetches and decodes the secret named in `settings`.
pub async fn resolve_secret(store: &dyn SecretStore, settings: &RunSettings) -> Result<SecretMap> {
    tracing::info!(
        secret_name = %settings.secret_name,
        region = %settings.region,
        "Resolving database credentials"
    );

    let payload = store.get_secret_value(&settings.secret_name).await?;
    tracing::debug!(payload = ?payload, "Secret value received");

    let secret = decode_secret_payload(payload)?;
    tracing::debug!(fields = secret.len(), "Secret decoded");

    Ok(secret)
}

fn parse_secret_json(bytes: &[u8], source: &str) -> Result<SecretMap> {
    // serde_json errors quote no input, so they are safe to surface
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(ProbeError::secret_format(format!(
            "{} is valid JSON but not an object",
            source
        ))),
        Err(e) => Err(ProbeError::secret_format(format!(
            "{} is not valid JSON: {}",
            source, e
        ))),
    }
}
