//! AWS Secrets Manager backend.
//!
//! Credentials for Secrets Manager itself come from the standard AWS
//! provider chain (environment, shared profile, SSO, instance metadata).
//! Client timeouts are left at the SDK defaults.

use super::{SecretPayload, SecretStore};
use crate::Result;
use crate::error::ProbeError;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::{
    GetSecretValueError, GetSecretValueOutput,
};

/// Error codes Secrets Manager returns for rejected caller credentials.
const AUTHENTICATION_ERROR_CODES: [&str; 5] = [
    "UnrecognizedClientException",
    "InvalidSignatureException",
    "ExpiredTokenException",
    "AccessDeniedException",
    "InvalidClientTokenId",
];

/// How a failed `GetSecretValue` call maps onto the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreFailure {
    NotFound,
    Unauthorized,
    Other,
}

/// Secret store backed by AWS Secrets Manager.
#[derive(Clone)]
pub struct AwsSecretStore {
    client: Client,
    region: String,
}

impl std::fmt::Debug for AwsSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretStore")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl AwsSecretStore {
    /// Loads the shared AWS configuration for `region` and builds a client.
    ///
    /// No network call happens here; credentials are resolved lazily on the
    /// first request.
    pub async fn connect(region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        tracing::debug!(region = %region, "Secrets Manager client configured");

        Self {
            client: Client::new(&sdk_config),
            region: region.to_string(),
        }
    }

    /// Region this store sends requests to.
    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn get_secret_value(&self, secret_name: &str) -> Result<SecretPayload> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_name)
            .send()
            .await
            .map_err(|e| map_sdk_error(secret_name, e))?;

        Ok(payload_from_output(&output))
    }
}

fn payload_from_output(output: &GetSecretValueOutput) -> SecretPayload {
    if let Some(text) = output.secret_string() {
        SecretPayload::Text(text.to_string())
    } else if let Some(blob) = output.secret_binary() {
        SecretPayload::Binary(blob.as_ref().to_vec())
    } else {
        SecretPayload::Empty
    }
}

fn map_sdk_error<R>(secret_name: &str, error: SdkError<GetSecretValueError, R>) -> ProbeError
where
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let not_found = error
        .as_service_error()
        .is_some_and(GetSecretValueError::is_resource_not_found_exception);
    let code = error.code().map(str::to_string);

    let failure = if not_found {
        StoreFailure::NotFound
    } else if code.is_some() {
        classify_error_code(code.as_deref())
    } else if mentions_credentials(&error) {
        // Provider chain found nothing; the request never left the process
        StoreFailure::Unauthorized
    } else {
        StoreFailure::Other
    };

    tracing::debug!(
        secret_name = %secret_name,
        code = code.as_deref().unwrap_or("none"),
        failure = ?failure,
        "GetSecretValue failed"
    );

    match failure {
        StoreFailure::NotFound => ProbeError::SecretNotFound {
            secret_name: secret_name.to_string(),
        },
        StoreFailure::Unauthorized => ProbeError::Authentication {
            context: code.map_or_else(
                || "no usable AWS credentials".to_string(),
                |code| format!("Secrets Manager rejected the request ({})", code),
            ),
            source: Some(Box::new(error)),
        },
        StoreFailure::Other => ProbeError::secret_access(
            format!("GetSecretValue failed: {}", DisplayErrorContext(&error)),
            error,
        ),
    }
}

fn classify_error_code(code: Option<&str>) -> StoreFailure {
    match code {
        Some("ResourceNotFoundException") => StoreFailure::NotFound,
        Some(code) if AUTHENTICATION_ERROR_CODES.contains(&code) => StoreFailure::Unauthorized,
        _ => StoreFailure::Other,
    }
}

fn mentions_credentials(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = error.source();
    while let Some(source) = current {
        if source.to_string().to_lowercase().contains("credentials") {
            return true;
        }
        current = source.source();
    }
    false
}
