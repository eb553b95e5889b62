//! Run settings read once at process start.
//!
//! Values are threaded through the run as parameters; nothing here is
//! global or mutable after construction.

use std::env;

/// Environment variable naming the secret to fetch.
pub const SECRET_NAME_ENV: &str = "SECRET_NAME";
/// Environment variable naming the secret store region.
pub const AWS_REGION_ENV: &str = "AWS_REGION";
/// Secret fetched when `SECRET_NAME` is unset.
pub const DEFAULT_SECRET_NAME: &str = "invitime-dev-db-credentials";
/// Region used when `AWS_REGION` is unset.
pub const DEFAULT_REGION: &str = "ap-northeast-2";

/// Settings for a single diagnostic run.
///
/// # Example
/// ```rust
/// use dbprobe_core::settings::RunSettings;
///
/// let settings = RunSettings::new("app-db-credentials", "us-east-1");
/// assert_eq!(settings.secret_name, "app-db-credentials");
/// assert!(!settings.reveal_password);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Identifier of the secret holding the credential bundle
    pub secret_name: String,
    /// Region passed to the secret store client
    pub region: String,
    /// Print the plaintext password in the configuration line
    pub reveal_password: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_NAME, DEFAULT_REGION)
    }
}

impl RunSettings {
    /// Creates settings with the password masked in output.
    pub fn new(secret_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            region: region.into(),
            reveal_password: false,
        }
    }

    /// Reads `SECRET_NAME` and `AWS_REGION`, falling back to the defaults
    /// when a variable is unset or empty.
    pub fn from_env() -> Self {
        Self::new(
            env_or(SECRET_NAME_ENV, DEFAULT_SECRET_NAME),
            env_or(AWS_REGION_ENV, DEFAULT_REGION),
        )
    }

    /// Builder method to reveal the password in printed output.
    pub const fn with_reveal_password(mut self, reveal: bool) -> Self {
        self.reveal_password = reveal;
        self
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_when_unset() {
        temp_env::with_vars_unset([SECRET_NAME_ENV, AWS_REGION_ENV], || {
            let settings = RunSettings::from_env();
            assert_eq!(settings.secret_name, "invitime-dev-db-credentials");
            assert_eq!(settings.region, "ap-northeast-2");
            assert!(!settings.reveal_password);
        });
    }

    #[test]
    fn test_settings_read_from_env() {
        temp_env::with_vars(
            [
                (SECRET_NAME_ENV, Some("prod-db-credentials")),
                (AWS_REGION_ENV, Some("eu-west-1")),
            ],
            || {
                let settings = RunSettings::from_env();
                assert_eq!(settings.secret_name, "prod-db-credentials");
                assert_eq!(settings.region, "eu-west-1");
            },
        );
    }

    #[test]
    fn test_settings_empty_values_fall_back() {
        temp_env::with_vars(
            [(SECRET_NAME_ENV, Some("")), (AWS_REGION_ENV, Some("  "))],
            || {
                assert_eq!(RunSettings::from_env(), RunSettings::default());
            },
        );
    }

    #[test]
    fn test_settings_reveal_password_builder() {
        let settings = RunSettings::default().with_reveal_password(true);
        assert!(settings.reveal_password);
        assert_eq!(settings.secret_name, DEFAULT_SECRET_NAME);
    }
}
