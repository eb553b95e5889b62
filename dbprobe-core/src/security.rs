//! Credential protection utilities.
//!
//! Passwords resolved from the secret store live in a zeroizing container
//! that never prints its contents through `Debug` or `Display`.

use zeroize::Zeroizing;

/// Placeholder printed in place of a password.
pub const REDACTED: &str = "****";

/// Database password that zeros its memory on drop.
///
/// # Security
/// - `Debug` and `Display` both render as `****`
/// - The plaintext is only reachable through [`Password::expose`]
///
/// # Example
/// ```rust
/// use dbprobe_core::security::Password;
///
/// let password = Password::new("hunter2".to_string());
/// assert_eq!(format!("{:?}", password), "Password(****)");
/// assert_eq!(password.expose(), "hunter2");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Moves the plaintext into a zeroizing container.
    pub fn new(plaintext: String) -> Self {
        Self(Zeroizing::new(plaintext))
    }

    /// Returns the plaintext for handing to the database driver.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Password({})", REDACTED)
    }
}

impl std::fmt::Display for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(REDACTED)
    }
}
