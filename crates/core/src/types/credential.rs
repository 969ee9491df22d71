//! Stored password credential.
//!
//! The storefront never persists a password. It persists a [`PasswordDigest`]:
//! the PHC-format string produced by the password hasher (argon2id), which
//! embeds the algorithm, parameters and salt alongside the hash itself.

use serde::{Deserialize, Serialize};

/// A PHC-format password hash string (e.g. `$argon2id$v=19$...`).
///
/// Serialized transparently so the persisted user record keeps a plain
/// `"password"` string field.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an already-computed PHC string.
    #[must_use]
    pub const fn new(phc: String) -> Self {
        Self(phc)
    }

    /// Get the PHC string for verification.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep digests out of logs and debug dumps of user records.
impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordDigest([REDACTED])")
    }
}

impl AsRef<str> for PasswordDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
