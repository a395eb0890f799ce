//! Admin access - a single shared secret.
//!
//! The secret is compared for plain equality. There is no hashing, lockout or rate
//! limiting; anyone who can read the environment or guess the password is an admin.

use crate::errors::{Error, Result};

/// Gatekeeper for admin operations.
#[derive(Clone, Default)]
pub struct AdminGate {
    secret: Option<String>,
}

impl AdminGate {
    /// Creates a gate for `secret`. A blank secret disables admin access entirely.
    #[must_use]
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Whether any admin secret is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Checks an attempt against the configured secret.
    ///
    /// # Errors
    /// Returns [`Error::Unauthorized`] on mismatch or when admin access is disabled.
    pub fn verify(&self, attempt: &str) -> Result<()> {
        match &self.secret {
            Some(secret) if secret == attempt => Ok(()),
            _ => Err(Error::Unauthorized),
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
