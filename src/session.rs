//! Session identity
//!
//! Who is signed in on this device. The favorites store asks an
//! [`IdentityProvider`] on every operation to decide which collection to use.

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{NewsError, Result};
use crate::storage::KeyValueStore;

/// Storage key holding the signed-in user's email
pub const USER_EMAIL_KEY: &str = "userEmail";

/// Storage key holding the backend auth token
pub const TOKEN_KEY: &str = "token";

/// Source of the current signed-in identity
pub trait IdentityProvider: Send + Sync {
    /// Email of the signed-in user, or `None` when signed out.
    fn current_email(&self) -> Option<String>;
}

/// Fixed identity, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<String>);

impl StaticIdentity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(email: impl Into<String>) -> Self {
        Self(Some(email.into()))
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_email(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Session persisted in a [`KeyValueStore`]
pub struct StoredSession {
    store: Arc<dyn KeyValueStore>,
}

impl StoredSession {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Record a successful backend login on this device.
    ///
    /// # Arguments
    ///
    /// * `email` - The address the user signed in with; surrounding
    ///   whitespace is dropped
    /// * `token` - The access token the backend issued
    ///
    /// # Errors
    ///
    /// [`NewsError::InvalidInput`] for a blank email, or the store's error
    /// when either value cannot be written. Nothing is stored on error.
    pub fn sign_in(&self, email: &str, token: &str) -> Result<()> {
        let email = normalize_email(email)?;
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_EMAIL_KEY, email)?;
        info!(%email, "Signed in");
        Ok(())
    }

    /// Access token from the last sign-in, if any
    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).ok().flatten().filter(|t| !t.is_empty())
    }

    /// Forget the signed-in user and their token.
    ///
    /// Favorites stored under the user's key are left in place.
    pub fn sign_out(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_EMAIL_KEY)?;
        info!("Signed out");
        Ok(())
    }
}

/// Trimmed `email`, rejecting blank input.
pub fn normalize_email(email: &str) -> Result<&str> {
    let email = email.trim();
    if email.is_empty() {
        return Err(NewsError::InvalidInput("Email is required".to_string()));
    }
    Ok(email)
}

impl IdentityProvider for StoredSession {
    fn current_email(&self) -> Option<String> {
        match self.store.get(USER_EMAIL_KEY) {
            Ok(email) => email.filter(|e| !e.is_empty()),
            Err(e) => {
                warn!(error = %e, "Could not read session; treating as signed out");
                None
            }
        }
    }
}
