//! Owner key derivation
//!
//! Each signed-in user gets their own favorites partition; signed-out
//! sessions share a single anonymous one.

use std::fmt;

/// Storage key of the anonymous favorites bucket
pub const ANONYMOUS_KEY: &str = "favorites";

/// Prefix of per-user favorites keys
pub const USER_KEY_PREFIX: &str = "favorites_";

/// Partition a favorites collection is stored under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerKey {
    /// No one is signed in
    Anonymous,
    /// Signed in as this email
    User(String),
}

impl OwnerKey {
    /// Derive the owner from an optional identity.
    ///
    /// A missing or empty email selects the anonymous bucket. Switching
    /// identity never moves favorites between buckets.
    pub fn from_identity(email: Option<&str>) -> Self {
        match email {
            Some(email) if !email.is_empty() => OwnerKey::User(email.to_string()),
            _ => OwnerKey::Anonymous,
        }
    }

    /// Key the collection is persisted under.
    pub fn storage_key(&self) -> String {
        match self {
            OwnerKey::Anonymous => ANONYMOUS_KEY.to_string(),
            OwnerKey::User(email) => format!("{USER_KEY_PREFIX}{email}"),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, OwnerKey::Anonymous)
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerKey::Anonymous => f.write_str("anonymous"),
            OwnerKey::User(email) => f.write_str(email),
        }
    }
}
