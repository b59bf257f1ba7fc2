//! Key-value persistence
//!
//! A small string-to-string store, the same shape as browser local storage.
//! The favorites store and the session both sit on top of an injected
//! [`KeyValueStore`] so tests can swap in [`MemoryStore`] while the CLI
//! uses the directory-backed [`FileStore`].

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::utils::ensure_writable_dir;

/// String key-value storage
///
/// Methods take `&self`; implementations handle their own synchronization.
/// Writes are last-writer-wins with no merge.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, or `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set `key` to `value`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// How a command intends to use the data directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Browsing and listing; an unusable directory reads as empty
    ReadOnly,
    /// Toggling, clearing and session changes
    ReadWrite,
}

/// Open the directory-backed store at `root`.
///
/// # Arguments
///
/// * `root` - Data directory holding one file per key
/// * `mode` - Whether the caller is about to write
///
/// # Returns
///
/// The store as a shared [`KeyValueStore`].
///
/// # Errors
///
/// Only [`AccessMode::ReadWrite`] can fail: the directory is created and
/// probed for writability first, and a [`NewsError::Storage`] comes back
/// when that fails. [`AccessMode::ReadOnly`] never touches the disk here;
/// later reads from a missing or broken directory surface as per-key
/// errors that the favorites store and session treat as empty.
///
/// [`NewsError::Storage`]: crate::error::NewsError::Storage
pub async fn open_data_dir(root: &Path, mode: AccessMode) -> Result<Arc<dyn KeyValueStore>> {
    if mode == AccessMode::ReadWrite {
        ensure_writable_dir(root).await?;
    }
    debug!(root = %root.display(), ?mode, "Opened data directory");
    Ok(Arc::new(FileStore::new(root)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NewsError;
    use crate::favorites::FavoritesStore;
    use crate::session::{IdentityProvider, StoredSession};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unusable_dir_reads_as_empty() {
        let tmp = TempDir::new().unwrap();
        let not_a_dir = tmp.path().join("plain-file");
        std::fs::write(&not_a_dir, "x").unwrap();

        let store = open_data_dir(&not_a_dir, AccessMode::ReadOnly).await.unwrap();
        let session = Arc::new(StoredSession::new(store.clone()));
        let favorites = FavoritesStore::new(store, session.clone());

        assert_eq!(session.current_email(), None);
        assert!(favorites.load_favorites().is_empty());
        assert!(!favorites.is_favorite("https://e.com/1"));
        assert_eq!(favorites.count(), 0);
    }

    #[tokio::test]
    async fn test_unusable_dir_rejects_writers() {
        let tmp = TempDir::new().unwrap();
        let not_a_dir = tmp.path().join("plain-file");
        std::fs::write(&not_a_dir, "x").unwrap();

        let err = open_data_dir(&not_a_dir, AccessMode::ReadWrite).await.err();
        assert!(matches!(err, Some(NewsError::Storage(_))));
    }

    #[tokio::test]
    async fn test_read_only_does_not_create_dir() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("later");

        let store = open_data_dir(&missing, AccessMode::ReadOnly).await.unwrap();
        assert_eq!(store.get("favorites").unwrap(), None);
        assert!(!missing.exists());

        let store = open_data_dir(&missing, AccessMode::ReadWrite).await.unwrap();
        store.set("favorites", "[]").unwrap();
        assert!(missing.is_dir());
    }
}
