//! Directory-backed key-value store
//!
//! One file per key. File names are the percent-encoded key, so keys like
//! `favorites_a@x.com` map to `favorites_a%40x.com`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::KeyValueStore;
use crate::error::{NewsError, Result};

/// Persistent store rooted at a data directory
///
/// Each key lives in its own file under `root`, holding the raw value.
/// Reads never create anything: a missing file is `None`, and a missing
/// root reads as empty. The root is created on the first [`set`].
///
/// # Errors
///
/// Every failure is reported as [`NewsError::Storage`] with a message
/// naming the path and, for permission and read-only problems, the cause.
///
/// [`set`]: KeyValueStore::set
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data directory this store writes into
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(urlencoding::encode(key).as_ref())
    }

    fn create_root_if_needed(&self) -> Result<()> {
        match fs::create_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) => {
                let msg = match e.kind() {
                    ErrorKind::PermissionDenied => {
                        format!("Permission denied: cannot create directory {:?}", self.root)
                    }
                    _ => format!("Failed to create directory {:?}: {}", self.root, e),
                };
                Err(NewsError::Storage(msg))
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) => match e.kind() {
                ErrorKind::NotFound => Ok(None),
                ErrorKind::PermissionDenied => Err(NewsError::Storage(format!(
                    "Permission denied: cannot read {:?}",
                    path
                ))),
                _ => Err(NewsError::Storage(format!(
                    "Failed to read {:?}: {}",
                    path, e
                ))),
            },
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.create_root_if_needed()?;
        let path = self.path_for(key);
        debug!(path = %path.display(), bytes = value.len(), "Writing key");

        fs::write(&path, value).map_err(|e| {
            let msg = match e.kind() {
                ErrorKind::PermissionDenied => {
                    format!("Permission denied: cannot write to {:?}", path)
                }
                ErrorKind::ReadOnlyFilesystem => {
                    format!("Cannot write to {:?}: filesystem is read-only", path)
                }
                _ => format!("Failed to write to {:?}: {}", path, e),
            };
            NewsError::Storage(msg)
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) => match e.kind() {
                ErrorKind::NotFound => Ok(()),
                ErrorKind::PermissionDenied => Err(NewsError::Storage(format!(
                    "Permission denied: cannot delete {:?}",
                    path
                ))),
                _ => Err(NewsError::Storage(format!(
                    "Failed to delete {:?}: {}",
                    path, e
                ))),
            },
        }
    }
}
