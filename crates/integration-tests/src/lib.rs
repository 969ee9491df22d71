//! Integration tests for the `MyShop` storefront.
//!
//! Tests in `tests/` drive the public library API end to end against a
//! file-backed store in a scratch directory, reopening the state where a
//! test needs to observe what survives a restart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p myshop-integration-tests
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use myshop_storefront::{AppState, FileStore, StorageError, StorefrontConfig};

/// A scratch data directory plus helpers to open storefront state on it.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    data_dir: PathBuf,
}

impl TestContext {
    /// Create a fresh, empty data directory.
    #[must_use]
    pub fn new() -> Self {
        let data_dir =
            std::env::temp_dir().join(format!("myshop-it-{}", uuid::Uuid::new_v4()));
        Self { data_dir }
    }

    /// The data directory backing this context.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Configuration pointing at the scratch directory.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            data_dir: Some(self.data_dir.clone()),
            checkout_clear_delay: Duration::from_millis(2000),
            ..StorefrontConfig::default()
        }
    }

    /// Open (or reopen) storefront state on the scratch directory, as a
    /// process restart would.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory or a stored record cannot be
    /// read.
    pub fn open(&self) -> Result<AppState, StorageError> {
        let store = FileStore::open(&self.data_dir)?;
        AppState::open(self.config(), Arc::new(store))
    }

    /// Raw JSON stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file exists but cannot be read or
    /// parsed.
    pub fn stored(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let path = self.data_dir.join(format!("{key}.json"));
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}
