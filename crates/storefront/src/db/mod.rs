//! Persistence for storefront state.
//!
//! # Storage model
//!
//! State is persisted to an opaque key-value store, one JSON record per key,
//! exactly like browser local storage:
//!
//! ## Keys
//!
//! - `users` - registered accounts (JSON array of `User`)
//! - `sellersProducts` - seller-submitted products (JSON array of `Product`)
//! - `cart` - the current cart (JSON array of `CartEntry`)
//!
//! Every mutating service call rewrites the whole record for its key
//! immediately (write-through). There are no transactions spanning keys.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, optionally with a byte quota
//! - [`FileStore`] - one `<key>.json` file per key inside a data directory

pub mod cart;
pub mod file;
pub mod memory;
pub mod products;
pub mod users;

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use cart::CartRepository;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use products::ProductRepository;
pub use users::UserRepository;

use crate::config::StorefrontConfig;

/// Fixed storage keys.
pub mod keys {
    /// Key for the registered user list.
    pub const USERS: &str = "users";

    /// Key for seller-submitted products.
    pub const SELLERS_PRODUCTS: &str = "sellersProducts";

    /// Key for the shopping cart.
    pub const CART: &str = "cart";
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error from the file-backed store.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized for writing.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored record is not valid JSON of the expected shape.
    #[error("stored record '{key}' is corrupt: {source}")]
    Corrupt {
        /// Key of the unreadable record.
        key: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The write would exceed the store's quota.
    #[error("storage quota exceeded writing '{key}' ({needed} bytes needed, {quota} allowed)")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Total bytes the store would hold after the write.
        needed: usize,
        /// Configured quota in bytes.
        quota: usize,
    },

    /// The key contains characters the backend cannot store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// A thread panicked while holding a state lock.
    #[error("state lock poisoned: {0}")]
    Poisoned(&'static str),
}

/// A string key-value store holding one JSON record per key.
pub trait KeyValueStore: Send + Sync {
    /// Read the record stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the record stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Open the store selected by configuration.
///
/// A configured data directory selects the [`FileStore`]; otherwise state
/// lives only in memory for the life of the process.
///
/// # Errors
///
/// Returns `StorageError::Io` if the data directory cannot be created.
pub fn open_store(config: &StorefrontConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match &config.data_dir {
        Some(dir) => {
            tracing::info!(data_dir = %dir.display(), "Using file store");
            Ok(Arc::new(FileStore::open(dir)?))
        }
        None => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Read and decode the JSON record under `key`.
pub(crate) fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            key: key.to_owned(),
            source,
        })
}

/// Encode `value` as JSON and store it under `key`.
pub(crate) fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Lock a state mutex, surfacing poisoning as a storage error.
pub(crate) fn lock<'a, T>(
    mutex: &'a Mutex<T>,
    what: &'static str,
) -> Result<MutexGuard<'a, T>, StorageError> {
    mutex.lock().map_err(|_| StorageError::Poisoned(what))
}
