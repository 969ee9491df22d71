//! User repository.
//!
//! The whole user list is stored as one JSON array under the `users` key.

use super::{KeyValueStore, StorageError, keys, load_json, save_json};
use crate::models::User;

/// Repository for the registered user list.
pub struct UserRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Load every registered user. A missing record means no users yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if the stored record is malformed.
    pub fn load(&self) -> Result<Vec<User>, StorageError> {
        Ok(load_json(self.store, keys::USERS)?.unwrap_or_default())
    }

    /// Replace the stored user list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn save(&self, users: &[User]) -> Result<(), StorageError> {
        save_json(self.store, keys::USERS, users)
    }
}
