//! Cart repository.

use super::{KeyValueStore, StorageError, keys, load_json, save_json};
use crate::models::{Cart, CartEntry};

/// Repository for the persisted cart.
pub struct CartRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Load the cart, normalizing stored quantities.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if the stored record is malformed.
    pub fn load(&self) -> Result<Cart, StorageError> {
        let entries: Vec<CartEntry> = load_json(self.store, keys::CART)?.unwrap_or_default();
        Ok(Cart::from_entries(entries))
    }

    /// Write the full cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        save_json(self.store, keys::CART, cart.entries())
    }
}
