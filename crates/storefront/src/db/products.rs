//! Seller product repository.
//!
//! Only seller-submitted products are persisted (`sellersProducts`). The
//! seed catalog is compiled in; once the list has been written it decides
//! which seed products are still listed.

use super::{KeyValueStore, StorageError, keys, load_json, save_json};
use crate::models::Product;

/// Repository for the seller product list.
pub struct ProductRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Load the seller product list.
    ///
    /// When nothing has been stored yet the list starts as `seed`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if the stored record is malformed.
    pub fn load(&self, seed: &[Product]) -> Result<Vec<Product>, StorageError> {
        Ok(load_json(self.store, keys::SELLERS_PRODUCTS)?.unwrap_or_else(|| seed.to_vec()))
    }

    /// Replace the stored seller product list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn save(&self, products: &[Product]) -> Result<(), StorageError> {
        save_json(self.store, keys::SELLERS_PRODUCTS, products)
    }
}
