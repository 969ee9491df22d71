//! Cart service.
//!
//! Every mutation is applied to a copy of the cart, written to the store,
//! and only then swapped in. A failed write leaves memory and storage in
//! agreement.

use std::num::NonZeroU32;

use tracing::instrument;

use myshop_core::{Price, ProductId};

use crate::db::{CartRepository, lock};
use crate::error::{AppError, Result};
use crate::models::{Cart, CartEntry, CartSummary, QuantityUpdate};
use crate::state::AppState;

/// Cart operations backed by the shared state.
pub struct CartService<'a> {
    state: &'a AppState,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Apply `change` to a staged copy, persist it, then commit.
    fn mutate<T>(&self, change: impl FnOnce(&mut Cart) -> T) -> Result<T> {
        let mut cart = lock(self.state.cart(), "cart")?;
        let mut staged = cart.clone();
        let outcome = change(&mut staged);

        CartRepository::new(self.state.store()).save(&staged)?;
        *cart = staged;
        Ok(outcome)
    }

    /// Add `quantity` units of a catalog product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a zero quantity,
    /// `AppError::NotFound` if the product is not in the catalog, and
    /// `AppError::Storage` if the cart cannot be written.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn add(&self, product_id: ProductId, quantity: u32) -> Result<CartEntry> {
        let quantity = NonZeroU32::new(quantity)
            .ok_or_else(|| AppError::Validation("Quantity must be at least 1".to_string()))?;

        let product = {
            let catalog = lock(self.state.catalog(), "catalog")?;
            catalog
                .products
                .iter()
                .find(|p| p.id == product_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?
        };

        let entry = self.mutate(|cart| cart.add(&product, quantity))?;
        tracing::info!(total_quantity = entry.quantity, "Added to cart");
        Ok(entry)
    }

    /// Remove a product's line. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart cannot be written.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove(&self, product_id: ProductId) -> Result<Option<CartEntry>> {
        if lock(self.state.cart(), "cart")?.get(product_id).is_none() {
            return Ok(None);
        }
        self.mutate(|cart| cart.remove(product_id))
    }

    /// Set a line's quantity; anything below 1 removes the line.
    ///
    /// An absent product is left absent whatever the quantity.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart cannot be written.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn update_quantity(&self, product_id: ProductId, quantity: i64) -> Result<QuantityUpdate> {
        if lock(self.state.cart(), "cart")?.get(product_id).is_none() {
            return Ok(QuantityUpdate::Missing);
        }
        self.mutate(|cart| cart.update_quantity(product_id, quantity))
    }

    /// Empty the cart unconditionally.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart cannot be written.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<()> {
        self.mutate(Cart::clear)?;
        tracing::info!("Cart cleared");
        Ok(())
    }

    /// Empty the cart only if the shopper confirmed and there is something
    /// to clear. Returns whether the cart was cleared.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart cannot be written.
    pub fn clear_confirmed(&self, confirmed: bool) -> Result<bool> {
        if !confirmed || lock(self.state.cart(), "cart")?.is_empty() {
            return Ok(false);
        }
        self.clear()?;
        Ok(true)
    }

    /// Sum of price times quantity.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart lock is poisoned.
    pub fn subtotal(&self) -> Result<Price> {
        Ok(lock(self.state.cart(), "cart")?.subtotal())
    }

    /// Shipping charged for `subtotal` under the configured policy.
    #[must_use]
    pub fn shipping(&self, subtotal: Price) -> Price {
        self.state.config().shipping.shipping(subtotal)
    }

    /// Subtotal plus shipping.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart lock is poisoned.
    pub fn total(&self) -> Result<Price> {
        Ok(self.summary()?.total)
    }

    /// Subtotal, shipping, total and item count.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart lock is poisoned.
    pub fn summary(&self) -> Result<CartSummary> {
        let cart = lock(self.state.cart(), "cart")?;
        Ok(cart.summary(&self.state.config().shipping))
    }

    /// Copy of the current lines, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart lock is poisoned.
    pub fn snapshot(&self) -> Result<Vec<CartEntry>> {
        Ok(lock(self.state.cart(), "cart")?.entries().to_vec())
    }

    /// Total units in the cart (the header badge).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart lock is poisoned.
    pub fn item_count(&self) -> Result<u64> {
        Ok(lock(self.state.cart(), "cart")?.item_count())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::db::{KeyValueStore, MemoryStore, StorageError, keys};
    use crate::error::ErrorKind;

    fn state_with(store: Arc<MemoryStore>) -> AppState {
        AppState::open(StorefrontConfig::default(), store).unwrap()
    }

    fn stored_cart(store: &MemoryStore) -> serde_json::Value {
        serde_json::from_str(&store.get(keys::CART).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_add_persists_immediately() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(store.clone());
        let cart = CartService::new(&state);

        let entry = cart.add(ProductId::new(1), 1).unwrap();
        assert_eq!(entry.quantity, 1);

        let stored = stored_cart(&store);
        assert_eq!(stored[0]["id"], 1);
        assert_eq!(stored[0]["quantity"], 1);
    }

    #[test]
    fn test_add_twice_accumulates() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let cart = CartService::new(&state);

        cart.add(ProductId::new(2), 1).unwrap();
        let entry = cart.add(ProductId::new(2), 2).unwrap();

        assert_eq!(entry.quantity, 3);
        assert_eq!(cart.snapshot().unwrap().len(), 1);
        assert_eq!(cart.item_count().unwrap(), 3);
    }

    #[test]
    fn test_add_rejects_unknown_and_zero() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let cart = CartService::new(&state);

        let err = cart.add(ProductId::new(404), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = cart.add(ProductId::new(1), 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert!(cart.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_worked_totals() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let cart = CartService::new(&state);

        cart.add(ProductId::new(1), 1).unwrap();
        let summary = cart.summary().unwrap();
        assert_eq!(summary.subtotal, Price::from_dollars(999));
        assert_eq!(summary.shipping, Price::ZERO);
        assert_eq!(cart.total().unwrap(), Price::from_dollars(999));

        assert_eq!(cart.shipping(Price::from_dollars(50)), Price::from_dollars(15));
        assert_eq!(cart.shipping(Price::from_dollars(100)), Price::from_dollars(15));
    }

    #[test]
    fn test_update_quantity_and_remove() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(store.clone());
        let cart = CartService::new(&state);
        cart.add(ProductId::new(1), 2).unwrap();

        assert_eq!(
            cart.update_quantity(ProductId::new(1), 5).unwrap(),
            QuantityUpdate::Set(5)
        );
        assert_eq!(stored_cart(&store)[0]["quantity"], 5);

        assert_eq!(
            cart.update_quantity(ProductId::new(2), 3).unwrap(),
            QuantityUpdate::Missing
        );
        assert_eq!(
            cart.update_quantity(ProductId::new(1), 0).unwrap(),
            QuantityUpdate::Removed
        );
        assert_eq!(stored_cart(&store), serde_json::json!([]));

        assert!(cart.remove(ProductId::new(1)).unwrap().is_none());
    }

    #[test]
    fn test_remove_returns_line() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let cart = CartService::new(&state);
        cart.add(ProductId::new(2), 1).unwrap();

        let removed = cart.remove(ProductId::new(2)).unwrap().unwrap();
        assert_eq!(removed.product.name, "Phone 1");
        assert_eq!(cart.item_count().unwrap(), 0);
    }

    #[test]
    fn test_clear_confirmed_guards() {
        let state = state_with(Arc::new(MemoryStore::new()));
        let cart = CartService::new(&state);

        assert!(!cart.clear_confirmed(true).unwrap());

        cart.add(ProductId::new(1), 1).unwrap();
        assert!(!cart.clear_confirmed(false).unwrap());
        assert_eq!(cart.item_count().unwrap(), 1);

        assert!(cart.clear_confirmed(true).unwrap());
        assert!(cart.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_cart_unchanged() {
        let store = Arc::new(MemoryStore::with_quota(64));
        let state = state_with(store);
        let cart = CartService::new(&state);

        let err = cart.add(ProductId::new(1), 1).unwrap_err();
        assert!(matches!(
            err,
            AppError::Storage(StorageError::QuotaExceeded { .. })
        ));
        assert!(cart.snapshot().unwrap().is_empty());
    }
}
