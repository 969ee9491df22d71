//! Application state shared across services.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use myshop_core::{ProductId, UserId};

use crate::config::StorefrontConfig;
use crate::db::{
    CartRepository, KeyValueStore, ProductRepository, StorageError, UserRepository,
};
use crate::models::{Cart, Product, Session, User, seed_products};

/// Application state shared across all services.
///
/// This struct is cheaply cloneable via `Arc` and owns everything the
/// storefront keeps in memory. Each collection has its own lock; code that
/// needs both takes the catalog lock before the cart lock.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn KeyValueStore>,
    catalog: Mutex<CatalogState>,
    cart: Mutex<Cart>,
    users: Mutex<Vec<User>>,
    session: Mutex<Session>,
    ids: IdAllocator,
}

/// Products known to the storefront.
#[derive(Debug, Clone, Default)]
pub(crate) struct CatalogState {
    /// Everything shoppers can browse: seed first, then seller additions.
    pub(crate) products: Vec<Product>,
    /// The persisted `sellersProducts` list.
    pub(crate) seller_products: Vec<Product>,
}

impl CatalogState {
    /// Merge the seed catalog with persisted seller products.
    ///
    /// The seller list decides which seed products are still listed, so a
    /// deleted seed product stays deleted. Seller additions follow the seed
    /// products, skipping ids already present.
    fn merge(seed: Vec<Product>, seller_products: Vec<Product>) -> Self {
        let listed: HashSet<ProductId> = seller_products.iter().map(|p| p.id).collect();
        let mut products: Vec<Product> =
            seed.into_iter().filter(|p| listed.contains(&p.id)).collect();
        let mut seen: HashSet<ProductId> = products.iter().map(|p| p.id).collect();
        products.extend(
            seller_products
                .iter()
                .filter(|p| seen.insert(p.id))
                .cloned(),
        );
        Self {
            products,
            seller_products,
        }
    }
}

/// Monotonic id counters, seeded above every id seen at startup.
#[derive(Debug)]
pub(crate) struct IdAllocator {
    next_product: AtomicI64,
    next_user: AtomicI64,
}

impl IdAllocator {
    fn seeded(max_product: i64, max_user: i64) -> Self {
        Self {
            next_product: AtomicI64::new(max_product.saturating_add(1)),
            next_user: AtomicI64::new(max_user.saturating_add(1)),
        }
    }

    pub(crate) fn next_product_id(&self) -> ProductId {
        ProductId::new(self.next_product.fetch_add(1, Ordering::SeqCst))
    }

    pub(crate) fn next_user_id(&self) -> UserId {
        UserId::new(self.next_user.fetch_add(1, Ordering::SeqCst))
    }
}

impl AppState {
    /// Load persisted state from `store` and build the application state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a stored record cannot be read or parsed.
    pub fn open(
        config: StorefrontConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, StorageError> {
        let seed = if config.seed_catalog {
            seed_products()
        } else {
            Vec::new()
        };

        let seller_products = ProductRepository::new(store.as_ref()).load(&seed)?;
        let catalog = CatalogState::merge(seed, seller_products);
        let cart = CartRepository::new(store.as_ref()).load()?;
        let users = UserRepository::new(store.as_ref()).load()?;

        let max_product = catalog
            .products
            .iter()
            .chain(&catalog.seller_products)
            .map(|p| p.id.as_i64())
            .chain(cart.entries().iter().map(|e| e.id().as_i64()))
            .max()
            .unwrap_or(0);
        // Seller ids on products count too, so a new account never inherits
        // ownership of an existing listing.
        let max_user = users
            .iter()
            .map(|u| u.id.as_i64())
            .chain(catalog.products.iter().map(|p| p.seller_id.as_i64()))
            .max()
            .unwrap_or(0);

        tracing::info!(
            products = catalog.products.len(),
            seller_products = catalog.seller_products.len(),
            cart_lines = cart.entries().len(),
            users = users.len(),
            "Storefront state loaded"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog: Mutex::new(catalog),
                cart: Mutex::new(cart),
                users: Mutex::new(users),
                session: Mutex::new(Session::Anonymous),
                ids: IdAllocator::seeded(max_product, max_user),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backing key-value store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.inner.store.as_ref()
    }

    pub(crate) fn catalog(&self) -> &Mutex<CatalogState> {
        &self.inner.catalog
    }

    pub(crate) fn cart(&self) -> &Mutex<Cart> {
        &self.inner.cart
    }

    pub(crate) fn users(&self) -> &Mutex<Vec<User>> {
        &self.inner.users
    }

    pub(crate) fn session(&self) -> &Mutex<Session> {
        &self.inner.session
    }

    pub(crate) fn ids(&self) -> &IdAllocator {
        &self.inner.ids
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, keys, lock};

    fn open_with(store: MemoryStore) -> AppState {
        AppState::open(StorefrontConfig::default(), Arc::new(store)).unwrap()
    }

    #[test]
    fn test_fresh_store_uses_seed() {
        let state = open_with(MemoryStore::new());
        let catalog = lock(state.catalog(), "catalog").unwrap();

        assert_eq!(catalog.products, seed_products());
        assert_eq!(catalog.seller_products, seed_products());
        assert!(lock(state.cart(), "cart").unwrap().is_empty());
    }

    #[test]
    fn test_seller_products_merge_without_duplicates() {
        let store = MemoryStore::new();
        let mut stored = seed_products();
        stored.push(Product {
            id: ProductId::new(50),
            name: "Lamp".to_owned(),
            ..seed_products()[0].clone()
        });
        store
            .set(keys::SELLERS_PRODUCTS, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let state = open_with(store);
        let catalog = lock(state.catalog(), "catalog").unwrap();
        let ids: Vec<i64> = catalog.products.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 50]);
    }

    #[test]
    fn test_seed_product_missing_from_seller_list_stays_deleted() {
        let store = MemoryStore::new();
        let remaining: Vec<Product> = seed_products()
            .into_iter()
            .filter(|p| p.id != ProductId::new(1))
            .collect();
        store
            .set(keys::SELLERS_PRODUCTS, &serde_json::to_string(&remaining).unwrap())
            .unwrap();

        let state = open_with(store);
        let catalog = lock(state.catalog(), "catalog").unwrap();
        let ids: Vec<i64> = catalog.products.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_ids_start_above_known_ids() {
        let state = open_with(MemoryStore::new());

        assert_eq!(state.ids().next_product_id(), ProductId::new(3));
        assert_eq!(state.ids().next_product_id(), ProductId::new(4));
        // Seed products belong to seller 1.
        assert_eq!(state.ids().next_user_id(), UserId::new(2));
    }

    #[test]
    fn test_unseeded_catalog_is_empty() {
        let config = StorefrontConfig {
            seed_catalog: false,
            ..StorefrontConfig::default()
        };
        let state = AppState::open(config, Arc::new(MemoryStore::new())).unwrap();

        assert!(lock(state.catalog(), "catalog").unwrap().products.is_empty());
        assert_eq!(state.ids().next_product_id(), ProductId::new(1));
    }

    #[test]
    fn test_corrupt_record_fails_open() {
        let store = MemoryStore::new();
        store.set(keys::USERS, "not json").unwrap();

        let result = AppState::open(StorefrontConfig::default(), Arc::new(store));
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    }
}
