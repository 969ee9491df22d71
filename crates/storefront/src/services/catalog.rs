//! Catalog service: browsing, search and seller listings.

use std::sync::Arc;

use tracing::instrument;

use myshop_core::{Price, ProductId, UserId};

use crate::db::{ProductRepository, lock};
use crate::error::{AppError, Result};
use crate::filters::escape_html;
use crate::models::{Listing, NewProduct, Product};
use crate::state::AppState;

/// Catalog operations backed by the shared state.
pub struct CatalogService<'a> {
    state: &'a AppState,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn snapshot(&self) -> Result<Arc<[Product]>> {
        let catalog = lock(self.state.catalog(), "catalog")?;
        Ok(catalog.products.as_slice().into())
    }

    /// Every product, seed first, then seller additions.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the catalog lock is poisoned.
    pub fn list_all(&self) -> Result<Listing> {
        Ok(Listing::all(self.snapshot()?))
    }

    /// Products whose name contains `term`, ignoring case. A blank term
    /// lists everything.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the catalog lock is poisoned.
    #[instrument(skip(self))]
    pub fn search(&self, term: &str) -> Result<Listing> {
        Ok(Listing::matching(self.snapshot()?, term))
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has this id.
    pub fn find_by_id(&self, id: ProductId) -> Result<Product> {
        let catalog = lock(self.state.catalog(), "catalog")?;
        catalog
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))
    }

    /// Products listed by `seller_id`, in listing order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the catalog lock is poisoned.
    pub fn seller_products(&self, seller_id: UserId) -> Result<Vec<Product>> {
        let catalog = lock(self.state.catalog(), "catalog")?;
        Ok(catalog
            .seller_products
            .iter()
            .filter(|p| p.seller_id == seller_id)
            .cloned()
            .collect())
    }

    /// List a new product for `seller_id`.
    ///
    /// Text fields are HTML-escaped; image URLs are taken one per non-blank
    /// line. The product gets a fresh id and is appended to both the
    /// catalog and the persisted seller list.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a blank name, `AppError::Price`
    /// for a negative or non-finite price, and `AppError::Storage` if the
    /// seller list cannot be written.
    #[instrument(skip(self, submission), fields(seller_id = %seller_id))]
    pub fn add_product(&self, submission: NewProduct, seller_id: UserId) -> Result<Product> {
        let name = submission.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Product name is required".to_string()));
        }
        let price = Price::from_f64(submission.price)?;

        let product = Product {
            id: self.state.ids().next_product_id(),
            name: escape_html(name),
            price,
            images: submission
                .image_urls()
                .iter()
                .map(|url| escape_html(url))
                .collect(),
            description: escape_html(submission.description.trim()),
            seller_id,
        };

        let mut catalog = lock(self.state.catalog(), "catalog")?;
        let mut staged = catalog.seller_products.clone();
        staged.push(product.clone());
        ProductRepository::new(self.state.store()).save(&staged)?;

        catalog.seller_products = staged;
        catalog.products.push(product.clone());

        tracing::info!(product_id = %product.id, price = %product.price, "Product listed");
        Ok(product)
    }

    /// Delete a product on behalf of `requester`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has this id,
    /// `AppError::Forbidden` if `requester` is not its seller, and
    /// `AppError::Storage` if the seller list cannot be written.
    #[instrument(skip(self), fields(product_id = %id, requester = %requester))]
    pub fn delete_product(&self, id: ProductId, requester: UserId) -> Result<Product> {
        let mut catalog = lock(self.state.catalog(), "catalog")?;

        let product = catalog
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

        if product.seller_id != requester {
            tracing::warn!(seller_id = %product.seller_id, "Delete refused for non-owner");
            return Err(AppError::Forbidden(
                "Only the seller can delete this product".to_string(),
            ));
        }

        let staged: Vec<Product> = catalog
            .seller_products
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect();
        ProductRepository::new(self.state.store()).save(&staged)?;

        catalog.seller_products = staged;
        catalog.products.retain(|p| p.id != id);

        tracing::info!("Product deleted");
        Ok(product)
    }
}
