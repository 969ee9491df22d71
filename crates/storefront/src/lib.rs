//! `MyShop` storefront library.
//!
//! The storefront data layer: a product catalog (built-in seed plus seller
//! listings), a shopping cart, an account registry with a single session
//! slot, and a stubbed checkout. State lives in memory in an [`AppState`]
//! and every change is written through to a [`KeyValueStore`] as JSON.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use myshop_core::ProductId;
//! use myshop_storefront::{AppState, CartService, MemoryStore, StorefrontConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState::open(StorefrontConfig::default(), Arc::new(MemoryStore::new()))?;
//! CartService::new(&state).add(ProductId::new(1), 1)?;
//! assert_eq!(CartService::new(&state).total()?.display(), "$999.00");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod models;
pub mod services;
pub mod state;

pub use config::{ConfigError, StorefrontConfig};
pub use db::{FileStore, KeyValueStore, MemoryStore, StorageError, open_store};
pub use error::{AppError, ErrorKind};
pub use services::{
    AuthService, CardDetails, CartService, CatalogService, CheckoutService, PaymentOutcome,
    Receipt,
};
pub use state::AppState;
