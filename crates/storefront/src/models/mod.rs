//! Domain models for the storefront.
//!
//! These are plain data types and pure logic. Persistence lives in
//! [`crate::db`] and orchestration in [`crate::services`].

pub mod cart;
pub mod catalog;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartEntry, CartSummary, QuantityUpdate, ShippingPolicy};
pub use catalog::{Listing, ListingIter};
pub use product::{NewProduct, Product, seed_products};
pub use session::{CurrentUser, Session};
pub use user::User;
