//! Business logic services for the storefront.
//!
//! Each service borrows the [`AppState`](crate::state::AppState) and is
//! cheap to construct per call site.
//!
//! # Services
//!
//! - `auth` - Signup, login and the session slot
//! - `cart` - Cart mutations with write-through persistence
//! - `catalog` - Browsing, search and seller listings
//! - `checkout` - Card validation and the payment stub

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use cart::CartService;
pub use catalog::CatalogService;
pub use checkout::{CardDetails, CardError, CheckoutService, PaymentOutcome, PendingClear, Receipt};
