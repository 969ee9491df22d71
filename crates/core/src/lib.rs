//! MyShop Core - Shared types library.
//!
//! This crate provides the types shared by the storefront library, its demo
//! binary and the integration tests.
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no password hashing. Validation that needs nothing but the value itself
//! (email shape, non-negative prices) lives here so that a constructed value
//! is always a valid one.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, digests and enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
