//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `MYSHOP_DATA_DIR` - Directory for the file-backed store (unset: in-memory)
//! - `MYSHOP_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 100)
//! - `MYSHOP_FLAT_SHIPPING_FEE` - Shipping fee otherwise (default: 15)
//! - `MYSHOP_CHECKOUT_CLEAR_DELAY_MS` - Delay before a paid cart is cleared (default: 2000)
//! - `MYSHOP_SEED_CATALOG` - Include the built-in products (default: true)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use myshop_core::Price;

use crate::models::ShippingPolicy;

const DEFAULT_CLEAR_DELAY_MS: u64 = 2000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory for the file-backed store; `None` keeps state in memory.
    pub data_dir: Option<PathBuf>,
    /// Shipping rule used for cart summaries and receipts.
    pub shipping: ShippingPolicy,
    /// How long after a successful payment the cart is cleared.
    pub checkout_clear_delay: Duration,
    /// Whether the built-in products are part of the catalog.
    pub seed_catalog: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            shipping: ShippingPolicy::default(),
            checkout_clear_delay: Duration::from_millis(DEFAULT_CLEAR_DELAY_MS),
            seed_catalog: true,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let data_dir = get_optional_env("MYSHOP_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let free_threshold = get_price_or(
            "MYSHOP_FREE_SHIPPING_THRESHOLD",
            defaults.shipping.free_threshold,
        )?;
        let flat_fee = get_price_or("MYSHOP_FLAT_SHIPPING_FEE", defaults.shipping.flat_fee)?;

        let clear_delay_ms =
            get_parsed_or("MYSHOP_CHECKOUT_CLEAR_DELAY_MS", DEFAULT_CLEAR_DELAY_MS)?;
        let seed_catalog = get_parsed_or("MYSHOP_SEED_CATALOG", defaults.seed_catalog)?;

        Ok(Self {
            data_dir,
            shipping: ShippingPolicy {
                free_threshold,
                flat_fee,
            },
            checkout_clear_delay: Duration::from_millis(clear_delay_ms),
            seed_catalog,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse an optional environment variable, falling back to `default`.
fn get_parsed_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an optional non-negative dollar amount.
fn get_price_or(key: &str, default: Price) -> Result<Price, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| parse_price(key, &raw))
}

fn parse_price(key: &str, raw: &str) -> Result<Price, ConfigError> {
    let amount: Decimal = parse_value(key, raw)?;
    Price::new(amount).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
