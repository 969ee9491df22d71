//! Checkout: card validation and the payment stub.
//!
//! No money moves. A successful "payment" produces a [`Receipt`] and
//! schedules the cart to be emptied after the configured delay, giving the
//! shopper time to read the confirmation before the cart badge drops to 0.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::instrument;
use uuid::Uuid;

use myshop_core::PaymentMethod;

use crate::db::lock;
use crate::error::{AppError, Result};
use crate::models::{CartEntry, CartSummary};
use crate::services::cart::CartService;
use crate::state::AppState;

/// Length of a card number once whitespace is removed.
const CARD_NUMBER_DIGITS: usize = 16;

/// Errors from [`validate_card`], in the order the rules are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CardError {
    /// Card number is not 16 digits once spaces are removed.
    #[error("Invalid card number")]
    InvalidNumber,
    /// Expiry is not two digits, a slash, and two digits.
    #[error("Invalid expiration date (MM/YY)")]
    InvalidExpiry,
    /// CVV is not 3 or 4 digits.
    #[error("Invalid CVV")]
    InvalidCvv,
}

/// Card fields as typed into the checkout form.
#[derive(Clone, Default)]
pub struct CardDetails {
    /// Cardholder name; not validated.
    pub holder: String,
    /// Card number, spaces allowed.
    pub number: String,
    /// Expiry in `MM/YY` form.
    pub expiry: String,
    /// Security code.
    pub cvv: String,
}

impl CardDetails {
    /// Check the number, expiry and CVV.
    ///
    /// # Errors
    ///
    /// Returns the first [`CardError`] that applies.
    pub fn validate(&self) -> std::result::Result<(), CardError> {
        validate_card(&self.number, &self.expiry, &self.cvv)
    }

    fn last4(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(char::is_ascii_digit).collect();
        digits.iter().skip(digits.len().saturating_sub(4)).collect()
    }
}

// Card data stays out of logs.
impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("holder", &self.holder)
            .field("number", &"[REDACTED]")
            .field("expiry", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// Shape-check card fields.
///
/// - number: exactly 16 ASCII digits once whitespace is removed
/// - expiry: two digits, `/`, two digits (month and year ranges are not checked)
/// - cvv: 3 or 4 ASCII digits
///
/// # Errors
///
/// Returns the first failing rule, checked in the order above.
pub fn validate_card(number: &str, expiry: &str, cvv: &str) -> std::result::Result<(), CardError> {
    let number: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    if number.len() != CARD_NUMBER_DIGITS || !all_digits(&number) {
        return Err(CardError::InvalidNumber);
    }

    let expiry_ok = expiry
        .split_once('/')
        .is_some_and(|(mm, yy)| mm.len() == 2 && yy.len() == 2 && all_digits(mm) && all_digits(yy));
    if !expiry_ok {
        return Err(CardError::InvalidExpiry);
    }

    if !(3..=4).contains(&cvv.len()) || !all_digits(cvv) {
        return Err(CardError::InvalidCvv);
    }

    Ok(())
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Confirmation of a successful payment.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    /// Order reference shown to the shopper.
    pub order_id: Uuid,
    /// How the order was paid.
    pub method: PaymentMethod,
    /// Last four card digits, for card payments.
    pub card_last4: Option<String>,
    /// Lines paid for.
    pub items: Vec<CartEntry>,
    /// Totals paid.
    pub summary: CartSummary,
    /// When the payment was accepted.
    pub paid_at: DateTime<Utc>,
}

/// The scheduled cart clear. It always runs; this handle only lets the
/// caller wait for it.
#[derive(Debug)]
pub struct PendingClear {
    handle: JoinHandle<()>,
}

impl PendingClear {
    /// Wait until the cart has been cleared.
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Deferred cart clear did not complete");
        }
    }

    /// Whether the clear has already run.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Result of [`CheckoutService::pay`].
#[derive(Debug)]
pub struct PaymentOutcome {
    /// What was paid.
    pub receipt: Receipt,
    /// The cart clear scheduled by the payment.
    pub pending_clear: PendingClear,
}

/// Checkout operations backed by the shared state.
pub struct CheckoutService<'a> {
    state: &'a AppState,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Take payment for the current cart.
    ///
    /// Credit payments need card details that pass [`validate_card`];
    /// `paypal` and `bank` need nothing. Must be called inside a tokio
    /// runtime, which runs the deferred cart clear.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the cart is empty or card details
    /// are missing, `AppError::Card` if they are malformed, and
    /// `AppError::Internal` when called outside a tokio runtime.
    #[instrument(skip(self, card), fields(method = %method))]
    pub fn pay(&self, method: PaymentMethod, card: Option<&CardDetails>) -> Result<PaymentOutcome> {
        let (items, summary) = {
            let cart = lock(self.state.cart(), "cart")?;
            (cart.entries().to_vec(), cart.summary(&self.state.config().shipping))
        };
        if items.is_empty() {
            return Err(AppError::Validation("Your cart is empty".to_string()));
        }

        let card_last4 = if method.requires_card() {
            let card = card.ok_or_else(|| {
                AppError::Validation("Card details are required for credit payments".to_string())
            })?;
            card.validate()?;
            Some(card.last4())
        } else {
            None
        };

        let runtime = Handle::try_current().map_err(|_| {
            AppError::Internal("payment requires a running tokio runtime".to_string())
        })?;

        let receipt = Receipt {
            order_id: Uuid::new_v4(),
            method,
            card_last4,
            summary,
            items,
            paid_at: Utc::now(),
        };

        let state = self.state.clone();
        let delay = self.state.config().checkout_clear_delay;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = CartService::new(&state).clear() {
                tracing::error!(error = %e, "Failed to clear cart after payment");
            }
        });

        tracing::info!(
            order_id = %receipt.order_id,
            total = %receipt.summary.total,
            "Payment accepted"
        );

        Ok(PaymentOutcome {
            receipt,
            pending_clear: PendingClear { handle },
        })
    }
}
