//! Shopping cart logic.
//!
//! [`Cart`] is pure in-memory state: it knows nothing about storage. The
//! cart service wraps it with persistence and catalog lookups.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use myshop_core::{Price, ProductId};

use super::product::Product;

/// One cart line: a snapshot of the product taken when it was first added,
/// plus a quantity.
///
/// Serialized flat, so a stored entry is a product record with an extra
/// `quantity` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Product snapshot.
    #[serde(flatten)]
    pub product: Product,
    /// Units in the cart, always at least 1 once inside a [`Cart`].
    #[serde(default)]
    pub quantity: u32,
}

impl CartEntry {
    /// Product ID of this line.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Outcome of [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The entry now holds this quantity.
    Set(u32),
    /// The requested quantity was below 1, so the entry was dropped.
    Removed,
    /// No entry for the product; nothing changed.
    Missing,
}

/// Free-shipping rule applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Subtotals strictly above this ship free.
    pub free_threshold: Price,
    /// Fee charged otherwise.
    pub flat_fee: Price,
}

impl ShippingPolicy {
    /// Shipping charged for `subtotal`.
    ///
    /// An empty cart (subtotal 0) still reports the flat fee.
    #[must_use]
    pub fn shipping(&self, subtotal: Price) -> Price {
        if subtotal.exceeds(self.free_threshold) {
            Price::ZERO
        } else {
            self.flat_fee
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: Price::from_dollars(100),
            flat_fee: Price::from_dollars(15),
        }
    }
}

/// Cart totals as shown on the cart page and the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Sum of line totals.
    pub subtotal: Price,
    /// Shipping for the subtotal.
    pub shipping: Price,
    /// Subtotal plus shipping.
    pub total: Price,
    /// Sum of quantities (the header badge count).
    pub item_count: u64,
}

/// Ordered cart lines, at most one per product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild a cart from stored entries.
    ///
    /// Stored quantities of 0 (or missing) count as 1. Duplicate product ids
    /// are merged into the first occurrence.
    #[must_use]
    pub fn from_entries(stored: Vec<CartEntry>) -> Self {
        let mut cart = Self::new();
        for mut entry in stored {
            entry.quantity = entry.quantity.max(1);
            match cart.entry_mut(entry.id()) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(entry.quantity);
                }
                None => cart.entries.push(entry),
            }
        }
        cart
    }

    fn entry_mut(&mut self, id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|entry| entry.id() == id)
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing line keeps its first snapshot and gains the quantity.
    /// Returns a copy of the resulting line.
    pub fn add(&mut self, product: &Product, quantity: NonZeroU32) -> CartEntry {
        if let Some(entry) = self.entry_mut(product.id) {
            entry.quantity = entry.quantity.saturating_add(quantity.get());
            return entry.clone();
        }

        let entry = CartEntry {
            product: product.clone(),
            quantity: quantity.get(),
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Remove the line for `id`, returning it if it existed.
    pub fn remove(&mut self, id: ProductId) -> Option<CartEntry> {
        let index = self.entries.iter().position(|entry| entry.id() == id)?;
        Some(self.entries.remove(index))
    }

    /// Set the quantity for `id`.
    ///
    /// Anything below 1 removes the line. Quantities beyond `u32::MAX` are
    /// clamped.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> QuantityUpdate {
        if quantity < 1 {
            return match self.remove(id) {
                Some(_) => QuantityUpdate::Removed,
                None => QuantityUpdate::Missing,
            };
        }

        let Some(entry) = self.entry_mut(id) else {
            return QuantityUpdate::Missing;
        };
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        entry.quantity = quantity;
        QuantityUpdate::Set(quantity)
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity))
            .sum()
    }

    /// Subtotal, shipping and total under `policy`.
    #[must_use]
    pub fn summary(&self, policy: &ShippingPolicy) -> CartSummary {
        let subtotal = self.subtotal();
        let shipping = policy.shipping(subtotal);
        CartSummary {
            subtotal,
            shipping,
            total: subtotal + shipping,
            item_count: self.item_count(),
        }
    }
}
