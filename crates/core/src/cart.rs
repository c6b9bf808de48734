//! The per-session order cart.
//!
//! One cart per storefront browsing session: empty → populated →
//! checkout-initiated → cleared. The cart lives in the visitor's session and
//! never persists across sessions. Totals accumulate exactly (Decimal);
//! rounding to two decimals happens only when an amount is formatted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// A product plus the quantity the visitor selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Line total: `price * quantity`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// An ordered accumulation of selected products.
///
/// Items keep their insertion order; incrementing an existing item's quantity
/// does not move it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all items (the badge count).
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its quantity incremented in place;
    /// a new product is appended with quantity 1.
    pub fn add_item(&mut self, product: Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                product,
                quantity: 1,
            });
        }
    }

    /// Set an item's quantity exactly; below 1 removes the item.
    ///
    /// Unknown ids are a no-op - the cart never invents an entry here.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) {
        if quantity < 1 {
            self.remove_item(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == id) {
            item.quantity = quantity;
        }
    }

    /// Remove an item; absent ids are a no-op.
    pub fn remove_item(&mut self, id: ProductId) {
        self.items.retain(|item| item.product.id != id);
    }

    /// Empty the cart (after checkout handoff).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Exact sum of line totals. Round only when formatting.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}
