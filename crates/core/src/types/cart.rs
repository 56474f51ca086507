//! Cart value type and its pure transformations.
//!
//! Every mutation consumes a [`Cart`] and returns the next one. Nothing here
//! touches storage; pairing a mutation with persistence is the job of the
//! storefront's cart manager.
//!
//! # Invariants
//!
//! - every line has `quantity >= 1`; a line that would reach zero is removed
//! - at most one line per product id
//! - the total is always derived from the lines, never stored

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;
use super::product::{Catalog, Product};

/// Errors raised by cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// A line index that does not exist in the current cart.
    ///
    /// Callers must only pass indices taken from the cart they are mutating,
    /// so this always indicates a caller bug.
    #[error("cart line index {index} out of bounds (cart has {len} lines)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A restored line with a quantity of zero.
    #[error("cart line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),

    /// Two restored lines for the same product.
    #[error("duplicate cart line for product {0}")]
    DuplicateLine(ProductId),
}

/// One entry in the cart: a product snapshot and the quantity selected.
///
/// Name and price are copied from the catalog when the line is created, so
/// later catalog changes do not affect lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "precio")]
    pub price: Price,
    #[serde(alias = "cantidad")]
    pub quantity: u32,
}

impl CartLine {
    /// A new line holding one unit of `product`.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
        }
    }

    /// `price * quantity`.
    #[must_use]
    pub const fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Ordered cart lines, unique by product id.
///
/// Serializes as a plain JSON array of lines. Deserialization re-checks the
/// invariants and fails on zero quantities or duplicate ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from existing lines, checking the invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] or [`CartError::DuplicateLine`].
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(lines.len());
        for line in &lines {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(line.id));
            }
            if !seen.insert(line.id) {
                return Err(CartError::DuplicateLine(line.id));
            }
        }
        Ok(Self { lines })
    }

    /// Add one unit of `product_id`.
    ///
    /// An id missing from `catalog` leaves the cart unchanged: it can only
    /// come from a stale reference to a product that is no longer offered.
    #[must_use]
    pub fn add(mut self, product_id: ProductId, catalog: &Catalog) -> Self {
        let Some(product) = catalog.get(product_id) else {
            return self;
        };

        match self.lines.iter_mut().find(|line| line.id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::from_product(product)),
        }
        self
    }

    /// Add one unit to the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfBounds`] if there is no such line.
    pub fn increment(mut self, index: usize) -> Result<Self, CartError> {
        let line = self.line_mut(index)?;
        line.quantity = line.quantity.saturating_add(1);
        Ok(self)
    }

    /// Take one unit from the line at `index`, dropping the line at zero.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfBounds`] if there is no such line.
    pub fn decrement(mut self, index: usize) -> Result<Self, CartError> {
        let line = self.line_mut(index)?;
        line.quantity -= 1;
        if line.quantity == 0 {
            self.lines.remove(index);
        }
        Ok(self)
    }

    /// Remove the line at `index` whatever its quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfBounds`] if there is no such line.
    pub fn remove(mut self, index: usize) -> Result<Self, CartError> {
        self.check_index(index)?;
        self.lines.remove(index);
        Ok(self)
    }

    /// An empty cart.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn clear(self) -> Self {
        Self::new()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities over all lines (units, not lines).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CartLine> {
        self.lines.get(index)
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    const fn check_index(&self, index: usize) -> Result<(), CartError> {
        if index < self.lines.len() {
            Ok(())
        } else {
            Err(CartError::IndexOutOfBounds {
                index,
                len: self.lines.len(),
            })
        }
    }

    fn line_mut(&mut self, index: usize) -> Result<&mut CartLine, CartError> {
        let len = self.lines.len();
        self.lines
            .get_mut(index)
            .ok_or(CartError::IndexOutOfBounds { index, len })
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

/// A user action on the cart, decoupled from any UI event model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartCommand {
    Add(ProductId),
    Increment(usize),
    Decrement(usize),
    Remove(usize),
    Clear,
}

impl CartCommand {
    /// Apply this command to `cart`.
    ///
    /// # Errors
    ///
    /// Propagates [`CartError::IndexOutOfBounds`] from index-based commands.
    pub fn apply(self, cart: Cart, catalog: &Catalog) -> Result<Cart, CartError> {
        match self {
            Self::Add(id) => Ok(cart.add(id, catalog)),
            Self::Increment(index) => cart.increment(index),
            Self::Decrement(index) => cart.decrement(index),
            Self::Remove(index) => cart.remove(index),
            Self::Clear => Ok(cart.clear()),
        }
    }
}
