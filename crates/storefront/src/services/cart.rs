//! Cart state manager.
//!
//! Owns the authoritative [`Cart`] for the session and keeps it in step with
//! the store. Every mutation computes the next cart, writes it under
//! [`keys::CART`], and only then replaces the in-memory value. A failed write
//! leaves both memory and storage at the previous state.

use tracing::instrument;

use tienda_core::{Cart, CartCommand, Catalog, Price, ProductId};

use crate::error::Result;
use crate::storage::{SharedStore, StorageError, keys, read_json, write_json};

/// Stateful wrapper pairing cart mutations with persistence.
pub struct CartManager {
    store: SharedStore,
    cart: Cart,
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl CartManager {
    /// Restore the cart from `store`.
    ///
    /// A missing or malformed value yields an empty cart.
    #[instrument(skip(store))]
    pub fn load(store: SharedStore) -> Self {
        let cart: Cart = read_json(store.as_ref(), keys::CART).unwrap_or_default();
        tracing::debug!(lines = cart.len(), items = cart.item_count(), "Cart loaded");
        Self { store, cart }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Sum of `price * quantity` over the current cart.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Number of units in the current cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Add one unit of a catalog product.
    ///
    /// Unknown ids are ignored and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart cannot be persisted.
    #[instrument(skip(self, catalog))]
    pub fn add(&mut self, product_id: ProductId, catalog: &Catalog) -> Result<()> {
        self.execute(CartCommand::Add(product_id), catalog)
    }

    /// Add one unit to the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cart` for an out-of-bounds index, or
    /// `AppError::Storage` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn increment(&mut self, index: usize) -> Result<()> {
        let next = self.cart.clone().increment(index)?;
        Ok(self.commit(next)?)
    }

    /// Take one unit from the line at `index`, removing the line at zero.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cart` for an out-of-bounds index, or
    /// `AppError::Storage` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn decrement(&mut self, index: usize) -> Result<()> {
        let next = self.cart.clone().decrement(index)?;
        Ok(self.commit(next)?)
    }

    /// Remove the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cart` for an out-of-bounds index, or
    /// `AppError::Storage` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove(&mut self, index: usize) -> Result<()> {
        let next = self.cart.clone().remove(index)?;
        Ok(self.commit(next)?)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<()> {
        Ok(self.commit(Cart::new())?)
    }

    /// Empty the in-memory cart, then write the empty cart.
    ///
    /// Unlike [`clear`](Self::clear), memory is emptied even if the write
    /// fails. Used once the cart's contents have been paid for.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the empty cart cannot be written; the
    /// stored cart then still holds the previous lines.
    #[instrument(skip(self))]
    pub fn discard(&mut self) -> std::result::Result<(), StorageError> {
        self.cart = Cart::new();
        self.persist()
    }

    /// Apply a command and persist the result.
    ///
    /// A command that leaves the cart unchanged (an unknown product id) is
    /// not written.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cart` for an out-of-bounds index, or
    /// `AppError::Storage` if the cart cannot be persisted.
    pub fn execute(&mut self, command: CartCommand, catalog: &Catalog) -> Result<()> {
        let next = command.apply(self.cart.clone(), catalog)?;
        if next == self.cart {
            tracing::debug!(?command, "Command left cart unchanged");
            return Ok(());
        }
        Ok(self.commit(next)?)
    }

    /// Write the current cart to the store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub fn persist(&self) -> std::result::Result<(), StorageError> {
        write_json(self.store.as_ref(), keys::CART, &self.cart)
    }

    fn commit(&mut self, next: Cart) -> std::result::Result<(), StorageError> {
        write_json(self.store.as_ref(), keys::CART, &next)?;
        self.cart = next;
        tracing::debug!(
            lines = self.cart.len(),
            items = self.cart.item_count(),
            total = %self.cart.total(),
            "Cart updated"
        );
        Ok(())
    }
}
