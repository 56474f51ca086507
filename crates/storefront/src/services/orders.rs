//! Order history repository.
//!
//! The history is append-only and stored as a single JSON array under
//! [`keys::ORDERS`]. Appends write the extended history first and update
//! memory only after the write succeeds.

use tracing::instrument;

use tienda_core::{Order, OrderHistory};

use crate::storage::{SharedStore, StorageError, keys, read_json, write_json};

/// Repository for completed orders.
pub struct OrderRepository {
    store: SharedStore,
    history: OrderHistory,
}

impl std::fmt::Debug for OrderRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderRepository")
            .field("orders", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl OrderRepository {
    /// Restore the history from `store`. Missing or malformed → empty.
    #[instrument(skip(store))]
    pub fn load(store: SharedStore) -> Self {
        let history: OrderHistory = read_json(store.as_ref(), keys::ORDERS).unwrap_or_default();
        tracing::debug!(orders = history.len(), "Order history loaded");
        Self { store, history }
    }

    #[must_use]
    pub const fn history(&self) -> &OrderHistory {
        &self.history
    }

    /// Most recent order, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Order> {
        self.history.last()
    }

    /// Append and persist an order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be written; the
    /// in-memory history is left unchanged.
    #[instrument(skip(self, order), fields(order_id = %order.id()))]
    pub fn append(&mut self, order: Order) -> Result<(), StorageError> {
        let mut next = self.history.clone();
        next.push(order);
        write_json(self.store.as_ref(), keys::ORDERS, &next)?;
        self.history = next;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use tienda_core::{Cart, Customer, Email, OrderId};

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn order(millis: i64) -> Order {
        Order::from_cart(
            OrderId::from_millis(millis),
            Customer {
                name: "Ana".to_string(),
                email: Email::parse("ana@example.com").unwrap(),
                address: "Calle 1".to_string(),
            },
            &Cart::new(),
            Utc.timestamp_millis_opt(millis).unwrap(),
        )
    }

    #[test]
    fn test_append_persists_in_order() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = OrderRepository::load(store.clone());
        repo.append(order(1)).unwrap();
        repo.append(order(2)).unwrap();

        let reloaded = OrderRepository::load(store);
        let ids: Vec<String> = reloaded
            .history()
            .iter()
            .map(|o| o.id().to_string())
            .collect();
        assert_eq!(ids, vec!["PED-1", "PED-2"]);
        assert_eq!(reloaded.last().unwrap().id(), &OrderId::from_millis(2));
    }

    #[test]
    fn test_malformed_history_is_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::ORDERS, "[{\"id\": 5}]").unwrap();
        let repo = OrderRepository::load(store);
        assert!(repo.history().is_empty());
    }
}
