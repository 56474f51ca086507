//! Orders and the order history.
//!
//! An [`Order`] is a frozen snapshot of a cart at checkout time. Its total is
//! computed once, from the snapshot, and never recomputed.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{Cart, CartLine};
use super::email::Email;
use super::price::Price;

/// Prefix of every order id.
pub const ORDER_ID_PREFIX: &str = "PED-";

/// Order identifier of the form `PED-<milliseconds since epoch>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Build the id for a millisecond timestamp.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("{ORDER_ID_PREFIX}{millis}"))
    }

    /// The timestamp encoded in the id, if it has the expected shape.
    #[must_use]
    pub fn millis(&self) -> Option<i64> {
        self.0.strip_prefix(ORDER_ID_PREFIX)?.parse().ok()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues strictly increasing order ids.
///
/// Ids are millisecond timestamps; when the clock has not advanced past the
/// last issued value (two checkouts in the same millisecond, or a clock step
/// backwards) the generator uses the last value plus one.
#[derive(Debug, Clone, Default)]
pub struct OrderIdGenerator {
    last: Option<i64>,
}

impl OrderIdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// A generator that will never reissue an id already in `history`.
    #[must_use]
    pub fn seeded(history: &OrderHistory) -> Self {
        Self {
            last: history.iter().filter_map(|o| o.id().millis()).max(),
        }
    }

    /// Next id for an order created at `now`.
    pub fn next(&mut self, now: DateTime<Utc>) -> OrderId {
        let millis = now.timestamp_millis();
        let millis = match self.last {
            Some(last) if millis <= last => last.saturating_add(1),
            _ => millis,
        };
        self.last = Some(millis);
        OrderId::from_millis(millis)
    }
}

/// Customer details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(alias = "nombre")]
    pub name: String,
    pub email: Email,
    #[serde(alias = "direccion")]
    pub address: String,
}

/// An immutable record of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    #[serde(alias = "cliente")]
    customer: Customer,
    items: Vec<CartLine>,
    total: Price,
    #[serde(alias = "fecha")]
    created_at: DateTime<Utc>,
}

impl Order {
    /// Snapshot `cart` into a new order, freezing its total.
    #[must_use]
    pub fn from_cart(
        id: OrderId,
        customer: Customer,
        cart: &Cart,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer,
            items: cart.lines().to_vec(),
            total: cart.total(),
            created_at,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    #[must_use]
    pub const fn customer(&self) -> &Customer {
        &self.customer
    }

    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Total at creation time.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Append-only log of completed orders, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderHistory(Vec<Order>);

impl OrderHistory {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an order.
    pub fn push(&mut self, order: Order) {
        self.0.push(order);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.0.iter()
    }

    /// Most recent order.
    #[must_use]
    pub fn last(&self) -> Option<&Order> {
        self.0.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a OrderHistory {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
