//! Core types for Tienda.
//!
//! This module provides the domain values shared by the storefront and CLI.

pub mod cart;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use cart::{Cart, CartCommand, CartError, CartLine};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{Customer, ORDER_ID_PREFIX, Order, OrderHistory, OrderId, OrderIdGenerator};
pub use price::Price;
pub use product::{Catalog, CatalogViolation, Product};
pub use status::PaymentStatus;
