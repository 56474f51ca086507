//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Cart state manager (mutations paired with persistence)
//! - `orders` - Append-only order history
//! - `checkout` - Form validation, payment, order recording

pub mod cart;
pub mod checkout;
pub mod orders;

pub use cart::CartManager;
pub use checkout::{
    CheckoutError, CheckoutField, CheckoutForm, CheckoutReceipt, CheckoutService, ValidationError,
};
pub use orders::OrderRepository;
