//! Tienda Storefront - Cart state, checkout and their collaborators.
//!
//! # Architecture
//!
//! - [`services::CartManager`] pairs every cart mutation with a write to the
//!   key-value store under `"carrito"`
//! - [`services::OrderRepository`] keeps the append-only history under `"pedidos"`
//! - [`services::CheckoutService`] validates the customer form, asks a
//!   [`payment::PaymentGateway`] and records the order
//! - [`catalog::CatalogSource`] supplies products once at startup
//! - [`state::Storefront`] owns one session's worth of the above
//!
//! Catalog and payment are simulated with timed delays; both sit behind
//! traits so tests run them with no delay.
//!
//! # Example
//!
//! ```rust,ignore
//! use tienda_storefront::{StorefrontConfig, Storefront};
//! use tienda_core::{CartCommand, ProductId};
//!
//! let config = StorefrontConfig::from_env()?;
//! let mut shop = Storefront::open_simulated(&config).await;
//! shop.execute(CartCommand::Add(ProductId::new(1)))?;
//! println!("{}", tienda_storefront::render::cart(shop.cart()));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod payment;
pub mod render;
pub mod services;
pub mod state;
pub mod storage;

pub use config::StorefrontConfig;
pub use error::{AppError, Result};
pub use state::Storefront;
