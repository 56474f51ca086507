//! Tienda Core - Shared types library.
//!
//! This crate provides the domain types used across all Tienda components:
//! - `storefront` - Cart manager, checkout flow, storage and simulators
//! - `cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure transformations - no I/O, no
//! storage, no clocks. Cart mutations take a cart and return the next one;
//! persisting the result is the caller's job.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, emails, catalog, cart, orders, statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
