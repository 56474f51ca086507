//! Integration tests for Tienda.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tienda-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Invariants of the cart transformations and persistence
//! - `checkout_scenarios` - End-to-end sessions through `Storefront`
//!
//! This module holds the fixtures both share.

use std::sync::Arc;
use std::time::Duration;

use tienda_core::{Cart, CartLine, Catalog, Price, ProductId};
use tienda_storefront::catalog::{SimulatedCatalog, demo_products};
use tienda_storefront::config::{CatalogConfig, PaymentConfig};
use tienda_storefront::payment::SimulatedPayment;
use tienda_storefront::services::CheckoutForm;
use tienda_storefront::storage::SharedStore;
use tienda_storefront::{Storefront, StorefrontConfig};

/// The demo catalog.
///
/// # Panics
///
/// Never: the demo products have unique positive ids.
#[must_use]
#[allow(clippy::expect_used)]
pub fn demo_catalog() -> Catalog {
    Catalog::new(demo_products()).expect("demo catalog is valid")
}

/// Configuration with no simulated latency.
#[must_use]
pub fn instant_config() -> StorefrontConfig {
    StorefrontConfig {
        data_dir: "unused".into(),
        catalog: CatalogConfig {
            delay: Duration::ZERO,
            timeout: Duration::from_secs(1),
            attempts: 1,
        },
        payment: PaymentConfig {
            delay: Duration::ZERO,
            timeout: Duration::from_secs(1),
            decline: false,
        },
    }
}

/// Open a session over `store` with instant simulators.
pub async fn open_shop(store: SharedStore, payment: SimulatedPayment) -> Storefront<SimulatedPayment> {
    Storefront::open(
        &instant_config(),
        store,
        &SimulatedCatalog::demo(Duration::ZERO),
        payment,
    )
    .await
}

/// Approving payment with no delay.
#[must_use]
pub const fn approving() -> SimulatedPayment {
    SimulatedPayment::approving(Duration::ZERO)
}

/// Declining payment with no delay.
#[must_use]
pub const fn declining() -> SimulatedPayment {
    SimulatedPayment::declining(Duration::ZERO)
}

/// A fresh in-memory store.
#[must_use]
pub fn memory_store() -> SharedStore {
    Arc::new(tienda_storefront::storage::MemoryStore::new())
}

/// A checkout form with every field filled.
#[must_use]
pub fn valid_form() -> CheckoutForm {
    CheckoutForm {
        name: "Ana Pérez".to_string(),
        email: "ana@example.com".to_string(),
        address: "Av. Corrientes 1234, CABA".to_string(),
    }
}

/// Deterministic set of carts covering empty, single-line, merged and
/// multi-line shapes.
///
/// # Panics
///
/// Never: generated lines have unique ids and positive quantities.
#[must_use]
#[allow(clippy::expect_used)]
pub fn sample_carts() -> Vec<Cart> {
    let mut carts = vec![Cart::new()];
    for lines in 1..=4_u32 {
        for base_quantity in [1_u32, 2, 5] {
            let cart_lines = (1..=lines)
                .map(|id| CartLine {
                    id: ProductId::new(id),
                    name: format!("Producto {id}"),
                    price: Price::new(u64::from(id) * 1_000 + 500),
                    quantity: base_quantity + id - 1,
                })
                .collect();
            carts.push(Cart::from_lines(cart_lines).expect("generated cart is valid"));
        }
    }
    carts
}
