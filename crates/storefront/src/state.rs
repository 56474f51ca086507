//! Storefront session state.
//!
//! A [`Storefront`] owns everything one shopping session needs: the catalog
//! fetched at startup, the cart manager, the order history and the checkout
//! service. There is no global state; front ends hold a `Storefront` and
//! call its methods.

use std::sync::Arc;

use chrono::Utc;

use tienda_core::{Cart, CartCommand, Catalog, OrderHistory, OrderIdGenerator};

use crate::catalog::{CatalogSource, SimulatedCatalog, load_catalog};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::payment::{PaymentGateway, SimulatedPayment};
use crate::services::{
    CartManager, CheckoutError, CheckoutForm, CheckoutReceipt, CheckoutService, OrderRepository,
};
use crate::storage::{FileStore, SharedStore};

/// One shopping session.
#[derive(Debug)]
pub struct Storefront<P> {
    catalog: Catalog,
    cart: CartManager,
    orders: OrderRepository,
    checkout: CheckoutService<P>,
}

impl<P: PaymentGateway> Storefront<P> {
    /// Open a session: restore cart and history from `store`, fetch the
    /// catalog from `source`.
    pub async fn open<C: CatalogSource>(
        config: &StorefrontConfig,
        store: SharedStore,
        source: &C,
        payment: P,
    ) -> Self {
        let cart = CartManager::load(Arc::clone(&store));
        let orders = OrderRepository::load(store);
        let ids = OrderIdGenerator::seeded(orders.history());
        let checkout = CheckoutService::new(payment, config.payment.timeout, ids);
        let catalog = load_catalog(source, &config.catalog).await;

        Self {
            catalog,
            cart,
            orders,
            checkout,
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        self.cart.cart()
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderHistory {
        self.orders.history()
    }

    /// Apply a cart command against the session catalog and persist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cart` for an index not in the current cart, or
    /// `AppError::Storage` if the cart cannot be persisted.
    pub fn execute(&mut self, command: CartCommand) -> Result<()> {
        self.cart.execute(command, &self.catalog)
    }

    /// Check out the current cart.
    ///
    /// # Errors
    ///
    /// See [`CheckoutService::checkout`].
    pub async fn checkout(
        &mut self,
        form: &CheckoutForm,
    ) -> std::result::Result<CheckoutReceipt, CheckoutError> {
        self.checkout
            .checkout(&mut self.cart, &mut self.orders, form, Utc::now())
            .await
    }
}

impl Storefront<SimulatedPayment> {
    /// Open a session backed by the data directory and the simulators
    /// described by `config`.
    pub async fn open_simulated(config: &StorefrontConfig) -> Self {
        let store: SharedStore = Arc::new(FileStore::new(&config.data_dir));
        let source = SimulatedCatalog::demo(config.catalog.delay);
        let payment = if config.payment.decline {
            SimulatedPayment::declining(config.payment.delay)
        } else {
            SimulatedPayment::approving(config.payment.delay)
        };
        tracing::debug!(data_dir = %config.data_dir.display(), "Opening storefront");
        Self::open(config, store, &source, payment).await
    }
}
