//! Checkout flow.
//!
//! 1. Refuse an empty cart.
//! 2. Validate the customer form (every field required after trimming).
//! 3. Snapshot the cart into an [`Order`] and ask the payment gateway.
//! 4. On approval, append the order to history, then clear the cart.
//!
//! Nothing is written before the payment is approved, so a validation
//! failure, a declined payment or a gateway error leave cart and history
//! exactly as they were.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::instrument;

use tienda_core::{Customer, Email, EmailError, Order, OrderId, OrderIdGenerator, Price};

use crate::payment::{PaymentError, PaymentGateway};
use crate::services::cart::CartManager;
use crate::services::orders::OrderRepository;
use crate::storage::StorageError;

/// Customer form field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutField {
    Name,
    Email,
    Address,
}

impl std::fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Email => write!(f, "email"),
            Self::Address => write!(f, "address"),
        }
    }
}

/// Errors in the customer form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty after trimming.
    #[error("{0} is required")]
    Missing(CheckoutField),

    /// The email is present but not an address.
    #[error("invalid email: {0}")]
    InvalidEmail(EmailError),
}

/// Reasons a checkout did not complete.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to buy.
    #[error("the cart is empty")]
    EmptyCart,

    /// The customer form is incomplete or invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The payment processor refused the order.
    #[error("payment declined for order {0}")]
    PaymentDeclined(OrderId),

    /// No answer could be obtained from the payment processor.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The approved order could not be recorded.
    #[error("failed to record order: {0}")]
    Storage(#[from] StorageError),
}

impl CheckoutError {
    /// Whether the user can fix this and retry.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::EmptyCart | Self::Validation(_) | Self::PaymentDeclined(_) | Self::Payment(_)
        )
    }
}

/// Raw customer input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub address: String,
}

impl CheckoutForm {
    /// Trim and validate every field.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] in form order.
    pub fn validate(&self) -> Result<Customer, ValidationError> {
        let name = required(&self.name, CheckoutField::Name)?;
        let email = required(&self.email, CheckoutField::Email)?;
        let address = required(&self.address, CheckoutField::Address)?;
        let email = Email::parse(email).map_err(ValidationError::InvalidEmail)?;

        Ok(Customer {
            name: name.to_owned(),
            email,
            address: address.to_owned(),
        })
    }
}

fn required(value: &str, field: CheckoutField) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(trimmed)
    }
}

/// Summary reported to the user after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub total: Price,
    pub customer_name: String,
    /// False when the emptied cart could not be saved, so the stored cart
    /// still holds the lines just paid for.
    pub cart_cleared: bool,
}

/// Runs checkouts against a payment gateway.
#[derive(Debug)]
pub struct CheckoutService<P> {
    payment: P,
    timeout: Duration,
    ids: OrderIdGenerator,
}

impl<P: PaymentGateway> CheckoutService<P> {
    /// Create a checkout service.
    ///
    /// `ids` should be seeded from the existing history so ids stay unique
    /// across restarts.
    #[must_use]
    pub const fn new(payment: P, timeout: Duration, ids: OrderIdGenerator) -> Self {
        Self {
            payment,
            timeout,
            ids,
        }
    }

    /// Check out the current cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` when the cart is empty, the form is invalid,
    /// the payment is declined or fails, or the order cannot be recorded.
    /// In every case cart and history are unchanged.
    ///
    /// Once the order is recorded the in-memory cart is always emptied; a
    /// failure to save the empty cart is reported through
    /// [`CheckoutReceipt::cart_cleared`].
    #[instrument(skip_all, fields(items = cart.item_count()))]
    pub async fn checkout(
        &mut self,
        cart: &mut CartManager,
        orders: &mut OrderRepository,
        form: &CheckoutForm,
        now: DateTime<Utc>,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if cart.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let customer = form.validate()?;

        let order = Order::from_cart(self.ids.next(now), customer, cart.cart(), now);
        tracing::info!(order_id = %order.id(), total = %order.total(), "Submitting payment");

        let receipt = tokio::time::timeout(self.timeout, self.payment.approve(&order))
            .await
            .map_err(|_| PaymentError::Timeout(self.timeout))??;
        if receipt.order_id != *order.id() {
            return Err(PaymentError::Mismatch {
                expected: order.id().clone(),
                received: receipt.order_id,
            }
            .into());
        }
        if !receipt.status.is_approved() {
            tracing::warn!(order_id = %order.id(), "Payment declined");
            return Err(CheckoutError::PaymentDeclined(order.id().clone()));
        }

        let order_id = order.id().clone();
        let total = order.total();
        let customer_name = order.customer().name.clone();
        orders.append(order)?;

        // Paid and recorded: the checkout has succeeded from here on.
        let cart_cleared = match cart.discard() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    order_id = %order_id,
                    error = %e,
                    "Failed to clear saved cart after checkout"
                );
                false
            }
        };
        let summary = CheckoutReceipt {
            order_id,
            total,
            customer_name,
            cart_cleared,
        };

        tracing::info!(order_id = %summary.order_id, total = %summary.total, "Checkout complete");
        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::TimeZone;
    use tienda_core::{Catalog, PaymentStatus, Product, ProductId};

    use super::*;
    use crate::payment::{PaymentReceipt, SimulatedPayment};
    use crate::storage::{KeyValueStore, MemoryStore, SharedStore, keys};

    /// Store that can be told to reject writes to the cart key.
    #[derive(Default)]
    struct CartLockedStore {
        inner: MemoryStore,
        reject_cart: AtomicBool,
    }

    impl KeyValueStore for CartLockedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == keys::CART && self.reject_cart.load(Ordering::SeqCst) {
                return Err(StorageError::Io {
                    key: key.to_owned(),
                    source: std::io::Error::other("read-only"),
                });
            }
            self.inner.set(key, value)
        }
    }

    /// Gateway with a fixed misbehaviour.
    enum ScriptedPayment {
        Unavailable,
        WrongOrder,
    }

    impl PaymentGateway for ScriptedPayment {
        async fn approve(&self, _order: &Order) -> Result<PaymentReceipt, PaymentError> {
            match self {
                Self::Unavailable => Err(PaymentError::Unavailable(
                    "connection refused".to_string(),
                )),
                Self::WrongOrder => Ok(PaymentReceipt {
                    order_id: OrderId::from_millis(1),
                    status: PaymentStatus::Approved,
                }),
            }
        }
    }

    fn form(name: &str, email: &str, address: &str) -> CheckoutForm {
        CheckoutForm {
            name: name.to_string(),
            email: email.to_string(),
            address: address.to_string(),
        }
    }

    fn valid_form() -> CheckoutForm {
        form(" Ana ", "ana@example.com", "Av. Corrientes 1234")
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_717_000_000_000).unwrap()
    }

    fn setup() -> (CartManager, OrderRepository) {
        setup_with(Arc::new(MemoryStore::new()))
    }

    fn setup_with(store: SharedStore) -> (CartManager, OrderRepository) {
        let catalog = Catalog::new(vec![
            Product::new(ProductId::new(1), "Remera", Price::new(5000)),
            Product::new(ProductId::new(3), "Zapatillas", Price::new(25000)),
        ])
        .unwrap();
        let mut cart = CartManager::load(Arc::clone(&store));
        cart.add(ProductId::new(1), &catalog).unwrap();
        cart.add(ProductId::new(3), &catalog).unwrap();
        (cart, OrderRepository::load(store))
    }

    fn service(payment: SimulatedPayment) -> CheckoutService<SimulatedPayment> {
        CheckoutService::new(payment, Duration::from_secs(1), OrderIdGenerator::new())
    }

    #[test]
    fn test_validate_trims() {
        let customer = valid_form().validate().unwrap();
        assert_eq!(customer.name, "Ana");
        assert_eq!(customer.email.as_str(), "ana@example.com");
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        assert_eq!(
            form("  ", "", "").validate().unwrap_err(),
            ValidationError::Missing(CheckoutField::Name)
        );
        assert_eq!(
            form("Ana", "ana@example.com", "\t").validate().unwrap_err(),
            ValidationError::Missing(CheckoutField::Address)
        );
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        assert!(matches!(
            form("Ana", "ana.example.com", "Calle 1").validate(),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_successful_checkout() {
        let (mut cart, mut orders) = setup();
        let mut service = service(SimulatedPayment::approving(Duration::ZERO));

        let receipt = service
            .checkout(&mut cart, &mut orders, &valid_form(), now())
            .await
            .unwrap();

        assert_eq!(receipt.total, Price::new(30000));
        assert_eq!(receipt.order_id.as_str(), "PED-1717000000000");
        assert_eq!(receipt.customer_name, "Ana");
        assert!(receipt.cart_cleared);
        assert!(cart.cart().is_empty());
        assert_eq!(orders.history().len(), 1);
        assert_eq!(orders.last().unwrap().items().len(), 2);
    }

    #[tokio::test]
    async fn test_declined_payment_changes_nothing() {
        let (mut cart, mut orders) = setup();
        let before = cart.cart().clone();
        let mut service = service(SimulatedPayment::declining(Duration::ZERO));

        let err = service
            .checkout(&mut cart, &mut orders, &valid_form(), now())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PaymentDeclined(_)));
        assert_eq!(cart.cart(), &before);
        assert!(orders.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_timeout_changes_nothing() {
        let (mut cart, mut orders) = setup();
        let mut service = CheckoutService::new(
            SimulatedPayment::approving(Duration::from_secs(30)),
            Duration::from_secs(2),
            OrderIdGenerator::new(),
        );

        let err = service
            .checkout(&mut cart, &mut orders, &valid_form(), now())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Payment(PaymentError::Timeout(_))));
        assert_eq!(cart.item_count(), 2);
        assert!(orders.history().is_empty());
    }

    #[tokio::test]
    async fn test_paid_cart_is_not_charged_twice_when_save_fails() {
        let store = Arc::new(CartLockedStore::default());
        let (mut cart, mut orders) = setup_with(store.clone());
        store.reject_cart.store(true, Ordering::SeqCst);
        let mut service = service(SimulatedPayment::approving(Duration::ZERO));

        let receipt = service
            .checkout(&mut cart, &mut orders, &valid_form(), now())
            .await
            .unwrap();
        assert!(!receipt.cart_cleared);
        assert!(cart.cart().is_empty());
        assert_eq!(orders.history().len(), 1);

        let err = service
            .checkout(&mut cart, &mut orders, &valid_form(), now())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(orders.history().len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_gateway_changes_nothing() {
        let (mut cart, mut orders) = setup();
        let mut service = CheckoutService::new(
            ScriptedPayment::Unavailable,
            Duration::from_secs(1),
            OrderIdGenerator::new(),
        );

        let err = service
            .checkout(&mut cart, &mut orders, &valid_form(), now())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Payment(PaymentError::Unavailable(_))));
        assert!(err.is_user_facing());
        assert_eq!(cart.item_count(), 2);
        assert!(orders.history().is_empty());
    }

    #[tokio::test]
    async fn test_answer_for_another_order_is_rejected() {
        let (mut cart, mut orders) = setup();
        let mut service = CheckoutService::new(
            ScriptedPayment::WrongOrder,
            Duration::from_secs(1),
            OrderIdGenerator::new(),
        );

        let err = service
            .checkout(&mut cart, &mut orders, &valid_form(), now())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Payment(PaymentError::Mismatch { ref expected, .. })
                if expected.as_str() == "PED-1717000000000"
        ));
        assert_eq!(cart.item_count(), 2);
        assert!(orders.history().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_refused() {
        let store = Arc::new(MemoryStore::new());
        let mut cart = CartManager::load(store.clone());
        let mut orders = OrderRepository::load(store);
        let mut service = service(SimulatedPayment::approving(Duration::ZERO));

        let err = service
            .checkout(&mut cart, &mut orders, &valid_form(), now())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_same_millisecond_orders_get_distinct_ids() {
        let mut service = service(SimulatedPayment::approving(Duration::ZERO));
        let (mut cart, mut orders) = setup();
        let first = service
            .checkout(&mut cart, &mut orders, &valid_form(), now())
            .await
            .unwrap();

        let (mut cart, _) = setup();
        let second = service
            .checkout(&mut cart, &mut orders, &valid_form(), now())
            .await
            .unwrap();

        assert_ne!(first.order_id, second.order_id);
        assert_eq!(orders.history().len(), 2);
    }
}
