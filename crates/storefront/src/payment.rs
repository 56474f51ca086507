//! Payment processing.
//!
//! There is no real gateway: [`SimulatedPayment`] answers after a fixed
//! delay standing in for network latency. Checkout only depends on the
//! [`PaymentGateway`] trait, so tests can use a zero delay.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use tienda_core::{Order, OrderId, PaymentStatus};

/// Errors that prevent a payment answer from being obtained.
///
/// A declined payment is an answer, not an error; see [`PaymentReceipt`].
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No answer within the allowed time.
    #[error("payment timed out after {0:?}")]
    Timeout(Duration),

    /// The processor could not be reached.
    #[error("payment processor unavailable: {0}")]
    Unavailable(String),

    /// The processor answered for a different order.
    #[error("payment answer for {received} does not match order {expected}")]
    Mismatch { expected: OrderId, received: OrderId },
}

/// Answer from a payment processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub order_id: OrderId,
    pub status: PaymentStatus,
}

/// Something that can approve or decline an order.
pub trait PaymentGateway: Send + Sync {
    /// Ask for approval of `order`.
    fn approve(
        &self,
        order: &Order,
    ) -> impl Future<Output = Result<PaymentReceipt, PaymentError>> + Send;
}

/// Payment processor that answers with a fixed outcome after `delay`.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedPayment {
    delay: Duration,
    outcome: PaymentStatus,
}

impl SimulatedPayment {
    /// Approves every order after `delay`.
    #[must_use]
    pub const fn approving(delay: Duration) -> Self {
        Self {
            delay,
            outcome: PaymentStatus::Approved,
        }
    }

    /// Declines every order after `delay`.
    #[must_use]
    pub const fn declining(delay: Duration) -> Self {
        Self {
            delay,
            outcome: PaymentStatus::Declined,
        }
    }
}

impl PaymentGateway for SimulatedPayment {
    async fn approve(&self, order: &Order) -> Result<PaymentReceipt, PaymentError> {
        tracing::debug!(order_id = %order.id(), delay = ?self.delay, "Simulating payment");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(PaymentReceipt {
            order_id: order.id().clone(),
            status: self.outcome,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use tienda_core::{Cart, Customer, Email};

    use super::*;

    fn order() -> Order {
        Order::from_cart(
            OrderId::from_millis(10),
            Customer {
                name: "Ana".to_string(),
                email: Email::parse("ana@example.com").unwrap(),
                address: "Calle 1".to_string(),
            },
            &Cart::new(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_approving() {
        let receipt = SimulatedPayment::approving(Duration::ZERO)
            .approve(&order())
            .await
            .unwrap();
        assert_eq!(receipt.order_id, OrderId::from_millis(10));
        assert_eq!(receipt.status, PaymentStatus::Approved);
    }

    #[tokio::test]
    async fn test_declining() {
        let receipt = SimulatedPayment::declining(Duration::ZERO)
            .approve(&order())
            .await
            .unwrap();
        assert_eq!(receipt.status, PaymentStatus::Declined);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_delay() {
        let payment = SimulatedPayment::approving(Duration::from_millis(800));
        let order = order();
        let started = tokio::time::Instant::now();
        payment.approve(&order).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
