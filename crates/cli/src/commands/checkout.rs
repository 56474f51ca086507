//! Checkout and order history commands.
//!
//! # Usage
//!
//! ```bash
//! tienda checkout --name "Ana" --email ana@example.com --address "Av. Corrientes 1234"
//! tienda orders
//! ```

use tienda_storefront::payment::PaymentGateway;
use tienda_storefront::services::{CheckoutError, CheckoutForm, ValidationError};
use tienda_storefront::{Storefront, render};

use super::print;

/// Check out the current cart.
///
/// User-correctable failures (empty cart, missing field, declined payment)
/// are reported on stdout and leave the cart as it was; anything else is
/// returned as an error.
pub async fn run<P: PaymentGateway>(
    shop: &mut Storefront<P>,
    form: CheckoutForm,
) -> Result<(), Box<dyn std::error::Error>> {
    match shop.checkout(&form).await {
        Ok(receipt) => print(&render::receipt(&receipt))?,
        Err(CheckoutError::EmptyCart) => {
            print("The cart is empty. Add products before checking out.")?;
        }
        Err(CheckoutError::Validation(e)) => print(&validation_message(&e))?,
        Err(e) if e.is_user_facing() => {
            tracing::warn!(error = %e, "Payment failed");
            print("There was an error processing the payment. Please try again.")?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::Missing(field) => {
            format!("Please complete every field: {field} is required.")
        }
        ValidationError::InvalidEmail(e) => {
            format!("Please enter a valid email address ({e}).")
        }
    }
}

/// Show the order history.
pub fn history<P: PaymentGateway>(shop: &Storefront<P>) -> std::io::Result<()> {
    print(&render::orders(shop.orders()))
}
