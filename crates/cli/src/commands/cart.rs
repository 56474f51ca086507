//! Catalog and cart commands.
//!
//! # Usage
//!
//! ```bash
//! tienda catalog          # list products with their ids
//! tienda add 1            # add one unit of product 1
//! tienda cart             # show lines with their indices
//! tienda inc 0            # one more of line 0
//! tienda dec 0            # one less of line 0 (removes it at zero)
//! tienda remove 0         # drop line 0
//! tienda clear --yes      # empty the cart
//! ```

use std::io::BufRead;

use tienda_core::CartCommand;
use tienda_storefront::payment::PaymentGateway;
use tienda_storefront::{Storefront, render};

use super::print;

/// Show the catalog.
pub fn catalog<P: PaymentGateway>(shop: &Storefront<P>) -> std::io::Result<()> {
    print(&render::catalog(shop.catalog()))
}

/// Show the cart with its item-count badge.
pub fn show<P: PaymentGateway>(shop: &Storefront<P>) -> std::io::Result<()> {
    print(&render::cart_badge(shop.cart()))?;
    print(&render::cart(shop.cart()))
}

/// Run a cart command, then show the resulting cart.
///
/// # Errors
///
/// Returns an error for an index not in the cart or a failed write.
pub fn apply<P: PaymentGateway>(
    shop: &mut Storefront<P>,
    command: CartCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    if matches!(command, CartCommand::Add(id) if shop.catalog().get(id).is_none()) {
        tracing::warn!(?command, "Unknown product, nothing added");
    }
    shop.execute(command)?;
    show(shop)?;
    Ok(())
}

/// Empty the cart after confirmation.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the write fails.
pub fn clear<P: PaymentGateway>(
    shop: &mut Storefront<P>,
    assume_yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if shop.cart().is_empty() {
        return Ok(print(&render::cart(shop.cart()))?);
    }
    if !assume_yes && !confirm("Empty the cart? [y/N] ")? {
        print("Cart left unchanged.")?;
        return Ok(());
    }
    apply(shop, CartCommand::Clear)
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    use std::io::Write;

    let mut out = std::io::stdout().lock();
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
