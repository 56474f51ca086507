//! Plain-text rendering of catalog, cart and orders.
//!
//! Amounts are formatted the way the store's locale (es-AR, pesos) shows
//! them: currency symbol, a space, `.` as thousands separator and no
//! decimals.

use tienda_core::{Cart, Catalog, OrderHistory, Price};

use crate::services::CheckoutReceipt;

/// Format an amount, e.g. `$ 37.000`.
#[must_use]
pub fn format_price(price: Price) -> String {
    let digits = price.amount().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("$ {grouped}")
}

/// Catalog listing with the id to use for `add`.
#[must_use]
pub fn catalog(catalog: &Catalog) -> String {
    if catalog.is_empty() {
        return "No products available.".to_string();
    }
    catalog
        .products()
        .iter()
        .map(|p| format!("[{}] {:<12} {}", p.id, p.name, format_price(p.price)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cart lines with the index to use for `inc`/`dec`/`remove`, then totals.
#[must_use]
pub fn cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "The cart is empty.".to_string();
    }
    let mut lines: Vec<String> = cart
        .lines()
        .iter()
        .enumerate()
        .map(|(index, line)| {
            format!(
                "{index}. {:<12} {} x {} = {}",
                line.name,
                format_price(line.price),
                line.quantity,
                format_price(line.subtotal()),
            )
        })
        .collect();
    lines.push(format!("Total: {}", format_price(cart.total())));
    lines.push(format!("Items: {}", cart.item_count()));
    lines.join("\n")
}

/// Item-count badge.
#[must_use]
pub fn cart_badge(cart: &Cart) -> String {
    format!("Cart ({})", cart.item_count())
}

/// Completed orders, oldest first.
#[must_use]
pub fn orders(history: &OrderHistory) -> String {
    if history.is_empty() {
        return "No orders yet.".to_string();
    }
    history
        .iter()
        .map(|order| {
            let units: u64 = order.items().iter().map(|l| u64::from(l.quantity)).sum();
            format!(
                "{} {} {} <{}> {} ({units} items)",
                order.id(),
                order.created_at().format("%Y-%m-%d %H:%M"),
                order.customer().name,
                order.customer().email,
                format_price(order.total()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Confirmation shown after a successful checkout.
#[must_use]
pub fn receipt(receipt: &CheckoutReceipt) -> String {
    let mut text = format!(
        "Payment approved. Order: {}\nTotal: {}\nThanks for your purchase, {}!",
        receipt.order_id,
        format_price(receipt.total),
        receipt.customer_name,
    );
    if !receipt.cart_cleared {
        text.push_str(
            "\nWarning: the saved cart could not be emptied. \
             Run `clear` before buying again so the same items are not paid twice.",
        );
    }
    text
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tienda_core::{OrderId, Product, ProductId};

    use super::*;

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(Price::ZERO), "$ 0");
        assert_eq!(format_price(Price::new(999)), "$ 999");
        assert_eq!(format_price(Price::new(5000)), "$ 5.000");
        assert_eq!(format_price(Price::new(37000)), "$ 37.000");
        assert_eq!(format_price(Price::new(1_234_567)), "$ 1.234.567");
    }

    #[test]
    fn test_empty_views() {
        assert_eq!(catalog(&Catalog::empty()), "No products available.");
        assert_eq!(cart(&Cart::new()), "The cart is empty.");
        assert_eq!(orders(&OrderHistory::new()), "No orders yet.");
        assert_eq!(cart_badge(&Cart::new()), "Cart (0)");
    }

    #[test]
    fn test_cart_view_shows_subtotals_and_totals() {
        let products = Catalog::new(vec![Product::new(
            ProductId::new(2),
            "Pantalón",
            Price::new(12000),
        )])
        .unwrap();
        let c = Cart::new()
            .add(ProductId::new(2), &products)
            .add(ProductId::new(2), &products);
        let view = cart(&c);
        assert!(view.starts_with("0. Pantalón"));
        assert!(view.contains("$ 12.000 x 2 = $ 24.000"));
        assert!(view.contains("Total: $ 24.000"));
        assert!(view.ends_with("Items: 2"));
    }

    fn paid(cart_cleared: bool) -> CheckoutReceipt {
        CheckoutReceipt {
            order_id: OrderId::from_millis(5),
            total: Price::new(37000),
            customer_name: "Ana".to_string(),
            cart_cleared,
        }
    }

    #[test]
    fn test_receipt() {
        assert_eq!(
            receipt(&paid(true)),
            "Payment approved. Order: PED-5\nTotal: $ 37.000\nThanks for your purchase, Ana!"
        );
    }

    #[test]
    fn test_receipt_warns_when_saved_cart_is_stale() {
        let text = receipt(&paid(false));
        assert!(text.starts_with("Payment approved. Order: PED-5"));
        assert!(text.contains("saved cart could not be emptied"));
    }
}
