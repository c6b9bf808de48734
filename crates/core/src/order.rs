//! The order-summary message contract.
//!
//! The text produced here is what the customer's messaging app opens with, so
//! line order and wording are a stable external contract. Amounts are
//! rounded to two decimals here, at formatting time.

use rust_decimal::Decimal;

use crate::cart::Cart;
use crate::types::PaymentInfo;

/// Format a money amount the way every customer-visible surface does.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Build the order-summary message for the WhatsApp handoff.
///
/// Greeting with the store name, one line per cart item in insertion order,
/// the total, the payment beneficiary, and a closing. The caller
/// percent-encodes this into the deep link.
#[must_use]
pub fn format_order_message(cart: &Cart, payment: &PaymentInfo, store_name: &str) -> String {
    let mut message = format!("¡Hola {store_name}! 👋 Quisiera hacer el siguiente pedido:\n\n");
    for item in cart.items() {
        message.push_str(&format!(
            "- {} (x{}) - S/ {}\n",
            item.product.name,
            item.quantity,
            format_amount(item.line_total())
        ));
    }
    message.push_str(&format!(
        "\n*Total a pagar: S/ {}*",
        format_amount(cart.total())
    ));
    message.push_str(&format!(
        "\n\nEl pago lo realizaré a nombre de *{}* al Yape/Plin: *{}*.",
        payment.name, payment.phone
    ));
    message.push_str("\n\n¡Muchas gracias! 😊");
    message
}
