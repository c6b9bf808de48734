//! Integration tests for the order-message contract and the outbound deep
//! link. The message text is customer-visible and must stay byte-stable.

use rust_decimal::Decimal;

use tienditas_core::{Cart, Product, ProductId, order};
use tienditas_integration_tests::test_state;
use tienditas_server::routes::cart::whatsapp_link;

fn seeded_cart() -> Cart {
    let mut cart = Cart::new();
    cart.add_item(Product {
        id: ProductId::new(1),
        name: "Tableta de Chocolate 70%".to_string(),
        description: String::new(),
        price: Decimal::new(1500, 2),
        image: String::new(),
    });
    cart.add_item(Product {
        id: ProductId::new(2),
        name: "Chocotejas de Pecanas".to_string(),
        description: String::new(),
        price: Decimal::new(250, 2),
        image: String::new(),
    });
    cart.update_quantity(ProductId::new(1), 2);
    cart.update_quantity(ProductId::new(2), 3);
    cart
}

#[test]
fn test_order_total_matches_line_math() {
    let cart = seeded_cart();
    assert_eq!(cart.total(), Decimal::new(3750, 2));
    assert_eq!(order::format_amount(cart.total()), "37.50");
}

#[test]
fn test_message_contract_for_a_seeded_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let collection = state.committed();
    let record = collection.get("sachacacao").expect("store");

    let message = order::format_order_message(&seeded_cart(), &record.payment_info, &record.name);

    // Line order and wording are a contract surface.
    let lines: Vec<&str> = message.lines().collect();
    assert_eq!(
        lines.first().copied(),
        Some("¡Hola Sacha Cacao! 👋 Quisiera hacer el siguiente pedido:")
    );
    assert!(message.contains("- Tableta de Chocolate 70% (x2) - S/ 30.00\n"));
    assert!(message.contains("- Chocotejas de Pecanas (x3) - S/ 7.50\n"));
    assert!(message.contains("*Total a pagar: S/ 37.50*"));
    assert!(message.contains(
        "El pago lo realizaré a nombre de *Juanita Pérez* al Yape/Plin: *987 654 321*."
    ));
    assert!(message.ends_with("¡Muchas gracias! 😊"));
}

#[test]
fn test_deep_link_targets_the_store_number_with_encoded_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let collection = state.committed();
    let record = collection.get("sachacacao").expect("store");

    let link = whatsapp_link(&seeded_cart(), record);

    assert!(link.starts_with("https://wa.me/51987654321?text="));
    // "¡Hola" percent-encoded.
    assert!(link.contains("%C2%A1Hola"));
    // No raw spaces or newlines survive the encoding.
    assert!(!link.contains(' '));
    assert!(!link.contains('\n'));
}

#[test]
fn test_deep_link_is_deterministic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let collection = state.committed();
    let record = collection.get("sachacacao").expect("store");

    assert_eq!(
        whatsapp_link(&seeded_cart(), record),
        whatsapp_link(&seeded_cart(), record)
    );
}
