//! Integration tests for store resolution and template dispatch.

use askama::Template;
use axum::http::StatusCode;

use tienditas_core::TemplateId;
use tienditas_integration_tests::test_state;
use tienditas_server::routes::store::{render_not_found, render_store};

#[test]
fn test_seeded_store_dispatches_to_its_template() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let collection = state.committed();

    let record = collection.get("sachacacao").expect("seeded store");
    assert_eq!(record.template_id, TemplateId::Classic);

    let response = render_store("sachacacao", record, 0);
    assert_eq!(response.status(), StatusCode::OK);

    let modern = collection.get("cafedelvalle").expect("seeded store");
    assert_eq!(modern.template_id, TemplateId::Modern);
    let response = render_store("cafedelvalle", modern, 2);
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_unknown_store_renders_the_not_found_page() {
    let response = render_not_found("bodega-fantasma");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_both_templates_consume_the_same_view_contract() {
    use tienditas_server::routes::store::{
        ClassicStoreTemplate, ModernStoreTemplate, StorePageView, ProductView,
    };

    let view = StorePageView {
        store_id: "sachacacao".to_string(),
        name: "Sacha Cacao".to_string(),
        section_title: "Nuestros Chocolates".to_string(),
        hero_image_url: "https://example.com/hero.jpg".to_string(),
        hero_title: "El Sabor".to_string(),
        hero_subtitle: "De la Amazonía".to_string(),
        products: vec![ProductView {
            id: 1,
            name: "Tableta".to_string(),
            description: "70% cacao".to_string(),
            price: "S/ 15.00".to_string(),
            image: "https://example.com/tableta.jpg".to_string(),
        }],
        theme_style: "--theme-primary: #5D4037;".to_string(),
        primary_color: "#5D4037".to_string(),
        cart_count: 3,
    };

    let classic = ClassicStoreTemplate { view: view.clone() }
        .render()
        .expect("classic renders");
    let modern = ModernStoreTemplate { view }
        .render()
        .expect("modern renders");

    for html in [&classic, &modern] {
        assert!(html.contains("Sacha Cacao"));
        assert!(html.contains("Tableta"));
        assert!(html.contains("S/ 15.00"));
        assert!(html.contains("--theme-primary: #5D4037;"), "scoped theme vars");
        assert!(html.contains("/sachacacao/cart/add"));
        assert!(html.contains("/sachacacao/chat/stream"), "chat widget wired");
    }

    // Same contract, different composition.
    assert!(classic.contains("store-classic"));
    assert!(modern.contains("store-modern"));
}

#[test]
fn test_theme_vars_are_scoped_to_the_store_view() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let collection = state.committed();

    // Rendering two stores side by side keeps their variable scopes apart.
    let sacha = collection.get("sachacacao").expect("store");
    let cafe = collection.get("cafedelvalle").expect("store");

    let sacha_scope = tienditas_core::theme_style_scope(&sacha.theme);
    let cafe_scope = tienditas_core::theme_style_scope(&cafe.theme);

    assert!(sacha_scope.contains("--theme-primary: #5D4037;"));
    assert!(cafe_scope.contains("--theme-primary: #1a4a3c;"));
    assert_ne!(sacha_scope, cafe_scope);
}
