//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Redirect to the default store
//! GET  /health                    - Health check
//!
//! # Admin console (the only fixed routing branch)
//! GET  /admin                     - Configuration editor (?store= selects)
//! POST /admin/field               - Nested-path edit on the draft
//! POST /admin/products            - Create/update a product (draft)
//! POST /admin/products/delete     - Delete a product (draft)
//! POST /admin/save                - Commit the draft
//! POST /admin/stores              - Store-creation wizard
//! POST /admin/palette             - AI palette derivation (multipart logo)
//!
//! # Public storefront
//! GET  /{storeId}                 - Store page (template dispatch)
//!
//! # Cart (fragments)
//! GET  /{storeId}/cart            - Cart page
//! POST /{storeId}/cart/add        - Add item (returns count badge fragment)
//! POST /{storeId}/cart/update     - Set quantity (returns items fragment)
//! POST /{storeId}/cart/remove     - Remove item (returns items fragment)
//! POST /{storeId}/cart/clear      - Empty the cart
//! GET  /{storeId}/cart/count      - Count badge fragment
//! GET  /{storeId}/checkout        - WhatsApp handoff, clears the cart
//!
//! # Chat
//! GET  /{storeId}/chat            - Transcript fragment
//! POST /{storeId}/chat/stream     - Send a turn, reply streamed as SSE
//! ```

pub mod admin;
pub mod cart;
pub mod chat;
pub mod store;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the server.
///
/// `/admin` is registered before the `/{store_id}` capture; static segments
/// win, so the admin prefix is never shadowed by a store page.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Default store redirect
        .route("/", get(store::root))
        // Admin console
        .nest("/admin", admin::router())
        // Public store pages
        .route("/{store_id}", get(store::show))
        .nest("/{store_id}/cart", cart_routes())
        .route("/{store_id}/checkout", get(cart::checkout))
        // Chat widget
        .route("/{store_id}/chat", get(chat::transcript))
        .route("/{store_id}/chat/stream", post(chat::stream_turn))
}
