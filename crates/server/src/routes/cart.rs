//! Cart route handlers.
//!
//! Cart operations return fragments for dynamic updates without full page
//! reloads. The cart itself lives in the visitor's session, one per store,
//! and never persists beyond the browsing session. Checkout builds the
//! WhatsApp deep link from the order-message contract and clears the cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tienditas_core::{Cart, ProductId, StoreRecord, order, theme_style_scope};

use crate::error::{AppError, Result};
use crate::filters;
use crate::session_keys;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: u64,
    pub name: String,
    pub quantity: u32,
    /// Formatted line total, without currency prefix.
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub store_id: String,
    pub items: Vec<CartItemView>,
    /// Formatted total, without currency prefix.
    pub total: String,
    pub payment_phone: String,
    pub payment_name: String,
    /// The outbound messaging deep link carrying the order summary.
    pub whatsapp_link: String,
}

impl CartView {
    fn build(cart: &Cart, store_id: &str, record: &StoreRecord) -> Self {
        Self {
            store_id: store_id.to_string(),
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    id: item.product.id.as_u64(),
                    name: item.product.name.clone(),
                    quantity: item.quantity,
                    line_total: order::format_amount(item.line_total()),
                })
                .collect(),
            total: order::format_amount(cart.total()),
            payment_phone: record.payment_info.phone.clone(),
            payment_name: record.payment_info.name.clone(),
            whatsapp_link: whatsapp_link(cart, record),
        }
    }
}

/// Build the `wa.me` deep link with the percent-encoded order message.
#[must_use]
pub fn whatsapp_link(cart: &Cart, record: &StoreRecord) -> String {
    let message = order::format_order_message(cart, &record.payment_info, &record.name);
    format!(
        "https://wa.me/{}?text={}",
        record.payment_info.whatsapp,
        urlencoding::encode(&message)
    )
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the store's cart from the session (empty when absent or unreadable).
pub async fn load_cart(session: &Session, store_id: &str) -> Cart {
    session
        .get::<Cart>(&session_keys::cart(store_id))
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Put the store's cart back into the session.
async fn save_cart(session: &Session, store_id: &str, cart: &Cart) -> Result<()> {
    session.insert(&session_keys::cart(store_id), cart).await?;
    Ok(())
}

fn resolve_record(state: &AppState, store_id: &str) -> Result<StoreRecord> {
    state
        .committed()
        .get(store_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("store '{store_id}'")))
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: u64,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: u64,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: u64,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub store_name: String,
    pub theme_style: String,
    pub cart: CartView,
}

/// Cart items fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
) -> Result<Response> {
    let record = resolve_record(&state, &store_id)?;
    let cart = load_cart(&session, &store_id).await;

    Ok(CartShowTemplate {
        store_name: record.name.clone(),
        theme_style: theme_style_scope(&record.theme),
        cart: CartView::build(&cart, &store_id, &record),
    }
    .into_response())
}

/// Add one unit of a product to the cart.
///
/// Returns the count badge fragment plus a trigger header so other fragments
/// refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let record = resolve_record(&state, &store_id)?;
    let product = record
        .product(ProductId::new(form.product_id))
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut cart = load_cart(&session, &store_id).await;
    cart.add_item(product);
    save_cart(&session, &store_id, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.unit_count(),
        },
    )
        .into_response())
}

/// Set a cart item's quantity exactly; zero removes it.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let record = resolve_record(&state, &store_id)?;

    let mut cart = load_cart(&session, &store_id).await;
    cart.update_quantity(ProductId::new(form.product_id), form.quantity);
    save_cart(&session, &store_id, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::build(&cart, &store_id, &record),
        },
    )
        .into_response())
}

/// Remove an item from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let record = resolve_record(&state, &store_id)?;

    let mut cart = load_cart(&session, &store_id).await;
    cart.remove_item(ProductId::new(form.product_id));
    save_cart(&session, &store_id, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::build(&cart, &store_id, &record),
        },
    )
        .into_response())
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
) -> Result<Response> {
    let record = resolve_record(&state, &store_id)?;

    let mut cart = load_cart(&session, &store_id).await;
    cart.clear();
    save_cart(&session, &store_id, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::build(&cart, &store_id, &record),
        },
    )
        .into_response())
}

/// Get the cart count badge fragment.
#[instrument(skip(session))]
pub async fn count(session: Session, Path(store_id): Path<String>) -> impl IntoResponse {
    let cart = load_cart(&session, &store_id).await;
    CartCountTemplate {
        count: cart.unit_count(),
    }
}

/// Hand the order off to WhatsApp and clear the cart.
#[instrument(skip(state, session))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
) -> Result<Response> {
    let record = resolve_record(&state, &store_id)?;

    let mut cart = load_cart(&session, &store_id).await;
    if cart.is_empty() {
        return Ok(Redirect::to(&format!("/{store_id}/cart")).into_response());
    }

    let link = whatsapp_link(&cart, &record);
    cart.clear();
    save_cart(&session, &store_id, &cart).await?;

    Ok(Redirect::to(&link).into_response())
}
