//! Public store page: resolution, theming, and template dispatch.
//!
//! Every template variant consumes the identical [`StorePageView`] contract;
//! dispatch is a single exhaustive match on the store's `templateId`. Adding
//! a variant means an enum case plus a template - the data model and the
//! admin editor never change.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use tienditas_core::{Product, StoreRecord, TemplateId, order, theme_style_scope};

use crate::filters;
use crate::routes::cart::load_cart;
use crate::seed::DEFAULT_STORE_ID;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Formatted with currency prefix, e.g. "S/ 15.00".
    pub price: String,
    pub image: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_u64(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format!("S/ {}", order::format_amount(product.price)),
            image: product.image.clone(),
        }
    }
}

/// Everything a store page template needs, template-agnostic.
#[derive(Clone)]
pub struct StorePageView {
    pub store_id: String,
    pub name: String,
    pub section_title: String,
    pub hero_image_url: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub products: Vec<ProductView>,
    /// Inline CSS custom-property scope for the store's theme. Applied to the
    /// view's root element only - never the document.
    pub theme_style: String,
    /// The primary theme color (chat widget accent).
    pub primary_color: String,
    pub cart_count: u32,
}

impl StorePageView {
    fn build(store_id: &str, record: &StoreRecord, cart_count: u32) -> Self {
        Self {
            store_id: store_id.to_string(),
            name: record.name.clone(),
            section_title: record.section_title.clone(),
            hero_image_url: record.hero_banner.image_url.clone(),
            hero_title: record.hero_banner.title.clone(),
            hero_subtitle: record.hero_banner.subtitle.clone(),
            products: record.products.iter().map(ProductView::from).collect(),
            theme_style: theme_style_scope(&record.theme),
            primary_color: record
                .theme
                .get("primary")
                .cloned()
                .unwrap_or_else(|| "#333333".to_string()),
            cart_count,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Classic layout: header, hero banner, product grid.
#[derive(Template, WebTemplate)]
#[template(path = "store/classic.html")]
pub struct ClassicStoreTemplate {
    pub view: StorePageView,
}

/// Modern layout: full-bleed hero with overlaid header, product rows.
#[derive(Template, WebTemplate)]
#[template(path = "store/modern.html")]
pub struct ModernStoreTemplate {
    pub view: StorePageView,
}

/// The "store not found" page - a first-class terminal state, not an error.
#[derive(Template, WebTemplate)]
#[template(path = "store/not_found.html")]
pub struct StoreNotFoundTemplate {
    pub store_id: String,
}

/// Render a resolved store through its template variant.
#[must_use]
pub fn render_store(store_id: &str, record: &StoreRecord, cart_count: u32) -> Response {
    let view = StorePageView::build(store_id, record, cart_count);
    match record.template_id {
        TemplateId::Classic => ClassicStoreTemplate { view }.into_response(),
        TemplateId::Modern => ModernStoreTemplate { view }.into_response(),
    }
}

/// Render the not-found page with a 404 status.
#[must_use]
pub fn render_not_found(store_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        StoreNotFoundTemplate {
            store_id: store_id.to_string(),
        },
    )
        .into_response()
}

// =============================================================================
// Route Handlers
// =============================================================================

/// The empty path resolves to the default store; the redirect reflects the
/// resolved identifier back into the visible address.
#[instrument(skip(state))]
pub async fn root(State(state): State<AppState>) -> Response {
    let collection = state.committed();
    let store_id = if collection.contains_key(DEFAULT_STORE_ID) {
        DEFAULT_STORE_ID.to_string()
    } else if let Some(first) = collection.keys().next() {
        first.clone()
    } else {
        return render_not_found("");
    };
    Redirect::to(&format!("/{store_id}")).into_response()
}

/// Display a store's public page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
) -> Response {
    let collection = state.committed();
    let Some(record) = collection.get(&store_id) else {
        return render_not_found(&store_id);
    };

    let cart = load_cart(&session, &store_id).await;
    render_store(&store_id, record, cart.unit_count())
}
