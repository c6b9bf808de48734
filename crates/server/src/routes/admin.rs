//! Admin console route handlers.
//!
//! All mutations here operate on the draft through the [`Editor`]; nothing is
//! visible on the public storefront until the save button commits. Validation
//! failures flash an inline message and leave the draft untouched.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::Session;
use tracing::instrument;

use tienditas_core::{FieldPath, ProductId, ProductInput, StoreRecord, Theme, order};

use crate::editor::{Editor, NewStore};
use crate::error::{AppError, Result};
use crate::filters;
use crate::services::palette;
use crate::session_keys;
use crate::state::AppState;

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(page))
        .route("/field", post(set_field))
        .route("/products", post(upsert_product))
        .route("/products/delete", post(delete_product))
        .route("/save", post(save))
        .route("/stores", post(create_store))
        .route("/palette", post(derive_palette))
}

// =============================================================================
// View Types
// =============================================================================

/// Sidebar entry for one store.
#[derive(Clone)]
pub struct StoreNav {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// One theme slot row.
#[derive(Clone)]
pub struct ThemeEntry {
    pub slot: String,
    pub color: String,
}

/// One product row in the management section.
#[derive(Clone)]
pub struct AdminProductRow {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Plain number for the form input, e.g. "15.00".
    pub price: String,
    pub image: String,
}

/// The selected store's full edit form.
#[derive(Clone)]
pub struct AdminStoreForm {
    pub id: String,
    pub name: String,
    pub template_id: String,
    pub section_title: String,
    pub hero_image_url: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub payment_phone: String,
    pub payment_name: String,
    pub payment_whatsapp: String,
    pub chat_instruction: String,
    pub theme: Vec<ThemeEntry>,
    pub products: Vec<AdminProductRow>,
    pub new_product: AdminProductRow,
    pub public_url: String,
}

impl AdminStoreForm {
    fn build(store_id: &str, record: &StoreRecord, base_url: &str) -> Self {
        let draft = ProductInput::draft();
        Self {
            id: store_id.to_string(),
            name: record.name.clone(),
            template_id: record.template_id.as_str().to_string(),
            section_title: record.section_title.clone(),
            hero_image_url: record.hero_banner.image_url.clone(),
            hero_title: record.hero_banner.title.clone(),
            hero_subtitle: record.hero_banner.subtitle.clone(),
            payment_phone: record.payment_info.phone.clone(),
            payment_name: record.payment_info.name.clone(),
            payment_whatsapp: record.payment_info.whatsapp.clone(),
            chat_instruction: record.chat_instruction.clone(),
            theme: record
                .theme
                .iter()
                .map(|(slot, color)| ThemeEntry {
                    slot: slot.clone(),
                    color: color.clone(),
                })
                .collect(),
            products: record.products.iter().map(product_row).collect(),
            new_product: AdminProductRow {
                id: 0,
                name: draft.name,
                description: draft.description,
                price: order::format_amount(draft.price),
                image: draft.image,
            },
            public_url: format!("{}/{store_id}", base_url.trim_end_matches('/')),
        }
    }
}

fn product_row(product: &tienditas_core::Product) -> AdminProductRow {
    AdminProductRow {
        id: product.id.as_u64(),
        name: product.name.clone(),
        description: product.description.clone(),
        price: order::format_amount(product.price),
        image: product.image.clone(),
    }
}

/// Admin console page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminPageTemplate {
    pub stores: Vec<StoreNav>,
    pub selected: Option<AdminStoreForm>,
    pub requested_store: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Flash Helpers
// =============================================================================

async fn flash(session: &Session, key: &str, message: String) {
    if let Err(e) = session.insert(key, message).await {
        tracing::warn!("failed to flash admin message: {e}");
    }
}

async fn take_flash(session: &Session, key: &str) -> Option<String> {
    session.remove::<String>(key).await.ok().flatten()
}

fn back_to(store_id: &str) -> Response {
    Redirect::to(&format!("/admin?store={store_id}")).into_response()
}

// =============================================================================
// Forms
// =============================================================================

/// Store selection query.
#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub store: Option<String>,
}

/// Generic nested-field edit.
#[derive(Debug, Deserialize)]
pub struct SetFieldForm {
    pub store: String,
    /// Dot-notation path within the store, e.g. `heroBanner.title`.
    pub path: String,
    pub value: String,
}

/// Product create/edit form.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub store: String,
    /// Present when editing an existing product.
    pub id: Option<u64>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
}

/// Product delete form.
#[derive(Debug, Deserialize)]
pub struct DeleteProductForm {
    pub store: String,
    pub id: u64,
}

/// Save (commit) form.
#[derive(Debug, Deserialize)]
pub struct SaveForm {
    pub store: Option<String>,
}

/// Store-creation wizard form.
#[derive(Debug, Deserialize)]
pub struct CreateStoreForm {
    pub store_id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub payee: String,
    #[serde(default)]
    pub whatsapp: String,
    /// Six-slot palette JSON from the AI assist, when the wizard ran it.
    #[serde(default)]
    pub palette: String,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Render the editor page for the selected store.
///
/// Selection comes from `?store=`; without it the first store is shown.
/// Switching stores never discards unsaved edits - they all live in the one
/// draft.
#[instrument(skip(state, session))]
pub async fn page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<AdminQuery>,
) -> Response {
    let draft = state.draft();

    let requested = query
        .store
        .or_else(|| draft.keys().next().cloned())
        .unwrap_or_default();

    let stores = draft
        .iter()
        .map(|(id, record)| StoreNav {
            id: id.clone(),
            name: record.name.clone(),
            active: *id == requested,
        })
        .collect();

    let selected = draft
        .get(&requested)
        .map(|record| AdminStoreForm::build(&requested, record, &state.config().base_url));

    let mut error = take_flash(&session, session_keys::ADMIN_ERROR).await;
    if selected.is_none() && error.is_none() {
        error = Some(format!("La tienda «{requested}» no existe."));
    }

    AdminPageTemplate {
        stores,
        selected,
        requested_store: requested,
        notice: take_flash(&session, session_keys::ADMIN_NOTICE).await,
        error,
    }
    .into_response()
}

/// Apply one nested-field edit to the draft.
#[instrument(skip(state, session, form), fields(store = %form.store, path = %form.path))]
pub async fn set_field(
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<SetFieldForm>,
) -> Result<Response> {
    let path = FieldPath::parse(&format!("{}.{}", form.store, form.path))
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let editor = Editor::new(&state);
    if let Err(e) = editor.set_field(&path, &Value::String(form.value)) {
        flash(&session, session_keys::ADMIN_ERROR, e.to_string()).await;
    }
    Ok(back_to(&form.store))
}

/// Create or update a product in the draft.
#[instrument(skip(state, session, form), fields(store = %form.store))]
pub async fn upsert_product(
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<ProductForm>,
) -> Result<Response> {
    let store = form.store.clone();

    match parse_price(&form.price) {
        Ok(price) => {
            let input = ProductInput {
                id: form.id.map(ProductId::new),
                name: form.name,
                description: form.description,
                price,
                image: form.image,
            };
            let editor = Editor::new(&state);
            if let Err(e) = editor.upsert_product(&store, input) {
                flash(&session, session_keys::ADMIN_ERROR, e.to_string()).await;
            }
        }
        Err(message) => flash(&session, session_keys::ADMIN_ERROR, message).await,
    }

    Ok(back_to(&store))
}

fn parse_price(raw: &str) -> std::result::Result<Decimal, String> {
    let price = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_| format!("precio inválido: «{raw}»"))?;
    if price.is_sign_negative() {
        return Err(format!("el precio no puede ser negativo: «{raw}»"));
    }
    Ok(price)
}

/// Delete a product from the draft.
#[instrument(skip(state, session, form), fields(store = %form.store, product = form.id))]
pub async fn delete_product(
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<DeleteProductForm>,
) -> Result<Response> {
    let editor = Editor::new(&state);
    if let Err(e) = editor.delete_product(&form.store, ProductId::new(form.id)) {
        flash(&session, session_keys::ADMIN_ERROR, e.to_string()).await;
    }
    Ok(back_to(&form.store))
}

/// Commit the draft: persist it and make it the storefront's baseline.
#[instrument(skip(state, session, form))]
pub async fn save(
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<SaveForm>,
) -> Result<Response> {
    let editor = Editor::new(&state);
    let committed = editor.commit();

    let store_id = form
        .store
        .or_else(|| committed.keys().next().cloned())
        .unwrap_or_default();
    let notice = committed.get(&store_id).map_or_else(
        || "Cambios guardados correctamente.".to_string(),
        |record| format!("Cambios para «{}» guardados correctamente.", record.name),
    );
    flash(&session, session_keys::ADMIN_NOTICE, notice).await;

    Ok(back_to(&store_id))
}

/// Create a new store through the wizard.
#[instrument(skip(state, session, form), fields(store = %form.store_id))]
pub async fn create_store(
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<CreateStoreForm>,
) -> Result<Response> {
    let theme = match parse_wizard_palette(&form.palette) {
        Ok(theme) => theme,
        Err(message) => {
            flash(&session, session_keys::ADMIN_ERROR, message).await;
            return Ok(back_to(&form.store_id));
        }
    };

    let editor = Editor::new(&state);
    match editor.create_store(
        &form.store_id,
        NewStore {
            name: form.name,
            phone: form.phone,
            payee: form.payee,
            whatsapp: form.whatsapp,
            theme,
        },
    ) {
        Ok(()) => {
            flash(
                &session,
                session_keys::ADMIN_NOTICE,
                format!("Tienda «{}» creada.", form.store_id),
            )
            .await;
            Ok(back_to(&form.store_id))
        }
        Err(e) => {
            flash(&session, session_keys::ADMIN_ERROR, e.to_string()).await;
            Ok(Redirect::to("/admin").into_response())
        }
    }
}

/// An empty palette field means "no assist ran"; anything else must be the
/// strict six-slot object.
fn parse_wizard_palette(raw: &str) -> std::result::Result<Option<Theme>, String> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    palette::parse_palette(raw)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Derive a palette from an uploaded logo (store-creation assist).
///
/// Pure with respect to the draft: the palette comes back as JSON for the
/// wizard's working state, and any failure surfaces as an error without
/// touching anything.
#[instrument(skip(state, multipart))]
pub async fn derive_palette(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Theme>> {
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("logo") {
            let mime = field
                .content_type()
                .unwrap_or("image/png")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("unreadable upload: {e}")))?;
            image = Some((bytes.to_vec(), mime));
        }
    }

    let (bytes, mime) = image.ok_or(AppError::BadRequest(
        "sube una imagen del logo primero".to_string(),
    ))?;

    let theme = palette::derive_palette(state.genai(), &bytes, &mime).await?;
    Ok(Json(theme))
}
