//! The admin configuration editor.
//!
//! All admin mutations go through here: nested-path edits, product CRUD and
//! the store-creation wizard operate on the draft snapshot, and an explicit
//! commit persists the draft and promotes it to the committed baseline the
//! public storefront renders. Until that commit, no edit is visible outside
//! the admin.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use tienditas_core::{
    FieldPath, HeroBanner, PathError, PaymentInfo, ProductId, ProductInput, StoreCollection,
    StoreRecord, Theme, path,
};

use crate::state::AppState;

/// Identifiers that would shadow fixed routes and can never name a store.
const RESERVED_IDS: [&str; 2] = ["admin", "health"];

/// Errors from admin editor operations.
///
/// Validation variants carry the inline message the admin sees; none of them
/// leaves the draft modified.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A nested-path edit failed to resolve or type-check.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Store creation with an empty identifier.
    #[error("el identificador de la tienda no puede estar vacío")]
    EmptyStoreId,

    /// Store creation with an identifier that is already taken.
    #[error("el identificador '{0}' ya está en uso")]
    StoreIdTaken(String),

    /// Store creation with an identifier that is not URL-safe or is reserved.
    #[error("identificador inválido '{0}': usa solo minúsculas, números y guiones")]
    InvalidStoreId(String),

    /// Operation addressed a store the draft does not have.
    #[error("unknown store: {0}")]
    UnknownStore(String),
}

/// Initial configuration for the store-creation wizard.
#[derive(Debug, Clone, Default)]
pub struct NewStore {
    pub name: String,
    pub phone: String,
    pub payee: String,
    pub whatsapp: String,
    /// Palette from the AI assist, when the wizard ran it; `None` gets the
    /// neutral default palette.
    pub theme: Option<Theme>,
}

/// Admin editor over the application state's draft snapshot.
pub struct Editor<'a> {
    state: &'a AppState,
}

impl<'a> Editor<'a> {
    /// Create an editor bound to the application state.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// The current draft snapshot.
    #[must_use]
    pub fn draft(&self) -> Arc<StoreCollection> {
        self.state.draft()
    }

    /// Apply one nested-path edit to the draft.
    ///
    /// Produces a new draft snapshot; the previous snapshot is untouched and
    /// remains valid for anything still reading it.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`PathError`] when the path does not resolve or
    /// the value does not fit; the draft is unchanged.
    #[instrument(skip(self, value), fields(path = %path))]
    pub fn set_field(
        &self,
        path: &FieldPath,
        value: &Value,
    ) -> Result<Arc<StoreCollection>, EditorError> {
        Ok(self
            .state
            .mutate_draft(|draft| path::apply(draft, path, value))?)
    }

    /// Insert or replace a product in a store's draft catalog.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownStore`] when the store does not exist.
    #[instrument(skip(self, input), fields(store = store_id))]
    pub fn upsert_product(
        &self,
        store_id: &str,
        input: ProductInput,
    ) -> Result<ProductId, EditorError> {
        let mut assigned = ProductId::default();
        self.state.mutate_draft(|draft| {
            let mut next = draft.clone();
            let record = next
                .get_mut(store_id)
                .ok_or_else(|| EditorError::UnknownStore(store_id.to_string()))?;
            assigned = record.upsert_product(input);
            Ok::<_, EditorError>(next)
        })?;
        Ok(assigned)
    }

    /// Delete a product from a store's draft catalog.
    ///
    /// An absent product id is a no-op; an unknown store is an error.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownStore`] when the store does not exist.
    #[instrument(skip(self), fields(store = store_id, product = %product_id))]
    pub fn delete_product(
        &self,
        store_id: &str,
        product_id: ProductId,
    ) -> Result<(), EditorError> {
        self.state.mutate_draft(|draft| {
            let mut next = draft.clone();
            let record = next
                .get_mut(store_id)
                .ok_or_else(|| EditorError::UnknownStore(store_id.to_string()))?;
            record.delete_product(product_id);
            Ok::<_, EditorError>(next)
        })?;
        Ok(())
    }

    /// Create a new store under a caller-supplied identifier.
    ///
    /// Every required field of the new record is backfilled so the store
    /// renders immediately.
    ///
    /// # Errors
    ///
    /// Returns a validation error (empty, non-URL-safe, reserved or duplicate
    /// identifier) without mutating the draft.
    #[instrument(skip(self, config), fields(store = store_id))]
    pub fn create_store(&self, store_id: &str, config: NewStore) -> Result<(), EditorError> {
        let store_id = store_id.trim();
        if store_id.is_empty() {
            return Err(EditorError::EmptyStoreId);
        }
        if !is_url_safe(store_id) || RESERVED_IDS.contains(&store_id) {
            return Err(EditorError::InvalidStoreId(store_id.to_string()));
        }

        self.state.mutate_draft(|draft| {
            if draft.contains_key(store_id) {
                return Err(EditorError::StoreIdTaken(store_id.to_string()));
            }
            let mut next = draft.clone();
            next.insert(store_id.to_string(), new_store_record(store_id, config));
            Ok(next)
        })?;
        info!(store = store_id, "store created");
        Ok(())
    }

    /// Persist the draft and promote it to the committed baseline.
    ///
    /// After this returns, the public storefront renders the saved state.
    #[instrument(skip(self))]
    pub fn commit(&self) -> Arc<StoreCollection> {
        let draft = self.state.draft();
        self.state.repository().save(&draft);
        self.state.set_committed(Arc::clone(&draft));
        info!(stores = draft.len(), "draft committed");
        draft
    }
}

/// Store identifiers are path segments: lowercase letters, digits, dashes.
fn is_url_safe(id: &str) -> bool {
    id.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// The neutral palette new stores start with, one entry per conventional slot.
#[must_use]
pub fn default_theme() -> Theme {
    [
        ("primary", "#333333"),
        ("secondary", "#DDDDDD"),
        ("background", "#FFFFFF"),
        ("text", "#222222"),
        ("cardBackground", "#FFFFFF"),
        ("buttonText", "#FFFFFF"),
    ]
    .into_iter()
    .map(|(slot, color)| (slot.to_string(), color.to_string()))
    .collect()
}

fn new_store_record(store_id: &str, config: NewStore) -> StoreRecord {
    let name = if config.name.trim().is_empty() {
        store_id.to_string()
    } else {
        config.name.trim().to_string()
    };

    StoreRecord {
        section_title: "Nuestros Productos".to_string(),
        hero_banner: HeroBanner {
            image_url: String::new(),
            title: format!("Bienvenidos a {name}"),
            subtitle: "Descubre nuestros productos.".to_string(),
        },
        products: Vec::new(),
        payment_info: PaymentInfo {
            phone: config.phone,
            name: config.payee,
            whatsapp: config.whatsapp,
        },
        theme: config.theme.unwrap_or_else(default_theme),
        chat_instruction: format!(
            "Eres el asistente virtual de {name}. Ayudas a los clientes con sus preguntas sobre \
             los productos, precios y pedidos. Eres amable y conciso. La tienda se llama {name}."
        ),
        name,
        template_id: tienditas_core::TemplateId::Classic,
        next_product_id: 1,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::config::{GenAiConfig, ServerConfig};

    use super::*;

    fn test_state(dir: &std::path::Path) -> AppState {
        AppState::new(ServerConfig {
            host: "127.0.0.1".parse().expect("ip"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            data_dir: dir.to_path_buf(),
            genai: GenAiConfig {
                api_key: None,
                model: "gemini-2.5-flash".to_string(),
            },
            sentry_dsn: None,
        })
    }

    #[test]
    fn test_set_field_updates_draft_not_committed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = test_state(dir.path());
        let editor = Editor::new(&state);

        let path = FieldPath::parse("sachacacao.name").expect("path");
        editor.set_field(&path, &json!("Cacao Nuevo")).expect("set");

        assert_eq!(
            state.draft().get("sachacacao").expect("store").name,
            "Cacao Nuevo"
        );
        assert_eq!(
            state.committed().get("sachacacao").expect("store").name,
            "Sacha Cacao",
            "uncommitted edits stay invisible to the storefront"
        );
    }

    #[test]
    fn test_failed_set_field_leaves_draft_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = test_state(dir.path());
        let editor = Editor::new(&state);
        let before = state.draft();

        let path = FieldPath::parse("sachacacao.nochesuchfield").expect("path");
        editor
            .set_field(&path, &json!("x"))
            .expect_err("unknown field");

        assert_eq!(*state.draft(), *before);
    }

    #[test]
    fn test_commit_promotes_draft_and_persists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = test_state(dir.path());
        let editor = Editor::new(&state);

        let path = FieldPath::parse("sachacacao.sectionTitle").expect("path");
        editor.set_field(&path, &json!("Chocolatería")).expect("set");
        editor.commit();

        assert_eq!(
            state.committed().get("sachacacao").expect("store").section_title,
            "Chocolatería"
        );

        // A fresh repository sees the committed state.
        let reloaded = state.repository().load();
        assert_eq!(
            reloaded.get("sachacacao").expect("store").section_title,
            "Chocolatería"
        );
    }

    #[test]
    fn test_create_store_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = test_state(dir.path());
        let editor = Editor::new(&state);

        assert!(matches!(
            editor.create_store("", NewStore::default()),
            Err(EditorError::EmptyStoreId)
        ));
        assert!(matches!(
            editor.create_store("Mi Tienda", NewStore::default()),
            Err(EditorError::InvalidStoreId(_))
        ));
        assert!(matches!(
            editor.create_store("admin", NewStore::default()),
            Err(EditorError::InvalidStoreId(_))
        ));
        assert!(matches!(
            editor.create_store("sachacacao", NewStore::default()),
            Err(EditorError::StoreIdTaken(_))
        ));
    }

    #[test]
    fn test_duplicate_create_leaves_first_store_intact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = test_state(dir.path());
        let editor = Editor::new(&state);

        editor
            .create_store(
                "newshop",
                NewStore {
                    name: "New Shop".to_string(),
                    ..NewStore::default()
                },
            )
            .expect("first create");
        editor
            .create_store(
                "newshop",
                NewStore {
                    name: "Otra".to_string(),
                    ..NewStore::default()
                },
            )
            .expect_err("duplicate id");

        let draft = state.draft();
        assert_eq!(draft.get("newshop").expect("store").name, "New Shop");
    }

    #[test]
    fn test_created_store_is_fully_backfilled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = test_state(dir.path());
        let editor = Editor::new(&state);

        editor
            .create_store(
                "newshop",
                NewStore {
                    name: "New Shop".to_string(),
                    whatsapp: "51900000000".to_string(),
                    ..NewStore::default()
                },
            )
            .expect("create");

        let draft = state.draft();
        let record = draft.get("newshop").expect("store");
        assert!(!record.name.is_empty());
        assert!(!record.section_title.is_empty());
        assert!(!record.hero_banner.title.is_empty());
        assert!(!record.chat_instruction.is_empty());
        assert_eq!(record.theme.len(), 6);
    }

    #[test]
    fn test_product_crud_against_draft() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = test_state(dir.path());
        let editor = Editor::new(&state);

        let id = editor
            .upsert_product(
                "sachacacao",
                ProductInput {
                    name: "Cacao Nibs".to_string(),
                    ..ProductInput::default()
                },
            )
            .expect("upsert");
        assert_eq!(id, ProductId::new(4), "after the three seeded products");

        editor.delete_product("sachacacao", id).expect("delete");
        let draft = state.draft();
        assert!(draft.get("sachacacao").expect("store").product(id).is_none());

        // Absent id is a no-op, unknown store is an error.
        editor
            .delete_product("sachacacao", ProductId::new(99))
            .expect("noop");
        assert!(matches!(
            editor.delete_product("bodega", ProductId::new(1)),
            Err(EditorError::UnknownStore(_))
        ));
    }
}
