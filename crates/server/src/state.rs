//! Application state shared across handlers.

use std::sync::{Arc, RwLock};

use tienditas_core::StoreCollection;

use crate::config::ServerConfig;
use crate::genai::GenAiClient;
use crate::repository::StoreRepository;
use crate::services::chat::ChatRegistry;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The committed and draft collections are each
/// held as an immutable snapshot (`Arc<StoreCollection>`); mutation always
/// builds a complete new snapshot before swapping the pointer, so a
/// concurrently rendering view can never observe a torn collection. The
/// public storefront reads only the committed snapshot; the admin editor
/// works on the draft until an explicit save commits it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    repository: StoreRepository,
    committed: RwLock<Arc<StoreCollection>>,
    draft: RwLock<Arc<StoreCollection>>,
    genai: GenAiClient,
    chats: ChatRegistry,
}

impl AppState {
    /// Create application state, loading the collection once.
    ///
    /// The draft starts structurally identical to the committed snapshot.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let repository = StoreRepository::new(&config.data_dir);
        let collection = Arc::new(repository.load());
        let genai = GenAiClient::new(&config.genai);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                repository,
                committed: RwLock::new(Arc::clone(&collection)),
                draft: RwLock::new(collection),
                genai,
                chats: ChatRegistry::new(),
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the store repository.
    #[must_use]
    pub fn repository(&self) -> &StoreRepository {
        &self.inner.repository
    }

    /// Get a reference to the generative AI client.
    #[must_use]
    pub fn genai(&self) -> &GenAiClient {
        &self.inner.genai
    }

    /// Get a reference to the chat session registry.
    #[must_use]
    pub fn chats(&self) -> &ChatRegistry {
        &self.inner.chats
    }

    /// The last committed collection snapshot (what the storefront renders).
    ///
    /// # Panics
    ///
    /// Panics if the snapshot lock was poisoned (a writer panicked).
    #[must_use]
    pub fn committed(&self) -> Arc<StoreCollection> {
        Arc::clone(&self.inner.committed.read().expect("committed lock poisoned"))
    }

    /// The admin's current draft snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the snapshot lock was poisoned (a writer panicked).
    #[must_use]
    pub fn draft(&self) -> Arc<StoreCollection> {
        Arc::clone(&self.inner.draft.read().expect("draft lock poisoned"))
    }

    /// Run one editor mutation against the draft.
    ///
    /// The closure builds a complete new collection from the current one; on
    /// success the snapshot pointer is swapped, on error the draft is left
    /// exactly as it was. The write lock is held across the whole
    /// read-build-swap so concurrent admin edits cannot lose each other.
    pub(crate) fn mutate_draft<E>(
        &self,
        mutate: impl FnOnce(&StoreCollection) -> Result<StoreCollection, E>,
    ) -> Result<Arc<StoreCollection>, E> {
        let mut guard = self.inner.draft.write().expect("draft lock poisoned");
        let next = Arc::new(mutate(&guard)?);
        *guard = Arc::clone(&next);
        Ok(next)
    }

    /// Promote a snapshot to the committed baseline.
    pub(crate) fn set_committed(&self, collection: Arc<StoreCollection>) {
        *self
            .inner
            .committed
            .write()
            .expect("committed lock poisoned") = collection;
    }
}
