//! The store repository: one JSON document on disk.
//!
//! The whole collection persists as a single file under the data directory,
//! using the same namespaced key the product has always used
//! (`tienditas_stores_v2`). Loading seeds the built-in defaults on first run;
//! every failure is recovered locally - a read error falls back to the
//! in-memory defaults and a write error leaves the caller's state
//! authoritative for the session. Nothing here is allowed to crash a caller.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::instrument;

use tienditas_core::StoreCollection;

use crate::seed;

/// File name of the persisted collection (the storage key).
pub const STORES_FILE: &str = "tienditas_stores_v2.json";

/// Errors from the persistence substrate. Callers of [`StoreRepository::load`]
/// and [`StoreRepository::save`] never see these; they are logged and
/// recovered internally.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File-backed repository for the store collection.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    path: PathBuf,
}

impl StoreRepository {
    /// Repository rooted at the given data directory.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORES_FILE),
        }
    }

    /// Path of the persisted document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted collection.
    ///
    /// Missing document: storage is initialized with the built-in defaults
    /// (atomically - the file appears complete or not at all) and a copy is
    /// returned. Unreadable or unparseable document: the error is logged and
    /// the in-memory defaults are returned without touching the file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> StoreCollection {
        if !self.path.exists() {
            let defaults = seed::default_collection();
            if let Err(e) = self.try_save(&defaults) {
                tracing::error!("failed to initialize store document: {e}");
            }
            return defaults;
        }

        match self.try_load() {
            Ok(collection) => collection,
            Err(e) => {
                tracing::error!("failed to read store document, using defaults: {e}");
                seed::default_collection()
            }
        }
    }

    /// Persist the collection, replacing any prior document.
    ///
    /// Failures are logged and swallowed; the caller's in-memory collection
    /// stays authoritative for the session.
    #[instrument(skip_all, fields(path = %self.path.display(), stores = collection.len()))]
    pub fn save(&self, collection: &StoreCollection) {
        if let Err(e) = self.try_save(collection) {
            tracing::error!("failed to write store document: {e}");
        }
    }

    fn try_load(&self) -> Result<StoreCollection, RepositoryError> {
        let raw = fs::read_to_string(&self.path)?;
        let mut collection: StoreCollection = serde_json::from_str(&raw)?;
        // Documents from before the id counter existed get it backfilled so
        // deleting a product can never free its id.
        for record in collection.values_mut() {
            record.init_product_counter();
        }
        Ok(collection)
    }

    /// Write-then-rename so a reader never observes a partial document.
    fn try_save(&self, collection: &StoreCollection) -> Result<(), RepositoryError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(collection)?;

        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
