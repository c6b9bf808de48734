//! Seed the data directory with the default store collection.

use tracing::info;

use tienditas_server::repository::StoreRepository;
use tienditas_server::seed::default_collection;

use super::data_dir;

/// Write the default collection.
///
/// # Errors
///
/// Returns an error if a document already exists and `force` was not given.
pub fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    let repository = StoreRepository::new(&dir);

    if repository.path().exists() && !force {
        return Err(format!(
            "store document already exists at {} (use --force to overwrite)",
            repository.path().display()
        )
        .into());
    }

    let defaults = default_collection();
    repository.save(&defaults);
    info!(
        path = %repository.path().display(),
        stores = defaults.len(),
        "default collection written"
    );
    Ok(())
}
