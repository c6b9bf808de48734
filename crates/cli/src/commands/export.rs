//! Inspect the persisted store collection.

use tienditas_server::repository::StoreRepository;

use super::data_dir;

/// Print the whole collection as pretty JSON.
///
/// # Errors
///
/// Returns an error if the collection cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn dump() -> Result<(), Box<dyn std::error::Error>> {
    let repository = StoreRepository::new(&data_dir());
    let collection = repository.load();
    println!("{}", serde_json::to_string_pretty(&collection)?);
    Ok(())
}

/// Print one line per store: identifier, display name, product count.
///
/// # Errors
///
/// Infallible today; kept fallible to match the command signature.
#[allow(clippy::print_stdout)]
pub fn list() -> Result<(), Box<dyn std::error::Error>> {
    let repository = StoreRepository::new(&data_dir());
    let collection = repository.load();
    for (id, record) in &collection {
        println!(
            "{id}\t{} [{}] ({} productos)",
            record.name,
            record.template_id.as_str(),
            record.products.len()
        );
    }
    Ok(())
}
