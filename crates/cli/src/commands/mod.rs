//! CLI subcommand implementations.

pub mod export;
pub mod seed;

use std::path::PathBuf;

/// Resolve the data directory the same way the server does.
pub fn data_dir() -> PathBuf {
    let _ = dotenvy::dotenv();
    PathBuf::from(std::env::var("TIENDITAS_DATA_DIR").unwrap_or_else(|_| "./data".to_string()))
}
