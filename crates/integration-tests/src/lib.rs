//! Integration tests for Tienditas.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tienditas-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `editor_pipeline` - Admin draft/commit flow across editor and repository
//! - `repository_roundtrip` - Persisted document seeding and stability
//! - `store_rendering` - Store resolution and template dispatch
//! - `order_messages` - The WhatsApp order contract end to end
//!
//! All tests run against temporary data directories; no external services are
//! involved (the generative AI boundary is exercised only through its
//! fallback paths).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::IpAddr;

use tienditas_server::config::{GenAiConfig, ServerConfig};
use tienditas_server::state::AppState;

/// Build an [`AppState`] over a temporary data directory.
///
/// # Panics
///
/// Panics if the loopback address fails to parse (it cannot).
#[must_use]
pub fn test_state(data_dir: &std::path::Path) -> AppState {
    AppState::new(ServerConfig {
        host: "127.0.0.1".parse::<IpAddr>().expect("loopback"),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        data_dir: data_dir.to_path_buf(),
        genai: GenAiConfig {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
        },
        sentry_dsn: None,
    })
}
