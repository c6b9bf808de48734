//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The session holds the
//! visitor's per-store cart, the chat visitor id, and the admin's transient
//! flash messages - all per-browsing-session state with no durability
//! requirement, so the memory store is the right substrate.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tienditas_session";

/// Session expiry time in seconds (1 day of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with the in-memory store.
#[must_use]
pub fn create_session_layer(config: &ServerConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
