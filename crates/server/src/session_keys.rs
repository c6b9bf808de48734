//! Session keys for per-visitor state.

/// Key for the visitor's chat identity (one per browsing session).
pub const CHAT_VISITOR: &str = "chat_visitor";

/// Key for the admin's transient save confirmation.
pub const ADMIN_NOTICE: &str = "admin.notice";

/// Key for the admin's transient inline error.
pub const ADMIN_ERROR: &str = "admin.error";

/// Key for a store's cart. One cart per storefront per session.
#[must_use]
pub fn cart(store_id: &str) -> String {
    format!("cart.{store_id}")
}
