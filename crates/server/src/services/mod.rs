//! Services orchestrating core logic against external boundaries.

pub mod chat;
pub mod palette;

pub use chat::{ChatError, ChatRegistry, ChatSession};
pub use palette::{PaletteError, derive_palette};
