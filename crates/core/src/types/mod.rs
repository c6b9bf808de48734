//! Core types for the Tienditas store configuration model.
//!
//! The shapes here mirror the persisted JSON document exactly (camelCase
//! field names, open-ended theme map). Deserialization is tolerant of older
//! documents: every field has a default so a missing `templateId` or a
//! partially-populated record loads instead of failing.

pub mod product;
pub mod store;
pub mod theme;

pub use product::{Product, ProductId, ProductInput};
pub use store::{HeroBanner, PaymentInfo, StoreCollection, StoreRecord, TemplateId};
pub use theme::{Theme, css_var_name, theme_style_scope};
