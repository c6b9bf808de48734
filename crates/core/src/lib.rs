//! Tienditas Core - Shared types and pure domain logic.
//!
//! This crate provides the pieces of Tienditas that have no I/O:
//! - [`types`] - The store configuration model (stores, products, themes)
//! - [`path`] - Tagged-path mutation over the configuration tree
//! - [`cart`] - The per-session order cart state machine
//! - [`order`] - The WhatsApp order-message text contract
//! - [`chat`] - Chat transcript accumulation for streamed replies
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no filesystem access. Everything here is deterministic and
//! unit-testable; the `server` crate wires it to storage, templates, and the
//! generative AI boundary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod chat;
pub mod order;
pub mod path;
pub mod types;

pub use cart::{Cart, CartItem};
pub use chat::{Author, Transcript, TranscriptEntry};
pub use path::{FieldPath, PathError, PathStep};
pub use types::*;
