//! Google Generative Language API integration.
//!
//! Two call shapes are consumed, both behind [`GenAiClient`]:
//! - conversational turns: persona + running history in, streamed text
//!   chunks out (`streamGenerateContent` over SSE);
//! - structured extraction: image + instruction in, strict JSON out
//!   (`generateContent` with a response schema) - used by the palette assist.

mod client;
mod error;
mod types;

pub use client::GenAiClient;
pub use error::GenAiError;
pub use types::{Blob, Content, GenerateContentResponse, GenerationConfig, Part};
