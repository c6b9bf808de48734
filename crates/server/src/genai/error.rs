//! Error types for the generative AI client.

use thiserror::Error;

/// Errors that can occur when calling the Generative Language API.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// No API key is configured; every call fails fast with this.
    #[error("no generative AI API key configured")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error body, as far as it could be read.
        message: String,
    },

    /// Failed to parse a response or stream frame.
    #[error("parse error: {0}")]
    Parse(String),

    /// The byte stream broke mid-response.
    #[error("stream error: {0}")]
    Stream(String),

    /// The response carried no usable text.
    #[error("empty response from model")]
    EmptyResponse,
}
