//! HTTP client for the Generative Language API.
//!
//! Provides both streaming and non-streaming access. Streaming responses are
//! SSE: complete `data:` frames are cut out of a byte buffer as chunks
//! arrive, each frame being one `GenerateContentResponse` JSON document.

use std::sync::Arc;

use async_stream::stream;
use futures::Stream;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::GenAiConfig;

use super::error::GenAiError;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

const GENAI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Generative Language API client.
///
/// Cheaply cloneable; one instance lives in the application state.
#[derive(Clone)]
pub struct GenAiClient {
    inner: Arc<GenAiClientInner>,
}

struct GenAiClientInner {
    client: reqwest::Client,
    model: String,
    api_key: Option<SecretString>,
}

impl GenAiClient {
    /// Create a new client.
    ///
    /// A missing API key does not fail construction; calls made without one
    /// return [`GenAiError::MissingApiKey`] so the caller can degrade to its
    /// fallback path.
    #[must_use]
    pub fn new(config: &GenAiConfig) -> Self {
        Self {
            inner: Arc::new(GenAiClientInner {
                client: reqwest::Client::new(),
                model: config.model.clone(),
                api_key: config.api_key.clone(),
            }),
        }
    }

    fn api_key(&self) -> Result<&str, GenAiError> {
        self.inner
            .api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .ok_or(GenAiError::MissingApiKey)
    }

    /// Send a non-streaming generation request.
    ///
    /// # Errors
    ///
    /// Returns an error if no key is configured, the request fails, or the
    /// response cannot be parsed.
    #[instrument(skip_all, fields(model = %self.inner.model))]
    pub async fn generate(
        &self,
        system: Option<Content>,
        contents: Vec<Content>,
        generation_config: Option<GenerationConfig>,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let key = self.api_key()?;
        let url = format!("{GENAI_API_URL}/{}:generateContent", self.inner.model);
        let request = GenerateContentRequest {
            system_instruction: system,
            contents,
            generation_config,
        };

        let response = self
            .inner
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_status(status, response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GenAiError::Parse(format!("Failed to parse response: {e}")))
    }

    /// Send a streaming generation request.
    ///
    /// Returns a stream of text chunks for incremental display. Frames that
    /// carry no text (safety metadata, final usage frames) are skipped.
    ///
    /// Takes `self` by value (the client is a cheap `Arc` clone) so the
    /// returned stream owns everything it needs and can be moved into an SSE
    /// response.
    ///
    /// # Errors
    ///
    /// Returns an error if no key is configured or the initial request fails;
    /// mid-stream failures are yielded through the stream.
    #[instrument(skip_all, fields(model = %self.inner.model))]
    pub async fn generate_stream(
        self,
        system: Option<Content>,
        contents: Vec<Content>,
    ) -> Result<impl Stream<Item = Result<String, GenAiError>>, GenAiError> {
        let key = self.api_key()?;
        let url = format!(
            "{GENAI_API_URL}/{}:streamGenerateContent?alt=sse",
            self.inner.model
        );
        let request = GenerateContentRequest {
            system_instruction: system,
            contents,
            generation_config: None,
        };

        let response = self
            .inner
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&request)
            .send()
            .await?;

        // Check for error responses before streaming
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_status(status, response).await);
        }

        // Return a stream that parses SSE frames into text chunks
        Ok(stream! {
            use futures::StreamExt;

            let mut buffer = String::new();
            let mut byte_stream = std::pin::pin!(response.bytes_stream());

            while let Some(chunk_result) = byte_stream.next().await {
                match chunk_result {
                    Ok(chunk) => {
                        let text = match std::str::from_utf8(&chunk) {
                            Ok(t) => t,
                            Err(e) => {
                                yield Err(GenAiError::Parse(format!("Invalid UTF-8: {e}")));
                                continue;
                            }
                        };

                        buffer.push_str(text);

                        // Process complete SSE events
                        while let Some(event) = extract_sse_event(&mut buffer) {
                            match parse_sse_event(&event) {
                                Some(Ok(frame)) => {
                                    if let Some(text) = frame.text() {
                                        yield Ok(text);
                                    }
                                }
                                Some(Err(e)) => yield Err(e),
                                None => {}
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(GenAiError::Stream(e.to_string()));
                    }
                }
            }
        })
    }
}

/// Read an error body into a typed API error.
async fn error_from_status(status: reqwest::StatusCode, response: reqwest::Response) -> GenAiError {
    let message = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
    GenAiError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Extract a complete SSE event from the buffer.
///
/// Returns `Some(event)` if a complete event was found (and removes it from
/// the buffer), or `None` if no complete event is available yet.
fn extract_sse_event(buffer: &mut String) -> Option<String> {
    // SSE events are separated by double newlines
    buffer.find("\n\n").map(|idx| {
        let event = buffer[..idx].to_string();
        *buffer = buffer[idx + 2..].to_string();
        event
    })
}

/// Parse an SSE event string into a response frame.
fn parse_sse_event(event: &str) -> Option<Result<GenerateContentResponse, GenAiError>> {
    // Skip empty events
    if event.trim().is_empty() {
        return None;
    }

    // Parse SSE format: "data: <json>"
    let mut data_line = None;

    for line in event.lines() {
        if let Some(stripped) = line.strip_prefix("data: ") {
            data_line = Some(stripped);
        }
    }

    let data = data_line?;

    // The terminator frame some SSE APIs send; Gemini ends with a plain frame
    // but handle it anyway.
    if data == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<GenerateContentResponse>(data) {
        Ok(frame) => Some(Ok(frame)),
        Err(e) => Some(Err(GenAiError::Parse(format!(
            "Failed to parse stream frame: {e}"
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_sse_event() {
        let mut buffer =
            "data: {\"candidates\":[]}\n\ndata: {\"candidates\":[]}\n\n".to_string();

        let event1 = extract_sse_event(&mut buffer);
        assert!(event1.is_some());
        assert!(event1.expect("no event").contains("candidates"));

        let event2 = extract_sse_event(&mut buffer);
        assert!(event2.is_some());

        let event3 = extract_sse_event(&mut buffer);
        assert!(event3.is_none());
    }

    #[test]
    fn test_extract_sse_event_incomplete() {
        let mut buffer = "data: {\"partial".to_string();
        let event = extract_sse_event(&mut buffer);
        assert!(event.is_none());
        assert_eq!(buffer, "data: {\"partial");
    }

    #[test]
    fn test_parse_sse_event_text_frame() {
        let event = r#"data: {"candidates":[{"content":{"role":"model","parts":[{"text":"Hola"}]}}]}"#;
        let result = parse_sse_event(event);
        let frame = result.expect("no result").expect("parse error");
        assert_eq!(frame.text().as_deref(), Some("Hola"));
    }

    #[test]
    fn test_parse_sse_event_empty() {
        assert!(parse_sse_event("").is_none());
    }

    #[test]
    fn test_parse_sse_event_done_marker() {
        assert!(parse_sse_event("data: [DONE]").is_none());
    }

    #[test]
    fn test_parse_sse_event_malformed_json() {
        let result = parse_sse_event("data: {nope");
        assert!(matches!(result, Some(Err(GenAiError::Parse(_)))));
    }

    #[test]
    fn test_client_without_key_fails_fast() {
        let client = GenAiClient::new(&crate::config::GenAiConfig {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
        });
        assert!(matches!(client.api_key(), Err(GenAiError::MissingApiKey)));
    }

    #[test]
    fn test_genai_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<GenAiClient>();
        assert_send_sync::<GenAiClient>();
    }
}
