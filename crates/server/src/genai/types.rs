//! Types for the Generative Language API.
//!
//! These match the REST wire format of `models.generateContent` and
//! `models.streamGenerateContent` (camelCase fields, parts as one-of
//! structs).

use serde::{Deserialize, Serialize};

/// A message in the conversation, or the system instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// "user" or "model"; absent on the system instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A user-authored text message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// A model-authored text message (history replay).
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// A system instruction (no role on the wire).
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// Concatenated text of this content's parts.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect()
    }
}

/// One part of a content: text or inline binary data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Plain text.
    Text {
        /// The text content.
        text: String,
    },
    /// Inline binary payload (the uploaded logo for palette extraction).
    InlineData {
        /// The payload.
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

/// Base64-encoded binary data with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blob {
    /// MIME type (e.g. "image/png").
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Generation parameters; only the structured-output knobs are used.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationConfig {
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

/// Request body for both generate endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Response body of `generateContent`, and of each streamed SSE frame.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, if the response carries any.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text = content.text();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// One response candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            system_instruction: Some(Content::system("Eres CacaoBot.")),
            contents: vec![Content::user("hola")],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: None,
            }),
        };
        let json = serde_json::to_string(&request).expect("serialize");
        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"responseMimeType\""));
        assert!(!json.contains("\"role\":null"));
    }

    #[test]
    fn test_inline_data_part_serialization() {
        let part = Part::InlineData {
            inline_data: Blob {
                mime_type: "image/png".to_string(),
                data: "aGVsbG8=".to_string(),
            },
        };
        let json = serde_json::to_string(&part).expect("serialize");
        assert!(json.contains("\"inlineData\""));
        assert!(json.contains("\"mimeType\":\"image/png\""));
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Hola, "}, {"text": "¿en qué ayudo?"}]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.text().as_deref(), Some("Hola, ¿en qué ayudo?"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").expect("deserialize");
        assert!(response.text().is_none());
    }
}
