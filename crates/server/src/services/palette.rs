//! AI-assisted palette derivation for the store-creation wizard.
//!
//! Sends the uploaded logo with a fixed instruction and a strict response
//! schema, then validates the returned JSON before anything uses it. Any
//! failure - missing image, transport, malformed or incomplete response -
//! leaves the caller's working palette untouched; this path can never corrupt
//! a draft.

use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use tienditas_core::{Theme, theme::CONVENTIONAL_SLOTS};

use crate::genai::{Blob, Content, GenAiClient, GenAiError, GenerationConfig, Part};

/// Fixed instruction sent with the logo.
pub const PALETTE_INSTRUCTION: &str = "Analiza el logo adjunto y propón la paleta de colores de \
    la tienda. Devuelve exactamente seis colores hex: primary, secondary, background, text, \
    cardBackground y buttonText.";

/// Errors from palette derivation.
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    /// No logo was uploaded.
    #[error("no image provided")]
    MissingImage,

    /// The generative AI call failed.
    #[error(transparent)]
    GenAi(#[from] GenAiError),

    /// The response was not the strict six-slot object.
    #[error("palette response did not match the expected shape: {0}")]
    InvalidShape(String),
}

/// The strict six-slot palette the model must return.
///
/// `deny_unknown_fields` plus six required strings: anything else is a
/// malformed response and is rejected wholesale.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PaletteResponse {
    primary: String,
    secondary: String,
    background: String,
    text: String,
    #[serde(rename = "cardBackground")]
    card_background: String,
    #[serde(rename = "buttonText")]
    button_text: String,
}

impl PaletteResponse {
    fn into_theme(self) -> Theme {
        [
            ("primary", self.primary),
            ("secondary", self.secondary),
            ("background", self.background),
            ("text", self.text),
            ("cardBackground", self.card_background),
            ("buttonText", self.button_text),
        ]
        .into_iter()
        .map(|(slot, color)| (slot.to_string(), color))
        .collect()
    }
}

/// JSON schema handed to the API so the model emits the palette shape.
fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "primary": { "type": "STRING" },
            "secondary": { "type": "STRING" },
            "background": { "type": "STRING" },
            "text": { "type": "STRING" },
            "cardBackground": { "type": "STRING" },
            "buttonText": { "type": "STRING" }
        },
        "required": CONVENTIONAL_SLOTS
    })
}

/// Derive a six-slot palette from an uploaded logo.
///
/// # Errors
///
/// Returns a [`PaletteError`] on a missing image, a failed API call, or a
/// response that does not validate against the palette shape.
#[instrument(skip_all, fields(bytes = image.len(), mime = mime_type))]
pub async fn derive_palette(
    client: &GenAiClient,
    image: &[u8],
    mime_type: &str,
) -> Result<Theme, PaletteError> {
    if image.is_empty() {
        return Err(PaletteError::MissingImage);
    }

    let content = Content {
        role: Some("user".to_string()),
        parts: vec![
            Part::Text {
                text: PALETTE_INSTRUCTION.to_string(),
            },
            Part::InlineData {
                inline_data: Blob {
                    mime_type: mime_type.to_string(),
                    data: base64::engine::general_purpose::STANDARD.encode(image),
                },
            },
        ],
    };
    let config = GenerationConfig {
        response_mime_type: Some("application/json".to_string()),
        response_schema: Some(response_schema()),
    };

    let response = client.generate(None, vec![content], Some(config)).await?;
    let text = response.text().ok_or(GenAiError::EmptyResponse)?;
    parse_palette(&text)
}

/// Validate a palette response body into a theme.
///
/// # Errors
///
/// Returns [`PaletteError::InvalidShape`] unless the body is exactly the
/// six-slot object of strings.
pub fn parse_palette(text: &str) -> Result<Theme, PaletteError> {
    let response: PaletteResponse =
        serde_json::from_str(text).map_err(|e| PaletteError::InvalidShape(e.to_string()))?;
    Ok(response.into_theme())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r##"{
        "primary": "#5D4037",
        "secondary": "#D7CCC8",
        "background": "#F5F5F5",
        "text": "#4E342E",
        "cardBackground": "#FFFFFF",
        "buttonText": "#FFFFFF"
    }"##;

    #[test]
    fn test_valid_palette_maps_to_theme() {
        let theme = parse_palette(VALID).expect("valid palette");
        assert_eq!(theme.len(), 6);
        assert_eq!(theme.get("primary").map(String::as_str), Some("#5D4037"));
        assert_eq!(
            theme.get("cardBackground").map(String::as_str),
            Some("#FFFFFF")
        );
    }

    #[test]
    fn test_missing_slot_is_rejected() {
        let incomplete = r##"{
            "primary": "#5D4037",
            "secondary": "#D7CCC8",
            "background": "#F5F5F5",
            "text": "#4E342E",
            "cardBackground": "#FFFFFF"
        }"##;
        assert!(matches!(
            parse_palette(incomplete),
            Err(PaletteError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_unknown_extra_slot_is_rejected() {
        let extra = r##"{
            "primary": "#111111",
            "secondary": "#222222",
            "background": "#333333",
            "text": "#444444",
            "cardBackground": "#555555",
            "buttonText": "#666666",
            "glow": "#777777"
        }"##;
        assert!(matches!(
            parse_palette(extra),
            Err(PaletteError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_non_string_slot_is_rejected() {
        let wrong_type = r##"{
            "primary": 5,
            "secondary": "#222222",
            "background": "#333333",
            "text": "#444444",
            "cardBackground": "#555555",
            "buttonText": "#666666"
        }"##;
        assert!(matches!(
            parse_palette(wrong_type),
            Err(PaletteError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_non_json_body_is_rejected() {
        assert!(matches!(
            parse_palette("the palette is brown-ish"),
            Err(PaletteError::InvalidShape(_))
        ));
    }
}
