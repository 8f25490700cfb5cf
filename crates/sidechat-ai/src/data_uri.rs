//! `data:` URI handling for image attachments.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::types::InlineData;
use crate::AiError;

/// Split `data:<mime>;base64,<payload>` into an [`InlineData`] part.
///
/// The payload must be standard base64; it is kept encoded.
pub fn parse_data_uri(uri: &str) -> Result<InlineData, AiError> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| AiError::InvalidImage("missing data: prefix".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AiError::InvalidImage("missing payload separator".into()))?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default().trim();
    if mime_type.is_empty() || !mime_type.contains('/') {
        return Err(AiError::InvalidImage(format!(
            "invalid mime type {mime_type:?}"
        )));
    }
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(AiError::InvalidImage("payload is not base64 encoded".into()));
    }
    if payload.is_empty() {
        return Err(AiError::InvalidImage("empty payload".into()));
    }
    STANDARD
        .decode(payload)
        .map_err(|e| AiError::InvalidImage(format!("payload is not valid base64: {e}")))?;

    Ok(InlineData {
        mime_type: mime_type.to_string(),
        data: payload.to_string(),
    })
}

/// Build a base64 `data:` URI from raw bytes.
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Re-assemble the `data:` URI for an inline part.
pub fn to_data_uri(inline: &InlineData) -> String {
    format!("data:{};base64,{}", inline.mime_type, inline.data)
}
