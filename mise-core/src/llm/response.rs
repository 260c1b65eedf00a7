//! Gemini `generateContent` wire types and defensive response parsing.

use serde::{Deserialize, Serialize};

use super::{GeneratedText, GenerationError, GenerationResult};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestContent {
    pub role: &'static str,
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestPart {
    pub text: String,
}

impl GenerateContentRequest {
    /// One user turn with one text part per prompt line.
    pub fn from_lines(lines: &[String]) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: lines
                    .iter()
                    .map(|line| RequestPart { text: line.clone() })
                    .collect(),
            }],
        }
    }
}

// Every level is optional: the upstream reply is untrusted.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Google API error envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct GoogleErrorResponse {
    pub error: GoogleApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleApiError {
    pub message: String,
}

/// Parse a `generateContent` response body.
///
/// Succeeds only when the body has a first candidate with content holding at
/// least one text part. The text parts are joined with `\n`. Any other shape
/// is a [`GenerationError::MalformedResponse`] carrying the raw body.
pub fn parse_generate_response(body: &str) -> GenerationResult {
    let malformed = |reason: &str| GenerationError::MalformedResponse {
        reason: reason.to_string(),
        payload: body.to_string(),
    };

    let response: Option<GenerateContentResponse> = serde_json::from_str(body)
        .map_err(|e| malformed(&format!("invalid JSON: {}", e)))?;

    let response = response.ok_or_else(|| malformed("no response"))?;

    let candidate = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .ok_or_else(|| malformed("no candidates"))?;

    let finish_reason = candidate.finish_reason;

    let parts = candidate
        .content
        .ok_or_else(|| malformed("candidate has no content"))?
        .parts
        .unwrap_or_default();

    let fragments: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
    if fragments.is_empty() {
        return Err(malformed("content has no text parts"));
    }

    Ok(GeneratedText {
        text: fragments.join("\n"),
        finish_reason,
    })
}
