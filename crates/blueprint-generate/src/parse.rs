use blueprint_core::{ArtifactBundle, GenerateError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull the model's answer text out of a `generateContent` response body.
/// Text parts of the first candidate are joined; the result is trimmed.
pub fn candidate_text(body: &str) -> Result<String, GenerateError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GenerateError::invalid(format!("malformed response envelope: {e}")))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("no candidates (blocked: {r})"))
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(GenerateError::invalid(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    let text = text.trim();
    if text.is_empty() {
        let finish = candidate.finish_reason.as_deref().unwrap_or("unknown");
        return Err(GenerateError::invalid(format!(
            "candidate carried no text (finish reason: {finish})"
        )));
    }
    Ok(text.to_string())
}

/// Parse a successful response body into a validated bundle.
pub fn parse_response(body: &str) -> Result<ArtifactBundle, GenerateError> {
    let text = candidate_text(body)?;
    ArtifactBundle::from_response_text(&text)
}

/// Message from a service error body, e.g. `{"error":{"message":"..."}}`.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
}
