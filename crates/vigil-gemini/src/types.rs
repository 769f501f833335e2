// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini `generateContent` request/response types.

use serde::{Deserialize, Serialize};

/// Finish reason reported when output was withheld by safety filters.
pub const FINISH_REASON_SAFETY: &str = "SAFETY";

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A role-tagged list of parts. `role` is `"user"` or `"model"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Response body for `generateContent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// What a response amounts to, before verdict parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The provider refused on safety grounds.
    Blocked(String),
    Text(String),
    Empty,
}

impl GenerateContentResponse {
    pub fn outcome(&self) -> ReplyOutcome {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return ReplyOutcome::Blocked(reason.clone());
        }

        let Some(candidate) = self.candidates.first() else {
            return ReplyOutcome::Empty;
        };
        if candidate.finish_reason.as_deref() == Some(FINISH_REASON_SAFETY) {
            return ReplyOutcome::Blocked(FINISH_REASON_SAFETY.to_string());
        }

        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            ReplyOutcome::Empty
        } else {
            ReplyOutcome::Text(text)
        }
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn request_serializes_in_camel_case() {
        let req = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), "hi")],
            system_instruction: Some(Content::text(None, "be brief")),
            generation_config: Some(GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 8,
            }),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 8);
    }

    #[test]
    fn text_parts_are_concatenated() {
        let resp = parse(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Uns"}, {"text": "afe"}]},
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(resp.outcome(), ReplyOutcome::Text("Unsafe".into()));
    }

    #[test]
    fn prompt_block_is_reported() {
        let resp = parse(serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        assert_eq!(resp.outcome(), ReplyOutcome::Blocked("SAFETY".into()));
    }

    #[test]
    fn safety_finish_reason_is_reported() {
        let resp = parse(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }));
        assert_eq!(resp.outcome(), ReplyOutcome::Blocked("SAFETY".into()));
    }

    #[test]
    fn missing_candidates_is_empty() {
        assert_eq!(parse(serde_json::json!({})).outcome(), ReplyOutcome::Empty);
        let blank = parse(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "  "}]}}]
        }));
        assert_eq!(blank.outcome(), ReplyOutcome::Empty);
    }
}
