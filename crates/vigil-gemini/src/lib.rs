// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini-backed remote text classifier for Vigil.
//!
//! Implements [`RemoteClassifier`] over the `generateContent` API with a
//! one-word verdict contract. A provider safety block counts as `Unsafe`;
//! everything else that is not a verdict word is `RemoteUnavailable`.

pub mod client;
pub mod types;

use async_trait::async_trait;
use tracing::{debug, info};
use vigil_config::model::GeminiConfig;
use vigil_core::{AssessmentVerdict, ChatTurn, RemoteClassifier, VigilError};

use crate::client::GeminiClient;
use crate::types::{Content, GenerateContentRequest, GenerationConfig, ReplyOutcome};

/// Instruction sent with every classification request.
pub const CLASSIFIER_INSTRUCTION: &str = "You are a cybersecurity assistant that screens links, \
emails, and messages for phishing and scams. Classify the final user message. Reply with exactly \
one word: Safe, Suspicious, or Unsafe.";

/// Remote classifier backed by a [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiClassifier {
    client: GeminiClient,
    instruction: String,
}

impl GeminiClassifier {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            instruction: CLASSIFIER_INSTRUCTION.to_string(),
        }
    }

    /// Builds a classifier from the `[gemini]` section.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, VigilError> {
        let client = GeminiClient::from_config(config)?;
        info!(model = client.model(), "Gemini classifier initialized");
        Ok(Self::new(client))
    }

    /// Replaces the system instruction.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    fn to_request(&self, text: &str, history: &[ChatTurn]) -> GenerateContentRequest {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content::text(Some(&turn.role.to_string()), turn.text.clone()))
            .collect();
        contents.push(Content::text(Some("user"), text));

        GenerateContentRequest {
            contents,
            system_instruction: Some(Content::text(None, self.instruction.clone())),
            generation_config: Some(GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 8,
            }),
        }
    }
}

#[async_trait]
impl RemoteClassifier for GeminiClassifier {
    async fn classify_text(
        &self,
        text: &str,
        history: &[ChatTurn],
    ) -> Result<AssessmentVerdict, VigilError> {
        let response = self
            .client
            .generate_content(&self.to_request(text, history))
            .await?;

        match response.outcome() {
            ReplyOutcome::Blocked(reason) => {
                debug!(reason = %reason, "provider safety block treated as unsafe");
                Ok(AssessmentVerdict::Unsafe)
            }
            ReplyOutcome::Text(reply) => AssessmentVerdict::from_one_word(&reply).ok_or_else(|| {
                VigilError::remote(format!("unrecognised classifier reply: {:?}", reply.trim()))
            }),
            ReplyOutcome::Empty => Err(VigilError::remote("empty classifier reply")),
        }
    }
}
