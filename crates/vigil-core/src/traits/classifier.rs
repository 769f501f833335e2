// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Verdict sources consumed by the assessment engine.

use async_trait::async_trait;

use crate::error::VigilError;
use crate::types::{AssessmentVerdict, ChatTurn};

/// On-device URL classifier.
///
/// Returns `None` when the URL cannot be parsed or has no host. Otherwise
/// returns `Safe` or `Unsafe`, never `Suspicious`.
pub trait LocalClassifier: Send + Sync {
    fn predict_url_safety(&self, url: &str) -> Option<AssessmentVerdict>;
}

/// Remote text classifier with a one-word verdict contract.
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    /// Classifies `text` in the context of prior conversation `history`.
    ///
    /// A provider-side safety block is reported as `Ok(Unsafe)`. Transport
    /// failures, HTTP errors, and replies that are not a verdict word are
    /// reported as [`VigilError::RemoteUnavailable`].
    async fn classify_text(
        &self,
        text: &str,
        history: &[ChatTurn],
    ) -> Result<AssessmentVerdict, VigilError>;
}
