// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic URL safety classification.
//!
//! Scores lexical [`UrlFeatures`] with zero-cost rules. No network, no model.
//! Answers `Safe` or `Unsafe` only.

use tracing::trace;
use vigil_config::model::AssessmentConfig;
use vigil_core::{AssessmentVerdict, LocalClassifier};

use crate::features::UrlFeatures;

/// URLs longer than this score a point.
const LONG_URL: usize = 75;
/// Paths longer than this score a point.
const LONG_PATH: usize = 40;
/// This many dots or more score a point.
const MANY_DOTS: usize = 5;

/// Local classifier backed by [`UrlFeatures`] scoring.
#[derive(Debug, Clone)]
pub struct HeuristicUrlClassifier {
    unsafe_score_threshold: u32,
}

impl Default for HeuristicUrlClassifier {
    fn default() -> Self {
        Self::new(3)
    }
}

impl HeuristicUrlClassifier {
    pub fn new(unsafe_score_threshold: u32) -> Self {
        Self {
            unsafe_score_threshold,
        }
    }

    pub fn from_config(config: &AssessmentConfig) -> Self {
        Self::new(config.unsafe_score_threshold)
    }

    /// Risk score of `features`; higher is worse.
    pub fn score(features: &UrlFeatures) -> u32 {
        let mut score = 0;

        // Signal 1: literal IPv4 host (weighted double)
        if features.ipv4_host {
            score += 2;
        }

        // Signal 2: no TLS
        if !features.is_https {
            score += 1;
        }

        // Signal 3: overall length
        if features.length > LONG_URL {
            score += 1;
        }

        // Signal 4: subdomain stacking
        if features.dot_count >= MANY_DOTS {
            score += 1;
        }

        // Signal 5: deep path
        if features.path_length > LONG_PATH {
            score += 1;
        }

        score
    }
}

impl LocalClassifier for HeuristicUrlClassifier {
    fn predict_url_safety(&self, url: &str) -> Option<AssessmentVerdict> {
        let features = UrlFeatures::extract(url)?;
        let score = Self::score(&features);
        trace!(score, threshold = self.unsafe_score_threshold, "url scored");

        Some(if score >= self.unsafe_score_threshold {
            AssessmentVerdict::Unsafe
        } else {
            AssessmentVerdict::Safe
        })
    }
}
