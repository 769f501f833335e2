// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vigil check` command implementation.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use vigil_assess::{Assessment, Assessor, HeuristicUrlClassifier, Questionnaire, RedFlag};
use vigil_config::VigilConfig;
use vigil_core::{RemoteClassifier, VigilError};
use vigil_gemini::GeminiClassifier;

use crate::CheckArgs;

/// JSON output of `vigil check --json`.
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    url: &'a str,
    red_flags: Vec<RedFlag>,
    #[serde(flatten)]
    assessment: &'a Assessment,
}

/// Build the assessor for this invocation.
///
/// The remote classifier is only wired in when an API key is configured and
/// `offline` is not set.
pub fn build_assessor(config: &VigilConfig, offline: bool) -> Result<Assessor, VigilError> {
    let local = Arc::new(HeuristicUrlClassifier::from_config(&config.assessment));
    let remote: Option<Arc<dyn RemoteClassifier>> =
        if offline || config.gemini.api_key.is_none() {
            debug!(offline, "remote classifier disabled");
            None
        } else {
            Some(Arc::new(GeminiClassifier::from_config(&config.gemini)?))
        };
    Ok(Assessor::new(local, remote, &config.assessment))
}

/// Run `vigil check`.
pub async fn run_check(config: &VigilConfig, args: CheckArgs) -> Result<(), VigilError> {
    let url = args.url.trim();
    if url.is_empty() {
        return Err(VigilError::InvalidInput("URL must not be empty".to_string()));
    }

    let assessor = build_assessor(config, args.offline)?;
    let questionnaire: Questionnaire = args.red_flags.iter().copied().collect();
    let assessment = assessor.assess_url(url, &[], &questionnaire).await;

    if args.json {
        let report = CheckReport {
            url,
            red_flags: questionnaire.flagged().collect(),
            assessment: &assessment,
        };
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| VigilError::Internal(format!("JSON serialization failed: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    println!("verdict: {}", assessment.verdict);
    println!("  local:  {}", describe(assessment.input.local_verdict));
    if assessment.input.bypass_remote {
        println!("  remote: skipped (https)");
    } else if let Some(error) = &assessment.remote_error {
        println!("  remote: unavailable ({error})");
    } else {
        println!("  remote: {}", describe(assessment.input.remote_verdict));
    }
    println!("  red flags: {}", assessment.input.red_flag_count);
    for flag in questionnaire.flagged() {
        println!("    - {}", flag.question());
    }
    Ok(())
}

fn describe(verdict: Option<vigil_core::AssessmentVerdict>) -> String {
    verdict.map_or_else(|| "none".to_string(), |v| v.to_string())
}
