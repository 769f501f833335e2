// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs the classifiers for one check and fuses their verdicts.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use vigil_config::model::AssessmentConfig;
use vigil_core::{AssessmentVerdict, ChatTurn, LocalClassifier, RemoteClassifier};

use crate::features;
use crate::fusion::{FusionInput, FusionPolicy};
use crate::questionnaire::Questionnaire;

/// Outcome of one check, with the signals that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub verdict: AssessmentVerdict,
    pub input: FusionInput,
    /// Set when the remote classifier was consulted and produced no verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_error: Option<String>,
}

/// Orchestrates local and remote classification for a URL check.
pub struct Assessor {
    local: Arc<dyn LocalClassifier>,
    remote: Option<Arc<dyn RemoteClassifier>>,
    policy: FusionPolicy,
    bypass_remote_on_https: bool,
}

impl std::fmt::Debug for Assessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assessor")
            .field("remote", &self.remote.is_some())
            .field("policy", &self.policy)
            .field("bypass_remote_on_https", &self.bypass_remote_on_https)
            .finish()
    }
}

impl Assessor {
    pub fn new(
        local: Arc<dyn LocalClassifier>,
        remote: Option<Arc<dyn RemoteClassifier>>,
        config: &AssessmentConfig,
    ) -> Self {
        Self {
            local,
            remote,
            policy: FusionPolicy::from(config),
            bypass_remote_on_https: config.bypass_remote_on_https,
        }
    }

    pub fn policy(&self) -> &FusionPolicy {
        &self.policy
    }

    /// Check `url` against both classifiers and the user's answers.
    ///
    /// The remote classifier is skipped on the https fast path and when none
    /// is configured. A remote failure counts as "no remote verdict".
    pub async fn assess_url(
        &self,
        url: &str,
        history: &[ChatTurn],
        questionnaire: &Questionnaire,
    ) -> Assessment {
        let local_verdict = self.local.predict_url_safety(url);
        let bypass_remote = self.bypass_remote_on_https && features::is_https(url);

        let (remote_verdict, remote_error) = match (&self.remote, bypass_remote) {
            (Some(remote), false) => match remote.classify_text(url, history).await {
                Ok(verdict) => (Some(verdict), None),
                Err(e) => {
                    warn!(error = %e, "remote classifier unavailable, continuing without it");
                    (None, Some(e.to_string()))
                }
            },
            _ => (None, None),
        };

        let input = FusionInput {
            local_verdict,
            remote_verdict,
            red_flag_count: questionnaire.red_flag_count(),
            bypass_remote,
        };
        let verdict = self.policy.fuse(&input);
        debug!(
            ?local_verdict,
            ?remote_verdict,
            red_flags = input.red_flag_count,
            bypass_remote,
            %verdict,
            "assessment fused"
        );

        Assessment {
            verdict,
            input,
            remote_error,
        }
    }
}
