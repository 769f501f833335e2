// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic fusion of local, remote, and questionnaire signals.

use serde::Serialize;
use vigil_config::model::AssessmentConfig;
use vigil_core::AssessmentVerdict::{self, Safe, Suspicious, Unsafe};

/// All signals for one check, built once and passed by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FusionInput {
    pub local_verdict: Option<AssessmentVerdict>,
    pub remote_verdict: Option<AssessmentVerdict>,
    /// Number of "yes" answers on the red-flag questionnaire.
    pub red_flag_count: u32,
    /// Fast path: the remote verdict is not consulted.
    pub bypass_remote: bool,
}

/// Thresholds and the missing-local approval flag.
///
/// The defaults are the shipped policy. In particular
/// `treat_missing_local_as_approved = false` means a check without a local
/// verdict can never come out `Safe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FusionPolicy {
    pub safe_escalation_threshold: u32,
    pub suspicious_escalation_threshold: u32,
    pub fallback_escalation_threshold: u32,
    pub treat_missing_local_as_approved: bool,
}

impl Default for FusionPolicy {
    fn default() -> Self {
        Self {
            safe_escalation_threshold: 3,
            suspicious_escalation_threshold: 2,
            fallback_escalation_threshold: 3,
            treat_missing_local_as_approved: false,
        }
    }
}

impl From<&AssessmentConfig> for FusionPolicy {
    fn from(config: &AssessmentConfig) -> Self {
        Self {
            safe_escalation_threshold: config.safe_escalation_threshold,
            suspicious_escalation_threshold: config.suspicious_escalation_threshold,
            fallback_escalation_threshold: config.fallback_escalation_threshold,
            treat_missing_local_as_approved: config.treat_missing_local_as_approved,
        }
    }
}

impl FusionPolicy {
    /// Map `input` to a single verdict.
    pub fn fuse(&self, input: &FusionInput) -> AssessmentVerdict {
        let remote = if input.bypass_remote {
            None
        } else {
            input.remote_verdict
        };
        let remote_unsafe = remote == Some(Unsafe);
        let flags = input.red_flag_count;

        match input.local_verdict {
            // Local unsafe is a hard stop.
            Some(Unsafe) => Unsafe,
            Some(Safe) => {
                if remote_unsafe || flags >= self.safe_escalation_threshold {
                    Suspicious
                } else {
                    Safe
                }
            }
            Some(Suspicious) => {
                if remote_unsafe || flags >= self.suspicious_escalation_threshold {
                    Unsafe
                } else {
                    Suspicious
                }
            }
            None => {
                let approved = self.treat_missing_local_as_approved;
                if approved && remote == Some(Safe) && flags == 0 {
                    Safe
                } else if !approved || remote_unsafe || flags >= self.fallback_escalation_threshold {
                    Unsafe
                } else {
                    Suspicious
                }
            }
        }
    }
}

/// [`FusionPolicy::fuse`] with the default policy.
pub fn fuse(input: &FusionInput) -> AssessmentVerdict {
    FusionPolicy::default().fuse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn input(
        local: Option<AssessmentVerdict>,
        remote: Option<AssessmentVerdict>,
        red_flag_count: u32,
    ) -> FusionInput {
        FusionInput {
            local_verdict: local,
            remote_verdict: remote,
            red_flag_count,
            bypass_remote: false,
        }
    }

    #[test]
    fn local_unsafe_dominates() {
        assert_eq!(fuse(&input(Some(Unsafe), Some(Safe), 0)), Unsafe);
    }

    #[test]
    fn clean_pass() {
        assert_eq!(fuse(&input(Some(Safe), Some(Safe), 0)), Safe);
    }

    #[test]
    fn red_flags_escalate_safe_to_suspicious() {
        assert_eq!(fuse(&input(Some(Safe), None, 2)), Safe);
        assert_eq!(fuse(&input(Some(Safe), None, 3)), Suspicious);
    }

    #[test]
    fn remote_unsafe_escalates_safe_to_suspicious() {
        assert_eq!(fuse(&input(Some(Safe), Some(Unsafe), 0)), Suspicious);
    }

    #[test]
    fn red_flags_escalate_suspicious_to_unsafe() {
        assert_eq!(fuse(&input(Some(Suspicious), None, 1)), Suspicious);
        assert_eq!(fuse(&input(Some(Suspicious), None, 2)), Unsafe);
        assert_eq!(fuse(&input(Some(Suspicious), Some(Unsafe), 0)), Unsafe);
    }

    #[test]
    fn bypass_path_trusts_local() {
        let fast = FusionInput {
            local_verdict: Some(Safe),
            remote_verdict: None,
            red_flag_count: 0,
            bypass_remote: true,
        };
        assert_eq!(fuse(&fast), Safe);
    }

    #[test]
    fn bypass_ignores_a_supplied_remote_verdict() {
        let fast = FusionInput {
            local_verdict: Some(Safe),
            remote_verdict: Some(Unsafe),
            red_flag_count: 0,
            bypass_remote: true,
        };
        assert_eq!(fuse(&fast), Safe);
    }

    #[test]
    fn missing_local_is_never_safe_by_default() {
        assert_eq!(fuse(&input(None, Some(Safe), 0)), Unsafe);
        assert_eq!(fuse(&input(None, None, 0)), Unsafe);
    }

    #[test]
    fn approving_missing_local_reaches_safe_and_suspicious() {
        let policy = FusionPolicy {
            treat_missing_local_as_approved: true,
            ..FusionPolicy::default()
        };
        assert_eq!(policy.fuse(&input(None, Some(Safe), 0)), Safe);
        assert_eq!(policy.fuse(&input(None, Some(Safe), 1)), Suspicious);
        assert_eq!(policy.fuse(&input(None, None, 0)), Suspicious);
        assert_eq!(policy.fuse(&input(None, Some(Unsafe), 0)), Unsafe);
        assert_eq!(policy.fuse(&input(None, Some(Safe), 3)), Unsafe);
    }

    #[test]
    fn policy_from_config_defaults_matches_default_policy() {
        assert_eq!(FusionPolicy::from(&AssessmentConfig::default()), FusionPolicy::default());
    }

    fn verdict() -> impl Strategy<Value = AssessmentVerdict> {
        prop_oneof![Just(Safe), Just(Suspicious), Just(Unsafe)]
    }

    fn fusion_input() -> impl Strategy<Value = FusionInput> {
        (
            proptest::option::of(verdict()),
            proptest::option::of(verdict()),
            0u32..10,
            any::<bool>(),
        )
            .prop_map(|(local_verdict, remote_verdict, red_flag_count, bypass_remote)| {
                FusionInput {
                    local_verdict,
                    remote_verdict,
                    red_flag_count,
                    bypass_remote,
                }
            })
    }

    proptest! {
        #[test]
        fn local_unsafe_is_always_unsafe(mut input in fusion_input()) {
            input.local_verdict = Some(Unsafe);
            prop_assert_eq!(fuse(&input), Unsafe);
        }

        #[test]
        fn local_safe_never_becomes_unsafe(mut input in fusion_input()) {
            input.local_verdict = Some(Safe);
            prop_assert_ne!(fuse(&input), Unsafe);
        }

        #[test]
        fn local_suspicious_never_becomes_safe(mut input in fusion_input()) {
            input.local_verdict = Some(Suspicious);
            prop_assert_ne!(fuse(&input), Safe);
        }

        #[test]
        fn more_red_flags_never_lower_severity(input in fusion_input(), extra in 0u32..5) {
            let more = FusionInput { red_flag_count: input.red_flag_count + extra, ..input };
            prop_assert!(fuse(&more) >= fuse(&input));
        }

        #[test]
        fn bypass_equals_absent_remote(input in fusion_input()) {
            let bypassed = FusionInput { bypass_remote: true, ..input };
            let absent = FusionInput { remote_verdict: None, bypass_remote: false, ..input };
            prop_assert_eq!(fuse(&bypassed), fuse(&absent));
        }
    }
}
