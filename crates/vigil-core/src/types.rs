// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the vault, the assessment engine, and their collaborators.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Final or intermediate verdict on a URL or message.
///
/// Variants are declared in ascending severity so the derived ordering
/// gives `Unsafe > Suspicious > Safe`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum AssessmentVerdict {
    Safe,
    Suspicious,
    Unsafe,
}

impl AssessmentVerdict {
    /// Parse a one-word classifier reply such as `"Unsafe."` or `" safe\n"`.
    ///
    /// Surrounding whitespace and trailing punctuation are ignored. Anything
    /// that is not exactly one of the three verdict words yields `None`.
    pub fn from_one_word(reply: &str) -> Option<Self> {
        let word = reply
            .trim()
            .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
        if word.is_empty() || word.contains(char::is_whitespace) {
            return None;
        }
        word.parse().ok()
    }
}

/// Speaker of a chat turn sent to the remote classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order_is_unsafe_suspicious_safe() {
        assert!(AssessmentVerdict::Unsafe > AssessmentVerdict::Suspicious);
        assert!(AssessmentVerdict::Suspicious > AssessmentVerdict::Safe);
        assert_eq!(
            [AssessmentVerdict::Safe, AssessmentVerdict::Unsafe, AssessmentVerdict::Suspicious]
                .into_iter()
                .max(),
            Some(AssessmentVerdict::Unsafe)
        );
    }

    #[test]
    fn one_word_replies_parse() {
        assert_eq!(AssessmentVerdict::from_one_word("Safe"), Some(AssessmentVerdict::Safe));
        assert_eq!(AssessmentVerdict::from_one_word("unsafe."), Some(AssessmentVerdict::Unsafe));
        assert_eq!(
            AssessmentVerdict::from_one_word("  SUSPICIOUS\n"),
            Some(AssessmentVerdict::Suspicious)
        );
    }

    #[test]
    fn chatty_or_empty_replies_are_rejected() {
        assert_eq!(AssessmentVerdict::from_one_word(""), None);
        assert_eq!(AssessmentVerdict::from_one_word("   "), None);
        assert_eq!(AssessmentVerdict::from_one_word("It looks safe"), None);
        assert_eq!(AssessmentVerdict::from_one_word("Maybe"), None);
    }

    #[test]
    fn chat_turn_serializes_role_lowercase() {
        let turn = ChatTurn::model("hello");
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"model","text":"hello"}"#);
        assert_eq!(ChatRole::User.to_string(), "user");
    }
}
