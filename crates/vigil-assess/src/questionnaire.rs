// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Red-flag questionnaire answered by the user before a verdict is fused.

use std::collections::BTreeSet;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// A yes/no warning sign. A "yes" answer counts as one red flag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum RedFlag {
    UnexpectedMessage,
    UrgentLanguage,
    RequestsCredentials,
    SenderMismatch,
    TooGoodToBeTrue,
    UnexpectedAttachment,
}

impl RedFlag {
    /// Question shown to the user.
    pub fn question(&self) -> &'static str {
        match self {
            RedFlag::UnexpectedMessage => "Did this arrive without you asking for it?",
            RedFlag::UrgentLanguage => "Does it pressure you to act immediately?",
            RedFlag::RequestsCredentials => {
                "Does it ask for a password, one-time code, or payment details?"
            }
            RedFlag::SenderMismatch => {
                "Does the sender's address differ from the organisation it claims to be?"
            }
            RedFlag::TooGoodToBeTrue => "Does it promise a prize, refund, or reward?",
            RedFlag::UnexpectedAttachment => "Does it include an attachment or download you did not expect?",
        }
    }

    /// Every question, in presentation order.
    pub fn all() -> impl Iterator<Item = RedFlag> {
        RedFlag::iter()
    }
}

/// The set of questions answered "yes".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Questionnaire {
    flagged: BTreeSet<RedFlag>,
}

impl Questionnaire {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the answer to one question. Answering again replaces it.
    pub fn answer(&mut self, flag: RedFlag, yes: bool) {
        if yes {
            self.flagged.insert(flag);
        } else {
            self.flagged.remove(&flag);
        }
    }

    pub fn is_flagged(&self, flag: RedFlag) -> bool {
        self.flagged.contains(&flag)
    }

    /// Number of distinct "yes" answers.
    pub fn red_flag_count(&self) -> u32 {
        self.flagged.len() as u32
    }

    pub fn flagged(&self) -> impl Iterator<Item = RedFlag> + '_ {
        self.flagged.iter().copied()
    }
}

impl FromIterator<RedFlag> for Questionnaire {
    fn from_iter<I: IntoIterator<Item = RedFlag>>(iter: I) -> Self {
        Self {
            flagged: iter.into_iter().collect(),
        }
    }
}
