// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Risk assessment for URLs and messages.
//!
//! A local URL classifier, an optional remote text classifier, and the user's
//! red-flag answers are combined by a fixed precedence policy ([`fusion`]).
//! The local verdict is authoritative when present; red flags can escalate a
//! clean local result but never clear a bad one.

pub mod assessor;
pub mod features;
pub mod fusion;
pub mod heuristic;
pub mod questionnaire;

pub use assessor::{Assessment, Assessor};
pub use features::UrlFeatures;
pub use fusion::{FusionInput, FusionPolicy, fuse};
pub use heuristic::HeuristicUrlClassifier;
pub use questionnaire::{Questionnaire, RedFlag};
