//! Wire shapes shared by both prediction paths.
//!
//! The text path reports a two-entry distribution: the primary entry and a
//! synthetic `neutral` entry worth `1 - primary.score`, rounded to two
//! decimals. With more than two classes this is not a true probability, but
//! clients depend on it. The face path carries its real distribution in
//! `all_predictions` and the same primary-then-complement tail at the end of
//! `predictions`.

use serde::Serialize;
use serde_json::Value;

use crate::shared::constants::NEUTRAL_LABEL;
use crate::shared::score::{ScoreEntry, ScoreSet};

/// Body of a successful face prediction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FacePrediction {
    pub label: String,
    pub score: f64,
    /// Full distribution, highest first.
    pub all_predictions: Vec<ScoreEntry>,
    /// Full distribution followed by the neutral complement of the top entry.
    pub predictions: Vec<ScoreEntry>,
}

/// Body of a successful text prediction. `text` echoes the request field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextPrediction {
    pub text: Value,
    pub predictions: Vec<ScoreEntry>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseComposer;

impl ResponseComposer {
    pub fn compose_face(&self, scores: ScoreSet) -> FacePrediction {
        let all_predictions = scores.into_entries();
        let primary = all_predictions
            .first()
            .cloned()
            .unwrap_or_else(|| ScoreEntry::new(NEUTRAL_LABEL, 0.0));

        let mut predictions = all_predictions.clone();
        predictions.push(neutral_complement(&primary));

        FacePrediction {
            label: primary.label,
            score: primary.score,
            all_predictions,
            predictions,
        }
    }

    pub fn compose_text(&self, text: Value, primary: ScoreEntry) -> TextPrediction {
        let complement = neutral_complement(&primary);
        TextPrediction {
            text,
            predictions: vec![primary, complement],
        }
    }
}

pub fn neutral_complement(primary: &ScoreEntry) -> ScoreEntry {
    ScoreEntry::new(NEUTRAL_LABEL, round2(1.0 - primary.score))
}

/// Two decimal places, rounding the exact binary value with ties to even.
///
/// `0.125` becomes `0.12`, and `0.015` (stored just below the tie) `0.01`.
pub fn round2(x: f64) -> f64 {
    format!("{x:.2}").parse().unwrap_or(x)
}
