use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::shared::error::InferenceError;

/// One label with its confidence in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub label: String,
    pub score: f64,
}

impl ScoreEntry {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Labelled scores sorted descending, labels unique within the set.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreSet {
    entries: Vec<ScoreEntry>,
}

impl ScoreSet {
    /// Pairs each label with its probability and sorts highest first.
    ///
    /// Equal scores keep vocabulary order.
    pub fn from_probabilities(labels: &[String], probs: &[f32]) -> Result<Self, InferenceError> {
        if labels.len() != probs.len() {
            return Err(InferenceError::LabelMismatch {
                logits: probs.len(),
                labels: labels.len(),
            });
        }
        let mut seen = HashSet::with_capacity(labels.len());
        for label in labels {
            if !seen.insert(label.as_str()) {
                return Err(InferenceError::DuplicateLabel(label.clone()));
            }
        }

        let mut entries: Vec<ScoreEntry> = labels
            .iter()
            .zip(probs)
            .map(|(label, &p)| ScoreEntry::new(label.clone(), p as f64))
            .collect();
        entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        Ok(Self { entries })
    }

    /// The highest-scoring entry, `None` only for an empty vocabulary.
    pub fn top(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ScoreEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.score).sum()
    }
}

/// Numerically stable softmax: subtracts the max logit before exponentiating.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index and value of the largest probability; first wins on ties.
pub fn argmax(probs: &[f32]) -> Option<(usize, f32)> {
    probs
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, p)| match best {
            Some((_, bp)) if p <= bp => best,
            _ => Some((i, p)),
        })
}
