//! Ordered text classification strategies.
//!
//! Each strategy reports an explicit [`Attempt`]; the chain stops at the
//! first one that produces a result and otherwise lands on the keyword
//! heuristic, which never fails. Nothing here unwinds or propagates errors.

use crate::classification::domain::keyword_heuristic::KeywordHeuristic;
use crate::classification::domain::text_emotion_model::TextEmotionModel;
use crate::shared::constants::NEUTRAL_LABEL;
use crate::shared::score::ScoreEntry;

/// Result of asking one strategy to classify a text.
#[derive(Clone, Debug, PartialEq)]
pub enum Attempt {
    Produced(ScoreEntry),
    Unavailable,
}

/// Which tier of the chain produced the final entry.
#[derive(Clone, Debug, PartialEq)]
pub enum FallbackOutcome {
    Model(ScoreEntry),
    Heuristic(ScoreEntry),
}

impl FallbackOutcome {
    pub fn entry(&self) -> &ScoreEntry {
        match self {
            FallbackOutcome::Model(e) | FallbackOutcome::Heuristic(e) => e,
        }
    }

    pub fn into_entry(self) -> ScoreEntry {
        match self {
            FallbackOutcome::Model(e) | FallbackOutcome::Heuristic(e) => e,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            FallbackOutcome::Model(_) => "model",
            FallbackOutcome::Heuristic(_) => "heuristic",
        }
    }
}

/// A named, model-backed way of classifying text.
pub trait TextStrategy: Send + Sync {
    fn name(&self) -> &str;
    fn attempt(&self, text: &str) -> Attempt;
}

/// Adapts a [`TextEmotionModel`] into a strategy. Any model error turns
/// into [`Attempt::Unavailable`].
pub struct ModelStrategy {
    name: String,
    model: Box<dyn TextEmotionModel>,
}

impl ModelStrategy {
    pub fn new(name: impl Into<String>, model: Box<dyn TextEmotionModel>) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }
}

impl TextStrategy for ModelStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn attempt(&self, text: &str) -> Attempt {
        match self.model.predict(text) {
            Ok(entry) => Attempt::Produced(entry),
            Err(e) => {
                log::warn!("Text model '{}' failed, falling back: {e}", self.name);
                Attempt::Unavailable
            }
        }
    }
}

pub struct FallbackChain {
    strategies: Vec<Box<dyn TextStrategy>>,
    last_resort: KeywordHeuristic,
}

impl FallbackChain {
    pub fn new(strategies: Vec<Box<dyn TextStrategy>>) -> Self {
        Self {
            strategies,
            last_resort: KeywordHeuristic,
        }
    }

    pub fn heuristic_only() -> Self {
        Self::new(Vec::new())
    }

    pub fn has_strategies(&self) -> bool {
        !self.strategies.is_empty()
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Tries each strategy in order, then the heuristic.
    ///
    /// Blank text skips every tier and scores `neutral` at 0.0.
    pub fn run(&self, text: &str) -> FallbackOutcome {
        if let Some(outcome) = blank_outcome(text) {
            return outcome;
        }
        for strategy in &self.strategies {
            if let Attempt::Produced(entry) = strategy.attempt(text) {
                return FallbackOutcome::Model(entry);
            }
        }
        FallbackOutcome::Heuristic(self.last_resort.classify(text))
    }

    /// Skips the model strategies entirely.
    pub fn run_last_resort(&self, text: &str) -> FallbackOutcome {
        blank_outcome(text)
            .unwrap_or_else(|| FallbackOutcome::Heuristic(self.last_resort.classify(text)))
    }
}

fn blank_outcome(text: &str) -> Option<FallbackOutcome> {
    text.trim()
        .is_empty()
        .then(|| FallbackOutcome::Heuristic(ScoreEntry::new(NEUTRAL_LABEL, 0.0)))
}
