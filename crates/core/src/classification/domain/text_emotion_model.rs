use crate::shared::error::InferenceError;
use crate::shared::score::ScoreEntry;

/// A trained text classifier that reports only its arg-max class.
pub trait TextEmotionModel: Send + Sync {
    fn predict(&self, text: &str) -> Result<ScoreEntry, InferenceError>;
}
