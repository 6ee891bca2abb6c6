use crate::classification::domain::fallback_chain::{FallbackChain, FallbackOutcome, ModelStrategy};
use crate::classification::domain::text_emotion_model::TextEmotionModel;
use crate::shared::score::ScoreEntry;

/// Text → single primary emotion.
///
/// Wraps a [`FallbackChain`] whose model tier is present only when a text
/// model loaded at startup. Classification never fails; the caller is not
/// told which tier answered.
pub struct TextEmotionClassifier {
    chain: FallbackChain,
}

impl TextEmotionClassifier {
    pub fn new(chain: FallbackChain) -> Self {
        Self { chain }
    }

    pub fn with_model(name: impl Into<String>, model: Box<dyn TextEmotionModel>) -> Self {
        Self::new(FallbackChain::new(vec![Box::new(ModelStrategy::new(name, model))]))
    }

    pub fn heuristic_only() -> Self {
        Self::new(FallbackChain::heuristic_only())
    }

    pub fn has_model(&self) -> bool {
        self.chain.has_strategies()
    }

    pub fn classify(&self, text: &str) -> ScoreEntry {
        self.classify_traced(text).into_entry()
    }

    /// Like [`classify`](Self::classify) but keeps the producing tier.
    pub fn classify_traced(&self, text: &str) -> FallbackOutcome {
        let outcome = self.chain.run(text);
        log::debug!(
            "Text classified by {}: {} ({:.3})",
            outcome.source(),
            outcome.entry().label,
            outcome.entry().score
        );
        outcome
    }

    /// Heuristic tier only, for when the model tier cannot be waited on.
    pub fn classify_heuristic_only(&self, text: &str) -> ScoreEntry {
        self.chain.run_last_resort(text).into_entry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::InferenceError;

    struct StubTextModel(ScoreEntry);

    impl TextEmotionModel for StubTextModel {
        fn predict(&self, _text: &str) -> Result<ScoreEntry, InferenceError> {
            Ok(self.0.clone())
        }
    }

    struct FailingTextModel;

    impl TextEmotionModel for FailingTextModel {
        fn predict(&self, _text: &str) -> Result<ScoreEntry, InferenceError> {
            Err(InferenceError::runtime("tokenizer exploded"))
        }
    }

    #[test]
    fn test_no_model_keyword_match() {
        let classifier = TextEmotionClassifier::heuristic_only();
        assert!(!classifier.has_model());
        assert_eq!(
            classifier.classify("I am so happy today!"),
            ScoreEntry::new("joy", 0.9)
        );
    }

    #[test]
    fn test_empty_text_is_neutral_zero() {
        let classifier = TextEmotionClassifier::heuristic_only();
        assert_eq!(classifier.classify(""), ScoreEntry::new("neutral", 0.0));
    }

    #[test]
    fn test_question_mark_rule() {
        let classifier = TextEmotionClassifier::heuristic_only();
        assert_eq!(classifier.classify("Really?"), ScoreEntry::new("neutral", 0.55));
    }

    #[test]
    fn test_model_answer_takes_precedence() {
        let classifier = TextEmotionClassifier::with_model(
            "stub",
            Box::new(StubTextModel(ScoreEntry::new("sadness", 0.81))),
        );
        assert!(classifier.has_model());
        let outcome = classifier.classify_traced("I am so happy today!");
        assert_eq!(outcome, FallbackOutcome::Model(ScoreEntry::new("sadness", 0.81)));
    }

    #[test]
    fn test_model_failure_never_surfaces() {
        let classifier = TextEmotionClassifier::with_model("broken", Box::new(FailingTextModel));
        let outcome = classifier.classify_traced("I am so happy today!");
        assert_eq!(outcome, FallbackOutcome::Heuristic(ScoreEntry::new("joy", 0.9)));
    }

    #[test]
    fn test_heuristic_only_bypasses_model() {
        let classifier = TextEmotionClassifier::with_model(
            "stub",
            Box::new(StubTextModel(ScoreEntry::new("sadness", 0.81))),
        );
        assert_eq!(
            classifier.classify_heuristic_only("wow"),
            ScoreEntry::new("surprise", 0.9)
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = TextEmotionClassifier::heuristic_only();
        let text = "He was mad, then glad?";
        assert_eq!(classifier.classify(text), classifier.classify(text));
    }
}
