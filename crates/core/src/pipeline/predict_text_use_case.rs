use std::time::Instant;

use serde_json::Value;

use crate::classification::domain::text_emotion_classifier::TextEmotionClassifier;
use crate::composition::response_composer::{ResponseComposer, TextPrediction};
use crate::pipeline::inference_logger::{elapsed_ms, InferenceLogger};

/// Text path: classify through the fallback chain → compose.
///
/// Takes the raw JSON `text` field. Anything that is not a string is
/// classified like empty text and echoed back unchanged. Never fails.
pub struct PredictTextUseCase {
    classifier: TextEmotionClassifier,
    composer: ResponseComposer,
    logger: Box<dyn InferenceLogger>,
}

impl PredictTextUseCase {
    pub fn new(classifier: TextEmotionClassifier, logger: Box<dyn InferenceLogger>) -> Self {
        Self {
            classifier,
            composer: ResponseComposer,
            logger,
        }
    }

    pub fn has_model(&self) -> bool {
        self.classifier.has_model()
    }

    pub fn execute(&self, text: Value) -> TextPrediction {
        let start = Instant::now();
        let outcome = self.classifier.classify_traced(as_text(&text));
        self.logger.timing(&format!("text_{}", outcome.source()), elapsed_ms(start));
        self.composer.compose_text(text, outcome.into_entry())
    }

    /// Answers from the keyword heuristic alone, for when the model tier
    /// could not finish in time.
    pub fn execute_heuristic_only(&self, text: Value) -> TextPrediction {
        let primary = self.classifier.classify_heuristic_only(as_text(&text));
        self.logger.info("Text model unavailable for request, answered heuristically");
        self.composer.compose_text(text, primary)
    }

    pub fn logger(&self) -> &dyn InferenceLogger {
        self.logger.as_ref()
    }
}

fn as_text(value: &Value) -> &str {
    value.as_str().unwrap_or("")
}
