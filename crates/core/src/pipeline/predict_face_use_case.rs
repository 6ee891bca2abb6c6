use std::time::Instant;

use thiserror::Error;

use crate::classification::domain::face_emotion_classifier::FaceEmotionClassifier;
use crate::composition::response_composer::{FacePrediction, ResponseComposer};
use crate::decoding::image_decoder::ImageDecoder;
use crate::detection::domain::face_locator::FaceLocator;
use crate::pipeline::inference_logger::{elapsed_ms, InferenceLogger};
use crate::shared::error::{DecodeError, InferenceError};

/// Anything that stops a face request after validation. Never recovered.
#[derive(Error, Debug)]
pub enum FacePipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Image path: decode → locate → classify → compose.
pub struct PredictFaceUseCase {
    decoder: ImageDecoder,
    locator: FaceLocator,
    classifier: FaceEmotionClassifier,
    composer: ResponseComposer,
    logger: Box<dyn InferenceLogger>,
}

impl PredictFaceUseCase {
    pub fn new(
        locator: FaceLocator,
        classifier: FaceEmotionClassifier,
        logger: Box<dyn InferenceLogger>,
    ) -> Self {
        Self {
            decoder: ImageDecoder::new(),
            locator,
            classifier,
            composer: ResponseComposer,
            logger,
        }
    }

    pub fn execute(&self, payload: &str) -> Result<FacePrediction, FacePipelineError> {
        let start = Instant::now();
        let frame = self.decoder.decode(payload)?;
        self.logger.timing("decode", elapsed_ms(start));

        let start = Instant::now();
        let face = self.locator.locate(&frame)?;
        self.logger.timing("detect", elapsed_ms(start));
        self.logger.metric("faces", face.candidates as f64);
        if face.is_full_frame_fallback() {
            log::debug!(
                "No face in {}x{} frame, using full frame",
                frame.width(),
                frame.height()
            );
        }

        let start = Instant::now();
        let scores = self.classifier.classify(&face.crop)?;
        self.logger.timing("classify", elapsed_ms(start));

        Ok(self.composer.compose_face(scores))
    }

    pub fn logger(&self) -> &dyn InferenceLogger {
        self.logger.as_ref()
    }
}
