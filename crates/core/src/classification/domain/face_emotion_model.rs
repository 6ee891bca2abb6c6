use ndarray::Array4;

use crate::shared::error::InferenceError;

/// Raw forward pass of a pretrained face emotion network.
///
/// Takes a normalised `[1, 3, H, W]` tensor and returns one logit per class.
/// Shared read-only across requests, hence `&self` and `Sync`.
pub trait FaceEmotionModel: Send + Sync {
    fn forward(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}
