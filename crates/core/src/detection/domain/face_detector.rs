use crate::shared::error::InferenceError;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Domain interface for face detection.
///
/// Detectors are loaded once and shared by every request, so detection
/// takes `&self` and implementations must be safe to call concurrently.
pub trait FaceDetector: Send + Sync {
    /// Candidate face rectangles in detection order.
    fn detect(&self, frame: &Frame) -> Result<Vec<FaceRegion>, InferenceError>;
}
