use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::error::InferenceError;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// The face chosen for classification, with the pixels cut out of the frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LocatedFace {
    pub region: FaceRegion,
    pub crop: Frame,
    /// Number of candidates the detector reported.
    pub candidates: usize,
}

impl LocatedFace {
    /// True when no face was detected and the whole frame stands in for it.
    pub fn is_full_frame_fallback(&self) -> bool {
        self.candidates == 0
    }
}

/// Picks the single face a request is classified on.
///
/// Policy: the largest detected rectangle (width × height), first one
/// wins on ties. With no detections the entire frame is used as the crop.
pub struct FaceLocator {
    detector: Box<dyn FaceDetector>,
}

impl FaceLocator {
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self { detector }
    }

    pub fn locate(&self, frame: &Frame) -> Result<LocatedFace, InferenceError> {
        let candidates = self.detector.detect(frame)?;
        match select_largest(&candidates) {
            Some(region) => {
                log::debug!(
                    "Selected face {region:?} out of {} candidates",
                    candidates.len()
                );
                Ok(LocatedFace {
                    region: *region,
                    crop: frame.crop(region),
                    candidates: candidates.len(),
                })
            }
            None => {
                log::debug!("No face detected, classifying the full frame");
                Ok(LocatedFace {
                    region: FaceRegion::full_frame(frame.width(), frame.height()),
                    crop: frame.clone(),
                    candidates: 0,
                })
            }
        }
    }
}

/// Largest region by area; the earliest one wins on ties.
pub fn select_largest(regions: &[FaceRegion]) -> Option<&FaceRegion> {
    regions.iter().fold(None, |best, r| match best {
        Some(b) if r.area() <= b.area() => Some(b),
        _ => Some(r),
    })
}
