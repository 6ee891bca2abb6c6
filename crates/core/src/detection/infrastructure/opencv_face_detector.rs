use std::path::{Path, PathBuf};
use std::sync::Mutex;

use opencv::core::{AlgorithmHint, Mat, Rect, Size, Vector};
use opencv::imgproc;
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{
    BUNDLED_CASCADE, CASCADE_NAME, DEFAULT_MIN_FACE_SIZE, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};
use crate::shared::error::{InferenceError, ModelLoadError};
use crate::shared::frame::{Frame, RGB_CHANNELS};
use crate::shared::model_resolver;
use crate::shared::region::FaceRegion;

/// `detectMultiScale` tuning.
///
/// Looser settings (smaller `min_neighbors`, larger `scale_factor`) raise
/// false positives; tighter ones miss more faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    pub scale_factor: f64,
    pub min_neighbors: usize,
    /// Smallest face edge in pixels.
    pub min_size: u32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_size: DEFAULT_MIN_FACE_SIZE,
        }
    }
}

impl DetectionParams {
    fn validate(&self) -> Result<(), ModelLoadError> {
        if !(self.scale_factor > 1.0 && self.scale_factor.is_finite()) {
            return Err(ModelLoadError::Config(format!(
                "scale factor must be greater than 1, got {}",
                self.scale_factor
            )));
        }
        if i32::try_from(self.min_neighbors).is_err() || i32::try_from(self.min_size).is_err() {
            return Err(ModelLoadError::Config(
                "min_neighbors and min_size must fit in i32".into(),
            ));
        }
        Ok(())
    }
}

/// Frontal-face detector backed by OpenCV's Haar `CascadeClassifier`.
pub struct OpencvFaceDetector {
    classifier: Mutex<CascadeClassifier>,
    params: DetectionParams,
}

impl OpencvFaceDetector {
    pub fn from_file(path: &Path, params: DetectionParams) -> Result<Self, ModelLoadError> {
        params.validate()?;
        model_resolver::require_file(path)?;
        let path_str = path
            .to_str()
            .ok_or_else(|| ModelLoadError::Cascade(format!("non UTF-8 path {}", path.display())))?;

        let classifier = CascadeClassifier::new(path_str)
            .map_err(|e| ModelLoadError::Cascade(format!("{}: {e}", path.display())))?;
        if classifier
            .empty()
            .map_err(|e| ModelLoadError::Cascade(e.to_string()))?
        {
            return Err(ModelLoadError::Cascade(format!(
                "{} holds no usable cascade",
                path.display()
            )));
        }

        log::info!("Loaded Haar cascade from {}", path.display());
        Ok(Self {
            classifier: Mutex::new(classifier),
            params,
        })
    }

    pub fn params(&self) -> DetectionParams {
        self.params
    }
}

impl FaceDetector for OpencvFaceDetector {
    fn detect(&self, frame: &Frame) -> Result<Vec<FaceRegion>, InferenceError> {
        if frame.is_empty() {
            return Ok(Vec::new());
        }
        let gray = frame_to_gray(frame).map_err(InferenceError::runtime)?;

        let min_edge = self.params.min_size as i32;
        let mut faces = Vector::<Rect>::new();
        let mut classifier = self
            .classifier
            .lock()
            .map_err(|e| InferenceError::Runtime(format!("Lock poisoned: {e}")))?;
        classifier
            .detect_multi_scale(
                &gray,
                &mut faces,
                self.params.scale_factor,
                self.params.min_neighbors as i32,
                0,
                Size::new(min_edge, min_edge),
                Size::new(0, 0),
            )
            .map_err(InferenceError::runtime)?;

        log::debug!("Cascade found {} faces", faces.len());
        Ok(faces.iter().map(to_region).collect())
    }
}

/// Single-channel copy of `frame` using OpenCV's RGB→gray weights.
pub fn frame_to_gray(frame: &Frame) -> opencv::Result<Mat> {
    let flat = Mat::from_slice(frame.data())?;
    let rgb = flat.reshape(RGB_CHANNELS as i32, frame.height() as i32)?;
    let mut gray = Mat::default();
    imgproc::cvt_color(
        &rgb,
        &mut gray,
        imgproc::COLOR_RGB2GRAY,
        0,
        AlgorithmHint::ALGO_HINT_DEFAULT,
    )?;
    Ok(gray)
}

fn to_region(rect: Rect) -> FaceRegion {
    FaceRegion::new(rect.x, rect.y, rect.width, rect.height)
}

/// The configured cascade if it exists, otherwise the frontal-face cascade
/// shipped in OpenCV's data directory.
pub fn locate_cascade(configured: &Path) -> Result<PathBuf, ModelLoadError> {
    if configured.is_file() {
        return Ok(configured.to_path_buf());
    }
    match opencv::core::find_file(BUNDLED_CASCADE, false, true) {
        Ok(found) if !found.is_empty() => {
            log::info!(
                "{} not found, using OpenCV's bundled {CASCADE_NAME}",
                configured.display()
            );
            Ok(PathBuf::from(found))
        }
        _ => Err(ModelLoadError::MissingArtifact {
            path: configured.to_path_buf(),
        }),
    }
}
