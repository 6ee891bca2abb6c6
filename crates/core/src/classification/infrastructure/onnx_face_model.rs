use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;

use crate::classification::domain::face_emotion_classifier::{parse_labels, FaceEmotionClassifier};
use crate::classification::domain::face_emotion_model::FaceEmotionModel;
use crate::classification::infrastructure::execution_provider::load_session;
use crate::shared::error::{InferenceError, ModelLoadError};
use crate::shared::model_resolver;

/// Face emotion network exported to ONNX.
///
/// Expects a `[1, 3, 224, 224]` f32 input and a single `[1, N]` logits output.
pub struct OnnxFaceModel {
    session: Mutex<Session>,
}

impl OnnxFaceModel {
    pub fn new(model_path: &Path) -> Result<Self, ModelLoadError> {
        let session = load_session(model_path)?;
        log::info!("Loaded face emotion model from {}", model_path.display());
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl FaceEmotionModel for OnnxFaceModel {
    fn forward(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let input_value = ort::value::Tensor::from_array(input).map_err(InferenceError::runtime)?;
        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::Runtime(format!("Lock poisoned: {e}")))?;
        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(InferenceError::runtime)?;
        let logits = outputs[0]
            .try_extract_array::<f32>()
            .map_err(InferenceError::runtime)?;

        let shape = logits.shape().to_vec();
        if shape.len() != 2 || shape[0] != 1 {
            return Err(InferenceError::OutputShape(shape));
        }
        Ok(logits.iter().copied().collect())
    }
}

/// Reads `class_names.txt`. An empty vocabulary is a load failure.
pub fn load_labels(path: &Path) -> Result<Vec<String>, ModelLoadError> {
    let labels = parse_labels(&model_resolver::read_to_string(path)?);
    if labels.is_empty() {
        return Err(ModelLoadError::Labels(format!(
            "no labels in {}",
            path.display()
        )));
    }
    Ok(labels)
}

/// Loads the label file and the ONNX network into a ready classifier.
pub fn load_face_classifier(
    model_path: &Path,
    labels_path: &Path,
) -> Result<FaceEmotionClassifier, ModelLoadError> {
    let labels = load_labels(labels_path)?;
    let model = OnnxFaceModel::new(model_path)?;
    log::info!("Face classifier labels: {}", labels.join(", "));
    FaceEmotionClassifier::new(labels, Box::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_labels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("class_names.txt");
        fs::write(&path, "angry\nhappy\n\nsad\n").unwrap();
        assert_eq!(load_labels(&path).unwrap(), vec!["angry", "happy", "sad"]);
    }

    #[test]
    fn test_load_labels_rejects_blank_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("class_names.txt");
        fs::write(&path, "\n  \n").unwrap();
        assert!(matches!(load_labels(&path), Err(ModelLoadError::Labels(_))));
    }

    #[test]
    fn test_missing_label_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = load_face_classifier(
            &dir.path().join("face_model.onnx"),
            &dir.path().join("class_names.txt"),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ModelLoadError::MissingArtifact { .. }));
    }

    #[test]
    fn test_missing_model_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let labels = dir.path().join("class_names.txt");
        fs::write(&labels, "happy\nsad\n").unwrap();
        let err = load_face_classifier(&dir.path().join("face_model.onnx"), &labels)
            .err()
            .unwrap();
        assert!(matches!(err, ModelLoadError::MissingArtifact { .. }));
    }
}
