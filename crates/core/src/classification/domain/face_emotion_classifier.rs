use std::collections::HashSet;

use image::imageops::FilterType;
use ndarray::Array4;

use crate::classification::domain::face_emotion_model::FaceEmotionModel;
use crate::shared::constants::{FACE_INPUT_SIZE, IMAGENET_MEAN, IMAGENET_STD};
use crate::shared::error::{InferenceError, ModelLoadError};
use crate::shared::frame::Frame;
use crate::shared::score::{softmax, ScoreSet};

/// Face crop → full emotion distribution.
///
/// Bundles the label vocabulary with the network that scores it. Built once
/// at startup and never mutated afterwards. There is no fallback mode: a
/// classifier either loads completely or the process refuses to start.
pub struct FaceEmotionClassifier {
    labels: Vec<String>,
    model: Box<dyn FaceEmotionModel>,
}

impl FaceEmotionClassifier {
    pub fn new(labels: Vec<String>, model: Box<dyn FaceEmotionModel>) -> Result<Self, ModelLoadError> {
        if labels.is_empty() {
            return Err(ModelLoadError::Labels("label list is empty".into()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = labels.iter().find(|l| !seen.insert(l.as_str())) {
            return Err(ModelLoadError::Labels(format!("duplicate label {dup:?}")));
        }
        Ok(Self { labels, model })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Softmax distribution over the vocabulary, highest score first.
    pub fn classify(&self, crop: &Frame) -> Result<ScoreSet, InferenceError> {
        let input = preprocess(crop)?;
        let logits = self.model.forward(input)?;
        if logits.len() != self.labels.len() {
            return Err(InferenceError::LabelMismatch {
                logits: logits.len(),
                labels: self.labels.len(),
            });
        }
        ScoreSet::from_probabilities(&self.labels, &softmax(&logits))
    }
}

/// Parses a newline-delimited label file, ignoring blank lines.
pub fn parse_labels(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resize to 224x224 (bilinear), scale to `[0, 1]`, apply ImageNet
/// normalisation, NCHW layout.
pub fn preprocess(crop: &Frame) -> Result<Array4<f32>, InferenceError> {
    if crop.is_empty() {
        return Err(InferenceError::Preprocess("face crop has no pixels".into()));
    }
    let size = FACE_INPUT_SIZE;
    let resized = image::imageops::resize(&crop.to_rgb_image(), size, size, FilterType::Triangle);

    let n = size as usize;
    let mut tensor = Array4::<f32>::zeros((1, 3, n, n));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            let v = pixel[c] as f32 / 255.0;
            tensor[[0, c, y as usize, x as usize]] = (v - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
        }
    }
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;
    use std::sync::{Arc, Mutex};

    /// Returns fixed logits and records the input shape it was given.
    struct StubFaceModel {
        logits: Vec<f32>,
        shapes: Arc<Mutex<Vec<Vec<usize>>>>,
    }

    impl StubFaceModel {
        fn new(logits: Vec<f32>) -> Self {
            Self {
                logits,
                shapes: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl FaceEmotionModel for StubFaceModel {
        fn forward(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
            self.shapes.lock().unwrap().push(input.shape().to_vec());
            Ok(self.logits.clone())
        }
    }

    /// Logits derived from the mean of each input channel, so different
    /// crops produce different distributions.
    struct ChannelMeanModel;

    impl FaceEmotionModel for ChannelMeanModel {
        fn forward(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
            let n = (input.shape()[2] * input.shape()[3]) as f32;
            Ok((0..3)
                .map(|c| input.slice(ndarray::s![0, c, .., ..]).sum() / n)
                .collect())
        }
    }

    struct BrokenModel;

    impl FaceEmotionModel for BrokenModel {
        fn forward(&self, _input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
            Err(InferenceError::OutputShape(vec![1, 2, 3]))
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn seven() -> Vec<String> {
        labels(&["angry", "disgust", "fear", "happy", "neutral", "sad", "surprise"])
    }

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> Frame {
        Frame::new(rgb.repeat((w * h) as usize), w, h)
    }

    #[test]
    fn test_rejects_empty_vocabulary() {
        let model = Box::new(StubFaceModel::new(vec![]));
        assert!(matches!(
            FaceEmotionClassifier::new(vec![], model),
            Err(ModelLoadError::Labels(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let model = Box::new(StubFaceModel::new(vec![0.0, 0.0]));
        assert!(FaceEmotionClassifier::new(labels(&["sad", "sad"]), model).is_err());
    }

    #[test]
    fn test_classify_returns_sorted_distribution() {
        let model = StubFaceModel::new(vec![0.1, -2.0, 0.3, 4.0, 1.0, 0.0, -1.0]);
        let shapes = model.shapes.clone();
        let classifier = FaceEmotionClassifier::new(seven(), Box::new(model)).unwrap();

        let scores = classifier.classify(&solid(50, 60, [120, 80, 40])).unwrap();

        assert_eq!(scores.len(), 7);
        assert_eq!(scores.top().unwrap().label, "happy");
        assert_abs_diff_eq!(scores.total(), 1.0, epsilon = 1e-4);
        for pair in scores.entries().windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(shapes.lock().unwrap()[0], vec![1, 3, 224, 224]);
    }

    #[rstest]
    #[case::tiny(1, 1)]
    #[case::wide(300, 20)]
    #[case::tall(17, 400)]
    fn test_any_crop_size_is_resized(#[case] w: u32, #[case] h: u32) {
        let model = StubFaceModel::new(vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0]);
        let shapes = model.shapes.clone();
        let classifier = FaceEmotionClassifier::new(seven(), Box::new(model)).unwrap();

        let scores = classifier.classify(&solid(w, h, [0, 0, 0])).unwrap();

        assert_abs_diff_eq!(scores.total(), 1.0, epsilon = 1e-4);
        assert_eq!(shapes.lock().unwrap()[0], vec![1, 3, 224, 224]);
    }

    #[test]
    fn test_logit_count_must_match_vocabulary() {
        let model = Box::new(StubFaceModel::new(vec![1.0, 2.0]));
        let classifier = FaceEmotionClassifier::new(seven(), model).unwrap();
        let err = classifier.classify(&solid(8, 8, [1, 2, 3])).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::LabelMismatch {
                logits: 2,
                labels: 7
            }
        ));
    }

    #[test]
    fn test_model_failure_is_propagated() {
        let classifier = FaceEmotionClassifier::new(seven(), Box::new(BrokenModel)).unwrap();
        assert!(classifier.classify(&solid(8, 8, [1, 2, 3])).is_err());
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier =
            FaceEmotionClassifier::new(labels(&["r", "g", "b"]), Box::new(ChannelMeanModel))
                .unwrap();
        let crop = solid(40, 30, [200, 30, 90]);
        assert_eq!(
            classifier.classify(&crop).unwrap(),
            classifier.classify(&crop).unwrap()
        );
        assert_eq!(classifier.classify(&crop).unwrap().top().unwrap().label, "r");
    }

    #[test]
    fn test_preprocess_applies_imagenet_normalisation() {
        let tensor = preprocess(&solid(10, 10, [255, 0, 128])).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
        assert_abs_diff_eq!(tensor[[0, 0, 5, 5]], (1.0 - 0.485) / 0.229, epsilon = 1e-5);
        assert_abs_diff_eq!(tensor[[0, 1, 100, 200]], (0.0 - 0.456) / 0.224, epsilon = 1e-5);
        assert_abs_diff_eq!(
            tensor[[0, 2, 223, 0]],
            (128.0 / 255.0 - 0.406) / 0.225,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_preprocess_rejects_empty_crop() {
        let empty = Frame::new(vec![], 0, 0);
        assert!(matches!(preprocess(&empty), Err(InferenceError::Preprocess(_))));
    }

    #[test]
    fn test_parse_labels_skips_blank_lines() {
        let parsed = parse_labels("angry\n\n  happy  \r\nsad\n");
        assert_eq!(parsed, labels(&["angry", "happy", "sad"]));
    }
}
