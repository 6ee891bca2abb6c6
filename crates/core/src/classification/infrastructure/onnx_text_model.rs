use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::Array2;
use ort::session::Session;
use serde::Deserialize;
use tokenizers::Tokenizer;

use crate::classification::domain::text_emotion_model::TextEmotionModel;
use crate::classification::infrastructure::execution_provider::load_session;
use crate::shared::constants::{TEXT_CONFIG_NAME, TEXT_MAX_TOKENS, TEXT_MODEL_NAME, TEXT_TOKENIZER_NAME};
use crate::shared::error::{InferenceError, ModelLoadError};
use crate::shared::model_resolver;
use crate::shared::score::{argmax, softmax, ScoreEntry};

#[derive(Deserialize)]
struct ModelConfig {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// Index → label vocabulary from a model's `config.json`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelMap {
    labels: HashMap<usize, String>,
}

impl LabelMap {
    pub fn from_config_json(json: &str) -> Result<Self, ModelLoadError> {
        let config: ModelConfig =
            serde_json::from_str(json).map_err(|e| ModelLoadError::Config(e.to_string()))?;
        let mut labels = HashMap::with_capacity(config.id2label.len());
        for (id, label) in config.id2label {
            let id: usize = id
                .parse()
                .map_err(|e| ModelLoadError::Config(format!("invalid label id {id:?}: {e}")))?;
            labels.insert(id, label);
        }
        Ok(Self { labels })
    }

    /// Falls back to the decimal index when the config has no entry.
    pub fn label(&self, index: usize) -> String {
        self.labels
            .get(&index)
            .cloned()
            .unwrap_or_else(|| index.to_string())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Sequence classifier exported to ONNX with its HuggingFace tokenizer.
///
/// A model directory holds `tokenizer.json`, `config.json` and `model.onnx`.
/// The graph takes `input_ids` and `attention_mask` as i64 `[1, seq]` and
/// returns `[1, num_labels]` logits.
pub struct OnnxTextModel {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    labels: LabelMap,
    max_tokens: usize,
}

impl OnnxTextModel {
    pub fn from_dir(dir: &Path) -> Result<Self, ModelLoadError> {
        let tokenizer_path = dir.join(TEXT_TOKENIZER_NAME);
        model_resolver::require_file(&tokenizer_path)?;
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| ModelLoadError::Tokenizer(format!("{}: {e}", tokenizer_path.display())))?;

        let labels =
            LabelMap::from_config_json(&model_resolver::read_to_string(&dir.join(TEXT_CONFIG_NAME))?)?;
        let session = load_session(&dir.join(TEXT_MODEL_NAME))?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
            max_tokens: TEXT_MAX_TOKENS,
        })
    }

    fn encode(&self, text: &str) -> Result<(Vec<i64>, Vec<i64>), InferenceError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| InferenceError::Preprocess(format!("tokenization failed: {e}")))?;

        let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mut mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        ids.truncate(self.max_tokens);
        mask.truncate(self.max_tokens);
        if ids.is_empty() {
            return Err(InferenceError::Preprocess("tokenizer produced no tokens".into()));
        }
        Ok((ids, mask))
    }
}

impl TextEmotionModel for OnnxTextModel {
    fn predict(&self, text: &str) -> Result<ScoreEntry, InferenceError> {
        let (ids, mask) = self.encode(text)?;
        let seq_len = ids.len();

        let ids = Array2::from_shape_vec((1, seq_len), ids).map_err(InferenceError::runtime)?;
        let mask = Array2::from_shape_vec((1, seq_len), mask).map_err(InferenceError::runtime)?;
        let ids = ort::value::Tensor::from_array(ids).map_err(InferenceError::runtime)?;
        let mask = ort::value::Tensor::from_array(mask).map_err(InferenceError::runtime)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::Runtime(format!("Lock poisoned: {e}")))?;
        let outputs = session
            .run(ort::inputs!["input_ids" => ids, "attention_mask" => mask])
            .map_err(InferenceError::runtime)?;
        let logits = outputs[0]
            .try_extract_array::<f32>()
            .map_err(InferenceError::runtime)?;

        let shape = logits.shape().to_vec();
        if shape.len() != 2 || shape[0] != 1 || shape[1] == 0 {
            return Err(InferenceError::OutputShape(shape));
        }
        let logits: Vec<f32> = logits.iter().copied().collect();
        Ok(pick_primary(&softmax(&logits), &self.labels))
    }
}

/// Arg-max entry of a probability vector; a NaN winner scores 0.0.
fn pick_primary(probs: &[f32], labels: &LabelMap) -> ScoreEntry {
    match argmax(probs) {
        Some((index, p)) => {
            let score = if p.is_nan() { 0.0 } else { p as f64 };
            ScoreEntry::new(labels.label(index), score)
        }
        None => ScoreEntry::new(labels.label(0), 0.0),
    }
}

/// Loads the first candidate directory holding a complete text model.
///
/// `None` means the service runs heuristic-only for its whole lifetime.
pub fn load_text_model(candidates: &[PathBuf]) -> Option<(PathBuf, OnnxTextModel)> {
    let loaded = model_resolver::load_first(candidates, OnnxTextModel::from_dir);
    match &loaded {
        Some((dir, model)) => log::info!(
            "Text classifier ready from {} ({} labels)",
            dir.display(),
            model.labels.len()
        ),
        None => log::warn!("No text model could be loaded; using keyword heuristic only"),
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"{
        "architectures": ["DistilBertForSequenceClassification"],
        "id2label": {"0": "anger", "1": "joy", "2": "sadness"},
        "label2id": {"anger": 0, "joy": 1, "sadness": 2}
    }"#;

    #[test]
    fn test_label_map_from_config() {
        let labels = LabelMap::from_config_json(CONFIG).unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.label(1), "joy");
    }

    #[test]
    fn test_label_map_missing_entry_uses_index() {
        let labels = LabelMap::from_config_json(CONFIG).unwrap();
        assert_eq!(labels.label(7), "7");
    }

    #[test]
    fn test_label_map_without_id2label() {
        let labels = LabelMap::from_config_json(r#"{"num_labels": 2}"#).unwrap();
        assert!(labels.is_empty());
        assert_eq!(labels.label(0), "0");
    }

    #[test]
    fn test_label_map_rejects_bad_json() {
        assert!(matches!(
            LabelMap::from_config_json("not json"),
            Err(ModelLoadError::Config(_))
        ));
        assert!(matches!(
            LabelMap::from_config_json(r#"{"id2label": {"x": "joy"}}"#),
            Err(ModelLoadError::Config(_))
        ));
    }

    #[test]
    fn test_pick_primary_uses_argmax() {
        let labels = LabelMap::from_config_json(CONFIG).unwrap();
        let entry = pick_primary(&softmax(&[0.5, 3.0, 1.0]), &labels);
        assert_eq!(entry.label, "joy");
        assert!(entry.score > 0.5 && entry.score < 1.0);
    }

    #[test]
    fn test_pick_primary_nan_scores_zero() {
        let labels = LabelMap::from_config_json(CONFIG).unwrap();
        let entry = pick_primary(&[f32::NAN, f32::NAN, f32::NAN], &labels);
        assert_relative_eq!(entry.score, 0.0);
    }

    #[test]
    fn test_from_dir_requires_tokenizer() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), CONFIG).unwrap();
        let err = OnnxTextModel::from_dir(dir.path()).err().unwrap();
        assert!(
            matches!(err, ModelLoadError::MissingArtifact { ref path } if path.ends_with("tokenizer.json"))
        );
    }

    #[test]
    fn test_from_dir_rejects_corrupt_tokenizer() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tokenizer.json"), "{ definitely not a tokenizer").unwrap();
        let err = OnnxTextModel::from_dir(dir.path()).err().unwrap();
        assert!(matches!(err, ModelLoadError::Tokenizer(_)));
    }

    #[test]
    fn test_load_text_model_degrades_when_nothing_loads() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("emotion_model");
        fs::create_dir_all(&empty).unwrap();
        let candidates = vec![empty, dir.path().join("results-distilbert")];
        assert!(load_text_model(&candidates).is_none());
    }
}
