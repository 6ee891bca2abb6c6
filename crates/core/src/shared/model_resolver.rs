use std::path::{Path, PathBuf};

use crate::shared::constants::{
    APP_DIR_NAME, CASCADE_NAME, FACE_ARTIFACT_DIR, FACE_LABELS_NAME, FACE_MODEL_NAME,
    TEXT_MODEL_DIR_NAMES,
};
use crate::shared::error::ModelLoadError;

/// Locations of every artifact the service reads at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtifactPaths {
    pub face_model: PathBuf,
    pub face_labels: PathBuf,
    pub cascade: PathBuf,
    /// Text model directories in priority order; the first that loads wins.
    pub text_model_candidates: Vec<PathBuf>,
}

impl ArtifactPaths {
    /// Default layout under an artifacts root (the training output directory).
    ///
    /// Text candidates:
    /// 1. `<root>/emotion_model`
    /// 2. `<root>/results-distilbert`
    /// 3. `<cache>/EmotionAI/models/text` (platform cache directory)
    pub fn under(root: &Path) -> Self {
        let face_dir = root.join(FACE_ARTIFACT_DIR);
        let mut text_model_candidates: Vec<PathBuf> =
            TEXT_MODEL_DIR_NAMES.iter().map(|name| root.join(name)).collect();
        if let Some(cache) = model_cache_dir() {
            text_model_candidates.push(cache.join("text"));
        }

        Self {
            face_model: face_dir.join(FACE_MODEL_NAME),
            face_labels: face_dir.join(FACE_LABELS_NAME),
            cascade: root.join(CASCADE_NAME),
            text_model_candidates,
        }
    }
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/EmotionAI/models/`
/// - Linux: `$XDG_CACHE_HOME/EmotionAI/models/` or `~/.cache/EmotionAI/models/`
/// - Windows: `%LOCALAPPDATA%/EmotionAI/models/`
pub fn model_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir().map(|d| d.join(APP_DIR_NAME).join("models"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir().map(|d| d.join(APP_DIR_NAME).join("models"))
    }
}

/// Fails with [`ModelLoadError::MissingArtifact`] unless `path` is an existing file.
pub fn require_file(path: &Path) -> Result<&Path, ModelLoadError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ModelLoadError::MissingArtifact {
            path: path.to_path_buf(),
        })
    }
}

/// Reads a UTF-8 artifact, attaching the path to any I/O error.
pub fn read_to_string(path: &Path) -> Result<String, ModelLoadError> {
    std::fs::read_to_string(require_file(path)?).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Tries each candidate directory in order, returning the first that loads.
///
/// Candidates that are not directories are skipped silently; load failures
/// are logged and the search moves on.
pub fn load_first<T, F>(candidates: &[PathBuf], mut load: F) -> Option<(PathBuf, T)>
where
    F: FnMut(&Path) -> Result<T, ModelLoadError>,
{
    for dir in candidates {
        if !dir.is_dir() {
            log::debug!("Skipping missing model directory {}", dir.display());
            continue;
        }
        match load(dir) {
            Ok(loaded) => {
                log::info!("Loaded model from {}", dir.display());
                return Some((dir.clone(), loaded));
            }
            Err(e) => log::warn!("Failed to load model from {}: {e}", dir.display()),
        }
    }
    None
}
