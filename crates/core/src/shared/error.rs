use std::path::PathBuf;

use thiserror::Error;

/// An image payload that could not be turned into a [`Frame`](super::frame::Frame).
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("image payload is empty")]
    Empty,
    #[error("image payload must be a base64 string")]
    NotText,
    #[error("invalid base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Unexpected failure inside a detector or classifier forward pass.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("failed to prepare model input: {0}")]
    Preprocess(String),
    #[error("inference runtime error: {0}")]
    Runtime(String),
    #[error("unexpected model output shape: {0:?}")]
    OutputShape(Vec<usize>),
    #[error("model produced {logits} scores for {labels} labels")]
    LabelMismatch { logits: usize, labels: usize },
    #[error("duplicate label in score set: {0}")]
    DuplicateLabel(String),
    #[error("inference timed out after {0} seconds")]
    Timeout(u64),
}

impl InferenceError {
    /// Wraps any runtime-layer error as [`InferenceError::Runtime`].
    pub fn runtime(e: impl std::fmt::Display) -> Self {
        InferenceError::Runtime(e.to_string())
    }
}

/// Failure to construct a classifier or detector from its artifacts at startup.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("required artifact not found: {path}")]
    MissingArtifact { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid label vocabulary: {0}")]
    Labels(String),
    #[error("failed to create inference session: {0}")]
    Session(String),
    #[error("failed to load tokenizer: {0}")]
    Tokenizer(String),
    #[error("invalid model configuration: {0}")]
    Config(String),
    #[error("invalid cascade: {0}")]
    Cascade(String),
}
