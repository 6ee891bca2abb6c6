use std::path::Path;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;

use crate::shared::error::ModelLoadError;
use crate::shared::model_resolver;

/// Return the preferred ONNX execution providers for the current platform.
///
/// Falls back to CPU if the platform-specific provider is unavailable.
pub fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

/// Build an inference session for `model_path` with the platform providers.
pub fn load_session(model_path: &Path) -> Result<Session, ModelLoadError> {
    model_resolver::require_file(model_path)?;
    let intra_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    Session::builder()
        .map_err(|e| ModelLoadError::Session(e.to_string()))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| ModelLoadError::Session(e.to_string()))?
        .with_intra_threads(intra_threads)
        .map_err(|e| ModelLoadError::Session(e.to_string()))?
        .with_execution_providers(preferred_execution_providers())
        .map_err(|e| ModelLoadError::Session(e.to_string()))?
        .commit_from_file(model_path)
        .map_err(|e| ModelLoadError::Session(format!("{}: {e}", model_path.display())))
}
