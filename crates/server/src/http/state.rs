use std::sync::Arc;
use std::time::Duration;

use emotion_core::auth::domain::auth_gate::AuthGate;
use emotion_core::pipeline::predict_face_use_case::PredictFaceUseCase;
use emotion_core::pipeline::predict_text_use_case::PredictTextUseCase;
use emotion_core::replies::domain::reply_book::ReplyBook;

/// Shared state for the axum handlers. Everything is built once at startup
/// and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthGate>,
    pub face: Arc<PredictFaceUseCase>,
    pub text: Arc<PredictTextUseCase>,
    pub replies: Arc<dyn ReplyBook>,
    /// Upper bound on one blocking inference call.
    pub inference_timeout: Duration,
}
