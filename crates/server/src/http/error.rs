use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use emotion_core::auth::domain::auth_gate::AuthError;
use emotion_core::pipeline::predict_face_use_case::FacePipelineError;
use emotion_core::shared::error::InferenceError;

/// Request-level failure, rendered as `{"error": <message>}`.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Auth(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unauthorized() -> Self {
        ApiError::Auth(AuthError::Unauthorized.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::Validation(m) | ApiError::Auth(m) | ApiError::Conflict(m) | ApiError::Internal(m) => m,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Conflict => ApiError::Conflict(e.to_string()),
            AuthError::Unauthorized | AuthError::InvalidCredentials => ApiError::Auth(e.to_string()),
            AuthError::Hashing(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<FacePipelineError> for ApiError {
    fn from(e: FacePipelineError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<InferenceError> for ApiError {
    fn from(e: InferenceError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self.message());
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
