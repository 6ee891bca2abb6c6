use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Map, Value};

use emotion_core::composition::response_composer::{FacePrediction, TextPrediction};
use emotion_core::shared::constants::NEUTRAL_LABEL;
use emotion_core::pipeline::predict_face_use_case::FacePipelineError;
use emotion_core::shared::error::{DecodeError, InferenceError};

use crate::http::error::ApiError;
use crate::http::state::AppState;

/// Token from the `Authorization` header; a `Bearer ` prefix is optional.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match raw.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim(),
        _ => raw,
    };
    (!token.is_empty()).then_some(token)
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let token = bearer_token(headers).ok_or_else(ApiError::unauthorized)?;
    state.auth.validate(token).ok_or_else(ApiError::unauthorized)
}

/// A non-empty JSON object, or `None` for anything else.
fn json_object(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(map) if !map.is_empty() => Some(map),
        _ => None,
    }
}

fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

pub async fn health(State(st): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "text_model": st.text.has_model(),
        "face_model": true,
        "bot": true,
    }))
}

pub async fn auth(State(st): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let data = json_object(&body).ok_or_else(|| ApiError::validation("Invalid request"))?;
    let email = non_empty_str(&data, "email");
    let password = non_empty_str(&data, "password");
    let mode = data.get("mode").and_then(Value::as_str);

    let token = match (email, password, mode) {
        (Some(email), Some(password), Some("signup")) => st.auth.signup(email, password)?,
        (Some(email), Some(password), Some("login")) => st.auth.login(email, password)?,
        _ => return Err(ApiError::validation("Missing fields")),
    };
    Ok(Json(json!({ "success": true, "token": token })))
}

pub async fn predict_text(
    State(st): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TextPrediction>, ApiError> {
    authorize(&st, &headers)?;
    let text = json_object(&body)
        .and_then(|mut data| data.remove("text"))
        .ok_or_else(|| ApiError::validation("Text required"))?;

    let use_case = st.text.clone();
    let request_text = text.clone();
    let job = tokio::task::spawn_blocking(move || use_case.execute(request_text));
    let body = match tokio::time::timeout(st.inference_timeout, job).await {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            log::error!("Text inference task failed: {e}");
            st.text.execute_heuristic_only(text)
        }
        Err(_) => {
            log::warn!(
                "Text inference exceeded {}s, answering heuristically",
                st.inference_timeout.as_secs()
            );
            st.text.execute_heuristic_only(text)
        }
    };
    Ok(Json(body))
}

pub async fn predict_face(
    State(st): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<FacePrediction>, ApiError> {
    authorize(&st, &headers)?;
    let image = json_object(&body)
        .and_then(|mut data| data.remove("image"))
        .ok_or_else(|| ApiError::validation("Image required"))?;
    // Only a missing field is a validation error; any other unusable value
    // fails decoding and is reported as 500.
    let Value::String(payload) = image else {
        return Err(FacePipelineError::from(DecodeError::NotText).into());
    };

    let use_case = st.face.clone();
    let job = tokio::task::spawn_blocking(move || use_case.execute(&payload));
    match tokio::time::timeout(st.inference_timeout, job).await {
        Ok(Ok(result)) => Ok(Json(result?)),
        Ok(Err(e)) => Err(ApiError::Internal(format!("face inference task failed: {e}"))),
        Err(_) => Err(InferenceError::Timeout(st.inference_timeout.as_secs()).into()),
    }
}

pub async fn chat(
    State(st): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    authorize(&st, &headers)?;
    let data = json_object(&body).ok_or_else(|| ApiError::validation("Invalid request"))?;
    let emotion = data
        .get("emotion")
        .cloned()
        .unwrap_or_else(|| Value::from(NEUTRAL_LABEL));
    let reply = st.replies.reply(emotion.as_str().unwrap_or(NEUTRAL_LABEL));
    Ok(Json(json!({ "reply": reply, "emotion": emotion })))
}

pub async fn logout(State(st): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let identity = authorize(&st, &headers)?;
    if let Some(token) = bearer_token(&headers) {
        st.auth.revoke(token);
    }
    log::debug!("Session closed for {identity}");
    Ok(Json(json!({ "success": true })))
}
