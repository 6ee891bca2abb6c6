pub mod face_emotion_classifier;
pub mod face_emotion_model;
pub mod fallback_chain;
pub mod keyword_heuristic;
pub mod text_emotion_classifier;
pub mod text_emotion_model;
