pub mod inference_logger;
pub mod predict_face_use_case;
pub mod predict_text_use_case;
