pub mod execution_provider;
pub mod onnx_face_model;
pub mod onnx_text_model;
