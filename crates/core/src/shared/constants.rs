pub const FACE_ARTIFACT_DIR: &str = "results-face";
pub const FACE_MODEL_NAME: &str = "face_model.onnx";
pub const FACE_LABELS_NAME: &str = "class_names.txt";
pub const CASCADE_NAME: &str = "haarcascade_frontalface_default.xml";
/// The same cascade relative to OpenCV's data directory.
pub const BUNDLED_CASCADE: &str = "haarcascades/haarcascade_frontalface_default.xml";

/// Text model directories under the artifacts root, highest priority first.
pub const TEXT_MODEL_DIR_NAMES: &[&str] = &["emotion_model", "results-distilbert"];
pub const TEXT_TOKENIZER_NAME: &str = "tokenizer.json";
pub const TEXT_CONFIG_NAME: &str = "config.json";
pub const TEXT_MODEL_NAME: &str = "model.onnx";
pub const TEXT_MAX_TOKENS: usize = 512;

/// Square input resolution of the face classifier.
pub const FACE_INPUT_SIZE: u32 = 224;

/// ImageNet channel statistics the face backbone was pretrained with.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;
pub const DEFAULT_MIN_NEIGHBORS: usize = 5;
pub const DEFAULT_MIN_FACE_SIZE: u32 = 30;

pub const NEUTRAL_LABEL: &str = "neutral";

pub const APP_DIR_NAME: &str = "EmotionAI";
