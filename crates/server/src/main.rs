mod http;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use env_logger::Env;

use emotion_core::auth::infrastructure::in_memory_auth_gate::InMemoryAuthGate;
use emotion_core::classification::domain::text_emotion_classifier::TextEmotionClassifier;
use emotion_core::classification::infrastructure::onnx_face_model::load_face_classifier;
use emotion_core::classification::infrastructure::onnx_text_model::load_text_model;
use emotion_core::detection::domain::face_locator::FaceLocator;
use emotion_core::detection::infrastructure::opencv_face_detector::{
    locate_cascade, DetectionParams, OpencvFaceDetector,
};
use emotion_core::pipeline::inference_logger::LogInferenceLogger;
use emotion_core::pipeline::predict_face_use_case::PredictFaceUseCase;
use emotion_core::pipeline::predict_text_use_case::PredictTextUseCase;
use emotion_core::replies::infrastructure::canned_reply_book::CannedReplyBook;
use emotion_core::shared::constants::{DEFAULT_MIN_FACE_SIZE, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR};
use emotion_core::shared::model_resolver::ArtifactPaths;

use crate::http::state::AppState;

/// Face and text emotion inference over HTTP.
#[derive(Parser)]
#[command(name = "emotion-server")]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Directory holding the trained artifacts.
    #[arg(long, default_value = "training")]
    artifacts_dir: PathBuf,

    /// Face classifier ONNX file [default: <artifacts>/results-face/face_model.onnx].
    #[arg(long)]
    face_model: Option<PathBuf>,

    /// Face label list [default: <artifacts>/results-face/class_names.txt].
    #[arg(long)]
    face_labels: Option<PathBuf>,

    /// Haar cascade XML [default: <artifacts>/haarcascade_frontalface_default.xml,
    /// then OpenCV's bundled copy].
    #[arg(long)]
    cascade: Option<PathBuf>,

    /// Text model directory to try, highest priority first (repeatable).
    #[arg(long)]
    text_model_dir: Vec<PathBuf>,

    /// Image shrink factor between detection scales.
    #[arg(long, default_value_t = DEFAULT_SCALE_FACTOR)]
    scale_factor: f64,

    /// Overlapping raw detections a face needs to be kept.
    #[arg(long, default_value_t = DEFAULT_MIN_NEIGHBORS)]
    min_neighbors: usize,

    /// Seconds one inference call may take before it is abandoned.
    #[arg(long, default_value_t = 30)]
    inference_timeout_secs: u64,

    /// Seed for chat reply selection (random when omitted).
    #[arg(long)]
    reply_seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let state = build_state(&cli)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(&cli.host, cli.port, state))
}

fn artifact_paths(cli: &Cli) -> ArtifactPaths {
    let mut paths = ArtifactPaths::under(&cli.artifacts_dir);
    if let Some(p) = &cli.face_model {
        paths.face_model = p.clone();
    }
    if let Some(p) = &cli.face_labels {
        paths.face_labels = p.clone();
    }
    if let Some(p) = &cli.cascade {
        paths.cascade = p.clone();
    }
    if !cli.text_model_dir.is_empty() {
        paths.text_model_candidates = cli.text_model_dir.clone();
    }
    paths
}

/// Loads every artifact. Face artifacts are required; the text model is not.
fn build_state(cli: &Cli) -> Result<AppState, Box<dyn std::error::Error>> {
    let paths = artifact_paths(cli);

    let params = DetectionParams {
        scale_factor: cli.scale_factor,
        min_neighbors: cli.min_neighbors,
        min_size: DEFAULT_MIN_FACE_SIZE,
    };
    let detector = OpencvFaceDetector::from_file(&locate_cascade(&paths.cascade)?, params)?;
    let face_classifier = load_face_classifier(&paths.face_model, &paths.face_labels)?;
    let face = PredictFaceUseCase::new(
        FaceLocator::new(Box::new(detector)),
        face_classifier,
        Box::new(LogInferenceLogger::new()),
    );

    let text_classifier = match load_text_model(&paths.text_model_candidates) {
        Some((dir, model)) => {
            TextEmotionClassifier::with_model(dir.display().to_string(), Box::new(model))
        }
        None => TextEmotionClassifier::heuristic_only(),
    };
    let text = PredictTextUseCase::new(text_classifier, Box::new(LogInferenceLogger::new()));

    let replies = match cli.reply_seed {
        Some(seed) => CannedReplyBook::seeded(seed),
        None => CannedReplyBook::from_entropy(),
    };

    Ok(AppState {
        auth: Arc::new(InMemoryAuthGate::new()),
        face: Arc::new(face),
        text: Arc::new(text),
        replies: Arc::new(replies),
        inference_timeout: Duration::from_secs(cli.inference_timeout_secs),
    })
}

async fn serve(host: &str, port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let face = state.face.clone();
    let text = state.text.clone();
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    log::info!("Backend running at http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    face.logger().summary();
    text.logger().summary();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
