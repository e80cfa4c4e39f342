use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod metrics;
mod questions;

use cache::AnalysisCache;
use config::AppConfig;
use metrics::{Metrics, TimedOperation};
use questions::QuestionBank;

use feedback::{Analyzer, Feedback, GeminiClient};
use store::InterviewStore;

// Recorded clips are webcam video, so allow well beyond axum's default body limit
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

struct AppState {
    store: InterviewStore,
    analyzer: Analyzer,
    questions: QuestionBank,
    cache: AnalysisCache,
    metrics: Arc<Metrics>,
    config: AppConfig,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    interviews: usize,
}

#[derive(Serialize)]
struct QuestionResponse {
    question: String,
}

#[derive(Serialize)]
struct UploadResponse {
    interview_id: String,
    video_url: String,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    feedback: Feedback,
}

#[derive(Serialize)]
struct HistoryResponse {
    interviews: Vec<store::Interview>,
}

#[derive(Serialize)]
struct ClearHistoryResponse {
    cleared: usize,
}

#[derive(Serialize)]
struct StatsResponse {
    metrics: metrics::MetricsSnapshot,
    cache: cache::CacheStats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    // Set up the interview store
    let store = InterviewStore::new(&config.data_dir);
    store.init().await?;
    let uploads_dir = store.uploads_dir();

    // Create the analyzer
    let client = GeminiClient::new(
        config.gemini.base_url.clone(),
        config.gemini.model.clone(),
        config.gemini.api_key.clone(),
    );
    let analyzer = Analyzer::new(client);

    let cache = AnalysisCache::new(config.cache.max_entries);
    let port = config.port;

    let state = Arc::new(AppState {
        store,
        analyzer,
        questions: QuestionBank::new(),
        cache,
        metrics: Metrics::new(),
        config,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/question", get(get_question))
        .route("/api/upload", post(upload_video))
        .route("/api/analyze/:id", post(analyze_interview))
        .route("/api/history", get(get_history).delete(clear_history))
        .route("/stats", get(get_stats))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;

    info!(port, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let interviews = match state.store.history().await {
        Ok(interviews) => interviews.len(),
        Err(e) => {
            error!(error = %e, "health check failed to read store");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        interviews,
    }))
}

async fn get_question(State(state): State<Arc<AppState>>) -> Json<QuestionResponse> {
    state.metrics.record_request(true);

    Json(QuestionResponse {
        question: state.questions.next().to_string(),
    })
}

async fn upload_video(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, StatusCode> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "malformed multipart upload");
        state.metrics.record_request(false);
        StatusCode::BAD_REQUEST
    })? {
        if field.name() != Some("video") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("recording.webm").to_string();
        let data = field.bytes().await.map_err(|e| {
            warn!(error = %e, "failed to read upload body");
            state.metrics.record_request(false);
            StatusCode::BAD_REQUEST
        })?;

        if data.is_empty() {
            state.metrics.record_request(false);
            return Err(StatusCode::BAD_REQUEST);
        }

        let stored = state.store.save_video(&file_name, &data).await.map_err(|e| {
            error!(error = %e, "failed to persist video");
            state.metrics.record_request(false);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        let interview = state.store.create(&stored).await.map_err(|e| {
            error!(error = %e, "failed to create interview record");
            state.metrics.record_request(false);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        info!(interview_id = %interview.id, bytes = data.len(), "video uploaded");
        state.metrics.record_request(true);
        state.metrics.record_upload();

        return Ok(Json(UploadResponse {
            video_url: format!("/uploads/{}", stored),
            interview_id: interview.id,
        }));
    }

    // No "video" field in the request
    state.metrics.record_request(false);
    Err(StatusCode::BAD_REQUEST)
}

async fn analyze_interview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AnalyzeResponse>, StatusCode> {
    let interview = state
        .store
        .get(&id)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to load interview record");
            state.metrics.record_request(false);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or_else(|| {
            state.metrics.record_request(false);
            StatusCode::NOT_FOUND
        })?;

    let video = state.store.read_video(&interview).await.map_err(|e| {
        warn!(interview_id = %id, error = %e, "video file missing");
        state.metrics.record_request(false);
        StatusCode::NOT_FOUND
    })?;

    // Identical clips get the cached feedback instead of another model call
    if state.config.cache.enabled {
        if let Some(feedback) = state.cache.get(&video) {
            info!(interview_id = %id, "serving cached analysis");
            state.metrics.record_cached_analysis();

            let updated = persist_feedback(&state, &id, feedback).await?;
            state.metrics.record_request(true);
            return Ok(Json(AnalyzeResponse { feedback: updated }));
        }
    }

    let mime_type = mime_for(&interview.video_file);
    let timer = TimedOperation::start();

    let feedback = state
        .analyzer
        .analyze_with_retry(&video, mime_type, state.config.analyze.max_retries)
        .await
        .map_err(|e| {
            error!(interview_id = %id, error = %e, "analysis failed");
            state.metrics.record_failed_analysis();
            state.metrics.record_request(false);
            StatusCode::BAD_GATEWAY
        })?;

    state.metrics.record_analysis(timer.elapsed());

    if state.config.cache.enabled {
        state.cache.set(&video, feedback.clone());
    }

    let updated = persist_feedback(&state, &id, feedback).await?;

    info!(interview_id = %id, "analysis completed");
    state.metrics.record_request(true);

    Ok(Json(AnalyzeResponse { feedback: updated }))
}

async fn persist_feedback(
    state: &Arc<AppState>,
    id: &str,
    feedback: Feedback,
) -> Result<Feedback, StatusCode> {
    let updated = state
        .store
        .set_feedback(id, feedback)
        .await
        .map_err(|e| {
            error!(interview_id = %id, error = %e, "failed to persist feedback");
            state.metrics.record_request(false);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    // set_feedback always stores Some(feedback)
    updated.feedback.ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn get_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoryResponse>, StatusCode> {
    let interviews = state.store.history().await.map_err(|e| {
        error!(error = %e, "failed to load history");
        state.metrics.record_request(false);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    state.metrics.record_request(true);
    Ok(Json(HistoryResponse { interviews }))
}

async fn clear_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearHistoryResponse>, StatusCode> {
    let cleared = state.store.clear().await.map_err(|e| {
        error!(error = %e, "failed to clear history");
        state.metrics.record_request(false);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    info!(cleared, "interview history cleared");
    state.metrics.record_request(true);
    Ok(Json(ClearHistoryResponse { cleared }))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        metrics: state.metrics.snapshot(),
        cache: state.cache.stats(),
    })
}

fn mime_for(file_name: &str) -> &'static str {
    match std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        // Browser MediaRecorder default
        _ => "video/webm",
    }
}
