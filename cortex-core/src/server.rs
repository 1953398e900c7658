//! HTTP server for the Cortex API.
//!
//! Exposes the study-plan pipeline over five endpoints: PDF upload
//! (`/api/process`), quiz generation from text or PDF (`/api/quiz/text`,
//! `/api/quiz/pdf`), level-adaptive summarization (`/api/summarize`),
//! and topic timing adjustment (`/api/update_timing`), plus health and
//! OpenAPI routes.

use crate::config::Config;
use crate::gemini::{GeminiClient, GeminiError};
use crate::model::{
    ApiError, HealthResponse, ProcessResponse, QuizResponse, QuizTextRequest, SummarizeResponse,
    UpdateTimingRequest, UpdateTimingResponse,
};
use crate::pdf::{self, PdfError};
use crate::study::{self, StudyError};
use crate::summarize::{self, SummaryError};
use crate::tier::DifficultyTier;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use std::io::Write;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};
use utoipa::OpenApi;

/// Longest accepted per-topic time adjustment, in minutes
const MAX_TOPIC_MINUTES: u32 = 480;

/// Question count for PDF quizzes when the form omits `numQuestions`
const DEFAULT_PDF_QUIZ_QUESTIONS: usize = 20;

/// OpenAPI documentation for the Cortex API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cortex API",
        version = "0.1.0",
        description = "Adaptive study-plan backend. Cortex extracts text from uploaded \
                       PDFs, generates difficulty-tiered study guides via the Gemini CLI, \
                       and lays the results out on a timed schedule with per-topic quizzes.",
        license(name = "MIT"),
        contact(name = "Cortex Contributors")
    ),
    servers(
        (url = "http://127.0.0.1:5000", description = "Local development server")
    ),
    paths(
        health_check,
        process_pdf,
        quiz_from_text,
        quiz_from_pdf,
        summarize_pdf,
        update_timing,
    ),
    components(schemas(
        crate::model::ApiError,
        crate::model::HealthResponse,
        crate::model::ProcessResponse,
        crate::model::QuizTextRequest,
        crate::model::QuizResponse,
        crate::model::SummarizeResponse,
        crate::model::UpdateTimingRequest,
        crate::model::UpdateTimingResponse,
        crate::parse::Mcq,
        crate::parse::AnswerKey,
        crate::schedule::TopicBlock,
        crate::schedule::Session,
        crate::schedule::SessionKind,
        crate::study::PlanMetadata,
        crate::study::AdaptiveFeatures,
        crate::tier::DifficultyTier,
    )),
    tags(
        (name = "Study Plans", description = "PDF processing and schedule generation"),
        (name = "Quizzes", description = "Standalone quiz generation from text or PDFs"),
        (name = "Summaries", description = "Level-adaptive document summarization"),
        (name = "Health", description = "Server health and status")
    )
)]
pub struct ApiDoc;

/// Shared application state
pub struct AppState {
    pub gemini: GeminiClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(gemini: GeminiClient, config: Config) -> Self {
        Self {
            gemini,
            config: Arc::new(config),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload = state.config.limits.max_upload_bytes;

    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/api/process", post(process_pdf))
        .route("/api/quiz/text", post(quiz_from_text))
        .route("/api/quiz/pdf", post(quiz_from_pdf))
        .route("/api/summarize", post(summarize_pdf))
        .route("/api/update_timing", post(update_timing))
        .route("/health", get(health_check))
        .route("/", get(root))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// OpenAPI JSON specification endpoint
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Root endpoint with discovery information
async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let base_url = state.config.server_url();

    Json(serde_json::json!({
        "name": "Cortex",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Adaptive study-plan backend",
        "base_url": base_url,
        "endpoints": {
            "process": {
                "path": "/api/process",
                "method": "POST",
                "description": "Upload a PDF and receive a timed study plan"
            },
            "quiz_text": {
                "path": "/api/quiz/text",
                "method": "POST",
                "description": "Generate a quiz from raw text"
            },
            "quiz_pdf": {
                "path": "/api/quiz/pdf",
                "method": "POST",
                "description": "Generate a quiz from an uploaded PDF"
            },
            "summarize": {
                "path": "/api/summarize",
                "method": "POST",
                "description": "Summarize an uploaded PDF at the requested level"
            },
            "update_timing": {
                "path": "/api/update_timing",
                "method": "POST",
                "description": "Adjust the allocated time of a topic"
            },
            "health": {
                "path": "/health",
                "method": "GET",
                "description": "Health check"
            },
            "openapi": {
                "path": "/openapi.json",
                "method": "GET",
                "description": "OpenAPI specification"
            }
        }
    }))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server health status", body = HealthResponse)
    )
)]
#[instrument(skip(state))]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let gemini_available = state.gemini.check_available().await;

    Json(HealthResponse {
        status: if gemini_available { "ok" } else { "degraded" }.to_string(),
        ready: gemini_available,
        version: env!("CARGO_PKG_VERSION").to_string(),
        gemini_available,
    })
}

/// Fields accepted by the multipart PDF endpoints
struct PdfUpload {
    bytes: Vec<u8>,
    filename: String,
    user_level: String,
    num_questions: Option<usize>,
}

async fn read_pdf_upload(mut multipart: Multipart) -> Result<PdfUpload, AppError> {
    let mut pdf_bytes: Option<Vec<u8>> = None;
    let mut filename = String::new();
    let mut user_level = String::from("basic");
    let mut num_questions = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("pdf") => {
                filename = field.file_name().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidRequest(format!("Failed to read upload: {e}")))?;
                pdf_bytes = Some(bytes.to_vec());
            }
            Some("userLevel") => {
                user_level = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidRequest(format!("Failed to read field: {e}")))?;
            }
            Some("numQuestions") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidRequest(format!("Failed to read field: {e}")))?;
                let parsed = raw.trim().parse::<usize>().map_err(|_| {
                    AppError::InvalidRequest("numQuestions must be an integer".to_string())
                })?;
                num_questions = Some(parsed);
            }
            _ => {}
        }
    }

    let bytes = pdf_bytes.ok_or_else(|| AppError::InvalidRequest("No file part".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::InvalidRequest("No selected file".to_string()));
    }
    if !is_pdf_filename(&filename) {
        return Err(AppError::InvalidRequest(
            "Only PDF files are supported".to_string(),
        ));
    }

    Ok(PdfUpload {
        bytes,
        filename,
        user_level,
        num_questions,
    })
}

/// Spool the upload to a temp file (removed on drop) and extract its text
/// off the async runtime, since lopdf parsing is CPU-bound.
async fn extract_upload_text(bytes: Vec<u8>) -> Result<String, AppError> {
    let mut temp = tempfile::NamedTempFile::new()
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;
    temp.write_all(&bytes)
        .map_err(|e| AppError::Internal(format!("Failed to write temp file: {e}")))?;

    let text = tokio::task::spawn_blocking(move || pdf::extract_text(temp.path()))
        .await
        .map_err(|e| AppError::Internal(format!("Extraction task failed: {e}")))??;
    Ok(text)
}

/// Upload a PDF and receive a timed study plan
#[utoipa::path(
    post,
    path = "/api/process",
    tag = "Study Plans",
    responses(
        (status = 200, description = "Generated study plan", body = ProcessResponse),
        (status = 400, description = "Invalid upload or unusable content", body = ApiError),
        (status = 401, description = "Upstream authentication failure", body = ApiError),
        (status = 429, description = "Upstream rate limit", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[instrument(skip(state, multipart))]
async fn process_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>, AppError> {
    let upload = read_pdf_upload(multipart).await?;

    let tier = DifficultyTier::parse_or_default(&upload.user_level);
    info!("Processing upload '{}' at {} tier", upload.filename, tier);

    let raw_text = extract_upload_text(upload.bytes).await?;
    debug!("Extracted {} chars from '{}'", raw_text.len(), upload.filename);

    let plan = study::generate_study_plan(
        &state.gemini,
        &raw_text,
        tier,
        Local::now(),
        state.config.limits.max_content_chars,
    )
    .await?;

    info!(
        "Plan ready: {} topics, {} min",
        plan.metadata.total_topics, plan.metadata.total_time
    );
    Ok(Json(plan.into()))
}

/// Generate a quiz from raw text
#[utoipa::path(
    post,
    path = "/api/quiz/text",
    tag = "Quizzes",
    request_body = QuizTextRequest,
    responses(
        (status = 200, description = "Generated quiz", body = QuizResponse),
        (status = 400, description = "Invalid request or unusable content", body = ApiError),
        (status = 401, description = "Upstream authentication failure", body = ApiError),
        (status = 429, description = "Upstream rate limit", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[instrument(skip(state, request), fields(num_questions = request.num_questions))]
async fn quiz_from_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuizTextRequest>,
) -> Result<Json<QuizResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::InvalidRequest("No text provided".to_string()));
    }
    validate_num_questions(request.num_questions)?;

    let tier = DifficultyTier::parse_or_default(&request.user_level);
    info!("Generating {} question quiz at {} tier", request.num_questions, tier);

    let quiz = study::generate_quiz(
        &state.gemini,
        &request.text,
        request.num_questions,
        tier,
        state.config.limits.max_content_chars,
    )
    .await?;

    Ok(Json(quiz.into()))
}

/// Generate a quiz from an uploaded PDF
#[utoipa::path(
    post,
    path = "/api/quiz/pdf",
    tag = "Quizzes",
    responses(
        (status = 200, description = "Generated quiz", body = QuizResponse),
        (status = 400, description = "Invalid upload or unusable content", body = ApiError),
        (status = 401, description = "Upstream authentication failure", body = ApiError),
        (status = 429, description = "Upstream rate limit", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[instrument(skip(state, multipart))]
async fn quiz_from_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<QuizResponse>, AppError> {
    let upload = read_pdf_upload(multipart).await?;

    let num_questions = upload.num_questions.unwrap_or(DEFAULT_PDF_QUIZ_QUESTIONS);
    validate_num_questions(num_questions)?;

    let tier = DifficultyTier::parse_or_default(&upload.user_level);
    info!(
        "Generating {} question quiz from '{}' at {} tier",
        num_questions, upload.filename, tier
    );

    let raw_text = extract_upload_text(upload.bytes).await?;
    let quiz = study::generate_quiz(
        &state.gemini,
        &raw_text,
        num_questions,
        tier,
        state.config.limits.max_content_chars,
    )
    .await?;

    Ok(Json(quiz.into()))
}

/// Summarize an uploaded PDF at the requested level
#[utoipa::path(
    post,
    path = "/api/summarize",
    tag = "Summaries",
    responses(
        (status = 200, description = "Generated summary", body = SummarizeResponse),
        (status = 400, description = "Invalid upload or unusable content", body = ApiError),
        (status = 401, description = "Upstream authentication failure", body = ApiError),
        (status = 429, description = "Upstream rate limit", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[instrument(skip(state, multipart))]
async fn summarize_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<SummarizeResponse>, AppError> {
    let upload = read_pdf_upload(multipart).await?;

    let tier = DifficultyTier::parse_or_default(&upload.user_level);
    info!("Summarizing '{}' at {} tier", upload.filename, tier);

    let raw_text = extract_upload_text(upload.bytes).await?;
    let summary = summarize::summarize(&state.gemini, &raw_text, tier).await?;

    info!("Summary ready: {} chunks", summary.chunks_processed);
    Ok(Json(summary.into()))
}

/// Adjust the allocated time of a topic
#[utoipa::path(
    post,
    path = "/api/update_timing",
    tag = "Study Plans",
    request_body = UpdateTimingRequest,
    responses(
        (status = 200, description = "Timing acknowledged", body = UpdateTimingResponse),
        (status = 400, description = "Invalid timing value", body = ApiError)
    )
)]
#[instrument(skip_all)]
async fn update_timing(
    Json(request): Json<UpdateTimingRequest>,
) -> Result<Json<UpdateTimingResponse>, AppError> {
    validate_topic_minutes(request.minutes)?;

    let time_saved = i64::from(request.allocated_time) - i64::from(request.minutes);
    debug!(
        "Topic {} timing updated to {} min ({} saved)",
        request.topic_id, request.minutes, time_saved
    );
    Ok(Json(UpdateTimingResponse {
        status: "success".to_string(),
        message: "Time updated successfully".to_string(),
        topic_id: request.topic_id,
        new_time: request.minutes,
        time_saved,
    }))
}

fn is_pdf_filename(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

fn validate_num_questions(n: usize) -> Result<(), AppError> {
    if (1..=20).contains(&n) {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(
            "num_questions must be between 1 and 20".to_string(),
        ))
    }
}

fn validate_topic_minutes(minutes: u32) -> Result<(), AppError> {
    if minutes == 0 || minutes > MAX_TOPIC_MINUTES {
        Err(AppError::InvalidRequest(format!(
            "minutes must be between 1 and {MAX_TOPIC_MINUTES}"
        )))
    } else {
        Ok(())
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    Pdf(PdfError),
    Study(StudyError),
    Internal(String),
}

impl From<PdfError> for AppError {
    fn from(e: PdfError) -> Self {
        AppError::Pdf(e)
    }
}

impl From<StudyError> for AppError {
    fn from(e: StudyError) -> Self {
        match e {
            StudyError::Pdf(e) => AppError::Pdf(e),
            other => AppError::Study(other),
        }
    }
}

impl From<SummaryError> for AppError {
    fn from(e: SummaryError) -> Self {
        // Same status mapping as the plan pipeline
        match e {
            SummaryError::Upstream(e) => AppError::Study(StudyError::Upstream(e)),
            SummaryError::EmptyContent => AppError::Study(StudyError::EmptyContent),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new(msg)),
            AppError::Pdf(e) => (StatusCode::BAD_REQUEST, ApiError::new(e.to_string())),
            AppError::Study(e) => {
                let status = match &e {
                    StudyError::EmptyContent | StudyError::NoQualifyingContent => {
                        StatusCode::BAD_REQUEST
                    }
                    StudyError::NoValidTopics { .. } => StatusCode::BAD_REQUEST,
                    StudyError::Upstream(upstream) => match upstream {
                        GeminiError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
                        GeminiError::RateLimitError(_) => StatusCode::TOO_MANY_REQUESTS,
                        GeminiError::BinaryNotFound(_) => StatusCode::SERVICE_UNAVAILABLE,
                        _ => StatusCode::INTERNAL_SERVER_ERROR,
                    },
                    StudyError::Pdf(_) => StatusCode::BAD_REQUEST,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    warn!("Upstream failure: {}", e);
                }
                (status, ApiError::new(e.to_string()))
            }
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(msg)),
        };

        (status, Json(error)).into_response()
    }
}

/// Start the HTTP server
pub async fn start_server(state: Arc<AppState>) -> Result<(), std::io::Error> {
    let addr = state.config.server_addr();
    let router = create_router(state);

    info!("Starting Cortex server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
