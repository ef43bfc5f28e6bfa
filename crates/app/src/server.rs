use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use doc_assist_core::{
    AnalysisError, AnswerModel, AssistPipeline, Document, DocumentKind, DocumentReceipt,
    PipelineError, SessionAnswer, SessionError, SessionStore, SummaryModel, TextExtractor,
};
use serde::Deserialize;
use serde_json::json;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub async fn serve<E, S, M, A>(pipeline: AssistPipeline<E, S, M, A>, port: u16) -> anyhow::Result<()>
where
    E: TextExtractor + 'static,
    S: SessionStore + 'static,
    M: SummaryModel + 'static,
    A: AnswerModel + 'static,
{
    let router = create_router(Arc::new(pipeline));
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
    info!(port, "http api listening");
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn create_router<E, S, M, A>(pipeline: Arc<AssistPipeline<E, S, M, A>>) -> Router
where
    E: TextExtractor + 'static,
    S: SessionStore + 'static,
    M: SummaryModel + 'static,
    A: AnswerModel + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/documents", post(upload_document::<E, S, M, A>))
        .route(
            "/sessions/:session_id/question",
            post(ask_question::<E, S, M, A>),
        )
        .with_state(pipeline)
}

#[derive(Debug, Deserialize)]
struct UploadRequest {
    file_name: String,
    content_base64: String,
}

#[derive(Debug, Deserialize)]
struct QuestionRequest {
    question: String,
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn upload_document<E, S, M, A>(
    State(pipeline): State<Arc<AssistPipeline<E, S, M, A>>>,
    Json(request): Json<UploadRequest>,
) -> Result<Json<DocumentReceipt>, AppError>
where
    E: TextExtractor,
    S: SessionStore,
    M: SummaryModel,
    A: AnswerModel,
{
    let extension = request
        .file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .unwrap_or_default();
    let kind = DocumentKind::from_extension(extension).ok_or_else(|| {
        AppError::BadRequest(format!(
            "unsupported file type: {} (allowed: pdf, png, jpg, jpeg)",
            request.file_name
        ))
    })?;
    let bytes = BASE64.decode(request.content_base64.as_bytes()).map_err(|error| {
        AppError::BadRequest(format!("content_base64 is not valid base64: {error}"))
    })?;

    let document = Document::new(bytes, kind, request.file_name);
    let receipt = pipeline.ingest_document(&document).await?;
    info!(session = %receipt.session_id, source = %document.source_name, "document ingested");
    Ok(Json(receipt))
}

async fn ask_question<E, S, M, A>(
    State(pipeline): State<Arc<AssistPipeline<E, S, M, A>>>,
    Path(session_id): Path<String>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<SessionAnswer>, AppError>
where
    E: TextExtractor,
    S: SessionStore,
    M: SummaryModel,
    A: AnswerModel,
{
    let outcome = pipeline.answer_question(&session_id, &request.question).await?;
    info!(session = %session_id, score = outcome.answer.score, "question answered");
    Ok(Json(outcome))
}

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Pipeline(PipelineError),
}

impl From<PipelineError> for AppError {
    fn from(error: PipelineError) -> Self {
        Self::Pipeline(error)
    }
}

fn pipeline_status(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
        PipelineError::Session(SessionError::InvalidId(_)) => StatusCode::BAD_REQUEST,
        PipelineError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        PipelineError::Extract(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::Answer(AnalysisError::EmptyQuestion) => StatusCode::BAD_REQUEST,
        PipelineError::Answer(AnalysisError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
        PipelineError::Answer(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Summary(failure) => match failure.reason {
            AnalysisError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(detail) => (StatusCode::BAD_REQUEST, json!({ "error": detail })),
            AppError::Pipeline(error) => {
                let status = pipeline_status(&error);
                let body = match &error {
                    PipelineError::Summary(failure) => json!({
                        "error": error.to_string(),
                        "excerpt": failure.excerpt,
                    }),
                    _ => json!({ "error": error.to_string() }),
                };
                (status, body)
            }
        };
        warn!(status = %status, error = %body["error"], "request failed");
        (status, Json(body)).into_response()
    }
}
