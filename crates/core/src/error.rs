use thiserror::Error;

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("ocr failed: {0}")]
    OcrFailed(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("question is empty")]
    EmptyQuestion,

    #[error("inference service unavailable: {0}")]
    ModelUnavailable(String),

    #[error("inference deadline exceeded: {0}")]
    Timeout(String),

    #[error("inference request failed: {0}")]
    Request(String),

    #[error("invalid inference response: {0}")]
    InvalidResponse(String),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session id: {0}")]
    InvalidId(String),

    #[error("session not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Error)]
#[error("summary generation failed: {reason}")]
pub struct SummaryError {
    #[source]
    pub reason: AnalysisError,
    pub excerpt: String,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error("answering failed: {0}")]
    Answer(#[from] AnalysisError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),
}
