pub mod chunking;
pub mod error;
pub mod extractor;
pub mod inference;
pub mod models;
pub mod pipeline;
pub mod qa;
pub mod session;
pub mod summarize;

pub use chunking::{char_prefix, chunk_text};
pub use error::{
    AnalysisError, ExtractError, PipelineError, Result, SessionError, SummaryError,
};
pub use extractor::{extract_pdf_text, DocumentTextExtractor, OcrEndpoint, TextExtractor};
pub use inference::{
    AnswerModel, InferenceClient, InferenceConfig, SummaryModel, DEFAULT_ANSWER_MODEL,
    DEFAULT_INFERENCE_TIMEOUT, DEFAULT_SUMMARY_MODEL,
};
pub use models::{
    AnalysisOptions, Answer, Document, DocumentKind, DocumentReceipt, SessionAnswer,
};
pub use pipeline::AssistPipeline;
pub use qa::QuestionAnswerer;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use summarize::Summarizer;
