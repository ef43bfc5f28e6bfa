use crate::error::{AnalysisError, Result};
use crate::extractor::TextExtractor;
use crate::inference::{AnswerModel, SummaryModel};
use crate::models::{AnalysisOptions, Document, DocumentReceipt, SessionAnswer};
use crate::qa::QuestionAnswerer;
use crate::session::SessionStore;
use crate::summarize::Summarizer;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct AssistPipeline<E, S, M, A>
where
    E: TextExtractor,
    S: SessionStore,
    M: SummaryModel,
    A: AnswerModel,
{
    extractor: E,
    sessions: S,
    summarizer: Summarizer<M>,
    answerer: QuestionAnswerer<A>,
    summary_cache: Mutex<HashMap<String, String>>,
}

impl<E, S, M, A> AssistPipeline<E, S, M, A>
where
    E: TextExtractor,
    S: SessionStore,
    M: SummaryModel,
    A: AnswerModel,
{
    pub fn new(
        extractor: E,
        sessions: S,
        summary_model: M,
        answer_model: A,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            extractor,
            sessions,
            summarizer: Summarizer::new(summary_model, options),
            answerer: QuestionAnswerer::new(answer_model, options),
            summary_cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn ingest_document(&self, document: &Document) -> Result<DocumentReceipt> {
        let text = self.extractor.extract(document)?;
        let summary = self.summarizer.summarize(&text).await?;
        let session_id = self.sessions.create(&text)?;
        self.cache_summary(&session_id, &summary);

        Ok(DocumentReceipt {
            session_id,
            summary,
            checksum: document.checksum(),
            ingested_at: Utc::now(),
        })
    }

    pub async fn answer_question(&self, session_id: &str, question: &str) -> Result<SessionAnswer> {
        let text = self.sessions.load(session_id)?;
        if question.trim().is_empty() {
            return Err(AnalysisError::EmptyQuestion.into());
        }

        let summary = match self.cached_summary(session_id) {
            Some(summary) => summary,
            None => {
                let summary = self.summarizer.summarize(&text).await?;
                self.cache_summary(session_id, &summary);
                summary
            }
        };

        let answer = self.answerer.answer(&text, question).await?;
        Ok(SessionAnswer {
            session_id: session_id.to_string(),
            summary,
            question: question.to_string(),
            answer,
        })
    }

    pub fn list_sessions(&self) -> Result<Vec<String>> {
        Ok(self.sessions.list()?)
    }

    fn cached_summary(&self, session_id: &str) -> Option<String> {
        let cache = self
            .summary_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.get(session_id).cloned()
    }

    fn cache_summary(&self, session_id: &str, summary: &str) {
        let mut cache = self
            .summary_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.insert(session_id.to_string(), summary.to_string());
    }
}
