use crate::chunking::{char_prefix, chunk_text};
use crate::error::{AnalysisError, SummaryError};
use crate::inference::SummaryModel;
use crate::models::AnalysisOptions;

pub struct Summarizer<M: SummaryModel> {
    model: M,
    options: AnalysisOptions,
}

impl<M: SummaryModel> Summarizer<M> {
    pub fn new(model: M, options: AnalysisOptions) -> Self {
        Self { model, options }
    }

    pub async fn summarize(&self, text: &str) -> Result<String, SummaryError> {
        match self.condense_in_order(text).await {
            Ok(summary) => Ok(summary),
            Err(reason) => Err(SummaryError {
                reason,
                excerpt: char_prefix(text, self.options.fallback_excerpt_chars).to_string(),
            }),
        }
    }

    async fn condense_in_order(&self, text: &str) -> Result<String, AnalysisError> {
        let chunks = chunk_text(text, self.options.chunk_chars)?;

        let mut parts = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let condensed = self
                .model
                .condense(
                    chunk,
                    self.options.summary_max_length,
                    self.options.summary_min_length,
                )
                .await?;
            parts.push(condensed);
        }
        Ok(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingModel {
        calls: Mutex<Vec<(String, usize, usize)>>,
        fail: bool,
    }

    #[async_trait]
    impl SummaryModel for RecordingModel {
        async fn condense(
            &self,
            text: &str,
            max_length: usize,
            min_length: usize,
        ) -> Result<String, AnalysisError> {
            if self.fail {
                return Err(AnalysisError::ModelUnavailable("no model loaded".to_string()));
            }
            self.calls
                .lock()
                .expect("lock calls")
                .push((text.to_string(), max_length, min_length));
            Ok(text.to_uppercase())
        }
    }

    fn small_chunk_options() -> AnalysisOptions {
        AnalysisOptions {
            chunk_chars: 4,
            ..AnalysisOptions::default()
        }
    }

    #[tokio::test]
    async fn chunk_summaries_join_in_order_with_single_spaces() {
        let summarizer = Summarizer::new(RecordingModel::default(), small_chunk_options());
        let summary = summarizer.summarize("aaaabbbbcc").await.expect("summary");
        assert_eq!(summary, "AAAA BBBB CC");
    }

    #[tokio::test]
    async fn model_receives_configured_length_bounds() {
        let summarizer = Summarizer::new(RecordingModel::default(), AnalysisOptions::default());
        summarizer.summarize("lecture notes").await.expect("summary");

        let calls = summarizer.model.calls.lock().expect("lock calls");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, 130);
        assert_eq!(calls[0].2, 30);
    }

    #[tokio::test]
    async fn empty_text_summarizes_without_model_calls() {
        let summarizer = Summarizer::new(RecordingModel::default(), AnalysisOptions::default());
        let summary = summarizer.summarize("").await.expect("summary");

        assert_eq!(summary, "");
        assert!(summarizer.model.calls.lock().expect("lock calls").is_empty());
    }

    #[tokio::test]
    async fn summarize_is_deterministic_for_equal_text() {
        let summarizer = Summarizer::new(RecordingModel::default(), small_chunk_options());
        let first = summarizer.summarize("the cell cycle").await.expect("summary");
        let second = summarizer.summarize("the cell cycle").await.expect("summary");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn failure_carries_reason_and_leading_excerpt() {
        let model = RecordingModel {
            fail: true,
            ..RecordingModel::default()
        };
        let summarizer = Summarizer::new(model, AnalysisOptions::default());
        let text = "z".repeat(700);

        let error = summarizer.summarize(&text).await.expect_err("failure");
        assert!(matches!(error.reason, AnalysisError::ModelUnavailable(_)));
        assert_eq!(error.excerpt, "z".repeat(500));
    }
}
