use crate::chunking::char_prefix;
use crate::error::AnalysisError;
use crate::inference::AnswerModel;
use crate::models::{AnalysisOptions, Answer};

pub struct QuestionAnswerer<A: AnswerModel> {
    model: A,
    options: AnalysisOptions,
}

impl<A: AnswerModel> QuestionAnswerer<A> {
    pub fn new(model: A, options: AnalysisOptions) -> Self {
        Self { model, options }
    }

    pub async fn answer(&self, text: &str, question: &str) -> Result<Answer, AnalysisError> {
        if question.trim().is_empty() {
            return Err(AnalysisError::EmptyQuestion);
        }

        let context = char_prefix(text, self.options.answer_context_chars);
        self.model.answer_span(question, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingModel {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl AnswerModel for RecordingModel {
        async fn answer_span(
            &self,
            question: &str,
            context: &str,
        ) -> Result<Answer, AnalysisError> {
            self.calls
                .lock()
                .expect("lock calls")
                .push((question.to_string(), context.to_string()));
            Ok(Answer {
                text: format!("answer about {} chars", context.chars().count()),
                score: 0.5,
            })
        }
    }

    #[tokio::test]
    async fn context_is_capped_at_the_configured_char_count() {
        let answerer = QuestionAnswerer::new(RecordingModel::default(), AnalysisOptions::default());
        let text = "a".repeat(6000);

        answerer.answer(&text, "what is this?").await.expect("answer");

        let calls = answerer.model.calls.lock().expect("lock calls");
        assert_eq!(calls[0].1.chars().count(), 5000);
    }

    #[tokio::test]
    async fn text_past_the_context_cap_cannot_change_the_answer() {
        let answerer = QuestionAnswerer::new(RecordingModel::default(), AnalysisOptions::default());
        let shared_head = "b".repeat(5000);
        let first_text = format!("{shared_head} tail one");
        let second_text = format!("{shared_head} другой хвост");

        let first = answerer
            .answer(&first_text, "what is this?")
            .await
            .expect("answer");
        let second = answerer
            .answer(&second_text, "what is this?")
            .await
            .expect("answer");

        assert_eq!(first.text, second.text);
        let calls = answerer.model.calls.lock().expect("lock calls");
        assert_eq!(calls[0].1, calls[1].1);
    }

    #[tokio::test]
    async fn short_text_passes_through_unmodified() {
        let answerer = QuestionAnswerer::new(RecordingModel::default(), AnalysisOptions::default());
        let text = "ATP is produced in the mitochondria.";

        answerer.answer(text, "where is ATP produced?").await.expect("answer");

        let calls = answerer.model.calls.lock().expect("lock calls");
        assert_eq!(calls[0].1, text);
    }

    #[tokio::test]
    async fn blank_question_is_rejected_before_inference() {
        let answerer = QuestionAnswerer::new(RecordingModel::default(), AnalysisOptions::default());

        let result = answerer.answer("some text", "   ").await;
        assert!(matches!(result, Err(AnalysisError::EmptyQuestion)));
        assert!(answerer.model.calls.lock().expect("lock calls").is_empty());
    }
}
