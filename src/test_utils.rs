// Mirrored by tests/common/mod.rs for the integration tests; keep in step.
#[cfg(test)]
pub mod fixtures {
    use std::{
        collections::VecDeque,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
    };

    use async_trait::async_trait;
    use serde_json::json;

    use crate::{
        errors::{AppError, AppResult},
        models::domain::QuestionItem,
        repositories::{InMemoryVectorIndex, VectorIndex},
        services::{embedding_service::HashingEmbedder, llm_service::TextGenerator},
    };

    /// Replays a fixed sequence of generator results, then empty strings.
    pub struct ScriptedGenerator {
        script: Mutex<VecDeque<AppResult<String>>>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        pub fn new(script: Vec<AppResult<String>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn always(response: &str) -> Self {
            Self::new(vec![Ok(response.to_string()); 16])
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str) -> AppResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .script
                .lock()
                .expect("script lock poisoned")
                .pop_front();
            next.unwrap_or_else(|| Ok(String::new()))
        }
    }

    pub fn generator_error() -> AppResult<String> {
        Err(AppError::InternalError("upstream 503".to_string()))
    }

    pub fn question_json(n: usize) -> serde_json::Value {
        json!({
            "question": format!("Question {}?", n),
            "options": ["Alpha", "Beta", "Gamma", "Delta"],
            "correct_answer": "Alpha",
            "explanation": format!("Explanation {}", n),
        })
    }

    pub fn questions_json(count: usize) -> String {
        let items: Vec<_> = (1..=count).map(question_json).collect();
        serde_json::Value::Array(items).to_string()
    }

    pub fn sample_question() -> QuestionItem {
        serde_json::from_value(question_json(1)).expect("fixture question is valid")
    }

    /// A photosynthesis passage well above the minimum context length.
    pub fn biology_text() -> String {
        "Photosynthesis takes place in the chloroplasts of plant cells. \
         Chlorophyll absorbs light energy, which drives the conversion of carbon dioxide \
         and water into glucose and oxygen. The light-dependent reactions occur in the \
         thylakoid membranes, while the Calvin cycle runs in the stroma."
            .to_string()
    }

    pub async fn index_with(documents: &[(&str, Vec<String>)]) -> Arc<InMemoryVectorIndex> {
        let index = Arc::new(InMemoryVectorIndex::new(Arc::new(HashingEmbedder::default())));
        for (document_id, chunks) in documents {
            index
                .insert(document_id, chunks.clone())
                .await
                .expect("in-memory insert never fails");
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::services::llm_service::TextGenerator;

    #[tokio::test]
    async fn scripted_generator_replays_then_returns_empty() {
        let generator = ScriptedGenerator::new(vec![generator_error(), Ok("[]".to_string())]);

        assert!(generator.generate("p").await.is_err());
        assert_eq!(generator.generate("p").await.ok().as_deref(), Some("[]"));
        assert_eq!(generator.generate("p").await.ok().as_deref(), Some(""));
        assert_eq!(generator.calls(), 3);
    }

    #[test]
    fn questions_json_produces_requested_count() {
        let parsed: Vec<serde_json::Value> =
            serde_json::from_str(&questions_json(3)).expect("fixture is valid json");
        assert_eq!(parsed.len(), 3);
        assert!(sample_question().validate_shape().is_ok());
    }

    #[test]
    fn biology_text_exceeds_minimum_context() {
        assert!(biology_text().chars().count() > 100);
    }
}
