use std::sync::Arc;

use crate::{errors::AppResult, repositories::VectorIndex};

pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_MIN_CONTEXT_CHARS: usize = 100;

/// Topic-scoped retrieval over a single document's chunks.
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
    top_k: usize,
    min_context_chars: usize,
}

impl Retriever {
    pub fn new(index: Arc<dyn VectorIndex>, top_k: usize, min_context_chars: usize) -> Self {
        Self {
            index,
            top_k,
            min_context_chars,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Joins the `k` most relevant chunks of `document_id` with newlines,
    /// most relevant first.
    pub async fn retrieve(&self, topic: &str, document_id: &str, k: usize) -> AppResult<String> {
        let chunks = self.index.query(topic, document_id, k).await?;
        log::debug!(
            "Retrieved {} chunks for topic '{}' in document {}",
            chunks.len(),
            topic,
            document_id
        );
        Ok(chunks.join("\n"))
    }

    pub async fn retrieve_default(&self, topic: &str, document_id: &str) -> AppResult<String> {
        self.retrieve(topic, document_id, self.top_k).await
    }

    /// Context shorter than the threshold (in characters) is not worth a
    /// generator call.
    pub fn is_sufficient(&self, context: &str) -> bool {
        context.chars().count() >= self.min_context_chars
    }
}
