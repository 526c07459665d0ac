use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Embedding vector produced by an [`Embedder`](crate::services::embedding_service::Embedder).
pub type Embedding = Vec<f32>;

/// Filterable metadata attached to every indexed chunk.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChunkMetadata {
    pub document_id: String,
}

/// A bounded slice of a source document. `chunk_index` is dense from 0
/// within one insertion of a document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentChunk {
    pub chunk_id: String,
    pub document_id: String,
    pub chunk_index: u32,
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    pub fn new(document_id: &str, chunk_index: u32, text: impl Into<String>) -> Self {
        Self {
            chunk_id: Self::chunk_id_for(document_id, chunk_index),
            document_id: document_id.to_string(),
            chunk_index,
            text: text.into(),
            metadata: ChunkMetadata {
                document_id: document_id.to_string(),
            },
        }
    }

    pub fn chunk_id_for(document_id: &str, chunk_index: u32) -> String {
        format!("{}_{}", document_id, chunk_index)
    }

    /// Builds the dense, ordered chunk list for one insertion call.
    pub fn from_texts(document_id: &str, texts: Vec<String>) -> Vec<Self> {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Self::new(document_id, i as u32, text))
            .collect()
    }
}

/// Persisted form of a chunk: the chunk itself plus its embedding.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct IndexedChunk {
    #[serde(flatten)]
    pub chunk: DocumentChunk,
    pub embedding: Embedding,
    pub created_at: DateTime<Utc>,
}

impl IndexedChunk {
    pub fn new(chunk: DocumentChunk, embedding: Embedding) -> Self {
        Self {
            chunk,
            embedding,
            created_at: Utc::now(),
        }
    }
}
