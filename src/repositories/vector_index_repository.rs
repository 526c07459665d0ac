use std::{cmp::Ordering, sync::Arc};

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};
use tokio::sync::RwLock;

use crate::{
    db::{Database, DOCUMENT_CHUNKS_COLLECTION},
    errors::{AppError, AppResult},
    models::domain::{DocumentChunk, IndexedChunk},
    services::embedding_service::{cosine_similarity, Embedder},
};

/// Chunk store with metadata-scoped similarity search.
///
/// `query` only ever considers chunks whose `metadata.document_id` equals
/// the requested document, however similar other documents' chunks are.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Embeds and stores `chunks` for `document_id`. Repeated calls for the
    /// same document append; nothing is replaced.
    async fn insert(&self, document_id: &str, chunks: Vec<String>) -> AppResult<usize>;

    /// Up to `k` chunk texts of `document_id`, most similar first.
    async fn query(&self, query_text: &str, document_id: &str, k: usize) -> AppResult<Vec<String>>;

    async fn delete_document(&self, document_id: &str) -> AppResult<u64>;
}

async fn embed_chunks(
    embedder: &dyn Embedder,
    document_id: &str,
    chunks: Vec<String>,
) -> AppResult<Vec<IndexedChunk>> {
    let embeddings = embedder.embed(&chunks).await?;
    if embeddings.len() != chunks.len() {
        return Err(AppError::IndexUnavailable(format!(
            "embedder returned {} vectors for {} chunks",
            embeddings.len(),
            chunks.len()
        )));
    }

    Ok(DocumentChunk::from_texts(document_id, chunks)
        .into_iter()
        .zip(embeddings)
        .map(|(chunk, embedding)| IndexedChunk::new(chunk, embedding))
        .collect())
}

/// Ranks `candidates` against `query_embedding`, keeping only chunks of
/// `document_id`. Ties keep chunk order so results are deterministic.
pub fn rank_chunks<'a, I>(
    query_embedding: &[f32],
    document_id: &str,
    candidates: I,
    k: usize,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a IndexedChunk>,
{
    let mut scored: Vec<(f32, &IndexedChunk)> = candidates
        .into_iter()
        .filter(|c| c.chunk.metadata.document_id == document_id)
        .map(|c| (cosine_similarity(query_embedding, &c.embedding), c))
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.chunk.chunk_index.cmp(&b.chunk.chunk_index))
    });

    scored
        .into_iter()
        .take(k)
        .map(|(_, c)| c.chunk.text.clone())
        .collect()
}

pub struct MongoVectorIndex {
    collection: Collection<IndexedChunk>,
    embedder: Arc<dyn Embedder>,
}

impl MongoVectorIndex {
    pub fn new(db: &Database, embedder: Arc<dyn Embedder>) -> Self {
        let collection = db.get_collection(DOCUMENT_CHUNKS_COLLECTION);
        Self {
            collection,
            embedder,
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for {} collection", DOCUMENT_CHUNKS_COLLECTION);

        // Not unique: re-ingesting a document appends a second copy.
        let document_index = IndexModel::builder()
            .keys(doc! { "metadata.document_id": 1, "chunk_index": 1 })
            .options(
                IndexOptions::builder()
                    .name("document_chunk".to_string())
                    .build(),
            )
            .build();

        self.collection
            .create_index(document_index)
            .await
            .map_err(|e| AppError::IndexUnavailable(e.to_string()))?;

        log::info!(
            "Successfully created indexes for {} collection",
            DOCUMENT_CHUNKS_COLLECTION
        );
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for MongoVectorIndex {
    async fn insert(&self, document_id: &str, chunks: Vec<String>) -> AppResult<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let records = embed_chunks(self.embedder.as_ref(), document_id, chunks).await?;
        let count = records.len();

        self.collection
            .insert_many(&records)
            .await
            .map_err(|e| AppError::IndexUnavailable(e.to_string()))?;

        log::debug!("Indexed {} chunks for document {}", count, document_id);
        Ok(count)
    }

    async fn query(&self, query_text: &str, document_id: &str, k: usize) -> AppResult<Vec<String>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed_one(query_text).await?;

        let cursor = self
            .collection
            .find(doc! { "metadata.document_id": document_id })
            .await
            .map_err(|e| AppError::IndexUnavailable(e.to_string()))?;
        let candidates: Vec<IndexedChunk> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::IndexUnavailable(e.to_string()))?;

        Ok(rank_chunks(&query_embedding, document_id, &candidates, k))
    }

    async fn delete_document(&self, document_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "metadata.document_id": document_id })
            .await
            .map_err(|e| AppError::IndexUnavailable(e.to_string()))?;
        Ok(result.deleted_count)
    }
}

/// Process-local index; contents are lost on restart.
pub struct InMemoryVectorIndex {
    records: RwLock<Vec<IndexedChunk>>,
    embedder: Arc<dyn Embedder>,
}

impl InMemoryVectorIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            embedder,
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn insert(&self, document_id: &str, chunks: Vec<String>) -> AppResult<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let records = embed_chunks(self.embedder.as_ref(), document_id, chunks).await?;
        let count = records.len();
        self.records.write().await.extend(records);
        Ok(count)
    }

    async fn query(&self, query_text: &str, document_id: &str, k: usize) -> AppResult<Vec<String>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed_one(query_text).await?;
        let records = self.records.read().await;
        Ok(rank_chunks(&query_embedding, document_id, records.iter(), k))
    }

    async fn delete_document(&self, document_id: &str) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.chunk.metadata.document_id != document_id);
        Ok((before - records.len()) as u64)
    }
}
