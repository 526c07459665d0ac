use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    repositories::VectorIndex,
    services::chunker::Chunker,
};

/// Splits raw document text into chunks and stores them under a
/// document id.
pub struct IngestionService {
    chunker: Chunker,
    index: Arc<dyn VectorIndex>,
}

impl IngestionService {
    pub fn new(chunker: Chunker, index: Arc<dyn VectorIndex>) -> Self {
        Self { chunker, index }
    }

    /// Returns the number of chunks stored. Text that yields no chunks
    /// leaves the index untouched.
    pub async fn ingest(&self, document_id: &str, raw_text: &str) -> AppResult<usize> {
        if document_id.trim().is_empty() {
            return Err(AppError::ValidationError(
                "document_id: document_id is required".to_string(),
            ));
        }

        let chunks = self.chunker.split(raw_text);
        if chunks.is_empty() {
            log::info!("Document {} produced no chunks, nothing indexed", document_id);
            return Ok(0);
        }

        let stored = self.index.insert(document_id, chunks).await?;
        log::info!("Indexed {} chunks for document {}", stored, document_id);
        Ok(stored)
    }

    pub async fn delete(&self, document_id: &str) -> AppResult<u64> {
        let removed = self.index.delete_document(document_id).await?;
        log::info!("Removed {} chunks for document {}", removed, document_id);
        Ok(removed)
    }
}

/// Pulls the text layer out of a PDF on the blocking pool.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> AppResult<String> {
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::InternalError(format!("PDF extraction task failed: {}", e)))?
        .map_err(|e| AppError::BadRequest(format!("Could not read PDF: {}", e)))
}
