use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::application::ports::{
    EmbeddingProvider,
    embedding_provider::{BatchEmbeddingRequest, EmbeddingProviderError},
};
use crate::domain::entities::{KnowledgeBaseEntry, ProcessedDocument};
use crate::domain::repositories::{
    KnowledgeBaseMatch, KnowledgeBaseRepository, ProcessedDocumentRepository, RepositoryError,
    UploadedFileRepository,
};

const CHUNK_SIZE: usize = 200;
const CHUNK_OVERLAP: usize = 40;
const BATCH_SIZE: usize = 10;

#[derive(Debug)]
pub enum IndexingError {
    DocumentNotFound(Uuid),
    EmbeddingError(EmbeddingProviderError),
    InvalidEmbedding(String),
    RepositoryError(String),
}

impl IndexingError {
    pub fn is_retryable(&self) -> bool {
        match self {
            IndexingError::EmbeddingError(e) => e.is_retryable(),
            IndexingError::RepositoryError(_) => true,
            IndexingError::DocumentNotFound(_) | IndexingError::InvalidEmbedding(_) => false,
        }
    }
}

impl std::fmt::Display for IndexingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexingError::DocumentNotFound(id) => write!(f, "Document not found: {}", id),
            IndexingError::EmbeddingError(e) => write!(f, "Embedding error: {}", e),
            IndexingError::InvalidEmbedding(msg) => write!(f, "Invalid embedding: {}", msg),
            IndexingError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for IndexingError {}

impl From<RepositoryError> for IndexingError {
    fn from(error: RepositoryError) -> Self {
        IndexingError::RepositoryError(error.to_string())
    }
}

/// Derived retrieval index over processed documents. Losing it loses no
/// authoritative data.
pub struct KnowledgeBaseIndexer {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    knowledge_base_repository: Arc<dyn KnowledgeBaseRepository>,
    processed_document_repository: Arc<dyn ProcessedDocumentRepository>,
    uploaded_file_repository: Arc<dyn UploadedFileRepository>,
}

impl KnowledgeBaseIndexer {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        knowledge_base_repository: Arc<dyn KnowledgeBaseRepository>,
        processed_document_repository: Arc<dyn ProcessedDocumentRepository>,
        uploaded_file_repository: Arc<dyn UploadedFileRepository>,
    ) -> Self {
        Self {
            embedding_provider,
            knowledge_base_repository,
            processed_document_repository,
            uploaded_file_repository,
        }
    }

    /// Returns the number of entries written for the document.
    pub async fn index_document(&self, document_id: Uuid) -> Result<usize, IndexingError> {
        let document = self
            .processed_document_repository
            .find_by_id(document_id)
            .await?
            .ok_or(IndexingError::DocumentNotFound(document_id))?;

        let chunks = chunk_words(&document.text_content(), CHUNK_SIZE, CHUNK_OVERLAP);
        let entries = self.embed_chunks(&document, &chunks).await?;

        let written = self
            .knowledge_base_repository
            .replace_for_document(document_id, &entries)
            .await?;

        if let Some(file_id) = document.file_id() {
            if let Some(mut file) = self.uploaded_file_repository.find_by_file_id(file_id).await? {
                match file.mark_indexed() {
                    Ok(()) => self.uploaded_file_repository.update(&file).await?,
                    Err(e) => debug!("Stage unchanged for {}: {}", file_id, e),
                }
            }
        }

        info!("Indexed document {} into {} entries", document_id, written);
        Ok(written)
    }

    pub async fn search(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<KnowledgeBaseMatch>, IndexingError> {
        let (model_name, _) = self.embedding_provider.model_info();
        let response = self
            .embedding_provider
            .generate_embeddings(BatchEmbeddingRequest {
                texts: vec![query.to_string()],
                model_name: Some(model_name),
            })
            .await
            .map_err(IndexingError::EmbeddingError)?;

        let query_vector = response.embeddings.into_iter().next().ok_or_else(|| {
            IndexingError::InvalidEmbedding("No embedding returned for query".to_string())
        })?;

        Ok(self
            .knowledge_base_repository
            .similarity_search(&query_vector, limit)
            .await?)
    }

    async fn embed_chunks(
        &self,
        document: &ProcessedDocument,
        chunks: &[String],
    ) -> Result<Vec<KnowledgeBaseEntry>, IndexingError> {
        let mut entries = Vec::with_capacity(chunks.len());
        let (model_name, _) = self.embedding_provider.model_info();

        for (batch_index, batch) in chunks.chunks(BATCH_SIZE).enumerate() {
            let response = self
                .embedding_provider
                .generate_embeddings(BatchEmbeddingRequest {
                    texts: batch.to_vec(),
                    model_name: Some(model_name.clone()),
                })
                .await
                .map_err(IndexingError::EmbeddingError)?;

            if response.embeddings.len() != batch.len() {
                return Err(IndexingError::InvalidEmbedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }

            for (offset, (text, embedding)) in
                batch.iter().zip(response.embeddings.into_iter()).enumerate()
            {
                let metadata = serde_json::json!({
                    "chunk_index": batch_index * BATCH_SIZE + offset,
                    "patient_id": document.patient_id(),
                    "file_id": document.file_id(),
                    "model": response.model_name,
                });
                let entry = KnowledgeBaseEntry::new(
                    document.document_id(),
                    text.clone(),
                    embedding,
                    metadata,
                )
                .map_err(IndexingError::InvalidEmbedding)?;
                entries.push(entry);
            }
        }

        Ok(entries)
    }
}

/// Overlapping windows of `size` words, each starting `size - overlap` words
/// after the previous one.
fn chunk_words(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut chunks = Vec::new();
    if words.is_empty() {
        return chunks;
    }

    let step = size.saturating_sub(overlap).max(1);
    let mut start = 0;
    loop {
        let end = std::cmp::min(start + size, words.len());
        chunks.push(words[start..end].join(" "));
        if end >= words.len() {
            break;
        }
        start += step;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_words_overlaps() {
        let text = (0..450).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let chunks = chunk_words(&text, 200, 40);

        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].starts_with("w0 "));
        assert!(chunks[1].starts_with("w160 "));
        assert!(chunks[2].starts_with("w320 "));
        assert!(chunks[2].ends_with("w449"));
    }

    #[test]
    fn test_chunk_words_short_and_empty() {
        assert!(chunk_words("   ", 200, 40).is_empty());
        assert_eq!(chunk_words("Hemoglobin 13.5", 200, 40), vec!["Hemoglobin 13.5"]);
    }
}
