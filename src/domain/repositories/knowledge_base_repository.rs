use async_trait::async_trait;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::KnowledgeBaseEntry;
use crate::domain::repositories::RepositoryError;

#[derive(Debug, Clone)]
pub struct KnowledgeBaseMatch {
    pub entry: KnowledgeBaseEntry,
    pub similarity_score: f32,
}

#[async_trait]
pub trait KnowledgeBaseRepository: Send + Sync {
    /// Swaps a document's entries for `entries` in one transaction.
    async fn replace_for_document(
        &self,
        document_id: Uuid,
        entries: &[KnowledgeBaseEntry],
    ) -> Result<usize, RepositoryError>;
    async fn similarity_search(
        &self,
        query_vector: &Vector,
        limit: i64,
    ) -> Result<Vec<KnowledgeBaseMatch>, RepositoryError>;
    async fn count_by_document(&self, document_id: Uuid) -> Result<i64, RepositoryError>;
    async fn delete_by_document(&self, document_id: Uuid) -> Result<usize, RepositoryError>;
}
