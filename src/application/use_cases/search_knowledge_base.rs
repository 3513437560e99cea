use std::sync::Arc;

use crate::application::services::KnowledgeBaseIndexer;
use crate::application::services::knowledge_base_indexer::IndexingError;
use crate::domain::repositories::KnowledgeBaseMatch;

#[derive(Debug)]
pub enum SearchKnowledgeBaseError {
    ValidationError(String),
    UpstreamError(String),
    RepositoryError(String),
}

impl std::fmt::Display for SearchKnowledgeBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchKnowledgeBaseError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            SearchKnowledgeBaseError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            SearchKnowledgeBaseError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for SearchKnowledgeBaseError {}

impl From<IndexingError> for SearchKnowledgeBaseError {
    fn from(error: IndexingError) -> Self {
        match error {
            IndexingError::EmbeddingError(_) | IndexingError::InvalidEmbedding(_) => {
                SearchKnowledgeBaseError::UpstreamError(error.to_string())
            }
            _ => SearchKnowledgeBaseError::RepositoryError(error.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchKnowledgeBaseRequest {
    pub query: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct SearchKnowledgeBaseResponse {
    pub query: String,
    pub results: Vec<KnowledgeBaseMatch>,
    pub search_time_ms: u64,
}

pub struct SearchKnowledgeBaseUseCase {
    indexer: Arc<KnowledgeBaseIndexer>,
}

impl SearchKnowledgeBaseUseCase {
    pub fn new(indexer: Arc<KnowledgeBaseIndexer>) -> Self {
        Self { indexer }
    }

    pub async fn execute(
        &self,
        request: SearchKnowledgeBaseRequest,
    ) -> Result<SearchKnowledgeBaseResponse, SearchKnowledgeBaseError> {
        let start_time = std::time::Instant::now();

        if request.query.trim().is_empty() {
            return Err(SearchKnowledgeBaseError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }

        let limit = request.limit.unwrap_or(10);
        if limit <= 0 || limit > 100 {
            return Err(SearchKnowledgeBaseError::ValidationError(
                "Limit must be between 1 and 100".to_string(),
            ));
        }

        let results = self.indexer.search(request.query.trim(), limit).await?;

        Ok(SearchKnowledgeBaseResponse {
            query: request.query,
            results,
            search_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
