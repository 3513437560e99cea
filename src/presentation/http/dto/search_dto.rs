use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::search_knowledge_base::SearchKnowledgeBaseResponse;
use crate::domain::repositories::KnowledgeBaseMatch;

#[derive(Debug, Deserialize)]
pub struct SearchQueryDto {
    pub q: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponseDto {
    pub query: String,
    pub results: Vec<SearchResultDto>,
    pub total_results: usize,
    pub search_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct SearchResultDto {
    pub entry_id: Uuid,
    pub document_id: Uuid,
    pub text: String,
    pub similarity_score: f32,
    pub metadata: serde_json::Value,
}

impl From<SearchKnowledgeBaseResponse> for SearchResponseDto {
    fn from(response: SearchKnowledgeBaseResponse) -> Self {
        Self {
            query: response.query,
            total_results: response.results.len(),
            results: response.results.into_iter().map(SearchResultDto::from).collect(),
            search_time_ms: response.search_time_ms,
        }
    }
}

impl From<KnowledgeBaseMatch> for SearchResultDto {
    fn from(result: KnowledgeBaseMatch) -> Self {
        Self {
            entry_id: result.entry.id(),
            document_id: result.entry.document_id(),
            text: result.entry.text().to_string(),
            similarity_score: result.similarity_score,
            metadata: result.entry.metadata().clone(),
        }
    }
}
