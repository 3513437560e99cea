use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{
    SearchKnowledgeBaseUseCase, search_knowledge_base::SearchKnowledgeBaseRequest,
};
use crate::presentation::http::dto::{ApiResponse, SearchQueryDto, SearchResponseDto};
use crate::presentation::http::error::ApiFailure;

pub struct SearchHandler {
    search_use_case: Arc<SearchKnowledgeBaseUseCase>,
}

impl SearchHandler {
    pub fn new(search_use_case: Arc<SearchKnowledgeBaseUseCase>) -> Self {
        Self { search_use_case }
    }

    pub async fn search_knowledge_base(
        State(handler): State<Arc<SearchHandler>>,
        query: Result<Query<SearchQueryDto>, QueryRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Query(params) = query?;

        let response = handler
            .search_use_case
            .execute(SearchKnowledgeBaseRequest {
                query: params.q,
                limit: params.limit,
            })
            .await?;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(SearchResponseDto::from(response))),
        ))
    }
}
