use axum::{Router, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::SearchHandler;

pub fn search_routes(handler: Arc<SearchHandler>) -> Router {
    Router::new()
        .route(
            "/knowledge-base/search",
            get(SearchHandler::search_knowledge_base),
        )
        .with_state(handler)
}
