use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::ToolHandler;

pub fn tool_routes(handler: Arc<ToolHandler>) -> Router {
    Router::new()
        .route("/tools", get(ToolHandler::list_tools))
        .route("/tools/{name}/invoke", post(ToolHandler::invoke_tool))
        .with_state(handler)
}
