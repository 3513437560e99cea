use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use std::sync::Arc;

use crate::application::services::{ToolCatalog, ToolRegistry};
use crate::presentation::http::dto::ApiResponse;
use crate::presentation::http::error::ApiFailure;

pub struct ToolHandler {
    catalog: Arc<ToolCatalog>,
    registry: Arc<ToolRegistry>,
}

impl ToolHandler {
    pub fn new(catalog: Arc<ToolCatalog>, registry: Arc<ToolRegistry>) -> Self {
        Self { catalog, registry }
    }

    pub async fn list_tools(State(handler): State<Arc<ToolHandler>>) -> impl IntoResponse {
        let listing = handler.catalog.list_tools().await;
        (StatusCode::OK, Json(ApiResponse::success(listing)))
    }

    pub async fn invoke_tool(
        State(handler): State<Arc<ToolHandler>>,
        Path(name): Path<String>,
        payload: Result<Json<Value>, JsonRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Json(input) = payload?;
        let output = handler.registry.invoke(&name, input).await?;
        Ok((StatusCode::OK, Json(ApiResponse::success(output))))
    }
}
