use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::DocumentHandler;

pub fn document_routes(handler: Arc<DocumentHandler>) -> Router {
    Router::new()
        .route("/patients/{patient_id}/files", post(DocumentHandler::upload_file))
        .route(
            "/patients/{patient_id}/files/{file_id}",
            delete(DocumentHandler::delete_file),
        )
        .route("/documents/status/{id}", get(DocumentHandler::get_status))
        .route("/documents", get(DocumentHandler::list_documents))
        .route(
            "/documents/{document_id}",
            get(DocumentHandler::get_document).delete(DocumentHandler::delete_document),
        )
        .with_state(handler)
}
