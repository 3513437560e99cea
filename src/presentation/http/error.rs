use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::application::services::tool_registry::ToolError;
use crate::application::use_cases::{
    record_error::RecordError, search_knowledge_base::SearchKnowledgeBaseError,
    upload_file::UploadFileError,
};
use crate::domain::value_objects::FieldErrors;
use crate::presentation::http::dto::ApiResponse;

pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const CONFLICT: &str = "CONFLICT";
pub const SLOT_ALREADY_BOOKED: &str = "SLOT_ALREADY_BOOKED";
pub const RESTRICTED: &str = "RESTRICTED";
pub const UPSTREAM_UNAVAILABLE: &str = "UPSTREAM_UNAVAILABLE";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// An error response: HTTP status plus the machine-readable code carried in
/// the envelope.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub field_errors: Option<FieldErrors>,
}

impl ApiFailure {
    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: VALIDATION_FAILED,
            message: "Request validation failed".to_string(),
            field_errors: Some(errors),
        }
    }

    pub fn bad_request(field: &str, message: &str) -> Self {
        Self::validation(FieldErrors::single(field, message))
    }

    pub fn not_found(message: String) -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND, message)
    }

    pub fn upstream(detail: &str) -> Self {
        error!("Upstream failure: {}", detail);
        Self::new(
            StatusCode::BAD_GATEWAY,
            UPSTREAM_UNAVAILABLE,
            "A dependent service is unavailable".to_string(),
        )
    }

    /// Details go to the log only.
    pub fn internal(detail: &str) -> Self {
        error!("Internal error: {}", detail);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR,
            "An internal error occurred".to_string(),
        )
    }

    fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            code,
            message,
            field_errors: None,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let field_errors = self.field_errors.map(|e| e.errors().to_vec());
        let body = ApiResponse::<()>::error(self.code.to_string(), self.message, field_errors);
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        ApiFailure::bad_request("body", &rejection.body_text())
    }
}

impl From<QueryRejection> for ApiFailure {
    fn from(rejection: QueryRejection) -> Self {
        ApiFailure::bad_request("query", &rejection.body_text())
    }
}

impl From<PathRejection> for ApiFailure {
    fn from(rejection: PathRejection) -> Self {
        ApiFailure::bad_request("path", &rejection.body_text())
    }
}

impl From<RecordError> for ApiFailure {
    fn from(error: RecordError) -> Self {
        match error {
            RecordError::Validation(errors) => ApiFailure::validation(errors),
            RecordError::NotFound(what) => ApiFailure::not_found(format!("Not found: {}", what)),
            RecordError::Conflict(msg) => ApiFailure::new(StatusCode::CONFLICT, CONFLICT, msg),
            RecordError::SlotAlreadyBooked(slot) => ApiFailure::new(
                StatusCode::CONFLICT,
                SLOT_ALREADY_BOOKED,
                format!("Slot already booked: {}", slot),
            ),
            RecordError::Restricted(msg) => {
                ApiFailure::new(StatusCode::CONFLICT, RESTRICTED, msg)
            }
            RecordError::RepositoryError(msg) => ApiFailure::internal(&msg),
        }
    }
}

impl From<UploadFileError> for ApiFailure {
    fn from(error: UploadFileError) -> Self {
        match error {
            UploadFileError::Validation(errors) => ApiFailure::validation(errors),
            UploadFileError::PatientNotFound(id) => {
                ApiFailure::not_found(format!("Not found: patient {}", id))
            }
            UploadFileError::StorageError(msg) | UploadFileError::RepositoryError(msg) => {
                ApiFailure::internal(&msg)
            }
        }
    }
}

impl From<SearchKnowledgeBaseError> for ApiFailure {
    fn from(error: SearchKnowledgeBaseError) -> Self {
        match error {
            SearchKnowledgeBaseError::ValidationError(msg) => ApiFailure::bad_request("q", &msg),
            SearchKnowledgeBaseError::UpstreamError(msg) => ApiFailure::upstream(&msg),
            SearchKnowledgeBaseError::RepositoryError(msg) => ApiFailure::internal(&msg),
        }
    }
}

impl From<ToolError> for ApiFailure {
    fn from(error: ToolError) -> Self {
        match error {
            ToolError::UnknownTool(name) => ApiFailure::not_found(format!("Unknown tool: {}", name)),
            ToolError::InvalidInput(errors) => ApiFailure::validation(errors),
            ToolError::Record(e) => e.into(),
            ToolError::Upload(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use http_body_util::BodyExt;
    use uuid::Uuid;

    use crate::domain::entities::ReservationSlot;

    async fn body_json(failure: ApiFailure) -> (StatusCode, serde_json::Value) {
        let response = failure.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_slot_conflict_envelope() {
        let slot = ReservationSlot {
            medic_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        };

        let (status, body) = body_json(RecordError::SlotAlreadyBooked(slot).into()).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], SLOT_ALREADY_BOOKED);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_validation_carries_field_errors() {
        let mut errors = FieldErrors::new();
        errors.add("email", "must be a valid email address");
        errors.add("first_name", "must not be blank");

        let (status, body) = body_json(RecordError::Validation(errors).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], VALIDATION_FAILED);
        assert_eq!(body["error"]["field_errors"][1]["field"], "first_name");
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let (status, body) = body_json(
            RecordError::RepositoryError("connection refused at 10.0.0.3".to_string()).into(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], INTERNAL_ERROR);
        assert!(!body["error"]["message"].as_str().unwrap().contains("10.0.0.3"));
        assert!(body["error"].get("field_errors").is_none());
    }

    #[tokio::test]
    async fn test_restricted_and_upstream_codes() {
        let (status, body) =
            body_json(RecordError::Restricted("medic has reservations".to_string()).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], RESTRICTED);

        let (status, body) = body_json(
            SearchKnowledgeBaseError::UpstreamError("embeddings down".to_string()).into(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], UPSTREAM_UNAVAILABLE);
    }
}
