use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::use_cases::record_error::RecordError;
use crate::domain::repositories::{ProcessedDocumentRepository, UploadedFileRepository};
use crate::domain::value_objects::{DocumentStatus, WorkflowStage};

#[derive(Debug, Clone)]
pub struct DocumentStatusResponse {
    pub id: String,
    pub status: DocumentStatus,
    pub stage: WorkflowStage,
    pub document_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Resolves a status by upload `file_id`, or by processed `document_id` for
/// documents whose upload record is gone.
pub struct GetDocumentStatusUseCase {
    uploaded_file_repository: Arc<dyn UploadedFileRepository>,
    processed_document_repository: Arc<dyn ProcessedDocumentRepository>,
}

impl GetDocumentStatusUseCase {
    pub fn new(
        uploaded_file_repository: Arc<dyn UploadedFileRepository>,
        processed_document_repository: Arc<dyn ProcessedDocumentRepository>,
    ) -> Self {
        Self {
            uploaded_file_repository,
            processed_document_repository,
        }
    }

    pub async fn execute(&self, id: &str) -> Result<DocumentStatusResponse, RecordError> {
        if let Some(file) = self.uploaded_file_repository.find_by_file_id(id).await? {
            let document_id = self
                .processed_document_repository
                .find_by_file_id(id)
                .await?
                .map(|d| d.document_id());

            return Ok(DocumentStatusResponse {
                id: id.to_string(),
                status: file.status().clone(),
                stage: file.stage(),
                document_id,
                updated_at: file.updated_at(),
            });
        }

        if let Ok(document_id) = Uuid::parse_str(id) {
            if let Some(document) = self
                .processed_document_repository
                .find_by_id(document_id)
                .await?
            {
                return Ok(DocumentStatusResponse {
                    id: id.to_string(),
                    status: DocumentStatus::Completed,
                    stage: WorkflowStage::Extracted,
                    document_id: Some(document.document_id()),
                    updated_at: document.processing_date(),
                });
            }
        }

        Err(RecordError::NotFound(format!("document {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ProcessedDocument, UploadedFile};
    use crate::domain::value_objects::RawObjectKey;
    use crate::testing::TestApp;

    #[tokio::test]
    async fn test_status_by_file_id() {
        let app = TestApp::new();
        let raw = RawObjectKey::new("patient1", "labs", "f-1", "cbc.pdf").unwrap();
        let mut file = UploadedFile::new(raw, None, None, None);
        file.start_processing().unwrap();
        file.fail_processing("extractor timed out".to_string())
            .unwrap();
        UploadedFileRepository::save(app.records.as_ref(), &file)
            .await
            .unwrap();

        let status = app
            .container
            .document_status_use_case
            .execute("f-1")
            .await
            .unwrap();

        assert_eq!(status.status.error_message(), Some("extractor timed out"));
        assert_eq!(status.stage, WorkflowStage::Uploaded);
        assert_eq!(status.document_id, None);
    }

    #[tokio::test]
    async fn test_status_by_document_id_after_upload_row_is_gone() {
        let app = TestApp::new();
        let document = ProcessedDocument::new(
            "patient1".to_string(),
            "f-2".to_string(),
            serde_json::json!({"content": "ok"}),
            "s3://clinic-intake/patient1/labs/f-2/cbc.pdf".to_string(),
            "s3://clinic-intake/processed/patient1/cbc/extracted_data.json".to_string(),
            Utc::now(),
        );
        app.records.insert_if_absent(&document).await.unwrap();

        let status = app
            .container
            .document_status_use_case
            .execute(&document.document_id().to_string())
            .await
            .unwrap();

        assert!(status.status.is_completed());
        assert_eq!(status.document_id, Some(document.document_id()));
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let app = TestApp::new();

        let error = app
            .container
            .document_status_use_case
            .execute("nope")
            .await
            .unwrap_err();

        assert!(matches!(error, RecordError::NotFound(_)));
    }
}
