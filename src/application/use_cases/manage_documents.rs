use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::record_error::{Page, RecordError, validate_page};
use crate::domain::entities::ProcessedDocument;
use crate::domain::repositories::ProcessedDocumentRepository;

pub struct ManageDocumentsUseCase {
    processed_document_repository: Arc<dyn ProcessedDocumentRepository>,
}

impl ManageDocumentsUseCase {
    pub fn new(processed_document_repository: Arc<dyn ProcessedDocumentRepository>) -> Self {
        Self {
            processed_document_repository,
        }
    }

    pub async fn get(&self, document_id: Uuid) -> Result<ProcessedDocument, RecordError> {
        self.processed_document_repository
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| RecordError::NotFound(format!("document {}", document_id)))
    }

    pub async fn list(
        &self,
        patient_id: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Page<ProcessedDocument>, RecordError> {
        validate_page(skip, limit)?;

        let (items, total_count) = match patient_id {
            Some(patient_id) => (
                self.processed_document_repository
                    .find_by_patient(patient_id, skip, limit)
                    .await?,
                self.processed_document_repository
                    .count_by_patient(patient_id)
                    .await?,
            ),
            None => (
                self.processed_document_repository
                    .find_all(skip, limit)
                    .await?,
                self.processed_document_repository.count().await?,
            ),
        };

        Ok(Page {
            items,
            total_count,
            skip,
            limit,
        })
    }

    /// Drops the record and, through the cascade, its knowledge-base entries.
    /// Stored objects are left alone.
    pub async fn delete(&self, document_id: Uuid) -> Result<(), RecordError> {
        if !self.processed_document_repository.delete(document_id).await? {
            return Err(RecordError::NotFound(format!("document {}", document_id)));
        }
        Ok(())
    }
}
