use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ports::{ObjectStore, object_store::ObjectStoreError};
use crate::application::services::processed_output;
use crate::domain::repositories::{
    ProcessedDocumentRepository, RepositoryError, UploadedFileRepository,
};
use crate::domain::value_objects::{
    ObjectKey, ProcessedObjectKey, RawObjectKey,
    object_key::{clean_filename, s3_uri},
};

#[derive(Debug)]
pub enum CleanupWorkerError {
    StorageError(String),
    RepositoryError(String),
}

impl CleanupWorkerError {
    pub fn is_retryable(&self) -> bool {
        true
    }
}

impl std::fmt::Display for CleanupWorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanupWorkerError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            CleanupWorkerError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for CleanupWorkerError {}

impl From<RepositoryError> for CleanupWorkerError {
    fn from(error: RepositoryError) -> Self {
        CleanupWorkerError::RepositoryError(error.to_string())
    }
}

impl From<ObjectStoreError> for CleanupWorkerError {
    fn from(error: ObjectStoreError) -> Self {
        CleanupWorkerError::StorageError(error.to_string())
    }
}

/// What a cleanup pass removed. All zeros is a valid outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanupOutcome {
    pub objects_deleted: usize,
    pub documents_deleted: usize,
    pub uploads_deleted: usize,
}

/// Keeps raw uploads and their processed artifacts in step when either side
/// is deleted. Never touches keys outside the removed key's patient prefix.
pub struct CleanupWorker {
    object_store: Arc<dyn ObjectStore>,
    uploaded_file_repository: Arc<dyn UploadedFileRepository>,
    processed_document_repository: Arc<dyn ProcessedDocumentRepository>,
    bucket: String,
}

impl CleanupWorker {
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        uploaded_file_repository: Arc<dyn UploadedFileRepository>,
        processed_document_repository: Arc<dyn ProcessedDocumentRepository>,
        bucket: String,
    ) -> Self {
        Self {
            object_store,
            uploaded_file_repository,
            processed_document_repository,
            bucket,
        }
    }

    pub async fn handle_object_removed(
        &self,
        key: &str,
    ) -> Result<CleanupOutcome, CleanupWorkerError> {
        match ObjectKey::parse(key) {
            Ok(ObjectKey::Raw(raw)) => self.cleanup_processed(&raw).await,
            Ok(ObjectKey::Processed(processed)) => self.cleanup_raw(&processed).await,
            Err(e) => {
                warn!("Ignoring removal notification: {}", e);
                Ok(CleanupOutcome::default())
            }
        }
    }

    async fn cleanup_processed(
        &self,
        raw: &RawObjectKey,
    ) -> Result<CleanupOutcome, CleanupWorkerError> {
        let mut outcome = CleanupOutcome::default();

        let source_uri = s3_uri(&self.bucket, &raw.to_key());
        outcome.documents_deleted = self
            .processed_document_repository
            .delete_by_s3_uri(&source_uri)
            .await?;

        // Only drop the upload row when it belongs to this exact object.
        if let Some(file) = self
            .uploaded_file_repository
            .find_by_file_id(&raw.file_id)
            .await?
        {
            if file.key() == raw
                && self
                    .uploaded_file_repository
                    .delete(&raw.file_id)
                    .await?
            {
                outcome.uploads_deleted = 1;
            }
        }

        // Re-uploads of a same-named file share the prefix.
        outcome.objects_deleted = processed_output::release::<CleanupWorkerError>(
            self.object_store.as_ref(),
            self.processed_document_repository.as_ref(),
            &self.bucket,
            raw,
        )
        .await?;

        info!(
            "Cleaned up after raw {}: {} objects, {} documents, {} uploads",
            raw.to_key(),
            outcome.objects_deleted,
            outcome.documents_deleted,
            outcome.uploads_deleted
        );
        Ok(outcome)
    }

    async fn cleanup_raw(
        &self,
        processed: &ProcessedObjectKey,
    ) -> Result<CleanupOutcome, CleanupWorkerError> {
        let mut outcome = CleanupOutcome::default();

        let patient_prefix = format!("{}/", processed.patient_id);
        for key in self.object_store.list_objects(&patient_prefix).await? {
            let Ok(ObjectKey::Raw(raw)) = ObjectKey::parse(&key) else {
                continue;
            };
            if raw.patient_id != processed.patient_id
                || clean_filename(&raw.filename) != processed.clean_filename
            {
                continue;
            }
            if self.object_store.delete_object(&key).await? {
                outcome.objects_deleted += 1;
            }
        }

        info!(
            "Cleaned up after processed {}: {} raw objects",
            processed.to_key(),
            outcome.objects_deleted
        );
        Ok(outcome)
    }
}
