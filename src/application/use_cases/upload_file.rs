use std::sync::Arc;
use uuid::Uuid;

use tracing::{info, warn};

use crate::application::ports::ObjectStore;
use crate::domain::entities::UploadedFile;
use crate::domain::repositories::{PatientRepository, RepositoryError, UploadedFileRepository};
use crate::domain::value_objects::{
    FieldErrors, FileChecksum, RawObjectKey, WorkflowStage, object_key::s3_uri,
};

#[derive(Debug)]
pub enum UploadFileError {
    Validation(FieldErrors),
    PatientNotFound(String),
    StorageError(String),
    RepositoryError(String),
}

impl std::fmt::Display for UploadFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadFileError::Validation(errors) => write!(f, "Validation failed: {}", errors),
            UploadFileError::PatientNotFound(id) => write!(f, "Patient not found: {}", id),
            UploadFileError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            UploadFileError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for UploadFileError {}

impl From<RepositoryError> for UploadFileError {
    fn from(error: RepositoryError) -> Self {
        UploadFileError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct UploadFileRequest {
    pub patient_id: String,
    pub category: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadFileResponse {
    pub file_id: String,
    pub object_key: String,
    pub s3_uri: String,
    pub category: String,
    pub workflow_stage: WorkflowStage,
    pub size_bytes: i64,
    pub checksum: String,
}

/// Stores a patient file under `{patient_id}/{category}/{file_id}/{filename}`.
/// Extraction is kicked off by the store's creation notification.
pub struct UploadFileUseCase {
    patient_repository: Arc<dyn PatientRepository>,
    uploaded_file_repository: Arc<dyn UploadedFileRepository>,
    object_store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl UploadFileUseCase {
    pub fn new(
        patient_repository: Arc<dyn PatientRepository>,
        uploaded_file_repository: Arc<dyn UploadedFileRepository>,
        object_store: Arc<dyn ObjectStore>,
        bucket: String,
    ) -> Self {
        Self {
            patient_repository,
            uploaded_file_repository,
            object_store,
            bucket,
        }
    }

    pub async fn execute(
        &self,
        request: UploadFileRequest,
    ) -> Result<UploadFileResponse, UploadFileError> {
        let mut errors = FieldErrors::new();
        errors.require_non_blank("patient_id", &request.patient_id);
        errors.require_non_blank("category", &request.category);
        errors.require_non_blank("filename", &request.filename);
        if request.data.is_empty() {
            errors.add("file", "cannot be empty");
        }
        errors.into_result().map_err(UploadFileError::Validation)?;

        let patient_id = request.patient_id.trim();
        if self.patient_repository.find_by_id(patient_id).await?.is_none() {
            return Err(UploadFileError::PatientNotFound(patient_id.to_string()));
        }

        let filename = base_name(&request.filename);
        let file_id = Uuid::new_v4().to_string();
        let key = RawObjectKey::new(patient_id, request.category.trim(), &file_id, filename)
            .map_err(|e| UploadFileError::Validation(FieldErrors::single("file", &e.to_string())))?;

        let checksum = FileChecksum::from_bytes(&request.data);
        let size_bytes = request.data.len() as i64;
        let file = UploadedFile::new(
            key.clone(),
            request.content_type.clone(),
            Some(size_bytes),
            Some(checksum.clone()),
        );

        // The row must exist before the object does, so the extraction
        // triggered by the write sees the upload's metadata.
        self.uploaded_file_repository.save(&file).await?;

        let object_key = key.to_key();
        if let Err(e) = self
            .object_store
            .put_object(&object_key, &request.data, request.content_type.as_deref())
            .await
        {
            warn!("Upload of {} failed, removing record: {}", object_key, e);
            self.uploaded_file_repository.delete(&file_id).await?;
            return Err(UploadFileError::StorageError(e.to_string()));
        }

        info!("Stored {} ({} bytes)", object_key, size_bytes);

        Ok(UploadFileResponse {
            file_id,
            s3_uri: s3_uri(&self.bucket, &object_key),
            object_key,
            category: key.category,
            workflow_stage: file.stage(),
            size_bytes,
            checksum: checksum.to_string(),
        })
    }
}

/// Browsers may send a full client path as the filename.
fn base_name(filename: &str) -> &str {
    let trimmed = filename.trim();
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
}
