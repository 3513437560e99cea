use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::ports::{
    DocumentExtractor, EventPublisher, ObjectStore,
    document_extractor::{DocumentExtractionError, ExtractionRequest},
    event_queue::WorkflowEvent,
    object_store::ObjectStoreError,
};
use crate::application::services::processed_output;
use crate::domain::entities::{ProcessedDocument, UploadedFile};
use crate::domain::repositories::{
    PatientRepository, ProcessedDocumentRepository, RepositoryError, UploadedFileRepository,
};
use crate::domain::value_objects::{ObjectKey, RawObjectKey, object_key::s3_uri};

#[derive(Debug)]
pub enum ExtractionWorkerError {
    UnknownPatient(String),
    Extraction(DocumentExtractionError),
    StorageError(String),
    RepositoryError(String),
    InvalidState(String),
}

impl ExtractionWorkerError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ExtractionWorkerError::Extraction(e) => e.is_retryable(),
            ExtractionWorkerError::StorageError(_) | ExtractionWorkerError::RepositoryError(_) => {
                true
            }
            ExtractionWorkerError::UnknownPatient(_) | ExtractionWorkerError::InvalidState(_) => {
                false
            }
        }
    }
}

impl std::fmt::Display for ExtractionWorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionWorkerError::UnknownPatient(id) => write!(f, "Unknown patient: {}", id),
            ExtractionWorkerError::Extraction(e) => write!(f, "{}", e),
            ExtractionWorkerError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            ExtractionWorkerError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            ExtractionWorkerError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for ExtractionWorkerError {}

impl From<RepositoryError> for ExtractionWorkerError {
    fn from(error: RepositoryError) -> Self {
        ExtractionWorkerError::RepositoryError(error.to_string())
    }
}

impl From<ObjectStoreError> for ExtractionWorkerError {
    fn from(error: ObjectStoreError) -> Self {
        ExtractionWorkerError::StorageError(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Processed {
        document_id: Uuid,
        output_key: String,
    },
    AlreadyProcessed {
        document_id: Option<Uuid>,
    },
    Ignored(String),
}

/// Turns a raw patient upload into a `ProcessedDocument` plus its
/// `extracted_data.json` output object.
pub struct ExtractionWorker {
    object_store: Arc<dyn ObjectStore>,
    document_extractor: Arc<dyn DocumentExtractor>,
    patient_repository: Arc<dyn PatientRepository>,
    uploaded_file_repository: Arc<dyn UploadedFileRepository>,
    processed_document_repository: Arc<dyn ProcessedDocumentRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    bucket: String,
}

impl ExtractionWorker {
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        document_extractor: Arc<dyn DocumentExtractor>,
        patient_repository: Arc<dyn PatientRepository>,
        uploaded_file_repository: Arc<dyn UploadedFileRepository>,
        processed_document_repository: Arc<dyn ProcessedDocumentRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        bucket: String,
    ) -> Self {
        Self {
            object_store,
            document_extractor,
            patient_repository,
            uploaded_file_repository,
            processed_document_repository,
            event_publisher,
            bucket,
        }
    }

    pub async fn handle_object_created(
        &self,
        key: &str,
    ) -> Result<ExtractionOutcome, ExtractionWorkerError> {
        let raw = match ObjectKey::parse(key) {
            Ok(ObjectKey::Raw(raw)) => raw,
            Ok(ObjectKey::Processed(_)) => {
                return Ok(ExtractionOutcome::Ignored(format!(
                    "{} is a processed artifact",
                    key
                )));
            }
            Err(e) => {
                warn!("Ignoring object notification: {}", e);
                return Ok(ExtractionOutcome::Ignored(e.to_string()));
            }
        };

        let source_uri = s3_uri(&self.bucket, key);

        if let Some(existing) = self
            .processed_document_repository
            .find_by_s3_uri(&source_uri)
            .await?
        {
            info!(
                "Skipping {}: already processed as document {}",
                source_uri,
                existing.document_id()
            );
            return Ok(ExtractionOutcome::AlreadyProcessed {
                document_id: Some(existing.document_id()),
            });
        }

        if self
            .patient_repository
            .find_by_id(&raw.patient_id)
            .await?
            .is_none()
        {
            return Err(ExtractionWorkerError::UnknownPatient(raw.patient_id.clone()));
        }

        let mut file = self.claim_upload(&raw).await?;

        let data = match self.object_store.get_object(key).await {
            Ok(data) => data,
            Err(ObjectStoreError::ObjectNotFound(_)) => {
                return Ok(ExtractionOutcome::Ignored(format!(
                    "{} was removed before extraction",
                    key
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let request = ExtractionRequest {
            source_uri: source_uri.clone(),
            filename: raw.filename.clone(),
            content_type: file.content_type().map(str::to_string),
            data,
        };

        let extracted = match self.document_extractor.extract(request).await {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!("Extraction failed for {}: {}", source_uri, e);
                if file.status().is_processing() {
                    file.fail_processing(e.to_string())
                        .map_err(ExtractionWorkerError::InvalidState)?;
                    self.uploaded_file_repository.update(&file).await?;
                }
                return Err(ExtractionWorkerError::Extraction(e));
            }
        };

        let output_key = raw.extraction_output_key();
        let output = serde_json::to_vec_pretty(&extracted.data)
            .map_err(|e| ExtractionWorkerError::StorageError(e.to_string()))?;
        self.object_store
            .put_object(&output_key, &output, Some("application/json"))
            .await?;

        let document = ProcessedDocument::new(
            raw.patient_id.clone(),
            raw.file_id.clone(),
            extracted.data,
            source_uri.clone(),
            s3_uri(&self.bucket, &output_key),
            file.uploaded_at(),
        );

        let inserted = self
            .processed_document_repository
            .insert_if_absent(&document)
            .await?;

        if !inserted {
            let winner = self
                .processed_document_repository
                .find_by_s3_uri(&source_uri)
                .await?
                .map(|d| d.document_id());
            debug!("Lost insert race for {}", source_uri);
            self.complete(&mut file).await?;
            return Ok(ExtractionOutcome::AlreadyProcessed {
                document_id: winner,
            });
        }

        // The raw object may have been deleted while the extractor was running;
        // the cleanup for it has then already passed and would miss these rows.
        if !self.object_store.object_exists(key).await? {
            info!("{} removed during extraction, discarding output", key);
            self.processed_document_repository
                .delete(document.document_id())
                .await?;
            processed_output::release::<ExtractionWorkerError>(
                self.object_store.as_ref(),
                self.processed_document_repository.as_ref(),
                &self.bucket,
                &raw,
            )
            .await?;
            return Ok(ExtractionOutcome::Ignored(format!(
                "{} was removed during extraction",
                key
            )));
        }

        self.complete(&mut file).await?;

        if let Err(e) = self
            .event_publisher
            .publish(WorkflowEvent::IndexDocument {
                document_id: document.document_id(),
            })
            .await
        {
            warn!(
                "Could not request indexing for document {}: {}",
                document.document_id(),
                e
            );
        }

        info!(
            "Extracted {} into document {}",
            source_uri,
            document.document_id()
        );

        Ok(ExtractionOutcome::Processed {
            document_id: document.document_id(),
            output_key,
        })
    }

    /// Loads or registers the upload row and moves it to `processing`.
    async fn claim_upload(
        &self,
        raw: &RawObjectKey,
    ) -> Result<UploadedFile, ExtractionWorkerError> {
        let mut file = match self
            .uploaded_file_repository
            .find_by_file_id(&raw.file_id)
            .await?
        {
            Some(file) => file,
            None => {
                let file = UploadedFile::new(raw.clone(), None, None, None);
                self.uploaded_file_repository.save(&file).await?;
                file
            }
        };

        if file.status().is_uploaded() || file.status().is_failed() {
            file.start_processing()
                .map_err(ExtractionWorkerError::InvalidState)?;
            self.uploaded_file_repository.update(&file).await?;
        }

        Ok(file)
    }

    async fn complete(&self, file: &mut UploadedFile) -> Result<(), ExtractionWorkerError> {
        if file.status().is_processing() {
            file.complete_extraction()
                .map_err(ExtractionWorkerError::InvalidState)?;
            self.uploaded_file_repository.update(file).await?;
        }
        Ok(())
    }
}
