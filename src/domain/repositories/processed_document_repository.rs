use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::ProcessedDocument;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait ProcessedDocumentRepository: Send + Sync {
    /// Inserts unless a document for the same `s3_uri` already exists.
    /// Returns whether a row was written.
    async fn insert_if_absent(&self, document: &ProcessedDocument) -> Result<bool, RepositoryError>;
    async fn find_by_id(&self, document_id: Uuid) -> Result<Option<ProcessedDocument>, RepositoryError>;
    async fn find_by_s3_uri(&self, s3_uri: &str) -> Result<Option<ProcessedDocument>, RepositoryError>;
    async fn find_by_file_id(&self, file_id: &str) -> Result<Option<ProcessedDocument>, RepositoryError>;
    async fn find_by_patient(
        &self,
        patient_id: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ProcessedDocument>, RepositoryError>;
    async fn count_by_patient(&self, patient_id: &str) -> Result<i64, RepositoryError>;
    /// Documents whose extraction output lives at `output_uri`. Uploads whose
    /// filenames clean to the same name share one output.
    async fn count_by_output_uri(&self, output_uri: &str) -> Result<i64, RepositoryError>;
    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<ProcessedDocument>, RepositoryError>;
    async fn delete(&self, document_id: Uuid) -> Result<bool, RepositoryError>;
    async fn delete_by_s3_uri(&self, s3_uri: &str) -> Result<usize, RepositoryError>;
    async fn count(&self) -> Result<i64, RepositoryError>;
}
