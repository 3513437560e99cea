use async_trait::async_trait;

use crate::domain::entities::UploadedFile;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait UploadedFileRepository: Send + Sync {
    async fn save(&self, file: &UploadedFile) -> Result<(), RepositoryError>;
    async fn find_by_file_id(&self, file_id: &str) -> Result<Option<UploadedFile>, RepositoryError>;
    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<UploadedFile>, RepositoryError>;
    async fn update(&self, file: &UploadedFile) -> Result<(), RepositoryError>;
    async fn delete(&self, file_id: &str) -> Result<bool, RepositoryError>;
}
