use async_trait::async_trait;

use crate::domain::entities::Patient;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn save(&self, patient: &Patient) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, RepositoryError>;
    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Patient>, RepositoryError>;
    async fn update(&self, patient: &Patient) -> Result<(), RepositoryError>;
    /// Deleting a patient also removes their reservations.
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
    async fn count(&self) -> Result<i64, RepositoryError>;
}
