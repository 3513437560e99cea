use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Medic;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait MedicRepository: Send + Sync {
    async fn save(&self, medic: &Medic) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Medic>, RepositoryError>;
    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Medic>, RepositoryError>;
    async fn update(&self, medic: &Medic) -> Result<(), RepositoryError>;
    /// Fails with `Restricted` while reservations reference the medic.
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
    async fn count(&self) -> Result<i64, RepositoryError>;
}
