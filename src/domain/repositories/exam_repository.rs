use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Exam;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait ExamRepository: Send + Sync {
    async fn save(&self, exam: &Exam) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Exam>, RepositoryError>;
    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Exam>, RepositoryError>;
    async fn update(&self, exam: &Exam) -> Result<(), RepositoryError>;
    /// Fails with `Restricted` while reservations reference the exam.
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
    async fn count(&self) -> Result<i64, RepositoryError>;
}
