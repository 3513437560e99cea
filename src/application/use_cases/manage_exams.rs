use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::record_error::{Page, RecordError, validate_page};
use crate::domain::entities::{Exam, exam::ExamDetails};
use crate::domain::repositories::ExamRepository;

pub struct ManageExamsUseCase {
    exam_repository: Arc<dyn ExamRepository>,
}

impl ManageExamsUseCase {
    pub fn new(exam_repository: Arc<dyn ExamRepository>) -> Self {
        Self { exam_repository }
    }

    pub async fn create(&self, details: ExamDetails) -> Result<Exam, RecordError> {
        let exam = Exam::new(details)?;
        self.exam_repository.save(&exam).await?;
        Ok(exam)
    }

    pub async fn get(&self, id: Uuid) -> Result<Exam, RecordError> {
        self.exam_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RecordError::NotFound(format!("exam {}", id)))
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Page<Exam>, RecordError> {
        validate_page(skip, limit)?;
        let items = self.exam_repository.find_all(skip, limit).await?;
        let total_count = self.exam_repository.count().await?;
        Ok(Page {
            items,
            total_count,
            skip,
            limit,
        })
    }

    pub async fn update(&self, id: Uuid, details: ExamDetails) -> Result<Exam, RecordError> {
        let mut exam = self.get(id).await?;
        exam.update_details(details)?;
        self.exam_repository.update(&exam).await?;
        Ok(exam)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), RecordError> {
        if !self.exam_repository.delete(id).await? {
            return Err(RecordError::NotFound(format!("exam {}", id)));
        }
        Ok(())
    }
}
