use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::record_error::{Page, RecordError, validate_page};
use crate::domain::entities::{Medic, medic::MedicDetails};
use crate::domain::repositories::MedicRepository;

pub struct ManageMedicsUseCase {
    medic_repository: Arc<dyn MedicRepository>,
}

impl ManageMedicsUseCase {
    pub fn new(medic_repository: Arc<dyn MedicRepository>) -> Self {
        Self { medic_repository }
    }

    pub async fn create(&self, details: MedicDetails) -> Result<Medic, RecordError> {
        let medic = Medic::new(details)?;
        self.medic_repository.save(&medic).await?;
        Ok(medic)
    }

    pub async fn get(&self, id: Uuid) -> Result<Medic, RecordError> {
        self.medic_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RecordError::NotFound(format!("medic {}", id)))
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Page<Medic>, RecordError> {
        validate_page(skip, limit)?;
        let items = self.medic_repository.find_all(skip, limit).await?;
        let total_count = self.medic_repository.count().await?;
        Ok(Page {
            items,
            total_count,
            skip,
            limit,
        })
    }

    pub async fn update(&self, id: Uuid, details: MedicDetails) -> Result<Medic, RecordError> {
        let mut medic = self.get(id).await?;
        medic.update_details(details)?;
        self.medic_repository.update(&medic).await?;
        Ok(medic)
    }

    /// Rejected with `Restricted` while any reservation references the medic.
    pub async fn delete(&self, id: Uuid) -> Result<(), RecordError> {
        if !self.medic_repository.delete(id).await? {
            return Err(RecordError::NotFound(format!("medic {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestApp, medic_details};

    #[tokio::test]
    async fn test_license_number_is_unique() {
        let app = TestApp::new();
        let medics = &app.container.medics;
        medics.create(medic_details("CRM-5005")).await.unwrap();

        let error = medics
            .create(medic_details("CRM-5005"))
            .await
            .unwrap_err();

        assert!(matches!(error, RecordError::Conflict(_)));
        assert_eq!(medics.list(0, 20).await.unwrap().total_count, 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let app = TestApp::new();
        let medics = &app.container.medics;
        let medic = medics.create(medic_details("CRM-6006")).await.unwrap();

        let mut details = medic_details("CRM-6006");
        details.specialty = "Neurology".to_string();
        let updated = medics.update(medic.id(), details).await.unwrap();
        assert_eq!(updated.specialty(), "Neurology");

        medics.delete(medic.id()).await.unwrap();
        let error = medics.get(medic.id()).await.unwrap_err();
        assert!(matches!(error, RecordError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_rejects_bad_page() {
        let app = TestApp::new();

        let error = app.container.medics.list(-1, 0).await.unwrap_err();

        let RecordError::Validation(errors) = error else {
            panic!("expected validation error");
        };
        assert_eq!(errors.errors().len(), 2);
    }
}
