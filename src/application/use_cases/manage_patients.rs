use std::sync::Arc;

use crate::application::use_cases::record_error::{Page, RecordError, validate_page};
use crate::domain::entities::{Patient, patient::PatientDetails};
use crate::domain::repositories::PatientRepository;

#[derive(Debug, Clone)]
pub struct CreatePatientRequest {
    pub id: Option<String>,
    pub details: PatientDetails,
}

pub struct ManagePatientsUseCase {
    patient_repository: Arc<dyn PatientRepository>,
}

impl ManagePatientsUseCase {
    pub fn new(patient_repository: Arc<dyn PatientRepository>) -> Self {
        Self { patient_repository }
    }

    pub async fn create(&self, request: CreatePatientRequest) -> Result<Patient, RecordError> {
        let patient = Patient::new(request.id, request.details)?;
        self.patient_repository.save(&patient).await?;
        Ok(patient)
    }

    pub async fn get(&self, id: &str) -> Result<Patient, RecordError> {
        self.patient_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RecordError::NotFound(format!("patient {}", id)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Patient, RecordError> {
        self.patient_repository
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(|| RecordError::NotFound(format!("patient with email {}", email)))
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Page<Patient>, RecordError> {
        validate_page(skip, limit)?;
        let items = self.patient_repository.find_all(skip, limit).await?;
        let total_count = self.patient_repository.count().await?;
        Ok(Page {
            items,
            total_count,
            skip,
            limit,
        })
    }

    pub async fn update(&self, id: &str, details: PatientDetails) -> Result<Patient, RecordError> {
        let mut patient = self.get(id).await?;
        patient.update_details(details)?;
        self.patient_repository.update(&patient).await?;
        Ok(patient)
    }

    pub async fn delete(&self, id: &str) -> Result<(), RecordError> {
        if !self.patient_repository.delete(id).await? {
            return Err(RecordError::NotFound(format!("patient {}", id)));
        }
        Ok(())
    }
}
