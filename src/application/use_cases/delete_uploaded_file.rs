use std::sync::Arc;

use tracing::info;

use crate::application::ports::ObjectStore;
use crate::application::use_cases::record_error::RecordError;
use crate::domain::repositories::UploadedFileRepository;

/// Removes a patient's raw upload. Derived artifacts follow through the
/// cleanup triggered by the removal notification.
pub struct DeleteUploadedFileUseCase {
    uploaded_file_repository: Arc<dyn UploadedFileRepository>,
    object_store: Arc<dyn ObjectStore>,
}

impl DeleteUploadedFileUseCase {
    pub fn new(
        uploaded_file_repository: Arc<dyn UploadedFileRepository>,
        object_store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            uploaded_file_repository,
            object_store,
        }
    }

    pub async fn execute(&self, patient_id: &str, file_id: &str) -> Result<(), RecordError> {
        let file = self
            .uploaded_file_repository
            .find_by_file_id(file_id)
            .await?
            .filter(|f| f.patient_id() == patient_id)
            .ok_or_else(|| {
                RecordError::NotFound(format!("file {} for patient {}", file_id, patient_id))
            })?;

        let removed = self
            .object_store
            .delete_object(&file.object_key())
            .await
            .map_err(|e| RecordError::RepositoryError(e.to_string()))?;

        if !removed {
            // No notification follows for an object that was already gone.
            self.uploaded_file_repository.delete(file_id).await?;
        }

        info!("Deleted upload {} for patient {}", file_id, patient_id);
        Ok(())
    }
}
