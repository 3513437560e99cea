use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DocumentStatus, FileChecksum, RawObjectKey, WorkflowStage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    key: RawObjectKey,
    content_type: Option<String>,
    size_bytes: Option<i64>,
    checksum: Option<FileChecksum>,
    stage: WorkflowStage,
    status: DocumentStatus,
    uploaded_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UploadedFile {
    pub fn new(
        key: RawObjectKey,
        content_type: Option<String>,
        size_bytes: Option<i64>,
        checksum: Option<FileChecksum>,
    ) -> Self {
        let now = Utc::now();
        Self {
            key,
            content_type,
            size_bytes,
            checksum,
            stage: WorkflowStage::Uploaded,
            status: DocumentStatus::Uploaded,
            uploaded_at: now,
            updated_at: now,
        }
    }

    pub fn from_database(
        key: RawObjectKey,
        content_type: Option<String>,
        size_bytes: Option<i64>,
        checksum: Option<FileChecksum>,
        stage: WorkflowStage,
        status: DocumentStatus,
        uploaded_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            content_type,
            size_bytes,
            checksum,
            stage,
            status,
            uploaded_at,
            updated_at,
        }
    }

    pub fn file_id(&self) -> &str {
        &self.key.file_id
    }

    pub fn patient_id(&self) -> &str {
        &self.key.patient_id
    }

    pub fn category(&self) -> &str {
        &self.key.category
    }

    pub fn filename(&self) -> &str {
        &self.key.filename
    }

    pub fn key(&self) -> &RawObjectKey {
        &self.key
    }

    pub fn object_key(&self) -> String {
        self.key.to_key()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn size_bytes(&self) -> Option<i64> {
        self.size_bytes
    }

    pub fn checksum(&self) -> Option<&FileChecksum> {
        self.checksum.as_ref()
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    pub fn status(&self) -> &DocumentStatus {
        &self.status
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn start_processing(&mut self) -> Result<(), String> {
        self.transition(DocumentStatus::Processing)
    }

    /// Extraction output is persisted; the file moves to `extracted`.
    pub fn complete_extraction(&mut self) -> Result<(), String> {
        self.transition(DocumentStatus::Completed)?;
        if self.stage == WorkflowStage::Uploaded {
            self.stage = WorkflowStage::Extracted;
        }
        Ok(())
    }

    pub fn fail_processing(&mut self, error: String) -> Result<(), String> {
        self.transition(DocumentStatus::Failed(error))
    }

    pub fn mark_indexed(&mut self) -> Result<(), String> {
        if !self.stage.can_advance_to(WorkflowStage::Indexed) {
            return Err(format!(
                "File {} cannot be indexed from stage {}",
                self.file_id(),
                self.stage
            ));
        }
        self.stage = WorkflowStage::Indexed;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn transition(&mut self, next: DocumentStatus) -> Result<(), String> {
        if !self.status.can_transition_to(&next) {
            return Err(format!(
                "File {} cannot move from {} to {}",
                self.file_id(),
                self.status,
                next
            ));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload() -> UploadedFile {
        let key = RawObjectKey::new("patient123", "exam-results", "abc", "report.pdf").unwrap();
        UploadedFile::new(key, Some("application/pdf".to_string()), Some(2048), None)
    }

    #[test]
    fn test_upload_defaults() {
        let file = upload();
        assert_eq!(file.stage(), WorkflowStage::Uploaded);
        assert_eq!(file.status(), &DocumentStatus::Uploaded);
        assert_eq!(file.object_key(), "patient123/exam-results/abc/report.pdf");
    }

    #[test]
    fn test_full_lifecycle() {
        let mut file = upload();
        file.start_processing().unwrap();
        file.complete_extraction().unwrap();
        assert_eq!(file.stage(), WorkflowStage::Extracted);
        assert!(file.status().is_completed());

        file.mark_indexed().unwrap();
        assert_eq!(file.stage(), WorkflowStage::Indexed);
        assert!(file.mark_indexed().is_err());
    }

    #[test]
    fn test_failure_then_retry() {
        let mut file = upload();
        file.start_processing().unwrap();
        file.fail_processing("service unavailable".to_string()).unwrap();
        assert_eq!(file.status().error_message(), Some("service unavailable"));

        file.start_processing().unwrap();
        assert!(file.status().is_processing());
    }

    #[test]
    fn test_cannot_complete_without_processing() {
        let mut file = upload();
        assert!(file.complete_extraction().is_err());
        assert!(file.mark_indexed().is_err());
    }
}
