use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::entities::UploadedFile;
use crate::domain::value_objects::{DocumentStatus, FileChecksum, RawObjectKey, WorkflowStage};
use crate::infrastructure::database::schema::uploaded_files;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = uploaded_files)]
#[diesel(primary_key(file_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UploadedFileModel {
    pub file_id: String,
    pub patient_id: String,
    pub category: String,
    pub filename: String,
    pub object_key: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub checksum: Option<String>,
    pub stage: String,
    pub status: String,
    pub error_message: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = uploaded_files)]
#[diesel(primary_key(file_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct NewUploadedFileModel {
    pub file_id: String,
    pub patient_id: String,
    pub category: String,
    pub filename: String,
    pub object_key: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub checksum: Option<String>,
    pub stage: String,
    pub status: String,
    pub error_message: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UploadedFile> for NewUploadedFileModel {
    fn from(file: &UploadedFile) -> Self {
        Self {
            file_id: file.file_id().to_string(),
            patient_id: file.patient_id().to_string(),
            category: file.category().to_string(),
            filename: file.filename().to_string(),
            object_key: file.object_key(),
            content_type: file.content_type().map(str::to_string),
            size_bytes: file.size_bytes(),
            checksum: file.checksum().map(|c| c.as_str().to_string()),
            stage: file.stage().as_str().to_string(),
            status: file.status().as_str().to_string(),
            error_message: file.status().error_message().map(str::to_string),
            uploaded_at: file.uploaded_at(),
            updated_at: file.updated_at(),
        }
    }
}

impl TryFrom<UploadedFileModel> for UploadedFile {
    type Error = String;

    fn try_from(model: UploadedFileModel) -> Result<Self, Self::Error> {
        let key = RawObjectKey::new(
            &model.patient_id,
            &model.category,
            &model.file_id,
            &model.filename,
        )
        .map_err(|e| format!("Invalid object key: {}", e))?;

        let checksum = model
            .checksum
            .map(|c| FileChecksum::new(c).map_err(|e| format!("Invalid checksum: {}", e)))
            .transpose()?;

        Ok(UploadedFile::from_database(
            key,
            model.content_type,
            model.size_bytes,
            checksum,
            WorkflowStage::from_string(&model.stage)?,
            DocumentStatus::from_parts(&model.status, model.error_message.as_deref())?,
            model.uploaded_at,
            model.updated_at,
        ))
    }
}
