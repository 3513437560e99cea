use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::{
    get_document_status::DocumentStatusResponse, upload_file::UploadFileResponse,
};
use crate::domain::entities::ProcessedDocument;
use crate::domain::value_objects::WorkflowStage;

#[derive(Debug, Serialize)]
pub struct UploadResponseDto {
    pub file_id: String,
    pub s3_uri: String,
    pub category: String,
    pub workflow_stage: WorkflowStage,
    pub size_bytes: i64,
    pub checksum: String,
}

impl From<UploadFileResponse> for UploadResponseDto {
    fn from(response: UploadFileResponse) -> Self {
        Self {
            file_id: response.file_id,
            s3_uri: response.s3_uri,
            category: response.category,
            workflow_stage: response.workflow_stage,
            size_bytes: response.size_bytes,
            checksum: response.checksum,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentStatusDto {
    pub id: String,
    pub status: String,
    pub stage: WorkflowStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub document_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentStatusResponse> for DocumentStatusDto {
    fn from(response: DocumentStatusResponse) -> Self {
        Self {
            id: response.id,
            status: response.status.as_str().to_string(),
            stage: response.stage,
            error_message: response.status.error_message().map(|s| s.to_string()),
            document_id: response.document_id,
            updated_at: response.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentQueryDto {
    pub patient_id: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct ProcessedDocumentDto {
    pub document_id: Uuid,
    pub patient_id: Option<String>,
    pub file_id: Option<String>,
    pub s3_uri: String,
    pub output_uri: String,
    pub extracted_data: serde_json::Value,
    pub processing_date: DateTime<Utc>,
}

impl From<ProcessedDocument> for ProcessedDocumentDto {
    fn from(document: ProcessedDocument) -> Self {
        Self {
            document_id: document.document_id(),
            patient_id: document.patient_id().map(|s| s.to_string()),
            file_id: document.file_id().map(|s| s.to_string()),
            s3_uri: document.s3_uri().to_string(),
            output_uri: document.output_uri().to_string(),
            extracted_data: document.extracted_data().clone(),
            processing_date: document.processing_date(),
        }
    }
}
