use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::ProcessedDocument;
use crate::infrastructure::database::schema::processed_documents;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = processed_documents)]
#[diesel(primary_key(document_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProcessedDocumentModel {
    pub document_id: Uuid,
    pub patient_id: Option<String>,
    pub file_id: Option<String>,
    pub extracted_data: serde_json::Value,
    pub s3_uri: String,
    pub output_uri: String,
    pub processing_date: DateTime<Utc>,
}

impl From<&ProcessedDocument> for ProcessedDocumentModel {
    fn from(document: &ProcessedDocument) -> Self {
        Self {
            document_id: document.document_id(),
            patient_id: document.patient_id().map(str::to_string),
            file_id: document.file_id().map(str::to_string),
            extracted_data: document.extracted_data().clone(),
            s3_uri: document.s3_uri().to_string(),
            output_uri: document.output_uri().to_string(),
            processing_date: document.processing_date(),
        }
    }
}

impl From<ProcessedDocumentModel> for ProcessedDocument {
    fn from(model: ProcessedDocumentModel) -> Self {
        ProcessedDocument::from_database(
            model.document_id,
            model.patient_id,
            model.file_id,
            model.extracted_data,
            model.s3_uri,
            model.output_uri,
            model.processing_date,
        )
    }
}
