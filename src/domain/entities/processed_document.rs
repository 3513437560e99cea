use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    document_id: Uuid,
    patient_id: Option<String>,
    file_id: Option<String>,
    extracted_data: serde_json::Value,
    s3_uri: String,
    output_uri: String,
    processing_date: DateTime<Utc>,
}

impl ProcessedDocument {
    /// `processing_date` never precedes the upload it was derived from, even
    /// when the uploader's clock runs ahead of ours.
    pub fn new(
        patient_id: String,
        file_id: String,
        extracted_data: serde_json::Value,
        s3_uri: String,
        output_uri: String,
        source_uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            document_id: Uuid::new_v4(),
            patient_id: Some(patient_id),
            file_id: Some(file_id),
            extracted_data,
            s3_uri,
            output_uri,
            processing_date: Utc::now().max(source_uploaded_at),
        }
    }

    pub fn from_database(
        document_id: Uuid,
        patient_id: Option<String>,
        file_id: Option<String>,
        extracted_data: serde_json::Value,
        s3_uri: String,
        output_uri: String,
        processing_date: DateTime<Utc>,
    ) -> Self {
        Self {
            document_id,
            patient_id,
            file_id,
            extracted_data,
            s3_uri,
            output_uri,
            processing_date,
        }
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    pub fn file_id(&self) -> Option<&str> {
        self.file_id.as_deref()
    }

    pub fn extracted_data(&self) -> &serde_json::Value {
        &self.extracted_data
    }

    pub fn s3_uri(&self) -> &str {
        &self.s3_uri
    }

    pub fn output_uri(&self) -> &str {
        &self.output_uri
    }

    pub fn processing_date(&self) -> DateTime<Utc> {
        self.processing_date
    }

    /// Plain text of every string leaf in `extracted_data`, in document order.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        collect_text(&self.extracted_data, &mut parts);
        parts.join("\n")
    }
}

fn collect_text(value: &serde_json::Value, parts: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => parts.push(s.trim().to_string()),
        serde_json::Value::Array(items) => items.iter().for_each(|v| collect_text(v, parts)),
        serde_json::Value::Object(map) => map.values().for_each(|v| collect_text(v, parts)),
        _ => {}
    }
}
