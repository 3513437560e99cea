use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const PROCESSED_ROOT: &str = "processed";
pub const EXTRACTION_OUTPUT_NAME: &str = "extracted_data.json";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("static pattern"));

/// Location of an object in the store, decoded from its key.
///
/// Raw uploads live under `{patient_id}/{category}/{file_id}/{filename}`;
/// extraction outputs live under `processed/{patient_id}/{clean_filename}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKey {
    Raw(RawObjectKey),
    Processed(ProcessedObjectKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObjectKey {
    pub patient_id: String,
    pub category: String,
    pub file_id: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedObjectKey {
    pub patient_id: String,
    pub clean_filename: String,
    pub object_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKeyError {
    UnrecognizedKey(String),
    InvalidSegment(String),
}

impl std::fmt::Display for ObjectKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKeyError::UnrecognizedKey(key) => write!(f, "Unrecognized object key: {}", key),
            ObjectKeyError::InvalidSegment(msg) => write!(f, "Invalid key segment: {}", msg),
        }
    }
}

impl std::error::Error for ObjectKeyError {}

impl ObjectKey {
    pub fn parse(key: &str) -> Result<Self, ObjectKeyError> {
        let segments: Vec<&str> = key.split('/').collect();

        if segments.len() != 4 || segments.iter().any(|s| s.is_empty()) {
            return Err(ObjectKeyError::UnrecognizedKey(key.to_string()));
        }

        if segments[0] == PROCESSED_ROOT {
            return Ok(ObjectKey::Processed(ProcessedObjectKey {
                patient_id: segments[1].to_string(),
                clean_filename: segments[2].to_string(),
                object_name: segments[3].to_string(),
            }));
        }

        Ok(ObjectKey::Raw(RawObjectKey {
            patient_id: segments[0].to_string(),
            category: segments[1].to_string(),
            file_id: segments[2].to_string(),
            filename: segments[3].to_string(),
        }))
    }

    pub fn patient_id(&self) -> &str {
        match self {
            ObjectKey::Raw(raw) => &raw.patient_id,
            ObjectKey::Processed(processed) => &processed.patient_id,
        }
    }
}

impl RawObjectKey {
    pub fn new(
        patient_id: &str,
        category: &str,
        file_id: &str,
        filename: &str,
    ) -> Result<Self, ObjectKeyError> {
        for (name, value) in [
            ("patient_id", patient_id),
            ("category", category),
            ("file_id", file_id),
            ("filename", filename),
        ] {
            validate_segment(name, value)?;
        }

        if patient_id == PROCESSED_ROOT {
            return Err(ObjectKeyError::InvalidSegment(format!(
                "patient_id cannot be '{}'",
                PROCESSED_ROOT
            )));
        }

        Ok(Self {
            patient_id: patient_id.to_string(),
            category: category.to_string(),
            file_id: file_id.to_string(),
            filename: filename.to_string(),
        })
    }

    pub fn to_key(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.patient_id, self.category, self.file_id, self.filename
        )
    }

    pub fn clean_filename(&self) -> String {
        clean_filename(&self.filename)
    }

    /// Prefix holding every processed artifact derived from this upload.
    pub fn processed_prefix(&self) -> String {
        processed_prefix(&self.patient_id, &self.clean_filename())
    }

    pub fn extraction_output_key(&self) -> String {
        format!("{}{}", self.processed_prefix(), EXTRACTION_OUTPUT_NAME)
    }
}

impl ProcessedObjectKey {
    pub fn to_key(&self) -> String {
        format!(
            "{}{}",
            processed_prefix(&self.patient_id, &self.clean_filename),
            self.object_name
        )
    }
}

fn validate_segment(name: &str, value: &str) -> Result<(), ObjectKeyError> {
    if value.trim().is_empty() {
        return Err(ObjectKeyError::InvalidSegment(format!(
            "{} cannot be empty",
            name
        )));
    }
    if value.contains('/') || value == "." || value == ".." {
        return Err(ObjectKeyError::InvalidSegment(format!(
            "{} contains a path separator or relative component",
            name
        )));
    }
    Ok(())
}

/// Strips the final extension and replaces anything outside `[A-Za-z0-9_-]`.
pub fn clean_filename(filename: &str) -> String {
    let stem = match filename.rfind('.') {
        Some(idx) if idx > 0 => &filename[..idx],
        _ => filename,
    };
    UNSAFE_CHARS.replace_all(stem, "_").into_owned()
}

pub fn processed_prefix(patient_id: &str, clean_name: &str) -> String {
    format!("{}/{}/{}/", PROCESSED_ROOT, patient_id, clean_name)
}

pub fn s3_uri(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_key() {
        let key = ObjectKey::parse("patient123/exam-results/abc/report.pdf").unwrap();
        match key {
            ObjectKey::Raw(raw) => {
                assert_eq!(raw.patient_id, "patient123");
                assert_eq!(raw.category, "exam-results");
                assert_eq!(raw.file_id, "abc");
                assert_eq!(raw.filename, "report.pdf");
                assert_eq!(
                    raw.extraction_output_key(),
                    "processed/patient123/report/extracted_data.json"
                );
            }
            other => panic!("Expected raw key, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_processed_key() {
        let key =
            ObjectKey::parse("processed/patient123/report/extracted_data.json").unwrap();
        assert_eq!(key.patient_id(), "patient123");
        if let ObjectKey::Processed(processed) = key {
            assert_eq!(processed.clean_filename, "report");
            assert_eq!(processed.object_name, "extracted_data.json");
        } else {
            panic!("Expected processed key");
        }
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert!(ObjectKey::parse("patient123/report.pdf").is_err());
        assert!(ObjectKey::parse("patient123//abc/report.pdf").is_err());
        assert!(ObjectKey::parse("a/b/c/d/e").is_err());
    }

    #[test]
    fn test_clean_filename() {
        assert_eq!(clean_filename("report.pdf"), "report");
        assert_eq!(clean_filename("blood test (1).v2.png"), "blood_test__1__v2");
        assert_eq!(clean_filename("noext"), "noext");
        assert_eq!(clean_filename(".hidden"), "_hidden");
    }

    #[test]
    fn test_raw_key_rejects_separators() {
        assert!(RawObjectKey::new("p1", "labs", "f1", "a/b.pdf").is_err());
        assert!(RawObjectKey::new("processed", "labs", "f1", "b.pdf").is_err());
        assert!(RawObjectKey::new("p1", " ", "f1", "b.pdf").is_err());
        assert!(RawObjectKey::new("p1", "labs", "f1", "b.pdf").is_ok());
    }

    #[test]
    fn test_s3_uri() {
        assert_eq!(
            s3_uri("bucket", "p1/labs/f1/a.pdf"),
            "s3://bucket/p1/labs/f1/a.pdf"
        );
    }
}
