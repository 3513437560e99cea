use async_trait::async_trait;

#[derive(Debug)]
pub enum DocumentExtractionError {
    UnsupportedFormat(String),
    ServiceUnavailable(String),
    ExtractionFailed(String),
    InvalidResponse(String),
}

impl DocumentExtractionError {
    /// Transient failures worth another delivery of the same object.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DocumentExtractionError::ServiceUnavailable(_)
                | DocumentExtractionError::ExtractionFailed(_)
        )
    }
}

impl std::fmt::Display for DocumentExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentExtractionError::UnsupportedFormat(format) => {
                write!(f, "Unsupported format: {}", format)
            }
            DocumentExtractionError::ServiceUnavailable(msg) => {
                write!(f, "Extraction service unavailable: {}", msg)
            }
            DocumentExtractionError::ExtractionFailed(msg) => write!(f, "Extraction failed: {}", msg),
            DocumentExtractionError::InvalidResponse(msg) => {
                write!(f, "Invalid extraction response: {}", msg)
            }
        }
    }
}

impl std::error::Error for DocumentExtractionError {}

#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub source_uri: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub data: serde_json::Value,
    pub page_count: Option<i32>,
    pub model: Option<String>,
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractedDocument, DocumentExtractionError>;

    fn supported_formats(&self) -> Vec<String>;

    fn can_extract(&self, content_type: &str) -> bool;

    fn max_file_size(&self) -> Option<usize>;
}
