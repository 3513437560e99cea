use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, Error as ReqwestError, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::retry::RetryPolicy;
use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedDocument, ExtractionRequest,
};

const SUPPORTED_FORMATS: [&str; 5] = [
    "application/pdf",
    "image/png",
    "image/jpeg",
    "image/tiff",
    "text/plain",
];

const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

#[derive(Serialize)]
struct ExtractRequestBody<'a> {
    source_uri: &'a str,
    filename: &'a str,
    content_type: Option<&'a str>,
    document: String,
}

#[derive(Deserialize)]
struct ExtractResponseBody {
    #[serde(alias = "result")]
    data: serde_json::Value,
    #[serde(default)]
    page_count: Option<i32>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExtractionClientConfig {
    pub service_url: String,
    pub timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl ExtractionClientConfig {
    pub fn new(service_url: String) -> Self {
        Self {
            service_url,
            timeout_secs: 120,
            retry: RetryPolicy::default(),
        }
    }
}

/// Client for the document-extraction service. Documents are posted as
/// base64 and the structured result comes back as free-form JSON.
pub struct ExtractionServiceClient {
    client: Client,
    config: ExtractionClientConfig,
}

impl ExtractionServiceClient {
    pub fn new(config: ExtractionClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_url(service_url: String) -> Result<Self, ReqwestError> {
        Self::new(ExtractionClientConfig::new(service_url))
    }

    fn endpoint(&self) -> String {
        format!("{}/extract", self.config.service_url.trim_end_matches('/'))
    }

    async fn execute_request(
        &self,
        body: &ExtractRequestBody<'_>,
    ) -> Result<ExtractedDocument, DocumentExtractionError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(body)
            .send()
            .await
            .map_err(|e| DocumentExtractionError::ServiceUnavailable(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, detail));
        }

        let parsed = response
            .json::<ExtractResponseBody>()
            .await
            .map_err(|e| DocumentExtractionError::InvalidResponse(e.to_string()))?;

        Ok(ExtractedDocument {
            data: parsed.data,
            page_count: parsed.page_count,
            model: parsed.model,
        })
    }
}

fn error_for_status(status: StatusCode, detail: String) -> DocumentExtractionError {
    match status {
        StatusCode::UNSUPPORTED_MEDIA_TYPE => DocumentExtractionError::UnsupportedFormat(detail),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
            DocumentExtractionError::ServiceUnavailable(format!("{}: {}", status, detail))
        }
        s if s.is_server_error() => {
            DocumentExtractionError::ExtractionFailed(format!("{}: {}", status, detail))
        }
        _ => DocumentExtractionError::InvalidResponse(format!("{}: {}", status, detail)),
    }
}

#[async_trait]
impl DocumentExtractor for ExtractionServiceClient {
    async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractedDocument, DocumentExtractionError> {
        if let Some(content_type) = request.content_type.as_deref() {
            if !self.can_extract(content_type) {
                return Err(DocumentExtractionError::UnsupportedFormat(
                    content_type.to_string(),
                ));
            }
        }
        if self.max_file_size().is_some_and(|max| request.data.len() > max) {
            return Err(DocumentExtractionError::UnsupportedFormat(format!(
                "{} exceeds {} bytes",
                request.filename, MAX_FILE_SIZE
            )));
        }

        debug!("Extracting {} ({} bytes)", request.source_uri, request.data.len());

        let body = ExtractRequestBody {
            source_uri: &request.source_uri,
            filename: &request.filename,
            content_type: request.content_type.as_deref(),
            document: STANDARD.encode(&request.data),
        };

        self.config
            .retry
            .run(
                "Extraction request",
                DocumentExtractionError::is_retryable,
                || self.execute_request(&body),
            )
            .await
    }

    fn supported_formats(&self) -> Vec<String> {
        SUPPORTED_FORMATS.iter().map(|s| s.to_string()).collect()
    }

    fn can_extract(&self, content_type: &str) -> bool {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        essence == "application/octet-stream" || SUPPORTED_FORMATS.contains(&essence)
    }

    fn max_file_size(&self) -> Option<usize> {
        Some(MAX_FILE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ExtractionServiceClient {
        let mut config = ExtractionClientConfig::new("http://127.0.0.1:1/".to_string());
        config.retry = RetryPolicy::no_retries();
        ExtractionServiceClient::new(config).unwrap()
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(client().endpoint(), "http://127.0.0.1:1/extract");
    }

    #[test]
    fn test_content_type_support() {
        let client = client();
        assert!(client.can_extract("application/pdf"));
        assert!(client.can_extract("image/png; charset=binary"));
        assert!(!client.can_extract("video/mp4"));
    }

    #[test]
    fn test_status_mapping() {
        assert!(error_for_status(StatusCode::SERVICE_UNAVAILABLE, String::new()).is_retryable());
        assert!(error_for_status(StatusCode::INTERNAL_SERVER_ERROR, String::new()).is_retryable());
        assert!(!error_for_status(StatusCode::BAD_REQUEST, String::new()).is_retryable());
        assert!(matches!(
            error_for_status(StatusCode::UNSUPPORTED_MEDIA_TYPE, String::new()),
            DocumentExtractionError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_response_accepts_result_alias() {
        let parsed: ExtractResponseBody = serde_json::from_value(serde_json::json!({
            "result": {"patient": {"name": "Ana"}},
            "page_count": 2
        }))
        .unwrap();

        assert_eq!(parsed.data["patient"]["name"], "Ana");
        assert_eq!(parsed.page_count, Some(2));
    }

    #[tokio::test]
    async fn test_unsupported_format_skips_network() {
        let result = client()
            .extract(ExtractionRequest {
                source_uri: "s3://clinic-intake/p1/labs/a/clip.mp4".to_string(),
                filename: "clip.mp4".to_string(),
                content_type: Some("video/mp4".to_string()),
                data: vec![0; 4],
            })
            .await;

        assert!(matches!(result, Err(DocumentExtractionError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_retryable() {
        let result = client()
            .extract(ExtractionRequest {
                source_uri: "s3://clinic-intake/p1/labs/a/report.pdf".to_string(),
                filename: "report.pdf".to_string(),
                content_type: Some("application/pdf".to_string()),
                data: b"%PDF".to_vec(),
            })
            .await;

        assert!(result.is_err_and(|e| e.is_retryable()));
    }
}
