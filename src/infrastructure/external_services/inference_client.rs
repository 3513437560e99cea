use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, Error as ReqwestError, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::RetryPolicy;
use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
};
use crate::domain::entities::knowledge_base_entry::EMBEDDING_DIMENSION;

const DEFAULT_MODEL: &str = "default";

#[derive(Serialize)]
pub struct EmbeddingsRequest {
    pub text: TextInput,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Deserialize)]
pub struct EmbeddingsResponse {
    pub embeddings: Vec<Vector>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub service_url: String,
    pub timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl EmbeddingsClientConfig {
    pub fn new(service_url: String) -> Self {
        Self {
            service_url,
            timeout_secs: 30,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    config: EmbeddingsClientConfig,
}

impl InferenceClient {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn get_embeddings(
        &self,
        texts: &[String],
    ) -> Result<EmbeddingsResponse, EmbeddingProviderError> {
        let request = EmbeddingsRequest {
            text: TextInput::Multiple(texts.to_vec()),
        };

        self.config
            .retry
            .run("Embeddings request", EmbeddingProviderError::is_retryable, || {
                self.execute_request(&request)
            })
            .await
    }

    async fn execute_request(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingProviderError> {
        let response = self
            .client
            .post(&self.config.service_url)
            .json(request)
            .send()
            .await
            .map_err(|e| EmbeddingProviderError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbeddingProviderError::ServiceUnavailable);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingProviderError::ApiError(format!("{}: {}", status, body)));
        }

        response
            .json::<EmbeddingsResponse>()
            .await
            .map_err(|e| EmbeddingProviderError::ApiError(e.to_string()))
    }
}

/// `EmbeddingProvider` backed by the embeddings HTTP service.
pub struct InferenceEmbeddingProvider {
    client: InferenceClient,
}

impl InferenceEmbeddingProvider {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }

    pub fn from_url(service_url: String) -> Result<Self, ReqwestError> {
        let client = InferenceClient::new(EmbeddingsClientConfig::new(service_url))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl EmbeddingProvider for InferenceEmbeddingProvider {
    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        if request.texts.is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "No texts to embed".to_string(),
            ));
        }

        let response = self.client.get_embeddings(&request.texts).await?;

        Ok(BatchEmbeddingResponse {
            embeddings: response.embeddings,
            model_name: response
                .model
                .or(request.model_name)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    fn model_info(&self) -> (String, Option<String>) {
        (DEFAULT_MODEL.to_string(), None)
    }

    fn embedding_dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}
