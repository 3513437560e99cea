use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::Deserialize;
use std::time::Duration;

use super::retry::RetryPolicy;
use crate::application::ports::tool_gateway::{ToolDescriptor, ToolGateway, ToolGatewayError};

#[derive(Deserialize)]
#[serde(untagged)]
enum ToolListBody {
    Wrapped { tools: Vec<ToolDescriptor> },
    Bare(Vec<ToolDescriptor>),
}

impl From<ToolListBody> for Vec<ToolDescriptor> {
    fn from(body: ToolListBody) -> Self {
        match body {
            ToolListBody::Wrapped { tools } | ToolListBody::Bare(tools) => tools,
        }
    }
}

/// Reads the tool list published by an external agent gateway.
pub struct HttpToolGateway {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpToolGateway {
    pub fn new(base_url: &str) -> Result<Self, ReqwestError> {
        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy {
                max_retries: 1,
                backoff_factor: 1.0,
            },
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_tools(&self) -> Result<Vec<ToolDescriptor>, ToolGatewayError> {
        let response = self
            .client
            .get(format!("{}/tools", self.base_url))
            .send()
            .await
            .map_err(|e| ToolGatewayError::Unreachable(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolGatewayError::Unreachable(status.to_string()));
        }

        response
            .json::<ToolListBody>()
            .await
            .map(Into::into)
            .map_err(|e| ToolGatewayError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ToolGateway for HttpToolGateway {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolGatewayError> {
        self.retry
            .run(
                "Tool gateway request",
                |e: &ToolGatewayError| matches!(e, ToolGatewayError::Unreachable(_)),
                || self.fetch_tools(),
            )
            .await
    }
}
