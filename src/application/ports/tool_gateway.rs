use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ToolGatewayError {
    Unreachable(String),
    InvalidResponse(String),
}

impl std::fmt::Display for ToolGatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolGatewayError::Unreachable(msg) => write!(f, "Tool gateway unreachable: {}", msg),
            ToolGatewayError::InvalidResponse(msg) => {
                write!(f, "Invalid tool gateway response: {}", msg)
            }
        }
    }
}

impl std::error::Error for ToolGatewayError {}

/// A named agent capability with fixed input and output schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
    pub output_schema: serde_json::Value,
}

#[async_trait]
pub trait ToolGateway: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolGatewayError>;
}
