pub mod extraction_client;
pub mod inference_client;
pub mod retry;
pub mod tool_gateway_client;

pub use extraction_client::ExtractionServiceClient;
pub use inference_client::InferenceEmbeddingProvider;
pub use tool_gateway_client::HttpToolGateway;
