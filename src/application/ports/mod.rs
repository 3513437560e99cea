pub mod document_extractor;
pub mod embedding_provider;
pub mod event_queue;
pub mod object_store;
pub mod tool_gateway;

pub use document_extractor::DocumentExtractor;
pub use embedding_provider::EmbeddingProvider;
pub use event_queue::EventPublisher;
pub use object_store::ObjectStore;
pub use tool_gateway::ToolGateway;
