pub mod cleanup_worker;
pub mod extraction_worker;
pub mod knowledge_base_indexer;
pub mod processed_output;
pub mod tool_registry;

pub use cleanup_worker::CleanupWorker;
pub use extraction_worker::ExtractionWorker;
pub use knowledge_base_indexer::KnowledgeBaseIndexer;
pub use tool_registry::{ToolCatalog, ToolRegistry};
