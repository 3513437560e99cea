pub mod document_status;
pub mod field_errors;
pub mod file_checksum;
pub mod object_key;
pub mod workflow_stage;

pub use document_status::DocumentStatus;
pub use field_errors::{FieldError, FieldErrors};
pub use file_checksum::FileChecksum;
pub use object_key::{ObjectKey, ProcessedObjectKey, RawObjectKey};
pub use workflow_stage::WorkflowStage;
