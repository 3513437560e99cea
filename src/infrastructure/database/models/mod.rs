pub mod exam_model;
pub mod knowledge_base_model;
pub mod medic_model;
pub mod patient_model;
pub mod processed_document_model;
pub mod reservation_model;
pub mod uploaded_file_model;

pub use exam_model::*;
pub use knowledge_base_model::*;
pub use medic_model::*;
pub use patient_model::*;
pub use processed_document_model::*;
pub use reservation_model::*;
pub use uploaded_file_model::*;
