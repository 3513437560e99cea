pub mod exam;
pub mod knowledge_base_entry;
pub mod medic;
pub mod patient;
pub mod processed_document;
pub mod reservation;
pub mod uploaded_file;

pub use exam::Exam;
pub use knowledge_base_entry::KnowledgeBaseEntry;
pub use medic::Medic;
pub use patient::Patient;
pub use processed_document::ProcessedDocument;
pub use reservation::{Reservation, ReservationSlot};
pub use uploaded_file::UploadedFile;
