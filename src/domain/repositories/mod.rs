pub mod error;
pub mod exam_repository;
pub mod knowledge_base_repository;
pub mod medic_repository;
pub mod patient_repository;
pub mod processed_document_repository;
pub mod reservation_repository;
pub mod uploaded_file_repository;

pub use error::RepositoryError;
pub use exam_repository::ExamRepository;
pub use knowledge_base_repository::{KnowledgeBaseMatch, KnowledgeBaseRepository};
pub use medic_repository::MedicRepository;
pub use patient_repository::PatientRepository;
pub use processed_document_repository::ProcessedDocumentRepository;
pub use reservation_repository::ReservationRepository;
pub use uploaded_file_repository::UploadedFileRepository;
