pub mod postgres_exam_repository;
pub mod postgres_knowledge_base_repository;
pub mod postgres_medic_repository;
pub mod postgres_patient_repository;
pub mod postgres_processed_document_repository;
pub mod postgres_reservation_repository;
pub mod postgres_uploaded_file_repository;

pub use postgres_exam_repository::PostgresExamRepository;
pub use postgres_knowledge_base_repository::PostgresKnowledgeBaseRepository;
pub use postgres_medic_repository::PostgresMedicRepository;
pub use postgres_patient_repository::PostgresPatientRepository;
pub use postgres_processed_document_repository::PostgresProcessedDocumentRepository;
pub use postgres_reservation_repository::PostgresReservationRepository;
pub use postgres_uploaded_file_repository::PostgresUploadedFileRepository;
