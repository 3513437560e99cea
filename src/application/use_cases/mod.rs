pub mod delete_uploaded_file;
pub mod get_document_status;
pub mod manage_documents;
pub mod manage_exams;
pub mod manage_medics;
pub mod manage_patients;
pub mod manage_reservations;
pub mod record_error;
pub mod search_knowledge_base;
pub mod upload_file;

pub use delete_uploaded_file::DeleteUploadedFileUseCase;
pub use get_document_status::GetDocumentStatusUseCase;
pub use manage_documents::ManageDocumentsUseCase;
pub use manage_exams::ManageExamsUseCase;
pub use manage_medics::ManageMedicsUseCase;
pub use manage_patients::ManagePatientsUseCase;
pub use manage_reservations::ManageReservationsUseCase;
pub use search_knowledge_base::SearchKnowledgeBaseUseCase;
pub use upload_file::UploadFileUseCase;
