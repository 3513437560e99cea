pub mod document_handler;
pub mod exam_handler;
pub mod medic_handler;
pub mod patient_handler;
pub mod reservation_handler;
pub mod search_handler;
pub mod tool_handler;

pub use document_handler::DocumentHandler;
pub use exam_handler::ExamHandler;
pub use medic_handler::MedicHandler;
pub use patient_handler::PatientHandler;
pub use reservation_handler::ReservationHandler;
pub use search_handler::SearchHandler;
pub use tool_handler::ToolHandler;
