use crate::domain::entities::ReservationSlot;
use crate::domain::repositories::RepositoryError;
use crate::domain::value_objects::FieldErrors;

/// Failure of a record-store use case, ready to be mapped onto an API kind.
#[derive(Debug)]
pub enum RecordError {
    Validation(FieldErrors),
    NotFound(String),
    Conflict(String),
    SlotAlreadyBooked(ReservationSlot),
    Restricted(String),
    RepositoryError(String),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::Validation(errors) => write!(f, "Validation failed: {}", errors),
            RecordError::NotFound(what) => write!(f, "Not found: {}", what),
            RecordError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            RecordError::SlotAlreadyBooked(slot) => write!(f, "Slot already booked: {}", slot),
            RecordError::Restricted(msg) => write!(f, "Restricted: {}", msg),
            RecordError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<RepositoryError> for RecordError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(what) => RecordError::NotFound(what),
            RepositoryError::Conflict(msg) => RecordError::Conflict(msg),
            RepositoryError::SlotAlreadyBooked(slot) => RecordError::SlotAlreadyBooked(slot),
            RepositoryError::Restricted(msg) => RecordError::Restricted(msg),
            RepositoryError::ValidationError(msg) => {
                RecordError::Validation(FieldErrors::single("body", &msg))
            }
            RepositoryError::DatabaseError(msg) => RecordError::RepositoryError(msg),
        }
    }
}

impl From<FieldErrors> for RecordError {
    fn from(errors: FieldErrors) -> Self {
        RecordError::Validation(errors)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub skip: i64,
    pub limit: i64,
}

pub fn validate_page(skip: i64, limit: i64) -> Result<(), RecordError> {
    let mut errors = FieldErrors::new();
    if skip < 0 {
        errors.add("skip", "cannot be negative");
    }
    if limit <= 0 || limit > 1000 {
        errors.add("limit", "must be between 1 and 1000");
    }
    Ok(errors.into_result()?)
}
