use crate::domain::entities::ReservationSlot;

#[derive(Debug)]
pub enum RepositoryError {
    NotFound(String),
    Conflict(String),
    SlotAlreadyBooked(ReservationSlot),
    Restricted(String),
    ValidationError(String),
    DatabaseError(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::NotFound(what) => write!(f, "Not found: {}", what),
            RepositoryError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            RepositoryError::SlotAlreadyBooked(slot) => {
                write!(f, "Slot already booked: {}", slot)
            }
            RepositoryError::Restricted(msg) => write!(f, "Restricted: {}", msg),
            RepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            RepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}
