use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::repositories::RepositoryError;

/// Constraint names from the migrations, matched against violations.
pub const RESERVATION_SLOT_CONSTRAINT: &str = "reservations_slot_key";
pub const PATIENT_EMAIL_CONSTRAINT: &str = "patients_email_key";
pub const MEDIC_LICENSE_CONSTRAINT: &str = "medics_license_number_key";
pub const MEDIC_EMAIL_CONSTRAINT: &str = "medics_email_key";
pub const EXAM_NAME_CONSTRAINT: &str = "exams_name_key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation<'a> {
    Unique(Option<&'a str>),
    ForeignKey(Option<&'a str>),
}

pub fn violation(error: &DieselError) -> Option<Violation<'_>> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(Violation::Unique(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            Some(Violation::ForeignKey(info.constraint_name()))
        }
        _ => None,
    }
}

pub fn database_error(error: DieselError) -> RepositoryError {
    RepositoryError::DatabaseError(error.to_string())
}

/// Unique violations become `Conflict` naming the duplicated field.
pub fn unique_conflict(error: DieselError) -> RepositoryError {
    let field = match violation(&error) {
        Some(Violation::Unique(Some(PATIENT_EMAIL_CONSTRAINT)))
        | Some(Violation::Unique(Some(MEDIC_EMAIL_CONSTRAINT))) => "email",
        Some(Violation::Unique(Some(MEDIC_LICENSE_CONSTRAINT))) => "license_number",
        Some(Violation::Unique(Some(EXAM_NAME_CONSTRAINT))) => "name",
        Some(Violation::Unique(_)) => "id",
        _ => return database_error(error),
    };
    RepositoryError::Conflict(format!("{} already exists", field))
}

impl From<DieselError> for RepositoryError {
    fn from(error: DieselError) -> Self {
        database_error(error)
    }
}
