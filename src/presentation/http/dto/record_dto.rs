use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Exam, Medic, Patient, Reservation};
use crate::domain::entities::patient::PatientDetails;

#[derive(Debug, Deserialize)]
pub struct CreatePatientDto {
    pub id: Option<String>,
    #[serde(flatten)]
    pub details: PatientDetails,
}

#[derive(Debug, Serialize)]
pub struct PatientResponseDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Patient> for PatientResponseDto {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id().to_string(),
            first_name: patient.first_name().to_string(),
            last_name: patient.last_name().to_string(),
            email: patient.email().to_string(),
            phone: patient.phone().map(|s| s.to_string()),
            date_of_birth: patient.date_of_birth(),
            created_at: patient.created_at(),
            updated_at: patient.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MedicResponseDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub license_number: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Medic> for MedicResponseDto {
    fn from(medic: Medic) -> Self {
        Self {
            id: medic.id(),
            first_name: medic.first_name().to_string(),
            last_name: medic.last_name().to_string(),
            specialty: medic.specialty().to_string(),
            license_number: medic.license_number().to_string(),
            email: medic.email().to_string(),
            phone: medic.phone().map(|s| s.to_string()),
            created_at: medic.created_at(),
            updated_at: medic.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExamResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub preparation_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Exam> for ExamResponseDto {
    fn from(exam: Exam) -> Self {
        Self {
            id: exam.id(),
            name: exam.name().to_string(),
            description: exam.description().map(|s| s.to_string()),
            duration_minutes: exam.duration_minutes(),
            preparation_instructions: exam.preparation_instructions().map(|s| s.to_string()),
            created_at: exam.created_at(),
            updated_at: exam.updated_at(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReservationQueryDto {
    pub patient_id: Option<String>,
    pub medic_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct ReservationResponseDto {
    pub id: Uuid,
    pub patient_id: String,
    pub medic_id: Uuid,
    pub exam_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponseDto {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id(),
            patient_id: reservation.patient_id().to_string(),
            medic_id: reservation.medic_id(),
            exam_id: reservation.exam_id(),
            date: reservation.date(),
            time: reservation.time().format("%H:%M").to_string(),
            notes: reservation.notes().map(|s| s.to_string()),
            created_at: reservation.created_at(),
            updated_at: reservation.updated_at(),
        }
    }
}
