use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::FieldErrors;

/// A medic's bookable slot. At most one reservation may hold a given slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationSlot {
    pub medic_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl std::fmt::Display for ReservationSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "medic {} on {} at {}",
            self.medic_id,
            self.date,
            self.time.format("%H:%M")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    id: Uuid,
    patient_id: String,
    medic_id: Uuid,
    exam_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReservationDetails {
    pub patient_id: String,
    pub medic_id: Uuid,
    pub exam_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: Option<String>,
}

impl ReservationDetails {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require_non_blank("patient_id", &self.patient_id);
        if self.time.second() != 0 || self.time.nanosecond() != 0 {
            errors.add("time", "must be given in whole minutes (HH:MM)");
        }
        errors
    }
}

impl Reservation {
    pub fn new(details: ReservationDetails) -> Result<Self, FieldErrors> {
        details.validate().into_result()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            patient_id: details.patient_id.trim().to_string(),
            medic_id: details.medic_id,
            exam_id: details.exam_id,
            date: details.date,
            time: details.time,
            notes: details.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn from_database(
        id: Uuid,
        patient_id: String,
        medic_id: Uuid,
        exam_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        notes: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            patient_id,
            medic_id,
            exam_id,
            date,
            time,
            notes,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn medic_id(&self) -> Uuid {
        self.medic_id
    }

    pub fn exam_id(&self) -> Uuid {
        self.exam_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn slot(&self) -> ReservationSlot {
        ReservationSlot {
            medic_id: self.medic_id,
            date: self.date,
            time: self.time,
        }
    }

    pub fn reschedule(&mut self, details: ReservationDetails) -> Result<(), FieldErrors> {
        details.validate().into_result()?;

        self.patient_id = details.patient_id.trim().to_string();
        self.medic_id = details.medic_id;
        self.exam_id = details.exam_id;
        self.date = details.date;
        self.time = details.time;
        self.notes = details.notes;
        self.updated_at = Utc::now();
        Ok(())
    }
}
