use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::application::use_cases::record_error::{Page, RecordError, validate_page};
use crate::domain::entities::{Reservation, reservation::ReservationDetails};
use crate::domain::repositories::ReservationRepository;
use crate::domain::value_objects::FieldErrors;

#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub patient_id: Option<String>,
    pub medic_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

pub struct ManageReservationsUseCase {
    reservation_repository: Arc<dyn ReservationRepository>,
}

impl ManageReservationsUseCase {
    pub fn new(reservation_repository: Arc<dyn ReservationRepository>) -> Self {
        Self {
            reservation_repository,
        }
    }

    /// Books a slot. Concurrent bookings of the same slot resolve to one
    /// success and `SlotAlreadyBooked` for everyone else.
    pub async fn create(&self, details: ReservationDetails) -> Result<Reservation, RecordError> {
        let reservation = Reservation::new(details)?;
        self.reservation_repository.create(&reservation).await?;
        info!(
            "Reservation {} booked for patient {} ({})",
            reservation.id(),
            reservation.patient_id(),
            reservation.slot()
        );
        Ok(reservation)
    }

    pub async fn get(&self, id: Uuid) -> Result<Reservation, RecordError> {
        self.reservation_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RecordError::NotFound(format!("reservation {}", id)))
    }

    pub async fn list(
        &self,
        filter: ReservationFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Page<Reservation>, RecordError> {
        validate_page(skip, limit)?;

        let filtered = match (&filter.patient_id, filter.medic_id, filter.date) {
            (Some(patient_id), _, _) => {
                Some(self.reservation_repository.find_by_patient(patient_id).await?)
            }
            (None, Some(medic_id), Some(date)) => Some(
                self.reservation_repository
                    .find_by_medic_and_date(medic_id, date)
                    .await?,
            ),
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(RecordError::Validation(FieldErrors::single(
                    "medic_id",
                    "medic_id and date must be given together",
                )));
            }
            (None, None, None) => None,
        };

        match filtered {
            Some(all) => {
                let all: Vec<Reservation> = all
                    .into_iter()
                    .filter(|r| filter.medic_id.is_none_or(|m| r.medic_id() == m))
                    .filter(|r| filter.date.is_none_or(|d| r.date() == d))
                    .collect();
                let total_count = all.len() as i64;
                let items = all
                    .into_iter()
                    .skip(skip as usize)
                    .take(limit as usize)
                    .collect();
                Ok(Page {
                    items,
                    total_count,
                    skip,
                    limit,
                })
            }
            None => {
                let items = self.reservation_repository.find_all(skip, limit).await?;
                let total_count = self.reservation_repository.count().await?;
                Ok(Page {
                    items,
                    total_count,
                    skip,
                    limit,
                })
            }
        }
    }

    pub async fn update(
        &self,
        id: Uuid,
        details: ReservationDetails,
    ) -> Result<Reservation, RecordError> {
        let mut reservation = self.get(id).await?;
        reservation.reschedule(details)?;
        self.reservation_repository.update(&reservation).await?;
        Ok(reservation)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), RecordError> {
        if !self.reservation_repository.delete(id).await? {
            return Err(RecordError::NotFound(format!("reservation {}", id)));
        }
        Ok(())
    }
}
