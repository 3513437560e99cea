use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::entities::Reservation;
use crate::domain::repositories::RepositoryError;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Atomic with respect to concurrent bookings of the same slot: exactly one
    /// caller succeeds, the rest get `SlotAlreadyBooked`. Missing patient, medic
    /// or exam yields `NotFound`.
    async fn create(&self, reservation: &Reservation) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, RepositoryError>;
    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Reservation>, RepositoryError>;
    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<Reservation>, RepositoryError>;
    async fn find_by_medic_and_date(
        &self,
        medic_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, RepositoryError>;
    /// Same slot guarantees as `create`.
    async fn update(&self, reservation: &Reservation) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
    async fn count(&self) -> Result<i64, RepositoryError>;
}
