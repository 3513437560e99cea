use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Reservation;
use crate::infrastructure::database::schema::reservations;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReservationModel {
    pub id: Uuid,
    pub patient_id: String,
    pub medic_id: Uuid,
    pub exam_id: Uuid,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct NewReservationModel {
    pub id: Uuid,
    pub patient_id: String,
    pub medic_id: Uuid,
    pub exam_id: Uuid,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Reservation> for NewReservationModel {
    fn from(reservation: &Reservation) -> Self {
        Self {
            id: reservation.id(),
            patient_id: reservation.patient_id().to_string(),
            medic_id: reservation.medic_id(),
            exam_id: reservation.exam_id(),
            reservation_date: reservation.date(),
            reservation_time: reservation.time(),
            notes: reservation.notes().map(str::to_string),
            created_at: reservation.created_at(),
            updated_at: reservation.updated_at(),
        }
    }
}

impl From<ReservationModel> for Reservation {
    fn from(model: ReservationModel) -> Self {
        Reservation::from_database(
            model.id,
            model.patient_id,
            model.medic_id,
            model.exam_id,
            model.reservation_date,
            model.reservation_time,
            model.notes,
            model.created_at,
            model.updated_at,
        )
    }
}
