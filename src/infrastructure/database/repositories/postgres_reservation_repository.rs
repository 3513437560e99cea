use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use uuid::Uuid;

use crate::domain::entities::{Reservation, ReservationSlot};
use crate::domain::repositories::{RepositoryError, ReservationRepository};
use crate::infrastructure::database::errors::{
    RESERVATION_SLOT_CONSTRAINT, Violation, database_error, violation,
};
use crate::infrastructure::database::models::{NewReservationModel, ReservationModel};
use crate::infrastructure::database::schema::{exams, medics, patients, reservations};
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresReservationRepository {
    pool: DbPool,
}

impl PostgresReservationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Maps a failed reservation write. The slot index is the only arbiter of
/// double booking.
fn write_error(error: DieselError, slot: ReservationSlot) -> RepositoryError {
    match violation(&error) {
        Some(Violation::Unique(Some(RESERVATION_SLOT_CONSTRAINT))) => {
            RepositoryError::SlotAlreadyBooked(slot)
        }
        Some(Violation::Unique(_)) => {
            RepositoryError::Conflict("reservation already exists".to_string())
        }
        Some(Violation::ForeignKey(_)) => RepositoryError::NotFound(
            "referenced patient, medic or exam".to_string(),
        ),
        None => database_error(error),
    }
}

fn ensure_references(
    conn: &mut PgConnection,
    model: &NewReservationModel,
) -> Result<(), RepositoryError> {
    let patient_exists: bool =
        diesel::select(exists(patients::table.find(model.patient_id.clone()))).get_result(conn)?;
    if !patient_exists {
        return Err(RepositoryError::NotFound(format!(
            "patient {}",
            model.patient_id
        )));
    }

    let medic_exists: bool =
        diesel::select(exists(medics::table.find(model.medic_id))).get_result(conn)?;
    if !medic_exists {
        return Err(RepositoryError::NotFound(format!("medic {}", model.medic_id)));
    }

    let exam_exists: bool =
        diesel::select(exists(exams::table.find(model.exam_id))).get_result(conn)?;
    if !exam_exists {
        return Err(RepositoryError::NotFound(format!("exam {}", model.exam_id)));
    }

    Ok(())
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    async fn create(&self, reservation: &Reservation) -> Result<(), RepositoryError> {
        let model = NewReservationModel::from(reservation);
        let slot = reservation.slot();

        with_connection(&self.pool, move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                ensure_references(conn, &model)?;
                diesel::insert_into(reservations::table)
                    .values(&model)
                    .execute(conn)
                    .map_err(|e| write_error(e, slot))?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let model = reservations::table
                .find(id)
                .select(ReservationModel::as_select())
                .first(conn)
                .optional()
                .map_err(database_error)?;
            Ok(model.map(Reservation::from))
        })
        .await
    }

    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Reservation>, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let models = reservations::table
                .order((
                    reservations::reservation_date.asc(),
                    reservations::reservation_time.asc(),
                ))
                .offset(skip)
                .limit(limit)
                .select(ReservationModel::as_select())
                .load(conn)
                .map_err(database_error)?;
            Ok(models.into_iter().map(Reservation::from).collect())
        })
        .await
    }

    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<Reservation>, RepositoryError> {
        let patient_id = patient_id.to_string();

        with_connection(&self.pool, move |conn| {
            let models = reservations::table
                .filter(reservations::patient_id.eq(patient_id))
                .order((
                    reservations::reservation_date.asc(),
                    reservations::reservation_time.asc(),
                ))
                .select(ReservationModel::as_select())
                .load(conn)
                .map_err(database_error)?;
            Ok(models.into_iter().map(Reservation::from).collect())
        })
        .await
    }

    async fn find_by_medic_and_date(
        &self,
        medic_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let models = reservations::table
                .filter(reservations::medic_id.eq(medic_id))
                .filter(reservations::reservation_date.eq(date))
                .order(reservations::reservation_time.asc())
                .select(ReservationModel::as_select())
                .load(conn)
                .map_err(database_error)?;
            Ok(models.into_iter().map(Reservation::from).collect())
        })
        .await
    }

    async fn update(&self, reservation: &Reservation) -> Result<(), RepositoryError> {
        let changes = NewReservationModel::from(reservation);
        let slot = reservation.slot();

        with_connection(&self.pool, move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                ensure_references(conn, &changes)?;
                let updated = diesel::update(reservations::table.find(changes.id))
                    .set(&changes)
                    .execute(conn)
                    .map_err(|e| write_error(e, slot))?;
                if updated == 0 {
                    return Err(RepositoryError::NotFound(format!(
                        "reservation {}",
                        changes.id
                    )));
                }
                Ok(())
            })
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let deleted = diesel::delete(reservations::table.find(id))
                .execute(conn)
                .map_err(database_error)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        with_connection(&self.pool, |conn| {
            reservations::table
                .count()
                .get_result(conn)
                .map_err(database_error)
        })
        .await
    }
}
