use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::Patient;
use crate::domain::repositories::{PatientRepository, RepositoryError};
use crate::infrastructure::database::errors::{database_error, unique_conflict};
use crate::infrastructure::database::models::{NewPatientModel, PatientModel};
use crate::infrastructure::database::schema::patients;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresPatientRepository {
    pool: DbPool,
}

impl PostgresPatientRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientRepository for PostgresPatientRepository {
    async fn save(&self, patient: &Patient) -> Result<(), RepositoryError> {
        let new_patient = NewPatientModel::from(patient);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(patients::table)
                .values(&new_patient)
                .execute(conn)
                .map_err(unique_conflict)?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, RepositoryError> {
        let id = id.to_string();

        with_connection(&self.pool, move |conn| {
            let model = patients::table
                .find(id)
                .select(PatientModel::as_select())
                .first(conn)
                .optional()
                .map_err(database_error)?;
            Ok(model.map(Patient::from))
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, RepositoryError> {
        let email = email.to_string();

        with_connection(&self.pool, move |conn| {
            let model = patients::table
                .filter(patients::email.eq(email))
                .select(PatientModel::as_select())
                .first(conn)
                .optional()
                .map_err(database_error)?;
            Ok(model.map(Patient::from))
        })
        .await
    }

    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Patient>, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let models = patients::table
                .order((patients::last_name.asc(), patients::first_name.asc()))
                .offset(skip)
                .limit(limit)
                .select(PatientModel::as_select())
                .load(conn)
                .map_err(database_error)?;
            Ok(models.into_iter().map(Patient::from).collect())
        })
        .await
    }

    async fn update(&self, patient: &Patient) -> Result<(), RepositoryError> {
        let changes = NewPatientModel::from(patient);

        with_connection(&self.pool, move |conn| {
            let updated = diesel::update(patients::table.find(changes.id.clone()))
                .set(&changes)
                .execute(conn)
                .map_err(unique_conflict)?;
            if updated == 0 {
                return Err(RepositoryError::NotFound(format!("patient {}", changes.id)));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let id = id.to_string();

        with_connection(&self.pool, move |conn| {
            let deleted = diesel::delete(patients::table.find(id))
                .execute(conn)
                .map_err(database_error)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        with_connection(&self.pool, |conn| {
            patients::table
                .count()
                .get_result(conn)
                .map_err(database_error)
        })
        .await
    }
}
