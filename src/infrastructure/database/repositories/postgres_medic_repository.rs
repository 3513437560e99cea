use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Medic;
use crate::domain::repositories::{MedicRepository, RepositoryError};
use crate::infrastructure::database::errors::{
    Violation, database_error, unique_conflict, violation,
};
use crate::infrastructure::database::models::{MedicModel, NewMedicModel};
use crate::infrastructure::database::schema::medics;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresMedicRepository {
    pool: DbPool,
}

impl PostgresMedicRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MedicRepository for PostgresMedicRepository {
    async fn save(&self, medic: &Medic) -> Result<(), RepositoryError> {
        let new_medic = NewMedicModel::from(medic);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(medics::table)
                .values(&new_medic)
                .execute(conn)
                .map_err(unique_conflict)?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Medic>, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let model = medics::table
                .find(id)
                .select(MedicModel::as_select())
                .first(conn)
                .optional()
                .map_err(database_error)?;
            Ok(model.map(Medic::from))
        })
        .await
    }

    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Medic>, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let models = medics::table
                .order((medics::last_name.asc(), medics::first_name.asc()))
                .offset(skip)
                .limit(limit)
                .select(MedicModel::as_select())
                .load(conn)
                .map_err(database_error)?;
            Ok(models.into_iter().map(Medic::from).collect())
        })
        .await
    }

    async fn update(&self, medic: &Medic) -> Result<(), RepositoryError> {
        let changes = NewMedicModel::from(medic);

        with_connection(&self.pool, move |conn| {
            let updated = diesel::update(medics::table.find(changes.id))
                .set(&changes)
                .execute(conn)
                .map_err(unique_conflict)?;
            if updated == 0 {
                return Err(RepositoryError::NotFound(format!("medic {}", changes.id)));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            match diesel::delete(medics::table.find(id)).execute(conn) {
                Ok(deleted) => Ok(deleted > 0),
                Err(e) if matches!(violation(&e), Some(Violation::ForeignKey(_))) => Err(
                    RepositoryError::Restricted(format!("medic {} has reservations", id)),
                ),
                Err(e) => Err(database_error(e)),
            }
        })
        .await
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        with_connection(&self.pool, |conn| {
            medics::table.count().get_result(conn).map_err(database_error)
        })
        .await
    }
}
