use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::UploadedFile;
use crate::domain::repositories::{RepositoryError, UploadedFileRepository};
use crate::infrastructure::database::errors::{database_error, unique_conflict};
use crate::infrastructure::database::models::{NewUploadedFileModel, UploadedFileModel};
use crate::infrastructure::database::schema::uploaded_files;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresUploadedFileRepository {
    pool: DbPool,
}

impl PostgresUploadedFileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_domain(model: UploadedFileModel) -> Result<UploadedFile, RepositoryError> {
    UploadedFile::try_from(model).map_err(RepositoryError::ValidationError)
}

#[async_trait]
impl UploadedFileRepository for PostgresUploadedFileRepository {
    async fn save(&self, file: &UploadedFile) -> Result<(), RepositoryError> {
        let new_file = NewUploadedFileModel::from(file);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(uploaded_files::table)
                .values(&new_file)
                .execute(conn)
                .map_err(unique_conflict)?;
            Ok(())
        })
        .await
    }

    async fn find_by_file_id(&self, file_id: &str) -> Result<Option<UploadedFile>, RepositoryError> {
        let file_id = file_id.to_string();

        with_connection(&self.pool, move |conn| {
            uploaded_files::table
                .find(file_id)
                .select(UploadedFileModel::as_select())
                .first(conn)
                .optional()
                .map_err(database_error)?
                .map(to_domain)
                .transpose()
        })
        .await
    }

    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<UploadedFile>, RepositoryError> {
        let patient_id = patient_id.to_string();

        with_connection(&self.pool, move |conn| {
            uploaded_files::table
                .filter(uploaded_files::patient_id.eq(patient_id))
                .order(uploaded_files::uploaded_at.desc())
                .select(UploadedFileModel::as_select())
                .load(conn)
                .map_err(database_error)?
                .into_iter()
                .map(to_domain)
                .collect()
        })
        .await
    }

    async fn update(&self, file: &UploadedFile) -> Result<(), RepositoryError> {
        let changes = NewUploadedFileModel::from(file);

        with_connection(&self.pool, move |conn| {
            let updated = diesel::update(uploaded_files::table.find(changes.file_id.clone()))
                .set(&changes)
                .execute(conn)
                .map_err(database_error)?;
            if updated == 0 {
                return Err(RepositoryError::NotFound(format!("file {}", changes.file_id)));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, file_id: &str) -> Result<bool, RepositoryError> {
        let file_id = file_id.to_string();

        with_connection(&self.pool, move |conn| {
            let deleted = diesel::delete(uploaded_files::table.find(file_id))
                .execute(conn)
                .map_err(database_error)?;
            Ok(deleted > 0)
        })
        .await
    }
}
