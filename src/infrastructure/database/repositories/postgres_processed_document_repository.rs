use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::ProcessedDocument;
use crate::domain::repositories::{ProcessedDocumentRepository, RepositoryError};
use crate::infrastructure::database::errors::database_error;
use crate::infrastructure::database::models::ProcessedDocumentModel;
use crate::infrastructure::database::schema::processed_documents;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresProcessedDocumentRepository {
    pool: DbPool,
}

impl PostgresProcessedDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessedDocumentRepository for PostgresProcessedDocumentRepository {
    async fn insert_if_absent(&self, document: &ProcessedDocument) -> Result<bool, RepositoryError> {
        let model = ProcessedDocumentModel::from(document);

        with_connection(&self.pool, move |conn| {
            let inserted = diesel::insert_into(processed_documents::table)
                .values(&model)
                .on_conflict(processed_documents::s3_uri)
                .do_nothing()
                .execute(conn)
                .map_err(database_error)?;
            Ok(inserted > 0)
        })
        .await
    }

    async fn find_by_id(&self, document_id: Uuid) -> Result<Option<ProcessedDocument>, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let model = processed_documents::table
                .find(document_id)
                .select(ProcessedDocumentModel::as_select())
                .first(conn)
                .optional()
                .map_err(database_error)?;
            Ok(model.map(ProcessedDocument::from))
        })
        .await
    }

    async fn find_by_s3_uri(&self, s3_uri: &str) -> Result<Option<ProcessedDocument>, RepositoryError> {
        let s3_uri = s3_uri.to_string();

        with_connection(&self.pool, move |conn| {
            let model = processed_documents::table
                .filter(processed_documents::s3_uri.eq(s3_uri))
                .select(ProcessedDocumentModel::as_select())
                .first(conn)
                .optional()
                .map_err(database_error)?;
            Ok(model.map(ProcessedDocument::from))
        })
        .await
    }

    async fn find_by_file_id(&self, file_id: &str) -> Result<Option<ProcessedDocument>, RepositoryError> {
        let file_id = file_id.to_string();

        with_connection(&self.pool, move |conn| {
            let model = processed_documents::table
                .filter(processed_documents::file_id.eq(file_id))
                .select(ProcessedDocumentModel::as_select())
                .first(conn)
                .optional()
                .map_err(database_error)?;
            Ok(model.map(ProcessedDocument::from))
        })
        .await
    }

    async fn find_by_patient(
        &self,
        patient_id: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ProcessedDocument>, RepositoryError> {
        let patient_id = patient_id.to_string();

        with_connection(&self.pool, move |conn| {
            let models = processed_documents::table
                .filter(processed_documents::patient_id.eq(patient_id))
                .order(processed_documents::processing_date.desc())
                .offset(skip)
                .limit(limit)
                .select(ProcessedDocumentModel::as_select())
                .load(conn)
                .map_err(database_error)?;
            Ok(models.into_iter().map(ProcessedDocument::from).collect())
        })
        .await
    }

    async fn count_by_patient(&self, patient_id: &str) -> Result<i64, RepositoryError> {
        let patient_id = patient_id.to_string();

        with_connection(&self.pool, move |conn| {
            processed_documents::table
                .filter(processed_documents::patient_id.eq(patient_id))
                .count()
                .get_result(conn)
                .map_err(database_error)
        })
        .await
    }

    async fn count_by_output_uri(&self, output_uri: &str) -> Result<i64, RepositoryError> {
        let output_uri = output_uri.to_string();

        with_connection(&self.pool, move |conn| {
            processed_documents::table
                .filter(processed_documents::output_uri.eq(output_uri))
                .count()
                .get_result(conn)
                .map_err(database_error)
        })
        .await
    }

    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<ProcessedDocument>, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let models = processed_documents::table
                .order(processed_documents::processing_date.desc())
                .offset(skip)
                .limit(limit)
                .select(ProcessedDocumentModel::as_select())
                .load(conn)
                .map_err(database_error)?;
            Ok(models.into_iter().map(ProcessedDocument::from).collect())
        })
        .await
    }

    async fn delete(&self, document_id: Uuid) -> Result<bool, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let deleted = diesel::delete(processed_documents::table.find(document_id))
                .execute(conn)
                .map_err(database_error)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn delete_by_s3_uri(&self, s3_uri: &str) -> Result<usize, RepositoryError> {
        let s3_uri = s3_uri.to_string();

        with_connection(&self.pool, move |conn| {
            diesel::delete(processed_documents::table.filter(processed_documents::s3_uri.eq(s3_uri)))
                .execute(conn)
                .map_err(database_error)
        })
        .await
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        with_connection(&self.pool, |conn| {
            processed_documents::table
                .count()
                .get_result(conn)
                .map_err(database_error)
        })
        .await
    }
}
