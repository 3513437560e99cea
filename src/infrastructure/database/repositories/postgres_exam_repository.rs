use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Exam;
use crate::domain::repositories::{ExamRepository, RepositoryError};
use crate::infrastructure::database::errors::{
    Violation, database_error, unique_conflict, violation,
};
use crate::infrastructure::database::models::{ExamModel, NewExamModel};
use crate::infrastructure::database::schema::exams;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresExamRepository {
    pool: DbPool,
}

impl PostgresExamRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExamRepository for PostgresExamRepository {
    async fn save(&self, exam: &Exam) -> Result<(), RepositoryError> {
        let new_exam = NewExamModel::from(exam);

        with_connection(&self.pool, move |conn| {
            diesel::insert_into(exams::table)
                .values(&new_exam)
                .execute(conn)
                .map_err(unique_conflict)?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Exam>, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let model = exams::table
                .find(id)
                .select(ExamModel::as_select())
                .first(conn)
                .optional()
                .map_err(database_error)?;
            Ok(model.map(Exam::from))
        })
        .await
    }

    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Exam>, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            let models = exams::table
                .order(exams::name.asc())
                .offset(skip)
                .limit(limit)
                .select(ExamModel::as_select())
                .load(conn)
                .map_err(database_error)?;
            Ok(models.into_iter().map(Exam::from).collect())
        })
        .await
    }

    async fn update(&self, exam: &Exam) -> Result<(), RepositoryError> {
        let changes = NewExamModel::from(exam);

        with_connection(&self.pool, move |conn| {
            let updated = diesel::update(exams::table.find(changes.id))
                .set(&changes)
                .execute(conn)
                .map_err(unique_conflict)?;
            if updated == 0 {
                return Err(RepositoryError::NotFound(format!("exam {}", changes.id)));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            match diesel::delete(exams::table.find(id)).execute(conn) {
                Ok(deleted) => Ok(deleted > 0),
                Err(e) if matches!(violation(&e), Some(Violation::ForeignKey(_))) => Err(
                    RepositoryError::Restricted(format!("exam {} has reservations", id)),
                ),
                Err(e) => Err(database_error(e)),
            }
        })
        .await
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        with_connection(&self.pool, |conn| {
            exams::table.count().get_result(conn).map_err(database_error)
        })
        .await
    }
}
