use async_trait::async_trait;
use diesel::prelude::*;
use pgvector::{Vector, VectorExpressionMethods};
use uuid::Uuid;

use crate::domain::entities::KnowledgeBaseEntry;
use crate::domain::repositories::{KnowledgeBaseMatch, KnowledgeBaseRepository, RepositoryError};
use crate::infrastructure::database::errors::database_error;
use crate::infrastructure::database::models::KnowledgeBaseModel;
use crate::infrastructure::database::schema::ab2_knowledge_base;
use crate::infrastructure::database::{DbPool, with_connection};

pub struct PostgresKnowledgeBaseRepository {
    pool: DbPool,
}

impl PostgresKnowledgeBaseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KnowledgeBaseRepository for PostgresKnowledgeBaseRepository {
    async fn replace_for_document(
        &self,
        document_id: Uuid,
        entries: &[KnowledgeBaseEntry],
    ) -> Result<usize, RepositoryError> {
        let models: Vec<KnowledgeBaseModel> =
            entries.iter().map(KnowledgeBaseModel::from).collect();

        with_connection(&self.pool, move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                diesel::delete(
                    ab2_knowledge_base::table
                        .filter(ab2_knowledge_base::document_id.eq(document_id)),
                )
                .execute(conn)?;

                if models.is_empty() {
                    return Ok(0);
                }

                Ok(diesel::insert_into(ab2_knowledge_base::table)
                    .values(&models)
                    .execute(conn)?)
            })
        })
        .await
    }

    async fn similarity_search(
        &self,
        query_vector: &Vector,
        limit: i64,
    ) -> Result<Vec<KnowledgeBaseMatch>, RepositoryError> {
        let query_vector = query_vector.clone();

        with_connection(&self.pool, move |conn| {
            let distance = ab2_knowledge_base::embedding.cosine_distance(query_vector.clone());
            let rows = ab2_knowledge_base::table
                .select((KnowledgeBaseModel::as_select(), distance))
                .order(ab2_knowledge_base::embedding.cosine_distance(query_vector))
                .limit(limit)
                .load::<(KnowledgeBaseModel, f64)>(conn)
                .map_err(database_error)?;

            Ok(rows
                .into_iter()
                .map(|(model, distance)| KnowledgeBaseMatch {
                    entry: KnowledgeBaseEntry::from(model),
                    similarity_score: (1.0 - distance) as f32,
                })
                .collect())
        })
        .await
    }

    async fn count_by_document(&self, document_id: Uuid) -> Result<i64, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            ab2_knowledge_base::table
                .filter(ab2_knowledge_base::document_id.eq(document_id))
                .count()
                .get_result(conn)
                .map_err(database_error)
        })
        .await
    }

    async fn delete_by_document(&self, document_id: Uuid) -> Result<usize, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            diesel::delete(
                ab2_knowledge_base::table.filter(ab2_knowledge_base::document_id.eq(document_id)),
            )
            .execute(conn)
            .map_err(database_error)
        })
        .await
    }
}
