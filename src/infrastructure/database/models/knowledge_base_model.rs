use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::KnowledgeBaseEntry;
use crate::infrastructure::database::schema::ab2_knowledge_base;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = ab2_knowledge_base)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct KnowledgeBaseModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub text: String,
    pub embedding: Vector,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<&KnowledgeBaseEntry> for KnowledgeBaseModel {
    fn from(entry: &KnowledgeBaseEntry) -> Self {
        Self {
            id: entry.id(),
            document_id: entry.document_id(),
            text: entry.text().to_string(),
            embedding: entry.embedding().clone(),
            metadata: entry.metadata().clone(),
            created_at: entry.created_at(),
        }
    }
}

impl From<KnowledgeBaseModel> for KnowledgeBaseEntry {
    fn from(model: KnowledgeBaseModel) -> Self {
        KnowledgeBaseEntry::from_database(
            model.id,
            model.document_id,
            model.text,
            model.embedding,
            model.metadata,
            model.created_at,
        )
    }
}
