use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dimension of the `ab2_knowledge_base.embedding` column.
pub const EMBEDDING_DIMENSION: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseEntry {
    id: Uuid,
    document_id: Uuid,
    text: String,
    embedding: Vector,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl KnowledgeBaseEntry {
    pub fn new(
        document_id: Uuid,
        text: String,
        embedding: Vector,
        metadata: serde_json::Value,
    ) -> Result<Self, String> {
        let dimension = embedding.as_slice().len();
        if dimension != EMBEDDING_DIMENSION {
            return Err(format!(
                "Embedding has {} dimensions, expected {}",
                dimension, EMBEDDING_DIMENSION
            ));
        }

        if text.trim().is_empty() {
            return Err("Knowledge base text cannot be empty".to_string());
        }

        Ok(Self {
            id: Uuid::new_v4(),
            document_id,
            text,
            embedding,
            metadata,
            created_at: Utc::now(),
        })
    }

    pub fn from_database(
        id: Uuid,
        document_id: Uuid,
        text: String,
        embedding: Vector,
        metadata: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            document_id,
            text,
            embedding,
            metadata,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn embedding(&self) -> &Vector {
        &self.embedding
    }

    pub fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
