use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug)]
pub enum EventQueueError {
    ChannelClosed,
    InvalidEvent(String),
}

impl std::fmt::Display for EventQueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventQueueError::ChannelClosed => write!(f, "Event channel closed"),
            EventQueueError::InvalidEvent(msg) => write!(f, "Invalid event: {}", msg),
        }
    }
}

impl std::error::Error for EventQueueError {}

/// Notifications that drive the intake workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkflowEvent {
    ObjectCreated { key: String },
    ObjectRemoved { key: String },
    IndexDocument { document_id: Uuid },
}

impl WorkflowEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowEvent::ObjectCreated { .. } => "object_created",
            WorkflowEvent::ObjectRemoved { .. } => "object_removed",
            WorkflowEvent::IndexDocument { .. } => "index_document",
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueuedEvent {
    pub id: Uuid,
    pub event: WorkflowEvent,
    pub attempt: u32,
    pub enqueued_at: DateTime<Utc>,
}

impl QueuedEvent {
    pub fn new(event: WorkflowEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            attempt: 1,
            enqueued_at: Utc::now(),
        }
    }

    pub fn next_attempt(&self) -> Self {
        Self {
            id: self.id,
            event: self.event.clone(),
            attempt: self.attempt + 1,
            enqueued_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueueHealth {
    pub total_published: u64,
    pub total_consumed: u64,
    pub total_retried: u64,
    pub total_dropped: u64,
    pub last_activity: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: WorkflowEvent) -> Result<(), EventQueueError>;

    /// Redelivers an event after `delay`, keeping its id and bumping the attempt.
    async fn redeliver(
        &self,
        event: QueuedEvent,
        delay: std::time::Duration,
    ) -> Result<(), EventQueueError>;

    async fn health_check(&self) -> QueueHealth;
}
