use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};

use crate::application::ports::event_queue::{
    EventPublisher, EventQueueError, QueueHealth, QueuedEvent, WorkflowEvent,
};

/// In-process notification channel standing in for object-store event
/// delivery. Publishing never blocks.
#[derive(Clone)]
pub struct MpscEventQueue {
    sender: mpsc::UnboundedSender<QueuedEvent>,
    stats: Arc<Mutex<QueueHealth>>,
}

pub struct MpscEventReceiver {
    receiver: Mutex<mpsc::UnboundedReceiver<QueuedEvent>>,
    stats: Arc<Mutex<QueueHealth>>,
}

impl MpscEventQueue {
    pub fn create_pair() -> (Self, MpscEventReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let stats = Arc::new(Mutex::new(QueueHealth::default()));

        (
            Self {
                sender,
                stats: stats.clone(),
            },
            MpscEventReceiver {
                receiver: Mutex::new(receiver),
                stats,
            },
        )
    }

    fn send(&self, event: QueuedEvent) -> Result<(), EventQueueError> {
        self.sender
            .send(event)
            .map_err(|_| EventQueueError::ChannelClosed)
    }
}

#[async_trait]
impl EventPublisher for MpscEventQueue {
    async fn publish(&self, event: WorkflowEvent) -> Result<(), EventQueueError> {
        self.send(QueuedEvent::new(event))?;

        let mut stats = self.stats.lock().await;
        stats.total_published += 1;
        stats.last_activity = Some(chrono::Utc::now());
        Ok(())
    }

    async fn redeliver(&self, event: QueuedEvent, delay: Duration) -> Result<(), EventQueueError> {
        if self.sender.is_closed() {
            return Err(EventQueueError::ChannelClosed);
        }

        {
            let mut stats = self.stats.lock().await;
            stats.total_retried += 1;
            stats.last_activity = Some(chrono::Utc::now());
        }

        let queue = self.clone();
        let next = event.next_attempt();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if queue.send(next).is_err() {
                tracing::warn!("Event channel closed before redelivery");
            }
        });
        Ok(())
    }

    async fn health_check(&self) -> QueueHealth {
        self.stats.lock().await.clone()
    }
}

impl MpscEventReceiver {
    /// `None` once every sender is gone.
    pub async fn recv(&self) -> Option<QueuedEvent> {
        let event = {
            let mut receiver = self.receiver.lock().await;
            receiver.recv().await
        };

        if event.is_some() {
            let mut stats = self.stats.lock().await;
            stats.total_consumed += 1;
            stats.last_activity = Some(chrono::Utc::now());
        }
        event
    }

    pub async fn record_dropped(&self) {
        let mut stats = self.stats.lock().await;
        stats.total_dropped += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_and_receive() {
        let (queue, receiver) = MpscEventQueue::create_pair();
        queue
            .publish(WorkflowEvent::ObjectCreated {
                key: "p1/labs/f1/a.pdf".to_string(),
            })
            .await
            .unwrap();

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.attempt, 1);
        assert_eq!(event.event.kind(), "object_created");

        let health = queue.health_check().await;
        assert_eq!(health.total_published, 1);
        assert_eq!(health.total_consumed, 1);
    }

    #[tokio::test]
    async fn test_redeliver_bumps_attempt() {
        let (queue, receiver) = MpscEventQueue::create_pair();
        let original = QueuedEvent::new(WorkflowEvent::ObjectRemoved {
            key: "p1/labs/f1/a.pdf".to_string(),
        });

        queue
            .redeliver(original.clone(), Duration::from_millis(5))
            .await
            .unwrap();

        let redelivered = receiver.recv().await.unwrap();
        assert_eq!(redelivered.id, original.id);
        assert_eq!(redelivered.attempt, 2);
        assert_eq!(queue.health_check().await.total_retried, 1);
    }
}
