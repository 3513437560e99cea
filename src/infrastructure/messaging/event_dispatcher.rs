use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::application::ports::EventPublisher;
use crate::application::ports::event_queue::{QueuedEvent, WorkflowEvent};
use crate::application::services::cleanup_worker::{CleanupOutcome, CleanupWorkerError};
use crate::application::services::extraction_worker::{ExtractionOutcome, ExtractionWorkerError};
use crate::application::services::knowledge_base_indexer::IndexingError;
use crate::application::services::{CleanupWorker, ExtractionWorker, KnowledgeBaseIndexer};
use crate::infrastructure::messaging::MpscEventReceiver;

#[derive(Debug)]
pub enum DispatchError {
    Extraction(ExtractionWorkerError),
    Cleanup(CleanupWorkerError),
    Indexing(IndexingError),
}

impl DispatchError {
    pub fn is_retryable(&self) -> bool {
        match self {
            DispatchError::Extraction(e) => e.is_retryable(),
            DispatchError::Cleanup(e) => e.is_retryable(),
            DispatchError::Indexing(e) => e.is_retryable(),
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::Extraction(e) => write!(f, "Extraction worker: {}", e),
            DispatchError::Cleanup(e) => write!(f, "Cleanup worker: {}", e),
            DispatchError::Indexing(e) => write!(f, "Indexer: {}", e),
        }
    }
}

impl std::error::Error for DispatchError {}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Extracted(ExtractionOutcome),
    CleanedUp(CleanupOutcome),
    Indexed(usize),
}

/// Routes workflow notifications to the workers. Retries of retryable
/// failures happen here, with exponential backoff, never inside a worker.
pub struct EventDispatcher {
    receiver: Arc<MpscEventReceiver>,
    publisher: Arc<dyn EventPublisher>,
    extraction_worker: Arc<ExtractionWorker>,
    cleanup_worker: Arc<CleanupWorker>,
    indexer: Arc<KnowledgeBaseIndexer>,
    worker_count: usize,
    max_attempts: u32,
    base_delay: Duration,
}

impl EventDispatcher {
    pub fn new(
        receiver: Arc<MpscEventReceiver>,
        publisher: Arc<dyn EventPublisher>,
        extraction_worker: Arc<ExtractionWorker>,
        cleanup_worker: Arc<CleanupWorker>,
        indexer: Arc<KnowledgeBaseIndexer>,
    ) -> Self {
        Self {
            receiver,
            publisher,
            extraction_worker,
            cleanup_worker,
            indexer,
            worker_count: 3,
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }

    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count.max(1);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            "Starting event dispatcher with {} workers",
            self.worker_count
        );

        let mut handles = Vec::with_capacity(self.worker_count);
        for worker_id in 0..self.worker_count {
            let dispatcher = self.clone();
            handles.push(tokio::spawn(async move {
                dispatcher.worker_loop(worker_id).await;
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                error!("Dispatcher worker {} panicked: {}", i, e);
            }
        }

        info!("Event dispatcher stopped");
    }

    async fn worker_loop(&self, worker_id: usize) {
        debug!("Dispatcher worker {} started", worker_id);

        while let Some(event) = self.receiver.recv().await {
            debug!(
                "Worker {} handling {} (attempt {})",
                worker_id,
                event.event.kind(),
                event.attempt
            );
            self.handle(event).await;
        }

        debug!("Dispatcher worker {} stopped", worker_id);
    }

    async fn handle(&self, event: QueuedEvent) {
        let error = match self.dispatch(&event.event).await {
            Ok(outcome) => {
                debug!("Event {} done: {:?}", event.id, outcome);
                return;
            }
            Err(e) => e,
        };

        if !error.is_retryable() {
            warn!(
                "Dropping {} event {}: {}",
                event.event.kind(),
                event.id,
                error
            );
            self.receiver.record_dropped().await;
            return;
        }

        if event.attempt >= self.max_attempts {
            error!(
                "Giving up on {} event {} after {} attempts: {}",
                event.event.kind(),
                event.id,
                event.attempt,
                error
            );
            self.receiver.record_dropped().await;
            return;
        }

        let delay = self.backoff(event.attempt);
        warn!(
            "{} event {} failed (attempt {}), retrying in {:?}: {}",
            event.event.kind(),
            event.id,
            event.attempt,
            delay,
            error
        );
        if let Err(e) = self.publisher.redeliver(event, delay).await {
            error!("Could not schedule redelivery: {}", e);
        }
    }

    pub async fn dispatch(&self, event: &WorkflowEvent) -> Result<DispatchOutcome, DispatchError> {
        match event {
            WorkflowEvent::ObjectCreated { key } => self
                .extraction_worker
                .handle_object_created(key)
                .await
                .map(DispatchOutcome::Extracted)
                .map_err(DispatchError::Extraction),
            WorkflowEvent::ObjectRemoved { key } => self
                .cleanup_worker
                .handle_object_removed(key)
                .await
                .map(DispatchOutcome::CleanedUp)
                .map_err(DispatchError::Cleanup),
            WorkflowEvent::IndexDocument { document_id } => self
                .indexer
                .index_document(*document_id)
                .await
                .map(DispatchOutcome::Indexed)
                .map_err(DispatchError::Indexing),
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ObjectStore;
    use crate::application::ports::document_extractor::DocumentExtractionError;
    use crate::application::use_cases::upload_file::UploadFileRequest;
    use crate::domain::repositories::{ProcessedDocumentRepository, UploadedFileRepository};
    use crate::domain::value_objects::WorkflowStage;
    use crate::testing::{TestApp, eventually};

    async fn upload(app: &TestApp, text: &str) -> String {
        app.container
            .upload_file_use_case
            .execute(UploadFileRequest {
                patient_id: "patient1".to_string(),
                category: "labs".to_string(),
                filename: "panel.txt".to_string(),
                content_type: Some("text/plain".to_string()),
                data: text.as_bytes().to_vec(),
            })
            .await
            .unwrap()
            .file_id
    }

    async fn stage_of(app: &TestApp, file_id: &str) -> Option<WorkflowStage> {
        UploadedFileRepository::find_by_file_id(app.records.as_ref(), file_id)
            .await
            .unwrap()
            .map(|f| f.stage())
    }

    async fn wait_for_stage(app: &TestApp, file_id: &str, stage: Option<WorkflowStage>) {
        eventually(move || async move { stage_of(app, file_id).await == stage }).await;
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let app = TestApp::new();
        let dispatcher = &app.container.event_dispatcher;

        assert_eq!(dispatcher.backoff(1), Duration::from_secs(1));
        assert_eq!(dispatcher.backoff(2), Duration::from_secs(2));
        assert_eq!(dispatcher.backoff(3), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_upload_is_extracted_and_indexed() {
        let app = TestApp::new();
        app.seed_patient("patient1").await;
        app.start_dispatcher();

        let file_id = upload(&app, "Total cholesterol 182 mg/dL").await;

        wait_for_stage(&app, &file_id, Some(WorkflowStage::Indexed)).await;
        assert_eq!(app.records.knowledge_base_len(), 1);
        assert!(
            app.store
                .keys()
                .contains(&"processed/patient1/panel/extracted_data.json".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_is_redelivered() {
        let app = TestApp::new();
        app.seed_patient("patient1").await;
        app.extractor
            .fail_next(DocumentExtractionError::ServiceUnavailable("busy".to_string()));
        app.start_dispatcher();

        let file_id = upload(&app, "Ferritin 54 ng/mL").await;

        wait_for_stage(&app, &file_id, Some(WorkflowStage::Indexed)).await;
        assert_eq!(app.extractor.calls(), 2);
        let health = app.container.event_dispatcher.publisher.health_check().await;
        assert_eq!(health.total_retried, 1);
    }

    #[tokio::test]
    async fn test_unknown_patient_is_dropped() {
        let app = TestApp::new();
        app.start_dispatcher();

        app.store
            .put_object("ghost/labs/f-9/panel.txt", b"orphan", None)
            .await
            .unwrap();

        let publisher = &app.container.event_dispatcher.publisher;
        eventually(move || async move {
            publisher.health_check().await.total_dropped == 1
        })
        .await;
        assert_eq!(app.extractor.calls(), 0);
        assert_eq!(publisher.health_check().await.total_retried, 0);
    }

    #[tokio::test]
    async fn test_deleting_raw_object_cleans_up() {
        let app = TestApp::new();
        app.seed_patient("patient1").await;
        app.start_dispatcher();

        let file_id = upload(&app, "Glucose 91 mg/dL").await;
        wait_for_stage(&app, &file_id, Some(WorkflowStage::Indexed)).await;

        let raw_key = format!("patient1/labs/{}/panel.txt", file_id);
        assert!(app.store.delete_object(&raw_key).await.unwrap());

        let app = &app;
        eventually(move || async move { app.store.keys().is_empty() }).await;
        eventually(move || async move {
            ProcessedDocumentRepository::count(app.records.as_ref())
                .await
                .unwrap()
                == 0
        })
        .await;
        assert_eq!(app.records.knowledge_base_len(), 0);
        wait_for_stage(&app, &file_id, None).await;
    }

    #[tokio::test]
    async fn test_deleting_one_same_named_upload_spares_the_other() {
        let app = TestApp::new();
        app.seed_patient("patient1").await;
        app.start_dispatcher();

        let first = upload(&app, "Hemoglobin 13.9 g/dL").await;
        wait_for_stage(&app, &first, Some(WorkflowStage::Indexed)).await;
        let second = upload(&app, "Hemoglobin 14.2 g/dL").await;
        wait_for_stage(&app, &second, Some(WorkflowStage::Indexed)).await;

        app.container
            .delete_uploaded_file_use_case
            .execute("patient1", &first)
            .await
            .unwrap();
        wait_for_stage(&app, &first, None).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        let second_key = format!("patient1/labs/{}/panel.txt", second);
        assert!(app.store.object_exists(&second_key).await.unwrap());
        assert!(
            app.store
                .object_exists("processed/patient1/panel/extracted_data.json")
                .await
                .unwrap()
        );
        assert_eq!(stage_of(&app, &second).await, Some(WorkflowStage::Indexed));
        let remaining = ProcessedDocumentRepository::find_by_file_id(app.records.as_ref(), &second)
            .await
            .unwrap();
        assert!(remaining.is_some());
        assert_eq!(
            ProcessedDocumentRepository::count(app.records.as_ref())
                .await
                .unwrap(),
            1
        );
        assert_eq!(app.records.knowledge_base_len(), 1);
    }
}
