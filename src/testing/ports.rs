use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pgvector::Vector;
use serde_json::json;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedDocument, ExtractionRequest,
};
use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
};
use crate::application::ports::event_queue::{EventPublisher, WorkflowEvent};
use crate::application::ports::object_store::{ObjectStore, ObjectStoreError, StoredObject};
use crate::application::ports::tool_gateway::{ToolDescriptor, ToolGateway, ToolGatewayError};
use crate::domain::entities::knowledge_base_entry::EMBEDDING_DIMENSION;
use crate::domain::value_objects::object_key::s3_uri;

pub const TEST_BUCKET: &str = "clinic-intake";

/// Object store held in a map. Announces writes and deletes like the
/// filesystem store when given a publisher.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Arc<dyn EventPublisher>) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            events: Some(events),
        }
    }

    /// Writes without announcing, as if the object predated the listener.
    pub fn seed(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    async fn notify(&self, event: WorkflowEvent) {
        if let Some(events) = &self.events {
            events.publish(event).await.unwrap();
        }
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(
        &self,
        key: &str,
        data: &[u8],
        content_type: Option<&str>,
    ) -> Result<StoredObject, ObjectStoreError> {
        self.seed(key, data);
        self.notify(WorkflowEvent::ObjectCreated {
            key: key.to_string(),
        })
        .await;
        Ok(StoredObject {
            key: key.to_string(),
            uri: self.object_uri(key),
            size: data.len() as u64,
            content_type: content_type.map(str::to_string),
        })
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| ObjectStoreError::ObjectNotFound(key.to_string()))
    }

    async fn delete_object(&self, key: &str) -> Result<bool, ObjectStoreError> {
        let removed = self.objects.lock().unwrap().remove(key).is_some();
        if removed {
            self.notify(WorkflowEvent::ObjectRemoved {
                key: key.to_string(),
            })
            .await;
        }
        Ok(removed)
    }

    async fn object_exists(&self, key: &str) -> Result<bool, ObjectStoreError> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, ObjectStoreError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn object_uri(&self, key: &str) -> String {
        s3_uri(TEST_BUCKET, key)
    }
}

/// Returns the document's bytes as text under `content`, or a queued failure.
#[derive(Default)]
pub struct FakeExtractor {
    failures: Mutex<Vec<DocumentExtractionError>>,
    calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, error: DocumentExtractionError) {
        self.failures.lock().unwrap().push(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentExtractor for FakeExtractor {
    async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractedDocument, DocumentExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.lock().unwrap().pop() {
            return Err(error);
        }
        Ok(ExtractedDocument {
            data: json!({
                "filename": request.filename,
                "content": String::from_utf8_lossy(&request.data),
            }),
            page_count: Some(1),
            model: Some("fake".to_string()),
        })
    }

    fn supported_formats(&self) -> Vec<String> {
        vec!["application/pdf".to_string()]
    }

    fn can_extract(&self, _content_type: &str) -> bool {
        true
    }

    fn max_file_size(&self) -> Option<usize> {
        None
    }
}

/// Bag-of-letters embedding: texts sharing vocabulary land close together.
#[derive(Default)]
pub struct FakeEmbeddings {
    unavailable: std::sync::atomic::AtomicBool,
}

impl FakeEmbeddings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn embed(text: &str) -> Vector {
        let mut values = vec![0.0f32; EMBEDDING_DIMENSION];
        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            let bucket = word
                .bytes()
                .fold(7usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize))
                % EMBEDDING_DIMENSION;
            values[bucket] += 1.0;
        }
        Vector::from(values)
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddings {
    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(EmbeddingProviderError::ServiceUnavailable);
        }
        Ok(BatchEmbeddingResponse {
            embeddings: request.texts.iter().map(|t| Self::embed(t)).collect(),
            model_name: request.model_name.unwrap_or_else(|| "fake".to_string()),
        })
    }

    fn model_info(&self) -> (String, Option<String>) {
        ("fake".to_string(), None)
    }

    fn embedding_dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}

pub enum FakeGateway {
    Tools(Vec<ToolDescriptor>),
    Down,
}

#[async_trait]
impl ToolGateway for FakeGateway {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolGatewayError> {
        match self {
            FakeGateway::Tools(tools) => Ok(tools.clone()),
            FakeGateway::Down => Err(ToolGatewayError::Unreachable(
                "connection refused".to_string(),
            )),
        }
    }
}
