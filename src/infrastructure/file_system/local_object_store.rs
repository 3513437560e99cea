use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use crate::application::ports::EventPublisher;
use crate::application::ports::event_queue::WorkflowEvent;
use crate::application::ports::object_store::{ObjectStore, ObjectStoreError, StoredObject};
use crate::domain::value_objects::object_key::s3_uri;

/// Filesystem-backed object store. Keys map to paths under `base_path`;
/// every write or delete is announced on the event channel.
pub struct LocalObjectStore {
    base_path: PathBuf,
    bucket: String,
    events: Option<Arc<dyn EventPublisher>>,
}

impl LocalObjectStore {
    pub fn new(base_path: PathBuf, bucket: String) -> Self {
        Self {
            base_path,
            bucket,
            events: None,
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    pub async fn ensure_directory_exists(&self) -> Result<(), ObjectStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| ObjectStoreError::IoError(e.to_string()))
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        if key.is_empty()
            || key.starts_with('/')
            || key
                .split('/')
                .any(|s| s.is_empty() || s == "." || s == ".." || s.starts_with(".tmp-"))
        {
            return Err(ObjectStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(key))
    }

    async fn notify(&self, event: WorkflowEvent) {
        if let Some(events) = &self.events {
            if let Err(e) = events.publish(event).await {
                warn!("Object notification lost: {}", e);
            }
        }
    }

    /// Removes directories left empty by a delete, stopping at the store root.
    async fn prune_empty_parents(&self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == self.base_path || !dir.starts_with(&self.base_path) {
                break;
            }
            if fs::remove_dir(dir).await.is_err() {
                break;
            }
            current = dir.parent();
        }
    }

    async fn collect_keys(&self, dir: PathBuf, keys: &mut Vec<String>) -> Result<(), ObjectStoreError> {
        let mut pending = vec![dir];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(ObjectStoreError::IoError(e.to_string())),
            };

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| ObjectStoreError::IoError(e.to_string()))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| ObjectStoreError::IoError(e.to_string()))?;

                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    if entry.file_name().to_string_lossy().starts_with(".tmp-") {
                        continue;
                    }
                    if let Ok(relative) = path.strip_prefix(&self.base_path) {
                        let key = relative
                            .components()
                            .map(|c| c.as_os_str().to_string_lossy())
                            .collect::<Vec<_>>()
                            .join("/");
                        keys.push(key);
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_object(
        &self,
        key: &str,
        data: &[u8],
        content_type: Option<&str>,
    ) -> Result<StoredObject, ObjectStoreError> {
        let path = self.object_path(key)?;
        let parent = path
            .parent()
            .ok_or_else(|| ObjectStoreError::InvalidKey(key.to_string()))?;

        fs::create_dir_all(parent)
            .await
            .map_err(|e| ObjectStoreError::IoError(e.to_string()))?;

        // Readers never observe a partially written object.
        let temp_path = parent.join(format!(".tmp-{}", Uuid::new_v4()));
        fs::write(&temp_path, data)
            .await
            .map_err(|e| ObjectStoreError::IoError(e.to_string()))?;
        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| ObjectStoreError::IoError(e.to_string()))?;

        self.notify(WorkflowEvent::ObjectCreated {
            key: key.to_string(),
        })
        .await;

        Ok(StoredObject {
            key: key.to_string(),
            uri: self.object_uri(key),
            size: data.len() as u64,
            content_type: content_type.map(|s| s.to_string()),
        })
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let path = self.object_path(key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ObjectStoreError::ObjectNotFound(key.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Err(ObjectStoreError::PermissionDenied(e.to_string()))
            }
            Err(e) => Err(ObjectStoreError::IoError(e.to_string())),
        }
    }

    async fn delete_object(&self, key: &str) -> Result<bool, ObjectStoreError> {
        let path = self.object_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(ObjectStoreError::IoError(e.to_string())),
        }

        self.prune_empty_parents(&path).await;
        self.notify(WorkflowEvent::ObjectRemoved {
            key: key.to_string(),
        })
        .await;

        Ok(true)
    }

    async fn object_exists(&self, key: &str) -> Result<bool, ObjectStoreError> {
        let path = self.object_path(key)?;
        fs::try_exists(&path)
            .await
            .map_err(|e| ObjectStoreError::IoError(e.to_string()))
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, ObjectStoreError> {
        // Only walk the deepest directory the prefix pins down.
        let start = match prefix.rfind('/') {
            Some(idx) => self.base_path.join(&prefix[..idx]),
            None => self.base_path.clone(),
        };

        let mut keys = Vec::new();
        self.collect_keys(start, &mut keys).await?;
        keys.retain(|k| k.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }

    fn object_uri(&self, key: &str) -> String {
        s3_uri(&self.bucket, key)
    }
}
