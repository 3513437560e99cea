use async_trait::async_trait;

#[derive(Debug)]
pub enum ObjectStoreError {
    ObjectNotFound(String),
    InvalidKey(String),
    PermissionDenied(String),
    IoError(String),
}

impl std::fmt::Display for ObjectStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectStoreError::ObjectNotFound(key) => write!(f, "Object not found: {}", key),
            ObjectStoreError::InvalidKey(key) => write!(f, "Invalid object key: {}", key),
            ObjectStoreError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            ObjectStoreError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ObjectStoreError {}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub uri: String,
    pub size: u64,
    pub content_type: Option<String>,
}

/// Key-addressed blob store. Implementations publish a notification for every
/// object written or removed.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        data: &[u8],
        content_type: Option<&str>,
    ) -> Result<StoredObject, ObjectStoreError>;

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError>;

    /// Returns `false` when the object was already absent.
    async fn delete_object(&self, key: &str) -> Result<bool, ObjectStoreError>;

    async fn object_exists(&self, key: &str) -> Result<bool, ObjectStoreError>;

    /// Keys under `prefix`, sorted.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, ObjectStoreError>;

    fn object_uri(&self, key: &str) -> String;
}
