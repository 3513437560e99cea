use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 of an uploaded file's bytes, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileChecksum(String);

impl FileChecksum {
    pub fn new(hash: String) -> Result<Self, String> {
        if hash.len() != 64 {
            return Err("Checksum must be 64 characters long (SHA-256)".to_string());
        }

        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("Checksum must contain only hexadecimal characters".to_string());
        }

        Ok(Self(hash.to_lowercase()))
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileChecksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
