use serde::{Deserialize, Serialize};

/// Processing status reported by the document-status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Uploaded,
    Processing,
    Completed,
    Failed(String),
}

impl DocumentStatus {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, DocumentStatus::Uploaded)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, DocumentStatus::Processing)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, DocumentStatus::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DocumentStatus::Failed(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Failed(_))
    }

    pub fn can_transition_to(&self, new_status: &DocumentStatus) -> bool {
        match (self, new_status) {
            (DocumentStatus::Uploaded, DocumentStatus::Processing) => true,
            (DocumentStatus::Processing, DocumentStatus::Completed) => true,
            (DocumentStatus::Processing, DocumentStatus::Failed(_)) => true,
            (DocumentStatus::Failed(_), DocumentStatus::Processing) => true, // retry
            _ => false,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            DocumentStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Uploaded => "uploaded",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Failed(_) => "failed", // error text lives in error_message
        }
    }

    /// Rebuilds a status from its stored name and the separate error column.
    pub fn from_parts(status: &str, error_message: Option<&str>) -> Result<Self, String> {
        match status.to_lowercase().as_str() {
            "uploaded" => Ok(DocumentStatus::Uploaded),
            "processing" => Ok(DocumentStatus::Processing),
            "completed" => Ok(DocumentStatus::Completed),
            "failed" => Ok(DocumentStatus::Failed(
                error_message.unwrap_or("Unknown error").to_string(),
            )),
            _ => Err(format!("Invalid document status: {}", status)),
        }
    }
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Uploaded
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
