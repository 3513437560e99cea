use serde::{Deserialize, Serialize};

/// Lifecycle of an uploaded file: `uploaded → extracted → indexed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStage {
    Uploaded,
    Extracted,
    Indexed,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Uploaded => "uploaded",
            WorkflowStage::Extracted => "extracted",
            WorkflowStage::Indexed => "indexed",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "uploaded" => Ok(WorkflowStage::Uploaded),
            "extracted" => Ok(WorkflowStage::Extracted),
            "indexed" => Ok(WorkflowStage::Indexed),
            _ => Err(format!("Invalid workflow stage: {}", s)),
        }
    }

    /// Stages only move forward, one step at a time.
    pub fn can_advance_to(&self, next: WorkflowStage) -> bool {
        matches!(
            (self, next),
            (WorkflowStage::Uploaded, WorkflowStage::Extracted)
                | (WorkflowStage::Extracted, WorkflowStage::Indexed)
        )
    }
}

impl Default for WorkflowStage {
    fn default() -> Self {
        WorkflowStage::Uploaded
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_only() {
        assert!(WorkflowStage::Uploaded.can_advance_to(WorkflowStage::Extracted));
        assert!(WorkflowStage::Extracted.can_advance_to(WorkflowStage::Indexed));
        assert!(!WorkflowStage::Uploaded.can_advance_to(WorkflowStage::Indexed));
        assert!(!WorkflowStage::Indexed.can_advance_to(WorkflowStage::Extracted));
        assert!(!WorkflowStage::Extracted.can_advance_to(WorkflowStage::Extracted));
    }

    #[test]
    fn test_string_conversion() {
        for stage in [
            WorkflowStage::Uploaded,
            WorkflowStage::Extracted,
            WorkflowStage::Indexed,
        ] {
            assert_eq!(WorkflowStage::from_string(stage.as_str()).unwrap(), stage);
        }
        assert!(WorkflowStage::from_string("archived").is_err());
    }
}
