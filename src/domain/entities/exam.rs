use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::FieldErrors;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    id: Uuid,
    name: String,
    description: Option<String>,
    duration_minutes: i32,
    preparation_instructions: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExamDetails {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub preparation_instructions: Option<String>,
}

impl ExamDetails {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require_non_blank("name", &self.name);
        if self.duration_minutes <= 0 {
            errors.add("duration_minutes", "must be greater than zero");
        }
        errors
    }
}

impl Exam {
    pub fn new(details: ExamDetails) -> Result<Self, FieldErrors> {
        details.validate().into_result()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: details.name.trim().to_string(),
            description: details.description,
            duration_minutes: details.duration_minutes,
            preparation_instructions: details.preparation_instructions,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn from_database(
        id: Uuid,
        name: String,
        description: Option<String>,
        duration_minutes: i32,
        preparation_instructions: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            duration_minutes,
            preparation_instructions,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    pub fn preparation_instructions(&self) -> Option<&str> {
        self.preparation_instructions.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn update_details(&mut self, details: ExamDetails) -> Result<(), FieldErrors> {
        details.validate().into_result()?;

        self.name = details.name.trim().to_string();
        self.description = details.description;
        self.duration_minutes = details.duration_minutes;
        self.preparation_instructions = details.preparation_instructions;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exam_duration_must_be_positive() {
        let errors = Exam::new(ExamDetails {
            name: "Blood panel".to_string(),
            description: None,
            duration_minutes: 0,
            preparation_instructions: Some("Fast for 8 hours".to_string()),
        })
        .unwrap_err();

        assert_eq!(errors.errors()[0].field, "duration_minutes");
    }
}
