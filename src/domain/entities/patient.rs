use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::FieldErrors;
use crate::domain::value_objects::object_key::PROCESSED_ROOT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    date_of_birth: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Mutable fields of a patient, shared by create and update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PatientDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl PatientDetails {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require_non_blank("first_name", &self.first_name);
        errors.require_non_blank("last_name", &self.last_name);
        errors.require_email("email", &self.email);
        if let Some(dob) = self.date_of_birth {
            if dob > Utc::now().date_naive() {
                errors.add("date_of_birth", "cannot be in the future");
            }
        }
        errors
    }
}

impl Patient {
    /// Patient ids double as the first segment of object keys, so they are
    /// restricted to characters that are safe in a path.
    pub fn new(id: Option<String>, details: PatientDetails) -> Result<Self, FieldErrors> {
        let mut errors = details.validate();

        let id = match id {
            Some(id) => {
                let id = id.trim().to_string();
                if id.is_empty()
                    || id == PROCESSED_ROOT
                    || !id
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
                {
                    errors.add("id", "must be non-empty and contain only [A-Za-z0-9_-]");
                }
                id
            }
            None => format!("patient-{}", Uuid::new_v4()),
        };

        errors.into_result()?;

        let now = Utc::now();
        Ok(Self {
            id,
            first_name: details.first_name.trim().to_string(),
            last_name: details.last_name.trim().to_string(),
            email: details.email.trim().to_lowercase(),
            phone: details.phone,
            date_of_birth: details.date_of_birth,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn from_database(
        id: String,
        first_name: String,
        last_name: String,
        email: String,
        phone: Option<String>,
        date_of_birth: Option<NaiveDate>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            phone,
            date_of_birth,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn update_details(&mut self, details: PatientDetails) -> Result<(), FieldErrors> {
        details.validate().into_result()?;

        self.first_name = details.first_name.trim().to_string();
        self.last_name = details.last_name.trim().to_string();
        self.email = details.email.trim().to_lowercase();
        self.phone = details.phone;
        self.date_of_birth = details.date_of_birth;
        self.updated_at = Utc::now();
        Ok(())
    }
}
