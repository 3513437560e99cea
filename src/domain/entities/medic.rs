use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::FieldErrors;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medic {
    id: Uuid,
    first_name: String,
    last_name: String,
    specialty: String,
    license_number: String,
    email: String,
    phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MedicDetails {
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub license_number: String,
    pub email: String,
    pub phone: Option<String>,
}

impl MedicDetails {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require_non_blank("first_name", &self.first_name);
        errors.require_non_blank("last_name", &self.last_name);
        errors.require_non_blank("specialty", &self.specialty);
        errors.require_non_blank("license_number", &self.license_number);
        errors.require_email("email", &self.email);
        errors
    }
}

impl Medic {
    pub fn new(details: MedicDetails) -> Result<Self, FieldErrors> {
        details.validate().into_result()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            first_name: details.first_name.trim().to_string(),
            last_name: details.last_name.trim().to_string(),
            specialty: details.specialty.trim().to_string(),
            license_number: details.license_number.trim().to_uppercase(),
            email: details.email.trim().to_lowercase(),
            phone: details.phone,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn from_database(
        id: Uuid,
        first_name: String,
        last_name: String,
        specialty: String,
        license_number: String,
        email: String,
        phone: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            specialty,
            license_number,
            email,
            phone,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn specialty(&self) -> &str {
        &self.specialty
    }

    pub fn license_number(&self) -> &str {
        &self.license_number
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn update_details(&mut self, details: MedicDetails) -> Result<(), FieldErrors> {
        details.validate().into_result()?;

        self.first_name = details.first_name.trim().to_string();
        self.last_name = details.last_name.trim().to_string();
        self.specialty = details.specialty.trim().to_string();
        self.license_number = details.license_number.trim().to_uppercase();
        self.email = details.email.trim().to_lowercase();
        self.phone = details.phone;
        self.updated_at = Utc::now();
        Ok(())
    }
}
