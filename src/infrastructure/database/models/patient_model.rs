use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::entities::Patient;
use crate::infrastructure::database::schema::patients;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PatientModel {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct NewPatientModel {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Patient> for NewPatientModel {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id().to_string(),
            first_name: patient.first_name().to_string(),
            last_name: patient.last_name().to_string(),
            email: patient.email().to_string(),
            phone: patient.phone().map(str::to_string),
            date_of_birth: patient.date_of_birth(),
            created_at: patient.created_at(),
            updated_at: patient.updated_at(),
        }
    }
}

impl From<PatientModel> for Patient {
    fn from(model: PatientModel) -> Self {
        Patient::from_database(
            model.id,
            model.first_name,
            model.last_name,
            model.email,
            model.phone,
            model.date_of_birth,
            model.created_at,
            model.updated_at,
        )
    }
}
