use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Medic;
use crate::infrastructure::database::schema::medics;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = medics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MedicModel {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub license_number: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = medics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct NewMedicModel {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub license_number: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Medic> for NewMedicModel {
    fn from(medic: &Medic) -> Self {
        Self {
            id: medic.id(),
            first_name: medic.first_name().to_string(),
            last_name: medic.last_name().to_string(),
            specialty: medic.specialty().to_string(),
            license_number: medic.license_number().to_string(),
            email: medic.email().to_string(),
            phone: medic.phone().map(str::to_string),
            created_at: medic.created_at(),
            updated_at: medic.updated_at(),
        }
    }
}

impl From<MedicModel> for Medic {
    fn from(model: MedicModel) -> Self {
        Medic::from_database(
            model.id,
            model.first_name,
            model.last_name,
            model.specialty,
            model.license_number,
            model.email,
            model.phone,
            model.created_at,
            model.updated_at,
        )
    }
}
