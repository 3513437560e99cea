use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Exam;
use crate::infrastructure::database::schema::exams;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = exams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExamModel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub preparation_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = exams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct NewExamModel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub preparation_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Exam> for NewExamModel {
    fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id(),
            name: exam.name().to_string(),
            description: exam.description().map(str::to_string),
            duration_minutes: exam.duration_minutes(),
            preparation_instructions: exam.preparation_instructions().map(str::to_string),
            created_at: exam.created_at(),
            updated_at: exam.updated_at(),
        }
    }
}

impl From<ExamModel> for Exam {
    fn from(model: ExamModel) -> Self {
        Exam::from_database(
            model.id,
            model.name,
            model.description,
            model.duration_minutes,
            model.preparation_instructions,
            model.created_at,
            model.updated_at,
        )
    }
}
