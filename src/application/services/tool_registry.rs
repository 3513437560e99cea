use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::ports::{ToolGateway, tool_gateway::ToolDescriptor};
use crate::application::use_cases::{
    ManagePatientsUseCase, ManageReservationsUseCase, UploadFileUseCase,
    record_error::RecordError,
    upload_file::{UploadFileError, UploadFileRequest},
};
use crate::domain::entities::reservation::ReservationDetails;
use crate::domain::value_objects::FieldErrors;

pub const LOOKUP_PATIENT: &str = "lookup_patient";
pub const UPLOAD_FILE: &str = "upload_file";
pub const CREATE_RESERVATION: &str = "create_reservation";

#[derive(Debug)]
pub enum ToolError {
    UnknownTool(String),
    InvalidInput(FieldErrors),
    Record(RecordError),
    Upload(UploadFileError),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::UnknownTool(name) => write!(f, "Unknown tool: {}", name),
            ToolError::InvalidInput(errors) => write!(f, "Invalid tool input: {}", errors),
            ToolError::Record(e) => write!(f, "{}", e),
            ToolError::Upload(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ToolError {}

impl From<RecordError> for ToolError {
    fn from(error: RecordError) -> Self {
        ToolError::Record(error)
    }
}

impl From<UploadFileError> for ToolError {
    fn from(error: UploadFileError) -> Self {
        ToolError::Upload(error)
    }
}

#[derive(Debug, Deserialize)]
struct LookupPatientInput {
    patient_id: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadFileInput {
    patient_id: String,
    category: String,
    filename: String,
    content: String,
    content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateReservationInput {
    patient_id: String,
    medic_id: Uuid,
    exam_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
    notes: Option<String>,
}

/// Capabilities offered to the conversational agent. Each tool validates its
/// input and delegates to the same use cases the HTTP API uses.
pub struct ToolRegistry {
    patients: Arc<ManagePatientsUseCase>,
    uploads: Arc<UploadFileUseCase>,
    reservations: Arc<ManageReservationsUseCase>,
}

impl ToolRegistry {
    pub fn new(
        patients: Arc<ManagePatientsUseCase>,
        uploads: Arc<UploadFileUseCase>,
        reservations: Arc<ManageReservationsUseCase>,
    ) -> Self {
        Self {
            patients,
            uploads,
            reservations,
        }
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        local_descriptors()
    }

    pub async fn invoke(&self, name: &str, input: Value) -> Result<Value, ToolError> {
        debug!("Invoking tool {}", name);
        match name {
            LOOKUP_PATIENT => self.lookup_patient(parse_input(input)?).await,
            UPLOAD_FILE => self.upload_file(parse_input(input)?).await,
            CREATE_RESERVATION => self.create_reservation(parse_input(input)?).await,
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    async fn lookup_patient(&self, input: LookupPatientInput) -> Result<Value, ToolError> {
        let patient = match (input.patient_id, input.email) {
            (Some(id), _) if !id.trim().is_empty() => self.patients.get(id.trim()).await?,
            (_, Some(email)) if !email.trim().is_empty() => {
                self.patients.find_by_email(&email).await?
            }
            _ => {
                return Err(ToolError::InvalidInput(FieldErrors::single(
                    "patient_id",
                    "either patient_id or email is required",
                )));
            }
        };

        Ok(json!({
            "patient_id": patient.id(),
            "first_name": patient.first_name(),
            "last_name": patient.last_name(),
            "email": patient.email(),
            "phone": patient.phone(),
            "date_of_birth": patient.date_of_birth(),
        }))
    }

    async fn upload_file(&self, input: UploadFileInput) -> Result<Value, ToolError> {
        let data = STANDARD.decode(input.content.trim()).map_err(|e| {
            ToolError::InvalidInput(FieldErrors::single(
                "content",
                &format!("must be base64: {}", e),
            ))
        })?;

        let response = self
            .uploads
            .execute(UploadFileRequest {
                patient_id: input.patient_id,
                category: input.category,
                filename: input.filename,
                content_type: input.content_type,
                data,
            })
            .await?;

        Ok(json!({
            "file_id": response.file_id,
            "s3_uri": response.s3_uri,
            "category": response.category,
            "workflow_stage": response.workflow_stage,
        }))
    }

    async fn create_reservation(&self, input: CreateReservationInput) -> Result<Value, ToolError> {
        let reservation = self
            .reservations
            .create(ReservationDetails {
                patient_id: input.patient_id,
                medic_id: input.medic_id,
                exam_id: input.exam_id,
                date: input.date,
                time: input.time,
                notes: input.notes,
            })
            .await?;

        Ok(json!({
            "reservation_id": reservation.id(),
            "patient_id": reservation.patient_id(),
            "medic_id": reservation.medic_id(),
            "exam_id": reservation.exam_id(),
            "date": reservation.date(),
            "time": reservation.time().format("%H:%M").to_string(),
            "notes": reservation.notes(),
        }))
    }
}

fn parse_input<T: for<'de> Deserialize<'de>>(input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input)
        .map_err(|e| ToolError::InvalidInput(FieldErrors::single("input", &e.to_string())))
}

fn local_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: LOOKUP_PATIENT.to_string(),
            description: "Look up a patient record by id or email".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "patient_id": {"type": "string"},
                    "email": {"type": "string", "format": "email"}
                }
            }),
            output_schema: json!({
                "type": "object",
                "properties": {
                    "patient_id": {"type": "string"},
                    "first_name": {"type": "string"},
                    "last_name": {"type": "string"},
                    "email": {"type": "string"},
                    "phone": {"type": ["string", "null"]},
                    "date_of_birth": {"type": ["string", "null"], "format": "date"}
                }
            }),
        },
        ToolDescriptor {
            name: UPLOAD_FILE.to_string(),
            description: "Store a patient document and start its extraction".to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["patient_id", "category", "filename", "content"],
                "properties": {
                    "patient_id": {"type": "string"},
                    "category": {"type": "string"},
                    "filename": {"type": "string"},
                    "content": {"type": "string", "contentEncoding": "base64"},
                    "content_type": {"type": "string"}
                }
            }),
            output_schema: json!({
                "type": "object",
                "properties": {
                    "file_id": {"type": "string"},
                    "s3_uri": {"type": "string"},
                    "category": {"type": "string"},
                    "workflow_stage": {"type": "string", "enum": ["uploaded", "extracted", "indexed"]}
                }
            }),
        },
        ToolDescriptor {
            name: CREATE_RESERVATION.to_string(),
            description: "Book an exam with a medic at a given date and time".to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["patient_id", "medic_id", "exam_id", "date", "time"],
                "properties": {
                    "patient_id": {"type": "string"},
                    "medic_id": {"type": "string", "format": "uuid"},
                    "exam_id": {"type": "string", "format": "uuid"},
                    "date": {"type": "string", "format": "date"},
                    "time": {"type": "string", "pattern": "^\\d{2}:\\d{2}(:00)?$"},
                    "notes": {"type": "string"}
                }
            }),
            output_schema: json!({
                "type": "object",
                "properties": {
                    "reservation_id": {"type": "string", "format": "uuid"},
                    "patient_id": {"type": "string"},
                    "medic_id": {"type": "string"},
                    "exam_id": {"type": "string"},
                    "date": {"type": "string"},
                    "time": {"type": "string"},
                    "notes": {"type": ["string", "null"]}
                }
            }),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolSource {
    Gateway,
    Local,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolListing {
    pub source: ToolSource,
    pub tools: Vec<ToolDescriptor>,
}

/// Advertised tool list: the gateway's when one is configured and answers,
/// otherwise the local descriptors.
pub struct ToolCatalog {
    gateway: Option<Arc<dyn ToolGateway>>,
}

impl ToolCatalog {
    pub fn new(gateway: Option<Arc<dyn ToolGateway>>) -> Self {
        Self { gateway }
    }

    pub async fn list_tools(&self) -> ToolListing {
        if let Some(gateway) = &self.gateway {
            match gateway.list_tools().await {
                Ok(tools) => {
                    return ToolListing {
                        source: ToolSource::Gateway,
                        tools,
                    };
                }
                Err(e) => warn!("Tool gateway failed, using local tools: {}", e),
            }
        }

        ToolListing {
            source: ToolSource::Local,
            tools: local_descriptors(),
        }
    }
}
