use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{
    ManagePatientsUseCase, manage_patients::CreatePatientRequest,
};
use crate::domain::entities::patient::PatientDetails;
use crate::presentation::http::dto::{
    ApiResponse, CreatePatientDto, ListResponseDto, MessageResponseDto, PaginationDto,
    PatientResponseDto,
};
use crate::presentation::http::error::ApiFailure;

pub struct PatientHandler {
    patients: Arc<ManagePatientsUseCase>,
}

impl PatientHandler {
    pub fn new(patients: Arc<ManagePatientsUseCase>) -> Self {
        Self { patients }
    }

    pub async fn create_patient(
        State(handler): State<Arc<PatientHandler>>,
        payload: Result<Json<CreatePatientDto>, JsonRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Json(dto) = payload?;
        let patient = handler
            .patients
            .create(CreatePatientRequest {
                id: dto.id,
                details: dto.details,
            })
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(PatientResponseDto::from(patient))),
        ))
    }

    pub async fn list_patients(
        State(handler): State<Arc<PatientHandler>>,
        query: Result<Query<PaginationDto>, QueryRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Query(pagination) = query?;
        let page = handler
            .patients
            .list(pagination.skip, pagination.limit)
            .await?;

        let dto: ListResponseDto<PatientResponseDto> = ListResponseDto::from_page(page);
        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }

    pub async fn get_patient(
        State(handler): State<Arc<PatientHandler>>,
        Path(patient_id): Path<String>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let patient = handler.patients.get(&patient_id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(PatientResponseDto::from(patient))),
        ))
    }

    pub async fn update_patient(
        State(handler): State<Arc<PatientHandler>>,
        Path(patient_id): Path<String>,
        payload: Result<Json<PatientDetails>, JsonRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Json(details) = payload?;
        let patient = handler.patients.update(&patient_id, details).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(PatientResponseDto::from(patient))),
        ))
    }

    pub async fn delete_patient(
        State(handler): State<Arc<PatientHandler>>,
        Path(patient_id): Path<String>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        handler.patients.delete(&patient_id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MessageResponseDto {
                message: format!("Patient {} deleted", patient_id),
            })),
        ))
    }
}
