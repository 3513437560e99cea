use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::ManageMedicsUseCase;
use crate::domain::entities::medic::MedicDetails;
use crate::presentation::http::dto::{
    ApiResponse, ListResponseDto, MedicResponseDto, MessageResponseDto, PaginationDto,
};
use crate::presentation::http::error::ApiFailure;

pub struct MedicHandler {
    medics: Arc<ManageMedicsUseCase>,
}

impl MedicHandler {
    pub fn new(medics: Arc<ManageMedicsUseCase>) -> Self {
        Self { medics }
    }

    pub async fn create_medic(
        State(handler): State<Arc<MedicHandler>>,
        payload: Result<Json<MedicDetails>, JsonRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Json(details) = payload?;
        let medic = handler.medics.create(details).await?;
        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(MedicResponseDto::from(medic))),
        ))
    }

    pub async fn list_medics(
        State(handler): State<Arc<MedicHandler>>,
        query: Result<Query<PaginationDto>, QueryRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Query(pagination) = query?;
        let page = handler.medics.list(pagination.skip, pagination.limit).await?;

        let dto: ListResponseDto<MedicResponseDto> = ListResponseDto::from_page(page);
        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }

    pub async fn get_medic(
        State(handler): State<Arc<MedicHandler>>,
        path: Result<Path<Uuid>, PathRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Path(medic_id) = path?;
        let medic = handler.medics.get(medic_id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MedicResponseDto::from(medic))),
        ))
    }

    pub async fn update_medic(
        State(handler): State<Arc<MedicHandler>>,
        path: Result<Path<Uuid>, PathRejection>,
        payload: Result<Json<MedicDetails>, JsonRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Path(medic_id) = path?;
        let Json(details) = payload?;
        let medic = handler.medics.update(medic_id, details).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MedicResponseDto::from(medic))),
        ))
    }

    pub async fn delete_medic(
        State(handler): State<Arc<MedicHandler>>,
        path: Result<Path<Uuid>, PathRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Path(medic_id) = path?;
        handler.medics.delete(medic_id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MessageResponseDto {
                message: format!("Medic {} deleted", medic_id),
            })),
        ))
    }
}
