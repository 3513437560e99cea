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

use crate::application::use_cases::ManageExamsUseCase;
use crate::domain::entities::exam::ExamDetails;
use crate::presentation::http::dto::{
    ApiResponse, ExamResponseDto, ListResponseDto, MessageResponseDto, PaginationDto,
};
use crate::presentation::http::error::ApiFailure;

pub struct ExamHandler {
    exams: Arc<ManageExamsUseCase>,
}

impl ExamHandler {
    pub fn new(exams: Arc<ManageExamsUseCase>) -> Self {
        Self { exams }
    }

    pub async fn create_exam(
        State(handler): State<Arc<ExamHandler>>,
        payload: Result<Json<ExamDetails>, JsonRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Json(details) = payload?;
        let exam = handler.exams.create(details).await?;
        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(ExamResponseDto::from(exam))),
        ))
    }

    pub async fn list_exams(
        State(handler): State<Arc<ExamHandler>>,
        query: Result<Query<PaginationDto>, QueryRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Query(pagination) = query?;
        let page = handler.exams.list(pagination.skip, pagination.limit).await?;

        let dto: ListResponseDto<ExamResponseDto> = ListResponseDto::from_page(page);
        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }

    pub async fn get_exam(
        State(handler): State<Arc<ExamHandler>>,
        path: Result<Path<Uuid>, PathRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Path(exam_id) = path?;
        let exam = handler.exams.get(exam_id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(ExamResponseDto::from(exam))),
        ))
    }

    pub async fn update_exam(
        State(handler): State<Arc<ExamHandler>>,
        path: Result<Path<Uuid>, PathRejection>,
        payload: Result<Json<ExamDetails>, JsonRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Path(exam_id) = path?;
        let Json(details) = payload?;
        let exam = handler.exams.update(exam_id, details).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(ExamResponseDto::from(exam))),
        ))
    }

    pub async fn delete_exam(
        State(handler): State<Arc<ExamHandler>>,
        path: Result<Path<Uuid>, PathRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Path(exam_id) = path?;
        handler.exams.delete(exam_id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MessageResponseDto {
                message: format!("Exam {} deleted", exam_id),
            })),
        ))
    }
}
