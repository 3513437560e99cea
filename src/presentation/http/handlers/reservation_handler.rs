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

use crate::application::use_cases::{
    ManageReservationsUseCase, manage_reservations::ReservationFilter,
};
use crate::domain::entities::reservation::ReservationDetails;
use crate::presentation::http::dto::{
    ApiResponse, ListResponseDto, MessageResponseDto, ReservationQueryDto,
    ReservationResponseDto,
};
use crate::presentation::http::error::ApiFailure;

pub struct ReservationHandler {
    reservations: Arc<ManageReservationsUseCase>,
}

impl ReservationHandler {
    pub fn new(reservations: Arc<ManageReservationsUseCase>) -> Self {
        Self { reservations }
    }

    /// 201 on success, 409 `SLOT_ALREADY_BOOKED` when the medic's slot is taken.
    pub async fn create_reservation(
        State(handler): State<Arc<ReservationHandler>>,
        payload: Result<Json<ReservationDetails>, JsonRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Json(details) = payload?;
        let reservation = handler.reservations.create(details).await?;
        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(ReservationResponseDto::from(
                reservation,
            ))),
        ))
    }

    pub async fn list_reservations(
        State(handler): State<Arc<ReservationHandler>>,
        query: Result<Query<ReservationQueryDto>, QueryRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Query(query) = query?;
        let filter = ReservationFilter {
            patient_id: query.patient_id,
            medic_id: query.medic_id,
            date: query.date,
        };
        let page = handler
            .reservations
            .list(filter, query.skip, query.limit)
            .await?;

        let dto: ListResponseDto<ReservationResponseDto> = ListResponseDto::from_page(page);
        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }

    pub async fn get_reservation(
        State(handler): State<Arc<ReservationHandler>>,
        path: Result<Path<Uuid>, PathRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Path(reservation_id) = path?;
        let reservation = handler.reservations.get(reservation_id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(ReservationResponseDto::from(
                reservation,
            ))),
        ))
    }

    pub async fn update_reservation(
        State(handler): State<Arc<ReservationHandler>>,
        path: Result<Path<Uuid>, PathRejection>,
        payload: Result<Json<ReservationDetails>, JsonRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Path(reservation_id) = path?;
        let Json(details) = payload?;
        let reservation = handler.reservations.update(reservation_id, details).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(ReservationResponseDto::from(
                reservation,
            ))),
        ))
    }

    pub async fn delete_reservation(
        State(handler): State<Arc<ReservationHandler>>,
        path: Result<Path<Uuid>, PathRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Path(reservation_id) = path?;
        handler.reservations.delete(reservation_id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MessageResponseDto {
                message: format!("Reservation {} deleted", reservation_id),
            })),
        ))
    }
}
