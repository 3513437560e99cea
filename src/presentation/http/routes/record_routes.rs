use axum::{Router, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::{
    ExamHandler, MedicHandler, PatientHandler, ReservationHandler,
};

pub fn patient_routes(handler: Arc<PatientHandler>) -> Router {
    Router::new()
        .route(
            "/patients",
            get(PatientHandler::list_patients).post(PatientHandler::create_patient),
        )
        .route(
            "/patients/{patient_id}",
            get(PatientHandler::get_patient)
                .put(PatientHandler::update_patient)
                .delete(PatientHandler::delete_patient),
        )
        .with_state(handler)
}

pub fn medic_routes(handler: Arc<MedicHandler>) -> Router {
    Router::new()
        .route(
            "/medics",
            get(MedicHandler::list_medics).post(MedicHandler::create_medic),
        )
        .route(
            "/medics/{medic_id}",
            get(MedicHandler::get_medic)
                .put(MedicHandler::update_medic)
                .delete(MedicHandler::delete_medic),
        )
        .with_state(handler)
}

pub fn exam_routes(handler: Arc<ExamHandler>) -> Router {
    Router::new()
        .route(
            "/exams",
            get(ExamHandler::list_exams).post(ExamHandler::create_exam),
        )
        .route(
            "/exams/{exam_id}",
            get(ExamHandler::get_exam)
                .put(ExamHandler::update_exam)
                .delete(ExamHandler::delete_exam),
        )
        .with_state(handler)
}

pub fn reservation_routes(handler: Arc<ReservationHandler>) -> Router {
    Router::new()
        .route(
            "/reservations",
            get(ReservationHandler::list_reservations)
                .post(ReservationHandler::create_reservation),
        )
        .route(
            "/reservations/{reservation_id}",
            get(ReservationHandler::get_reservation)
                .put(ReservationHandler::update_reservation)
                .delete(ReservationHandler::delete_reservation),
        )
        .with_state(handler)
}
