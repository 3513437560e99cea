use axum::{Router, extract::DefaultBodyLimit};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::infrastructure::messaging::EventDispatcher;
use crate::presentation::http::{
    handlers::{
        DocumentHandler, ExamHandler, MedicHandler, PatientHandler, ReservationHandler,
        SearchHandler, ToolHandler,
    },
    routes::{
        document_routes, exam_routes, health_routes, medic_routes, patient_routes,
        reservation_routes, search_routes, tool_routes,
    },
};

const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct HttpHandlers {
    pub patient_handler: Arc<PatientHandler>,
    pub medic_handler: Arc<MedicHandler>,
    pub exam_handler: Arc<ExamHandler>,
    pub reservation_handler: Arc<ReservationHandler>,
    pub document_handler: Arc<DocumentHandler>,
    pub search_handler: Arc<SearchHandler>,
    pub tool_handler: Arc<ToolHandler>,
}

pub fn build_router(handlers: HttpHandlers) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health_routes())
        .merge(patient_routes(handlers.patient_handler))
        .merge(medic_routes(handlers.medic_handler))
        .merge(exam_routes(handlers.exam_handler))
        .merge(reservation_routes(handlers.reservation_handler))
        .merge(document_routes(handlers.document_handler))
        .merge(search_routes(handlers.search_handler))
        .merge(tool_routes(handlers.tool_handler))
        .layer(cors)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .on_request(
                    |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                        tracing::info!("Received request: {} {}", request.method(), request.uri());
                    },
                )
                .on_response(
                    |response: &axum::http::Response<axum::body::Body>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            "Response: {} (took {} ms)",
                            response.status(),
                            latency.as_millis()
                        );
                    },
                )
                .on_failure(
                    |error: ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            "Request failed: {:?} (took {} ms)",
                            error,
                            latency.as_millis()
                        );
                    },
                ),
        )
}

pub struct HttpServer {
    handlers: HttpHandlers,
    event_dispatcher: Arc<EventDispatcher>,
    port: u16,
}

impl HttpServer {
    pub fn new(handlers: HttpHandlers, event_dispatcher: Arc<EventDispatcher>, port: u16) -> Self {
        Self {
            handlers,
            event_dispatcher,
            port,
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let event_dispatcher = self.event_dispatcher.clone();
        tokio::spawn(async move {
            event_dispatcher.start().await;
        });

        let app = build_router(self.handlers);
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));

        let listener = TcpListener::bind(addr).await?;
        info!("clinic-intake listening on {}", addr);
        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use chrono::Utc;

    use crate::domain::entities::ProcessedDocument;
    use crate::domain::repositories::ProcessedDocumentRepository;
    use crate::testing::{TestApp, eventually};

    async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn delete(app: &TestApp, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        send(app, request).await
    }

    fn multipart_upload(
        uri: &str,
        category: &str,
        filename: &str,
        content: &str,
    ) -> Request<Body> {
        let boundary = "intake-boundary";
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"category\"\r\n\r\n\
             {category}\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             {content}\r\n\
             --{b}--\r\n",
            b = boundary,
        );
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new();

        let (status, body) = get(&app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
        assert_eq!(body["data"]["service"], "clinic-intake");
    }

    #[tokio::test]
    async fn test_create_patient_validation() {
        let app = TestApp::new();

        let (status, body) = post_json(
            &app,
            "/patients",
            json!({
                "first_name": " ",
                "last_name": "Souza",
                "email": "not-an-email"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        let fields: Vec<&str> = body["error"]["field_errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"first_name"));
        assert!(fields.contains(&"email"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_validation_failure() {
        let app = TestApp::new();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/patients")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"first_name\":"))
            .unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_patient_lifecycle() {
        let app = TestApp::new();

        let (status, created) = post_json(
            &app,
            "/patients",
            json!({
                "id": "patient42",
                "first_name": "Lia",
                "last_name": "Mendes",
                "email": "Lia.Mendes@Example.test",
                "date_of_birth": "1990-02-17"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["email"], "lia.mendes@example.test");

        let (status, duplicate) = post_json(
            &app,
            "/patients",
            json!({
                "first_name": "Other",
                "last_name": "Person",
                "email": "lia.mendes@example.test"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(duplicate["error"]["code"], "CONFLICT");

        let (status, fetched) = get(&app, "/patients/patient42").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["last_name"], "Mendes");

        let (status, missing) = get(&app, "/patients/nobody").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_double_booking_is_rejected() {
        let app = TestApp::new();
        app.seed_patient("patient1").await;
        app.seed_patient("patient2").await;
        let medic = app.seed_medic("CRM-3003").await;
        let exam = app.seed_exam("Holter").await;
        let booking = |patient_id: &str| {
            json!({
                "patient_id": patient_id,
                "medic_id": medic.id(),
                "exam_id": exam.id(),
                "date": "2026-12-01",
                "time": "08:45"
            })
        };

        let (status, first) = post_json(&app, "/reservations", booking("patient1")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["data"]["time"], "08:45");

        let (status, second) = post_json(&app, "/reservations", booking("patient2")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(second["error"]["code"], "SLOT_ALREADY_BOOKED");
    }

    #[tokio::test]
    async fn test_medic_with_reservations_cannot_be_deleted() {
        let app = TestApp::new();
        app.seed_patient("patient1").await;
        let medic = app.seed_medic("CRM-4004").await;
        let exam = app.seed_exam("Audiometry").await;
        post_json(
            &app,
            "/reservations",
            json!({
                "patient_id": "patient1",
                "medic_id": medic.id(),
                "exam_id": exam.id(),
                "date": "2026-12-02",
                "time": "11:00"
            }),
        )
        .await;

        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/medics/{}", medic.id()))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "RESTRICTED");
    }

    #[tokio::test]
    async fn test_exam_with_reservations_cannot_be_deleted() {
        let app = TestApp::new();
        app.seed_patient("patient1").await;
        let medic = app.seed_medic("CRM-4005").await;
        let exam = app.seed_exam("Spirometry").await;
        let (status, _) = post_json(
            &app,
            "/reservations",
            json!({
                "patient_id": "patient1",
                "medic_id": medic.id(),
                "exam_id": exam.id(),
                "date": "2026-12-03",
                "time": "09:30"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let exam_uri = format!("/exams/{}", exam.id());
        let (status, body) = delete(&app, &exam_uri).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "RESTRICTED");

        let (status, fetched) = get(&app, &exam_uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["name"], "Spirometry");
    }

    #[tokio::test]
    async fn test_deleting_patient_cascades_reservations() {
        let app = TestApp::new();
        app.seed_patient("patient1").await;
        let medic = app.seed_medic("CRM-4006").await;
        let exam = app.seed_exam("Echocardiogram").await;
        let (status, booked) = post_json(
            &app,
            "/reservations",
            json!({
                "patient_id": "patient1",
                "medic_id": medic.id(),
                "exam_id": exam.id(),
                "date": "2026-12-04",
                "time": "14:15"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let reservation_id = booked["data"]["id"].as_str().unwrap().to_string();

        let document = ProcessedDocument::new(
            "patient1".to_string(),
            "f-1".to_string(),
            json!({ "content": "ECG sinus rhythm" }),
            "s3://clinic-intake/patient1/labs/f-1/ecg.txt".to_string(),
            "s3://clinic-intake/processed/patient1/ecg/extracted_data.json".to_string(),
            Utc::now(),
        );
        app.records.insert_if_absent(&document).await.unwrap();

        let (status, _) = delete(&app, "/patients/patient1").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(&app, &format!("/reservations/{}", reservation_id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (status, listed) = get(&app, "/reservations?patient_id=patient1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["data"]["meta"]["total"], 0);

        // The document outlives its patient, detached.
        let (status, kept) =
            get(&app, &format!("/documents/{}", document.document_id())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(kept["data"]["patient_id"].is_null());
    }

    #[tokio::test]
    async fn test_bad_uuid_path_is_a_validation_failure() {
        let app = TestApp::new();

        let (status, body) = get(&app, "/medics/not-a-uuid").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_status_of_unknown_document() {
        let app = TestApp::new();

        let (status, body) = get(&app, "/documents/status/missing-file").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_upload_to_unknown_patient() {
        let app = TestApp::new();

        let (status, body) = send(
            &app,
            multipart_upload("/patients/ghost/files", "labs", "cbc.txt", "Hb 14"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert!(app.store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_upload_flows_to_search() {
        let app = TestApp::new();
        app.seed_patient("patient1").await;
        app.start_dispatcher();

        let (status, uploaded) = send(
            &app,
            multipart_upload(
                "/patients/patient1/files",
                "labs",
                "thyroid.txt",
                "TSH 2.1 mIU/L within reference range",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(uploaded["data"]["workflow_stage"], "uploaded");
        let file_id = uploaded["data"]["file_id"].as_str().unwrap().to_string();
        let status_uri = format!("/documents/status/{}", file_id);

        let app = &app;
        let status_uri = status_uri.as_str();
        eventually(move || async move {
            let (_, body) = get(app, status_uri).await;
            body["data"]["stage"] == "indexed"
        })
        .await;

        let (status, body) = get(app, status_uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "completed");
        assert!(body["data"]["document_id"].is_string());

        let search_uri = "/knowledge-base/search?q=TSH%20reference&limit=5";
        let (status, results) = get(app, search_uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(results["data"]["total_results"], 1);
        assert_eq!(
            results["data"]["results"][0]["document_id"],
            body["data"]["document_id"]
        );

        let (status, documents) = get(app, "/documents?patient_id=patient1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(documents["data"]["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn test_search_needs_a_query() {
        let app = TestApp::new();

        let (status, body) = get(&app, "/knowledge-base/search?q=%20").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_search_with_embeddings_down() {
        let app = TestApp::new();
        app.embeddings.set_unavailable(true);

        let (status, body) = get(&app, "/knowledge-base/search?q=ferritin").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "UPSTREAM_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_tools_listing_and_unknown_tool() {
        let app = TestApp::new();

        let (status, body) = get(&app, "/tools").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["source"], "local");
        assert_eq!(body["data"]["tools"].as_array().unwrap().len(), 3);

        let (status, body) = post_json(&app, "/tools/drop_tables/invoke", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
