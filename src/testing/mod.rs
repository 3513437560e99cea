//! In-memory fakes and fixtures shared by unit and router tests.

pub mod ports;
pub mod repositories;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chrono::NaiveDate;

use crate::application::ports::ToolGateway;
use crate::domain::entities::exam::ExamDetails;
use crate::domain::entities::medic::MedicDetails;
use crate::domain::entities::patient::PatientDetails;
use crate::domain::entities::{Exam, Medic, Patient};
use crate::domain::repositories::{ExamRepository, MedicRepository, PatientRepository};
use crate::infrastructure::container::{AppContainer, Dependencies, DispatchSettings};
use crate::infrastructure::messaging::MpscEventQueue;
use crate::presentation::http::build_router;

pub use ports::{FakeEmbeddings, FakeExtractor, FakeGateway, InMemoryObjectStore, TEST_BUCKET};
pub use repositories::InMemoryRecords;

pub fn patient_details(email: &str) -> PatientDetails {
    PatientDetails {
        first_name: "Ana".to_string(),
        last_name: "Souza".to_string(),
        email: email.to_string(),
        phone: Some("+55 11 5555-0100".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 4, 12),
    }
}

pub fn medic_details(license_number: &str) -> MedicDetails {
    MedicDetails {
        first_name: "Rui".to_string(),
        last_name: "Costa".to_string(),
        specialty: "Cardiology".to_string(),
        license_number: license_number.to_string(),
        email: format!("{}@clinic.test", license_number.to_lowercase()),
        phone: None,
    }
}

pub fn exam_details(name: &str) -> ExamDetails {
    ExamDetails {
        name: name.to_string(),
        description: None,
        duration_minutes: 30,
        preparation_instructions: Some("Fast for 8 hours".to_string()),
    }
}

/// Fully wired application over in-memory adapters.
pub struct TestApp {
    pub records: Arc<InMemoryRecords>,
    pub store: Arc<InMemoryObjectStore>,
    pub extractor: Arc<FakeExtractor>,
    pub embeddings: Arc<FakeEmbeddings>,
    pub container: AppContainer,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_gateway(None)
    }

    pub fn with_gateway(tool_gateway: Option<Arc<dyn ToolGateway>>) -> Self {
        let (queue, receiver) = MpscEventQueue::create_pair();
        let records = Arc::new(InMemoryRecords::new());
        let store = Arc::new(InMemoryObjectStore::with_events(Arc::new(queue.clone())));
        let extractor = Arc::new(FakeExtractor::new());
        let embeddings = Arc::new(FakeEmbeddings::new());

        let dependencies = Dependencies {
            patient_repository: records.clone(),
            medic_repository: records.clone(),
            exam_repository: records.clone(),
            reservation_repository: records.clone(),
            uploaded_file_repository: records.clone(),
            processed_document_repository: records.clone(),
            knowledge_base_repository: records.clone(),
            object_store: store.clone(),
            document_extractor: extractor.clone(),
            embedding_provider: embeddings.clone(),
            tool_gateway,
        };

        let container = AppContainer::assemble(
            dependencies,
            queue,
            receiver,
            DispatchSettings {
                bucket: TEST_BUCKET.to_string(),
                workers: 2,
                max_attempts: 3,
            },
        );

        Self {
            records,
            store,
            extractor,
            embeddings,
            container,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.container.handlers.clone())
    }

    pub fn start_dispatcher(&self) {
        let dispatcher = self.container.event_dispatcher.clone();
        tokio::spawn(async move {
            dispatcher.start().await;
        });
    }

    pub async fn seed_patient(&self, id: &str) -> Patient {
        let patient = Patient::new(
            Some(id.to_string()),
            patient_details(&format!("{}@example.test", id)),
        )
        .unwrap();
        PatientRepository::save(self.records.as_ref(), &patient)
            .await
            .unwrap();
        patient
    }

    pub async fn seed_medic(&self, license_number: &str) -> Medic {
        let medic = Medic::new(medic_details(license_number)).unwrap();
        MedicRepository::save(self.records.as_ref(), &medic)
            .await
            .unwrap();
        medic
    }

    pub async fn seed_exam(&self, name: &str) -> Exam {
        let exam = Exam::new(exam_details(name)).unwrap();
        ExamRepository::save(self.records.as_ref(), &exam)
            .await
            .unwrap();
        exam
    }
}

/// Polls `check` until it holds, failing the test after two seconds.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within two seconds");
}
