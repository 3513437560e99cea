use std::sync::Arc;

use tracing::info;

use crate::{
    application::{
        ports::{DocumentExtractor, EmbeddingProvider, EventPublisher, ObjectStore, ToolGateway},
        services::{CleanupWorker, ExtractionWorker, KnowledgeBaseIndexer, ToolCatalog, ToolRegistry},
        use_cases::{
            DeleteUploadedFileUseCase, GetDocumentStatusUseCase, ManageDocumentsUseCase,
            ManageExamsUseCase, ManageMedicsUseCase, ManagePatientsUseCase,
            ManageReservationsUseCase, SearchKnowledgeBaseUseCase, UploadFileUseCase,
        },
    },
    domain::repositories::{
        ExamRepository, KnowledgeBaseRepository, MedicRepository, PatientRepository,
        ProcessedDocumentRepository, ReservationRepository, UploadedFileRepository,
    },
    infrastructure::{
        config::AppConfig,
        database::{
            create_connection_pool,
            repositories::{
                PostgresExamRepository, PostgresKnowledgeBaseRepository, PostgresMedicRepository,
                PostgresPatientRepository, PostgresProcessedDocumentRepository,
                PostgresReservationRepository, PostgresUploadedFileRepository,
            },
            run_migrations,
        },
        external_services::{ExtractionServiceClient, HttpToolGateway, InferenceEmbeddingProvider},
        file_system::LocalObjectStore,
        messaging::{EventDispatcher, MpscEventQueue, MpscEventReceiver},
    },
    presentation::http::{
        HttpHandlers,
        handlers::{
            DocumentHandler, ExamHandler, MedicHandler, PatientHandler, ReservationHandler,
            SearchHandler, ToolHandler,
        },
    },
};

/// Everything the container needs from the outside world. Production wiring
/// fills it with Postgres and HTTP adapters.
pub struct Dependencies {
    pub patient_repository: Arc<dyn PatientRepository>,
    pub medic_repository: Arc<dyn MedicRepository>,
    pub exam_repository: Arc<dyn ExamRepository>,
    pub reservation_repository: Arc<dyn ReservationRepository>,
    pub uploaded_file_repository: Arc<dyn UploadedFileRepository>,
    pub processed_document_repository: Arc<dyn ProcessedDocumentRepository>,
    pub knowledge_base_repository: Arc<dyn KnowledgeBaseRepository>,
    pub object_store: Arc<dyn ObjectStore>,
    pub document_extractor: Arc<dyn DocumentExtractor>,
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub tool_gateway: Option<Arc<dyn ToolGateway>>,
}

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub bucket: String,
    pub workers: usize,
    pub max_attempts: u32,
}

pub struct AppContainer {
    // Workers
    pub extraction_worker: Arc<ExtractionWorker>,
    pub cleanup_worker: Arc<CleanupWorker>,
    pub knowledge_base_indexer: Arc<KnowledgeBaseIndexer>,
    pub event_dispatcher: Arc<EventDispatcher>,

    // Use Cases
    pub patients: Arc<ManagePatientsUseCase>,
    pub medics: Arc<ManageMedicsUseCase>,
    pub exams: Arc<ManageExamsUseCase>,
    pub reservations: Arc<ManageReservationsUseCase>,
    pub documents: Arc<ManageDocumentsUseCase>,
    pub upload_file_use_case: Arc<UploadFileUseCase>,
    pub delete_uploaded_file_use_case: Arc<DeleteUploadedFileUseCase>,
    pub document_status_use_case: Arc<GetDocumentStatusUseCase>,
    pub search_use_case: Arc<SearchKnowledgeBaseUseCase>,

    // Agent tools
    pub tool_registry: Arc<ToolRegistry>,
    pub tool_catalog: Arc<ToolCatalog>,

    // HTTP Handlers
    pub handlers: HttpHandlers,
}

impl AppContainer {
    pub async fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let db_pool = create_connection_pool(&config.database_url)?;
        let applied = run_migrations(&db_pool)?;
        info!("Applied {} pending migrations", applied);

        let (event_queue, event_receiver) = MpscEventQueue::create_pair();

        let object_store = LocalObjectStore::new(
            config.object_store_dir.clone(),
            config.object_store_bucket.clone(),
        )
        .with_events(Arc::new(event_queue.clone()));
        object_store.ensure_directory_exists().await?;

        let tool_gateway: Option<Arc<dyn ToolGateway>> = match config.gateway.effective_url() {
            Some(url) => Some(Arc::new(HttpToolGateway::new(url)?)),
            None => None,
        };

        let dependencies = Dependencies {
            patient_repository: Arc::new(PostgresPatientRepository::new(db_pool.clone())),
            medic_repository: Arc::new(PostgresMedicRepository::new(db_pool.clone())),
            exam_repository: Arc::new(PostgresExamRepository::new(db_pool.clone())),
            reservation_repository: Arc::new(PostgresReservationRepository::new(db_pool.clone())),
            uploaded_file_repository: Arc::new(PostgresUploadedFileRepository::new(
                db_pool.clone(),
            )),
            processed_document_repository: Arc::new(PostgresProcessedDocumentRepository::new(
                db_pool.clone(),
            )),
            knowledge_base_repository: Arc::new(PostgresKnowledgeBaseRepository::new(db_pool)),
            object_store: Arc::new(object_store),
            document_extractor: Arc::new(ExtractionServiceClient::from_url(
                config.extraction_service_url.clone(),
            )?),
            embedding_provider: Arc::new(InferenceEmbeddingProvider::from_url(
                config.embeddings_service_url.clone(),
            )?),
            tool_gateway,
        };

        let settings = DispatchSettings {
            bucket: config.object_store_bucket.clone(),
            workers: config.dispatch_workers,
            max_attempts: config.dispatch_max_attempts,
        };

        Ok(Self::assemble(dependencies, event_queue, event_receiver, settings))
    }

    pub fn assemble(
        deps: Dependencies,
        event_queue: MpscEventQueue,
        event_receiver: MpscEventReceiver,
        settings: DispatchSettings,
    ) -> Self {
        let event_publisher: Arc<dyn EventPublisher> = Arc::new(event_queue);

        let extraction_worker = Arc::new(ExtractionWorker::new(
            deps.object_store.clone(),
            deps.document_extractor.clone(),
            deps.patient_repository.clone(),
            deps.uploaded_file_repository.clone(),
            deps.processed_document_repository.clone(),
            event_publisher.clone(),
            settings.bucket.clone(),
        ));
        let cleanup_worker = Arc::new(CleanupWorker::new(
            deps.object_store.clone(),
            deps.uploaded_file_repository.clone(),
            deps.processed_document_repository.clone(),
            settings.bucket.clone(),
        ));
        let knowledge_base_indexer = Arc::new(KnowledgeBaseIndexer::new(
            deps.embedding_provider.clone(),
            deps.knowledge_base_repository.clone(),
            deps.processed_document_repository.clone(),
            deps.uploaded_file_repository.clone(),
        ));
        let event_dispatcher = Arc::new(
            EventDispatcher::new(
                Arc::new(event_receiver),
                event_publisher,
                extraction_worker.clone(),
                cleanup_worker.clone(),
                knowledge_base_indexer.clone(),
            )
            .with_worker_count(settings.workers)
            .with_max_attempts(settings.max_attempts),
        );

        // Use cases
        let patients = Arc::new(ManagePatientsUseCase::new(deps.patient_repository.clone()));
        let medics = Arc::new(ManageMedicsUseCase::new(deps.medic_repository.clone()));
        let exams = Arc::new(ManageExamsUseCase::new(deps.exam_repository.clone()));
        let reservations = Arc::new(ManageReservationsUseCase::new(
            deps.reservation_repository.clone(),
        ));
        let documents = Arc::new(ManageDocumentsUseCase::new(
            deps.processed_document_repository.clone(),
        ));
        let upload_file_use_case = Arc::new(UploadFileUseCase::new(
            deps.patient_repository.clone(),
            deps.uploaded_file_repository.clone(),
            deps.object_store.clone(),
            settings.bucket.clone(),
        ));
        let delete_uploaded_file_use_case = Arc::new(DeleteUploadedFileUseCase::new(
            deps.uploaded_file_repository.clone(),
            deps.object_store.clone(),
        ));
        let document_status_use_case = Arc::new(GetDocumentStatusUseCase::new(
            deps.uploaded_file_repository.clone(),
            deps.processed_document_repository.clone(),
        ));
        let search_use_case = Arc::new(SearchKnowledgeBaseUseCase::new(
            knowledge_base_indexer.clone(),
        ));

        let tool_registry = Arc::new(ToolRegistry::new(
            patients.clone(),
            upload_file_use_case.clone(),
            reservations.clone(),
        ));
        let tool_catalog = Arc::new(ToolCatalog::new(deps.tool_gateway));

        let handlers = HttpHandlers {
            patient_handler: Arc::new(PatientHandler::new(patients.clone())),
            medic_handler: Arc::new(MedicHandler::new(medics.clone())),
            exam_handler: Arc::new(ExamHandler::new(exams.clone())),
            reservation_handler: Arc::new(ReservationHandler::new(reservations.clone())),
            document_handler: Arc::new(DocumentHandler::new(
                upload_file_use_case.clone(),
                delete_uploaded_file_use_case.clone(),
                document_status_use_case.clone(),
                documents.clone(),
            )),
            search_handler: Arc::new(SearchHandler::new(search_use_case.clone())),
            tool_handler: Arc::new(ToolHandler::new(
                tool_catalog.clone(),
                tool_registry.clone(),
            )),
        };

        Self {
            extraction_worker,
            cleanup_worker,
            knowledge_base_indexer,
            event_dispatcher,
            patients,
            medics,
            exams,
            reservations,
            documents,
            upload_file_use_case,
            delete_uploaded_file_use_case,
            document_status_use_case,
            search_use_case,
            tool_registry,
            tool_catalog,
            handlers,
        }
    }
}
