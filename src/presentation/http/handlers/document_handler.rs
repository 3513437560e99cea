use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::{
    DeleteUploadedFileUseCase, GetDocumentStatusUseCase, ManageDocumentsUseCase,
    UploadFileUseCase, upload_file::UploadFileRequest,
};
use crate::presentation::http::dto::{
    ApiResponse, DocumentQueryDto, DocumentStatusDto, ListResponseDto, MessageResponseDto,
    ProcessedDocumentDto, UploadResponseDto,
};
use crate::presentation::http::error::ApiFailure;

pub struct DocumentHandler {
    upload_use_case: Arc<UploadFileUseCase>,
    delete_upload_use_case: Arc<DeleteUploadedFileUseCase>,
    status_use_case: Arc<GetDocumentStatusUseCase>,
    documents: Arc<ManageDocumentsUseCase>,
}

impl DocumentHandler {
    pub fn new(
        upload_use_case: Arc<UploadFileUseCase>,
        delete_upload_use_case: Arc<DeleteUploadedFileUseCase>,
        status_use_case: Arc<GetDocumentStatusUseCase>,
        documents: Arc<ManageDocumentsUseCase>,
    ) -> Self {
        Self {
            upload_use_case,
            delete_upload_use_case,
            status_use_case,
            documents,
        }
    }

    /// Multipart form with a `category` text field and a `file` part.
    pub async fn upload_file(
        State(handler): State<Arc<DocumentHandler>>,
        Path(patient_id): Path<String>,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let mut category = None;
        let mut file = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiFailure::bad_request("body", &e.body_text()))?
        {
            match field.name() {
                Some("category") => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiFailure::bad_request("category", &e.body_text()))?;
                    category = Some(value);
                }
                Some("file") => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(|ct| ct.to_string());
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| ApiFailure::bad_request("file", &e.body_text()))?
                        .to_vec();
                    file = Some((filename, content_type, data));
                }
                _ => {}
            }
        }

        let Some((filename, content_type, data)) = file else {
            return Err(ApiFailure::bad_request("file", "no file provided"));
        };

        let response = handler
            .upload_use_case
            .execute(UploadFileRequest {
                patient_id,
                category: category.unwrap_or_default(),
                filename,
                content_type,
                data,
            })
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(UploadResponseDto::from(response))),
        ))
    }

    pub async fn delete_file(
        State(handler): State<Arc<DocumentHandler>>,
        Path((patient_id, file_id)): Path<(String, String)>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        handler
            .delete_upload_use_case
            .execute(&patient_id, &file_id)
            .await?;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MessageResponseDto {
                message: format!("File {} deleted", file_id),
            })),
        ))
    }

    pub async fn get_status(
        State(handler): State<Arc<DocumentHandler>>,
        Path(id): Path<String>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let status = handler.status_use_case.execute(&id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(DocumentStatusDto::from(status))),
        ))
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
        query: Result<Query<DocumentQueryDto>, QueryRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Query(query) = query?;
        let page = handler
            .documents
            .list(query.patient_id.as_deref(), query.skip, query.limit)
            .await?;

        let dto: ListResponseDto<ProcessedDocumentDto> = ListResponseDto::from_page(page);
        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }

    pub async fn get_document(
        State(handler): State<Arc<DocumentHandler>>,
        path: Result<Path<Uuid>, PathRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Path(document_id) = path?;
        let document = handler.documents.get(document_id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(ProcessedDocumentDto::from(document))),
        ))
    }

    pub async fn delete_document(
        State(handler): State<Arc<DocumentHandler>>,
        path: Result<Path<Uuid>, PathRejection>,
    ) -> Result<impl IntoResponse, ApiFailure> {
        let Path(document_id) = path?;
        handler.documents.delete(document_id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(MessageResponseDto {
                message: format!("Document {} deleted", document_id),
            })),
        ))
    }
}
