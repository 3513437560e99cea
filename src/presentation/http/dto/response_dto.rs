use serde::{Deserialize, Serialize};

use crate::application::use_cases::record_error::Page;
use crate::domain::value_objects::FieldError;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(code: String, message: String, field_errors: Option<Vec<FieldError>>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message,
                field_errors,
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponseDto {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PaginationDto {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct PaginationMetaDto {
    pub skip: i64,
    pub limit: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct ListResponseDto<T> {
    pub items: Vec<T>,
    pub meta: PaginationMetaDto,
}

impl<T> ListResponseDto<T> {
    pub fn from_page<E>(page: Page<E>) -> Self
    where
        T: From<E>,
    {
        Self {
            items: page.items.into_iter().map(T::from).collect(),
            meta: PaginationMetaDto {
                skip: page.skip,
                limit: page.limit,
                total: page.total_count,
            },
        }
    }
}
