//! HTTP response types and utilities
//!
//! Image endpoints answer with raw PNG bytes on success, plain text for
//! input problems and missing keys, and a small JSON body for generation
//! failures. JSON API endpoints use the [`ApiResponse`] envelope.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::AppError;

/// Output is fully determined by the request, so it may be cached forever
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";
pub const GENERATION_FAILED: &str = "Failed to generate image";

/// Body of a 500 from an image endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageErrorBody {
    pub error: String,
    pub details: String,
}

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
    /// Request timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create an error response with details
    pub fn error_with_details(message: String, details: HashMap<String, String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            details: Some(details),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// PNG bytes with the long-lived cache headers
pub fn png_response(png: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, IMMUTABLE_CACHE_CONTROL),
        ],
        png,
    )
        .into_response()
}

/// Helper function to convert an image result to an HTTP response
pub fn handle_image_result(result: Result<Vec<u8>, AppError>) -> Response {
    match result {
        Ok(png) => png_response(png),
        Err(error) => handle_error(error),
    }
}

/// Convert AppError to the image endpoint response shapes
pub fn handle_error(error: AppError) -> Response {
    match error {
        AppError::Validation { message } => (StatusCode::BAD_REQUEST, message).into_response(),
        AppError::NotFound { message } => (StatusCode::NOT_FOUND, message).into_response(),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ImageErrorBody {
                error: GENERATION_FAILED.to_string(),
                details: other.to_string(),
            }),
        )
            .into_response(),
    }
}

pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

/// Validation error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub field: String,
    pub message: String,
}

impl ValidationErrorResponse {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub fn validation_error(errors: Vec<ValidationErrorResponse>) -> impl IntoResponse {
    let mut details = HashMap::new();
    for error in &errors {
        details.insert(error.field.clone(), error.message.clone());
    }

    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error_with_details(
            "Validation failed".to_string(),
            details,
        )),
    )
}
