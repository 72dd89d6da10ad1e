//! Link planning endpoint
//!
//! Clients that build a QR page first ask here where the image will live,
//! then point an `<img>` at the returned path.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};

use crate::config::defaults::{MAX_PLANNED_PIXEL_SIZE, MIN_PLANNED_PIXEL_SIZE};
use crate::models::{GenerateRequest, GenerationPayload, IconSource};
use crate::web::{
    AppState,
    responses::{ValidationErrorResponse, ok, validation_error},
};

/// `POST /api/qr/generate`
pub async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return validation_error(vec![ValidationErrorResponse::new(
                "body",
                rejection.body_text(),
            )])
            .into_response();
        }
    };

    let errors = validate(&request);
    if !errors.is_empty() {
        return validation_error(errors).into_response();
    }

    let icon = IconSource::from_parts(request.icon_url, request.icon_data);
    let payload = GenerationPayload::new(request.url, icon, request.size);
    ok(state.image_service.plan(payload).await).into_response()
}

fn validate(request: &GenerateRequest) -> Vec<ValidationErrorResponse> {
    let mut errors = Vec::new();

    if url::Url::parse(&request.url).is_err() {
        errors.push(ValidationErrorResponse::new("url", "Must be a valid URL"));
    }

    if let Some(icon_url) = request.icon_url.as_deref().filter(|u| !u.is_empty())
        && url::Url::parse(icon_url).is_err()
    {
        errors.push(ValidationErrorResponse::new("iconUrl", "Must be a valid URL"));
    }

    if let Some(size) = request.size
        && !(MIN_PLANNED_PIXEL_SIZE..=MAX_PLANNED_PIXEL_SIZE).contains(&size)
    {
        errors.push(ValidationErrorResponse::new(
            "size",
            format!("Must be between {MIN_PLANNED_PIXEL_SIZE} and {MAX_PLANNED_PIXEL_SIZE}"),
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, icon_url: Option<&str>, size: Option<i64>) -> GenerateRequest {
        GenerateRequest {
            url: url.to_string(),
            icon_url: icon_url.map(str::to_string),
            icon_data: None,
            size,
        }
    }

    #[test]
    fn test_accepts_well_formed_request() {
        assert!(validate(&request("https://example.com", None, None)).is_empty());
        assert!(validate(&request("https://example.com", Some("https://example.com/i.png"), Some(100))).is_empty());
        assert!(validate(&request("https://example.com", None, Some(1000))).is_empty());
    }

    #[test]
    fn test_rejects_each_bad_field() {
        let errors = validate(&request("not a url", Some("also bad"), Some(99)));
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["url", "iconUrl", "size"]);

        assert_eq!(validate(&request("https://example.com", None, Some(1001))).len(), 1);
    }
}
