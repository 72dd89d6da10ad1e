//! Wire types for the HTTP surface

use serde::{Deserialize, Serialize};

use super::payload::{GenerationPayload, IconSource};
use crate::errors::{AppError, AppResult};

const MISSING_URL: &str = "URL parameter is required";

/// Query string of `GET /image`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
    /// Remote icon URL, or an inline `data:` URL
    pub icon: Option<String>,
    /// Kept as text so a non-numeric value becomes a 400 rather than an
    /// extractor rejection
    pub size: Option<String>,
}

impl ImageQuery {
    pub fn into_payload(self) -> AppResult<GenerationPayload> {
        let target = required_target(self.url)?;
        let pixel_size = match self.size.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                AppError::validation(format!("size parameter must be an integer, got '{raw}'"))
            })?),
        };
        let icon = IconSource::from_parts(self.icon, None);
        Ok(GenerationPayload::new(target, icon, pixel_size))
    }
}

/// JSON body of `POST /image/post/{key}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostImageBody {
    pub url: Option<String>,
    pub icon_url: Option<String>,
    pub icon_data: Option<String>,
    pub size: Option<i64>,
}

impl PostImageBody {
    pub fn into_payload(self) -> AppResult<GenerationPayload> {
        let target = required_target(self.url)?;
        let icon = IconSource::from_parts(self.icon_url, self.icon_data);
        Ok(GenerationPayload::new(target, icon, self.size))
    }
}

/// JSON body of `POST /api/qr/generate`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub url: String,
    pub icon_url: Option<String>,
    pub icon_data: Option<String>,
    pub size: Option<i64>,
}

/// Where the client should fetch the generated image from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub qr_code: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    pub size: i64,
    /// Request key, present when the payload was stored for key-only refetch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

fn required_target(url: Option<String>) -> AppResult<String> {
    url.filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::validation(MISSING_URL))
}
