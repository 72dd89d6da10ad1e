//! Icon resolution: turn an [`IconSource`] into a drawable image or a reason
//! why there is none.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use bytes::{Bytes, BytesMut};
use image::DynamicImage;
use reqwest::{Client, header::CONTENT_TYPE};
use tracing::debug;

use crate::errors::IconError;
use crate::models::IconSource;

/// Standard alphabet, padding optional
const INLINE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Result of resolving an icon. `Unavailable` is not an error for the
/// request: the image is produced without an icon.
#[derive(Debug)]
pub enum IconOutcome {
    Resolved(DynamicImage),
    Unavailable(IconError),
}

/// Retrieves raw icon bytes for a remote reference
#[async_trait]
pub trait IconFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, IconError>;
}

/// reqwest-backed fetcher. Requires a 2xx status and an `image/*` content type.
pub struct HttpIconFetcher {
    client: Client,
    max_icon_bytes: usize,
}

impl HttpIconFetcher {
    pub fn new(client: Client, max_icon_bytes: usize) -> Self {
        Self {
            client,
            max_icon_bytes,
        }
    }
}

#[async_trait]
impl IconFetcher for HttpIconFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, IconError> {
        debug!("Fetching icon from: {}", url);

        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IconError::Status {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.to_ascii_lowercase().starts_with("image/") {
            return Err(IconError::ContentType { content_type });
        }

        if let Some(length) = response.content_length() {
            let length = usize::try_from(length).unwrap_or(usize::MAX);
            if length > self.max_icon_bytes {
                return Err(IconError::TooLarge {
                    size: length,
                    max_size: self.max_icon_bytes,
                });
            }
        }

        // Content-Length may be absent or wrong, so count while reading.
        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_icon_bytes {
                return Err(IconError::TooLarge {
                    size: body.len() + chunk.len(),
                    max_size: self.max_icon_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }
        let bytes = body.freeze();

        debug!("Fetched {} icon bytes ({})", bytes.len(), content_type);
        Ok(bytes)
    }
}

/// Resolves icon sources, delegating remote references to an [`IconFetcher`]
#[derive(Clone)]
pub struct IconResolver {
    fetcher: Arc<dyn IconFetcher>,
    max_icon_bytes: usize,
}

impl IconResolver {
    pub fn new(fetcher: Arc<dyn IconFetcher>, max_icon_bytes: usize) -> Self {
        Self {
            fetcher,
            max_icon_bytes,
        }
    }

    pub async fn resolve(&self, source: &IconSource) -> IconOutcome {
        match self.load(source).await {
            Ok(icon) => IconOutcome::Resolved(icon),
            Err(reason) => IconOutcome::Unavailable(reason),
        }
    }

    async fn load(&self, source: &IconSource) -> Result<DynamicImage, IconError> {
        let bytes = match source {
            IconSource::Remote(url) => self.fetcher.fetch(url).await?,
            IconSource::Inline(data) => decode_inline(data, self.max_icon_bytes)?,
        };

        let icon = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await??;
        Ok(icon)
    }
}

/// Decode inline icon text: bare base64 or a `data:<mime>;base64,` URL.
/// Embedded whitespace is ignored.
pub fn decode_inline(data: &str, max_icon_bytes: usize) -> Result<Bytes, IconError> {
    let data = data.trim();
    let encoded = match data.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or("", |(_, payload)| payload),
        None => data,
    };
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let decoded = INLINE_ENGINE.decode(compact.as_bytes())?;
    if decoded.len() > max_icon_bytes {
        return Err(IconError::TooLarge {
            size: decoded.len(),
            max_size: max_icon_bytes,
        });
    }
    Ok(Bytes::from(decoded))
}
