//! Image generation service
//!
//! Every fetch renders again from parameters; only the parameters are
//! cached, never the PNG bytes.

use tracing::{debug, error};

use crate::cache::RequestCache;
use crate::compositor::Compositor;
use crate::errors::{AppError, AppResult};
use crate::models::{GenerateResponse, GenerationPayload, IconSource};
use crate::utils::derive_request_key;

/// Path of the direct image endpoint
pub const DIRECT_IMAGE_PATH: &str = "/image";
/// Path prefix of the addressable image endpoint
pub const ADDRESSABLE_IMAGE_PATH: &str = "/image/post";

const KEY_NOT_FOUND: &str = "Key not found or expired";

#[derive(Clone)]
pub struct ImageService {
    compositor: Compositor,
    cache: RequestCache,
}

impl ImageService {
    pub fn new(compositor: Compositor, cache: RequestCache) -> Self {
        Self { compositor, cache }
    }

    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    /// Render `payload` to PNG bytes.
    pub async fn render(&self, payload: &GenerationPayload) -> AppResult<Vec<u8>> {
        self.compositor
            .compose_payload(payload)
            .await
            .map_err(|e| {
                error!("Failed to generate image: {}", e);
                AppError::from(e)
            })
    }

    /// Write phase: remember `payload` under `key`, then render it.
    ///
    /// The cache write stands even if rendering fails afterwards.
    pub async fn store_and_render(&self, key: &str, payload: GenerationPayload) -> AppResult<Vec<u8>> {
        self.cache.put(key, payload.clone()).await;
        self.render(&payload).await
    }

    /// Read phase: render the payload last stored under `key`.
    pub async fn render_cached(&self, key: &str) -> AppResult<Vec<u8>> {
        let payload = self
            .cache
            .get(key)
            .await
            .ok_or_else(|| AppError::not_found(KEY_NOT_FOUND))?;
        self.render(&payload).await
    }

    /// Decide where a client should load `payload` from.
    ///
    /// Inline icons can be far larger than a URL may carry, so such payloads
    /// are stored under a derived key and addressed by it. Everything else
    /// gets a self-contained direct link.
    pub async fn plan(&self, payload: GenerationPayload) -> GenerateResponse {
        let icon_url = match &payload.icon {
            Some(IconSource::Remote(url)) => Some(url.clone()),
            _ => None,
        };

        let (qr_code, key) = if payload.icon.as_ref().is_some_and(IconSource::is_inline) {
            let key = derive_request_key(&payload);
            self.cache.put(&key, payload.clone()).await;
            debug!("Planned addressable image under key {}", key);
            (format!("{ADDRESSABLE_IMAGE_PATH}/{key}"), Some(key))
        } else {
            (direct_image_link(&payload.target, icon_url.as_deref(), payload.pixel_size), None)
        };

        GenerateResponse {
            qr_code,
            url: payload.target,
            icon_url,
            size: payload.pixel_size,
            key,
        }
    }
}

/// Relative link to the direct endpoint that renders this exact image.
pub fn direct_image_link(target: &str, icon_url: Option<&str>, pixel_size: i64) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("url", target);
    query.append_pair("size", &pixel_size.to_string());
    if let Some(icon_url) = icon_url {
        query.append_pair("icon", icon_url);
    }
    format!("{DIRECT_IMAGE_PATH}?{}", query.finish())
}
