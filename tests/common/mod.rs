#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
};
use bytes::Bytes;
use image::{Rgba, RgbaImage};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

use qr_image_server::{
    cache::RequestCache,
    compositor::{self, Compositor, IconFetcher},
    config::Config,
    errors::IconError,
    services::ImageService,
    web::{AppState, create_router},
};

/// Serves one fixed icon and counts how often it was asked for
pub struct CountingFetcher {
    pub icon: Option<Bytes>,
    pub calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn serving(icon: Option<Bytes>) -> Arc<Self> {
        Arc::new(Self {
            icon,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IconFetcher for CountingFetcher {
    async fn fetch(&self, _url: &str) -> Result<Bytes, IconError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.icon.clone().ok_or(IconError::Status { status: 404 })
    }
}

/// A solid red square encoded as PNG
pub fn red_icon_png() -> Vec<u8> {
    compositor::encode_png(RgbaImage::from_pixel(32, 32, Rgba([255, 0, 0, 255])))
        .expect("icon encodes")
}

pub fn app_with(fetcher: Arc<dyn IconFetcher>) -> (Router, RequestCache) {
    let config = Config::default();
    let cache = RequestCache::new();
    let compositor = Compositor::new(
        fetcher,
        config.image.max_pixel_size,
        config.icon.max_icon_bytes,
    );
    let service = ImageService::new(compositor, cache.clone());
    (create_router(AppState::new(config, service)), cache)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn image(&self) -> image::DynamicImage {
        image::load_from_memory(&self.body).expect("response body is an image")
    }
}

// Helper function to send requests to the app
pub async fn send_request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> TestResponse {
    let request_builder = Request::builder().method(method).uri(uri);

    let request = if let Some(body) = body {
        request_builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    } else {
        request_builder.body(Body::empty()).unwrap()
    };

    send_raw(app, request).await
}

pub async fn send_raw(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body,
    }
}
