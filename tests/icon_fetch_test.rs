mod common;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use image::{GenericImageView, Rgba};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use qr_image_server::{
    compositor::{HttpIconFetcher, IconFetcher},
    errors::IconError,
    utils::http_client::icon_http_client,
};

use common::{app_with, red_icon_png, send_request};

/// Serves a PNG icon, an HTML page and a 404 on an ephemeral local port
async fn spawn_icon_server() -> SocketAddr {
    let png = red_icon_png();
    let app = Router::new()
        .route(
            "/icon.png",
            get(move || {
                let png = png.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], png) }
            }),
        )
        .route(
            "/page.html",
            get(|| async { ([(header::CONTENT_TYPE, "text/html")], "<html></html>") }),
        )
        .route("/agent-checked.png", get(agent_checked_icon))
        .route("/chunked.png", get(chunked_icon));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Only hands the icon to clients that identify themselves
async fn agent_checked_icon(headers: HeaderMap) -> Response {
    let agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());
    if agent == Some("QR Generator Bot") {
        ([(header::CONTENT_TYPE, "image/png")], red_icon_png()).into_response()
    } else {
        StatusCode::FORBIDDEN.into_response()
    }
}

/// 100 chunks of 8 bytes with no Content-Length
async fn chunked_icon() -> Response {
    let chunks = futures::stream::iter(
        (0..100).map(|_| Ok::<_, std::io::Error>(Bytes::from_static(&[0u8; 8]))),
    );
    ([(header::CONTENT_TYPE, "image/png")], Body::from_stream(chunks)).into_response()
}

fn http_fetcher(max_icon_bytes: usize) -> Arc<HttpIconFetcher> {
    let client = icon_http_client("QR Generator Bot", Duration::from_secs(5)).unwrap();
    Arc::new(HttpIconFetcher::new(client, max_icon_bytes))
}

#[tokio::test]
async fn test_fetcher_checks_status_and_content_type() {
    let addr = spawn_icon_server().await;
    let fetcher = http_fetcher(1024 * 1024);

    let icon = fetcher.fetch(&format!("http://{addr}/icon.png")).await.unwrap();
    assert_eq!(icon.as_ref(), red_icon_png().as_slice());

    let page = fetcher.fetch(&format!("http://{addr}/page.html")).await;
    assert!(matches!(page, Err(IconError::ContentType { .. })));

    let missing = fetcher.fetch(&format!("http://{addr}/missing.png")).await;
    assert!(matches!(missing, Err(IconError::Status { status: 404 })));
}

#[tokio::test]
async fn test_fetcher_enforces_size_limit() {
    let addr = spawn_icon_server().await;
    let fetcher = http_fetcher(16);

    let result = fetcher.fetch(&format!("http://{addr}/icon.png")).await;
    assert!(matches!(result, Err(IconError::TooLarge { max_size: 16, .. })));
}

#[tokio::test]
async fn test_fetcher_identifies_itself_to_icon_host() {
    let addr = spawn_icon_server().await;
    let url = format!("http://{addr}/agent-checked.png");

    let icon = http_fetcher(1024 * 1024).fetch(&url).await.unwrap();
    assert_eq!(icon.as_ref(), red_icon_png().as_slice());

    let anonymous = Arc::new(HttpIconFetcher::new(reqwest::Client::new(), 1024 * 1024));
    let refused = anonymous.fetch(&url).await;
    assert!(matches!(refused, Err(IconError::Status { status: 403 })));
}

#[tokio::test]
async fn test_fetcher_stops_reading_oversized_chunked_body() {
    let addr = spawn_icon_server().await;
    let fetcher = http_fetcher(16);

    let result = fetcher.fetch(&format!("http://{addr}/chunked.png")).await;
    match result {
        Err(IconError::TooLarge { size, max_size }) => {
            assert_eq!(max_size, 16);
            assert!(size < 800, "read {size} bytes before giving up");
        }
        other => panic!("expected TooLarge, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_content_type_still_renders_plain_image() {
    let addr = spawn_icon_server().await;
    let (app, _cache) = app_with(http_fetcher(1024 * 1024));

    let plain = send_request(
        &app,
        Method::GET,
        "/image?url=https%3A%2F%2Fexample.com&size=300",
        None,
    )
    .await;

    let page_icon = format!("http://{addr}/page.html");
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", "https://example.com")
        .append_pair("size", "300")
        .append_pair("icon", &page_icon)
        .finish();
    let with_page_icon = send_request(&app, Method::GET, &format!("/image?{query}"), None).await;

    assert_eq!(with_page_icon.status, StatusCode::OK);
    assert_eq!(with_page_icon.body, plain.body);
}

#[tokio::test]
async fn test_remote_icon_is_centered() {
    let addr = spawn_icon_server().await;
    let (app, _cache) = app_with(http_fetcher(1024 * 1024));

    let icon_url = format!("http://{addr}/icon.png");
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", "https://example.com")
        .append_pair("size", "400")
        .append_pair("icon", &icon_url)
        .finish();
    let response = send_request(&app, Method::GET, &format!("/image?{query}"), None).await;

    assert_eq!(response.status, StatusCode::OK);
    let image = response.image();
    assert_eq!(image.dimensions(), (400, 400));
    // 60px icon at (170, 170) inside a white 4px margin
    assert_eq!(image.get_pixel(200, 200), Rgba([255, 0, 0, 255]));
    assert_eq!(image.get_pixel(167, 167), Rgba([255, 255, 255, 255]));
}
