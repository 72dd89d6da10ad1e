//! Image endpoints
//!
//! `GET /image` renders straight from the query string. `/image/post/{key}`
//! splits a request in two: a POST stores the parameters under a
//! client-chosen key and answers with the image, and later GETs on the same
//! key re-render from the stored parameters until they expire.

use axum::{
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{BytesRejection, QueryRejection},
    },
    response::Response,
};
use tracing::debug;

use crate::errors::AppError;
use crate::models::{ImageQuery, PostImageBody};
use crate::web::{
    AppState,
    responses::{handle_error, handle_image_result},
};

/// `GET /image?url=&icon=&size=`
pub async fn direct_image(
    State(state): State<AppState>,
    query: Result<Query<ImageQuery>, QueryRejection>,
) -> Response {
    let payload = match query
        .map_err(|e| AppError::validation(e.body_text()))
        .and_then(|Query(query)| query.into_payload())
    {
        Ok(payload) => payload,
        Err(e) => return handle_error(e),
    };

    debug!(
        "Direct image request for {} at {}px",
        payload.target, payload.pixel_size
    );
    handle_image_result(state.image_service.render(&payload).await)
}

/// `POST /image/post/{key}`
///
/// The body is read as JSON whatever its `Content-Type` says; form
/// clients often post with `text/plain`.
pub async fn store_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let payload = match body
        .map_err(|e| AppError::validation(e.body_text()))
        .and_then(|bytes| {
            serde_json::from_slice::<PostImageBody>(&bytes)
                .map_err(|e| AppError::validation(format!("Invalid JSON body: {e}")))
        })
        .and_then(PostImageBody::into_payload)
    {
        Ok(payload) => payload,
        Err(e) => return handle_error(e),
    };

    debug!("Storing image request under key {}", key);
    handle_image_result(state.image_service.store_and_render(&key, payload).await)
}

/// `GET /image/post/{key}`
pub async fn cached_image(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    handle_image_result(state.image_service.render_cached(&key).await)
}
