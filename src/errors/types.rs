//! Error type definitions for the QR image service

use thiserror::Error;

/// Top-level application error type
///
/// Every handler funnels its failures through this enum so the web layer
/// can translate them into the fixed response shapes in one place.
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller supplied unusable input (missing target, unparseable size)
    #[error("{message}")]
    Validation { message: String },

    /// Lookup found nothing; expired entries are reported the same way
    #[error("{message}")]
    NotFound { message: String },

    /// Image generation failed for a reason unrelated to the icon
    #[error("{0}")]
    Generation(#[from] CompositorError),
}

/// Fatal compositor failures
#[derive(Error, Debug)]
pub enum CompositorError {
    /// The target does not fit in a QR symbol at the configured EC level
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("Invalid image size {size}: must be a positive number of pixels")]
    InvalidSize { size: i64 },

    #[error("Image size {size}px exceeds the maximum of {max}px")]
    SizeTooLarge { size: i64, max: u32 },

    /// The blocking render task panicked or was cancelled
    #[error("Render task failed: {0}")]
    Render(#[from] tokio::task::JoinError),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
}

/// Reasons an icon could not be placed on the image
#[derive(Error, Debug)]
pub enum IconError {
    #[error("icon fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("icon fetch returned HTTP {status}")]
    Status { status: u16 },

    #[error("icon has invalid content type: {content_type}")]
    ContentType { content_type: String },

    #[error("icon is {size} bytes (max: {max_size})")]
    TooLarge { size: usize, max_size: usize },

    #[error("inline icon is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("icon could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("icon decode task failed: {0}")]
    DecodeTask(#[from] tokio::task::JoinError),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error with a custom message
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}
