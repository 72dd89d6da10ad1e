//! Centralized error handling for the QR image service
//!
//! # Error Categories
//!
//! - **Input Errors**: missing or malformed request parameters
//! - **Compositor Errors**: QR encoding, canvas allocation and PNG encoding
//! - **Icon Errors**: remote fetch or inline decode failures. These never
//!   leave the compositor; they downgrade the image to "no icon".
//!
//! # Usage
//!
//! ```rust
//! use qr_image_server::errors::{AppError, AppResult};
//!
//! fn require_target(target: Option<&str>) -> AppResult<&str> {
//!     target.ok_or_else(|| AppError::validation("URL parameter is required"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for compositor Results
pub type CompositorResult<T> = Result<T, CompositorError>;
