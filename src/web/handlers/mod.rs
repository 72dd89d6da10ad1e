//! HTTP request handlers
//!
//! Handlers stay thin: they turn extractor output into a payload and hand
//! it to [`crate::services::ImageService`].

pub mod generate;
pub mod health;
pub mod image;
