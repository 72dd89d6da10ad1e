//! Service layer
//!
//! Handlers stay thin and delegate here; the service owns the compositor and
//! the request cache and implements the direct, addressable and planning
//! flows on top of them.

pub mod image_service;

pub use image_service::ImageService;
