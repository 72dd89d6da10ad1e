//! Data model for image generation requests

pub mod payload;
pub mod requests;

pub use payload::{GenerationPayload, IconSource};
pub use requests::{GenerateRequest, GenerateResponse, ImageQuery, PostImageBody};
