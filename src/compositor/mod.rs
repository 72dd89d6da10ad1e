//! Image compositor
//!
//! Produces the PNG for one [`GenerationPayload`]:
//!
//! 1. a `pixel_size` x `pixel_size` canvas filled with the matte color
//! 2. the QR symbol (EC level M, 2-module quiet zone) stretched over it
//! 3. optionally, a centered icon on a white padded square
//!
//! Icon problems are logged and the image is returned without an icon.
//! QR encoding and canvas/PNG problems are fatal and surface as
//! [`CompositorError`].

pub mod icon;
pub mod overlay;
pub mod qr;

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, RgbaImage};
use qrcode::QrCode;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{CompositorError, CompositorResult};
use crate::models::{GenerationPayload, IconSource};
use crate::utils::http_client::icon_http_client;

pub use icon::{HttpIconFetcher, IconFetcher, IconOutcome, IconResolver};
pub use overlay::IconBox;

/// Renders QR code images. Cheap to clone; shares the icon fetcher.
#[derive(Clone)]
pub struct Compositor {
    icons: IconResolver,
    max_pixel_size: u32,
}

impl Compositor {
    pub fn new(fetcher: Arc<dyn IconFetcher>, max_pixel_size: u32, max_icon_bytes: usize) -> Self {
        Self {
            icons: IconResolver::new(fetcher, max_icon_bytes),
            max_pixel_size,
        }
    }

    /// Build a compositor that fetches remote icons over HTTP as configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = icon_http_client(&config.icon.user_agent, config.icon.fetch_timeout_duration()?)?;
        let fetcher = HttpIconFetcher::new(client, config.icon.max_icon_bytes);
        Ok(Self::new(
            Arc::new(fetcher),
            config.image.max_pixel_size,
            config.icon.max_icon_bytes,
        ))
    }

    pub async fn compose_payload(&self, payload: &GenerationPayload) -> CompositorResult<Vec<u8>> {
        self.compose(&payload.target, payload.icon.as_ref(), payload.pixel_size)
            .await
    }

    /// Produce PNG bytes for `target`, optionally with a center icon.
    pub async fn compose(
        &self,
        target: &str,
        icon: Option<&IconSource>,
        pixel_size: i64,
    ) -> CompositorResult<Vec<u8>> {
        let side = self.canvas_side(pixel_size)?;
        let code = qr::encode(target)?;

        let icon = match icon {
            Some(source) => match self.icons.resolve(source).await {
                IconOutcome::Resolved(image) => Some(image),
                IconOutcome::Unavailable(reason) => {
                    warn!("Failed to load icon, rendering without it: {}", reason);
                    None
                }
            },
            None => None,
        };

        let png = tokio::task::spawn_blocking(move || {
            let surface = render(&code, icon.as_ref(), side);
            encode_png(surface)
        })
        .await??;

        debug!(
            "Composed {}x{} QR image ({} bytes)",
            side,
            side,
            png.len()
        );
        Ok(png)
    }

    fn canvas_side(&self, pixel_size: i64) -> CompositorResult<u32> {
        if pixel_size <= 0 {
            return Err(CompositorError::InvalidSize { size: pixel_size });
        }
        if pixel_size > i64::from(self.max_pixel_size) {
            return Err(CompositorError::SizeTooLarge {
                size: pixel_size,
                max: self.max_pixel_size,
            });
        }
        Ok(pixel_size as u32)
    }
}

/// Draw the full image onto a fresh `side` x `side` surface.
pub fn render(code: &QrCode, icon: Option<&DynamicImage>, side: u32) -> RgbaImage {
    let mut surface = RgbaImage::from_pixel(side, side, qr::BACKGROUND);
    qr::draw(&mut surface, code);

    if let Some(icon) = icon {
        match IconBox::for_canvas(side) {
            Some(icon_box) => overlay::paint_icon(&mut surface, icon, icon_box),
            None => debug!("Canvas of {}px too small for an icon, skipping", side),
        }
    }

    surface
}

pub fn encode_png(surface: RgbaImage) -> CompositorResult<Vec<u8>> {
    let mut png_bytes = Vec::new();
    let mut cursor = Cursor::new(&mut png_bytes);
    DynamicImage::ImageRgba8(surface).write_to(&mut cursor, ImageFormat::Png)?;
    Ok(png_bytes)
}
