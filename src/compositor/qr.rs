//! QR symbol encoding and rasterisation onto the drawing surface

use image::{Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};

use crate::errors::CompositorResult;

/// Quiet zone around the symbol, in modules
pub const QUIET_ZONE: u32 = 2;
/// Canvas background and QR matte (`#f4f5f8`)
pub const BACKGROUND: Rgba<u8> = Rgba([0xf4, 0xf5, 0xf8, 0xff]);
pub const FOREGROUND: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xff]);

/// Encode `target` at error-correction level M.
pub fn encode(target: &str) -> CompositorResult<QrCode> {
    Ok(QrCode::with_error_correction_level(target.as_bytes(), EcLevel::M)?)
}

/// Draw `code` plus its quiet zone stretched over the whole surface.
///
/// Pixel `p` on an axis of length `side` samples module
/// `floor(p * (modules + 2 * QUIET_ZONE) / side) - QUIET_ZONE`, so the symbol
/// fills the canvas exactly even when `side` is not a multiple of the
/// module count.
pub fn draw(surface: &mut RgbaImage, code: &QrCode) {
    let modules = code.width();
    let colors = code.to_colors();
    let axis = |side: u32| -> Vec<Option<usize>> {
        let total = modules as u64 + 2 * QUIET_ZONE as u64;
        (0..side as u64)
            .map(|p| {
                let cell = (p * total / side as u64) as i64 - QUIET_ZONE as i64;
                (cell >= 0 && (cell as usize) < modules).then_some(cell as usize)
            })
            .collect()
    };
    let columns = axis(surface.width());
    let rows = axis(surface.height());

    for (x, y, pixel) in surface.enumerate_pixels_mut() {
        let dark = match (columns[x as usize], rows[y as usize]) {
            (Some(col), Some(row)) => colors[row * modules + col] == Color::Dark,
            _ => false,
        };
        *pixel = if dark { FOREGROUND } else { BACKGROUND };
    }
}
