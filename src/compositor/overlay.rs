//! Center icon placement: padded white backing square plus the icon itself.

use image::{DynamicImage, Rgba, RgbaImage, imageops::FilterType};

/// Icon side as a fraction of the canvas side
pub const ICON_SCALE: f64 = 0.15;
/// White border drawn around the icon box on every side
pub const ICON_PADDING: u32 = 4;
pub const ICON_BACKING: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

/// Square region the icon is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconBox {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl IconBox {
    /// Centered box of `floor(side * 0.15)` pixels, or `None` when that
    /// rounds down to nothing.
    pub fn for_canvas(side: u32) -> Option<Self> {
        let size = (side as f64 * ICON_SCALE).floor() as u32;
        if size == 0 {
            return None;
        }
        let origin = (side - size) / 2;
        Some(Self {
            x: origin,
            y: origin,
            size,
        })
    }

    /// Backing square bounds `(x0, y0, x1, y1)`, end-exclusive and clipped
    /// to a canvas of `side` pixels.
    pub fn padded_bounds(&self, side: u32) -> (u32, u32, u32, u32) {
        (
            self.x.saturating_sub(ICON_PADDING),
            self.y.saturating_sub(ICON_PADDING),
            (self.x + self.size + ICON_PADDING).min(side),
            (self.y + self.size + ICON_PADDING).min(side),
        )
    }
}

/// Paint the white backing square, then the icon scaled into `icon_box`.
pub fn paint_icon(surface: &mut RgbaImage, icon: &DynamicImage, icon_box: IconBox) {
    let (x0, y0, x1, y1) = icon_box.padded_bounds(surface.width());
    for y in y0..y1 {
        for x in x0..x1 {
            surface.put_pixel(x, y, ICON_BACKING);
        }
    }

    let scaled = image::imageops::resize(
        &icon.to_rgba8(),
        icon_box.size,
        icon_box.size,
        FilterType::Triangle,
    );
    overlay(surface, &scaled, icon_box.x, icon_box.y);
}

/// Alpha-composite `top` onto `base` at the given position.
fn overlay(base: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + dx;
        let target_y = y + dy;
        if target_x < base.width() && target_y < base.height() {
            let alpha = pixel[3] as f32 / 255.0;
            if alpha > 0.99 {
                base.put_pixel(target_x, target_y, *pixel);
            } else if alpha > 0.01 {
                let bg = base.get_pixel(target_x, target_y);
                let blended = blend_pixel(bg, pixel, alpha);
                base.put_pixel(target_x, target_y, blended);
            }
        }
    }
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    Rgba([
        (fg[0] as f32 * alpha + bg[0] as f32 * inv) as u8,
        (fg[1] as f32 * alpha + bg[1] as f32 * inv) as u8,
        (fg[2] as f32 * alpha + bg[2] as f32 * inv) as u8,
        255,
    ])
}
