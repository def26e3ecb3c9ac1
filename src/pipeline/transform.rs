//! Pixel transforms: flatten transparency onto white, then cap the width.
//!
//! JPEG has no alpha channel. Encoding an RGBA buffer directly either fails
//! or renders transparent regions black, so any image with alpha is
//! composited over an opaque white canvas of the same size first. Palette
//! PNGs arrive here already expanded to RGB/RGBA by the decoder.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage, Rgba};
use tracing::debug;

/// Convert any decoded image to 8-bit RGB, compositing alpha over white.
pub fn flatten_onto_white(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    debug!("Flattening {}x{} image with alpha onto white", width, height);

    RgbImage::from_fn(width, height, |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

/// `c·α + 255·(1−α)`, rounded.
fn over_white(c: u8, a: u8) -> u8 {
    let (c, a) = (u32::from(c), u32::from(a));
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Target size for an image of `width`×`height` capped at `max_width`.
///
/// Returns `None` when the image already fits. Otherwise the width becomes
/// exactly `max_width` and the height is scaled proportionally and rounded
/// (never below one pixel).
pub fn scaled_size(width: u32, height: u32, max_width: u32) -> Option<(u32, u32)> {
    if width <= max_width {
        return None;
    }
    let new_height = (f64::from(height) * f64::from(max_width) / f64::from(width)).round();
    Some((max_width, (new_height as u32).max(1)))
}

/// Scale `img` down to `max_width` with Lanczos3 if it is wider.
///
/// Returns the (possibly unchanged) image and whether it was resized.
pub fn fit_width(img: RgbImage, max_width: u32) -> (RgbImage, bool) {
    match scaled_size(img.width(), img.height(), max_width) {
        Some((w, h)) => {
            debug!("Resizing {}x{} → {}x{}", img.width(), img.height(), w, h);
            (imageops::resize(&img, w, h, FilterType::Lanczos3), true)
        }
        None => (img, false),
    }
}
