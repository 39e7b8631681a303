//! Image byte decoding into egui images.

use super::types::FetchError;
use eframe::egui::ColorImage;

/// Decode PNG/JPEG bytes into an RGBA `ColorImage`.
pub fn decode_image(bytes: &[u8]) -> Result<ColorImage, FetchError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
