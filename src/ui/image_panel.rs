//! Image panel: draws a region image inside the shared slot.

use eframe::egui::{self, Color32, Painter, Pos2, Rect, TextureHandle, Vec2};

/// Largest rect with the image's aspect ratio centered inside `slot`.
pub fn fit_contain(image_size: Vec2, slot: Rect) -> Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return Rect::from_center_size(slot.center(), Vec2::ZERO);
    }
    let scale = (slot.width() / image_size.x).min(slot.height() / image_size.y);
    Rect::from_center_size(slot.center(), image_size * scale)
}

/// Paint a panel's texture into `slot`.
///
/// A hidden panel draws nothing; its fetch keeps running regardless, so
/// the image is ready the moment it is shown.
pub fn paint_image_panel(
    painter: &Painter,
    slot: Rect,
    texture: Option<&TextureHandle>,
    show: bool,
) {
    let Some(texture) = texture.filter(|_| show) else {
        return;
    };

    let rect = fit_contain(texture.size_vec2(), slot);
    let uv = Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0));
    painter.image(texture.id(), rect, uv, Color32::WHITE);
}
