//! Query view: the image slot, loading overlay, narration, and reset.

use super::colors;
use super::image_panel::paint_image_panel;
use super::region_input::FORM_WIDTH;
use crate::classifier::{PanelKind, PanelTextures};
use crate::state::narration;
use crate::state::query::FailureStage;
use crate::state::AppState;
use eframe::egui::{self, Align2, FontId, Rect, RichText, Sense, Vec2};
use egui_phosphor::regular as icons;
use std::time::Duration;
use web_time::Instant;

/// Side length of the square image slot.
const SLOT_SIZE: f32 = 500.0;

/// Repaint interval while the progress overlay is animating.
const ANIMATION_FRAME: Duration = Duration::from_millis(33);

pub fn render_query_view(
    ui: &mut egui::Ui,
    state: &mut AppState,
    textures: &PanelTextures,
    now: Instant,
) {
    let Some(active) = state.query.active() else {
        return;
    };
    let generation = active.generation;
    let elapsed = state.query.loading_elapsed(now);

    ui.label(
        RichText::new(active.query.title())
            .size(15.0)
            .color(colors::ui::TITLE),
    );
    ui.add_space(5.0);

    let (slot, _) = ui.allocate_exact_size(Vec2::splat(SLOT_SIZE), Sense::hover());
    let painter = ui.painter_at(slot);
    painter.rect_filled(slot, 10.0, colors::panel::BACKGROUND);

    let raw_texture = textures.get(generation, PanelKind::Raw);

    if state.query.show_raw() {
        if raw_texture.is_none() {
            if let Some(error) = &active.raw.error {
                painter.text(
                    slot.center(),
                    Align2::CENTER_CENTER,
                    "Imagen de la región no disponible",
                    FontId::proportional(14.0),
                    colors::panel::PLACEHOLDER,
                );
                painter.text(
                    slot.center() + Vec2::new(0.0, 20.0),
                    Align2::CENTER_CENTER,
                    error,
                    FontId::proportional(11.0),
                    colors::panel::PLACEHOLDER,
                );
            } else {
                let spinner = Rect::from_center_size(slot.center(), Vec2::splat(36.0));
                egui::Spinner::new().paint_at(ui, spinner);
            }
        }
        paint_image_panel(&painter, slot, raw_texture, true);
    }

    // Decorative progress sweep over the raw image
    if let Some(elapsed) = elapsed {
        let width = slot.width() * narration::progress_fraction(elapsed);
        let overlay = Rect::from_min_size(slot.min, Vec2::new(width, slot.height()));
        painter.rect_filled(overlay, 0.0, colors::panel::progress_overlay());
    }

    paint_image_panel(
        &painter,
        slot,
        textures.get(generation, PanelKind::Classified),
        state.query.show_classified(),
    );

    if let Some(failure) = &active.failure {
        let title = match failure.stage {
            FailureStage::Classification => "No se pudo clasificar la región",
            FailureStage::Timeout => "La clasificación tardó demasiado",
        };
        painter.text(
            slot.center() - Vec2::new(0.0, 14.0),
            Align2::CENTER_CENTER,
            format!("{} {}", icons::WARNING, title),
            FontId::proportional(17.0),
            colors::ui::ERROR,
        );
        painter.text(
            slot.center() + Vec2::new(0.0, 14.0),
            Align2::CENTER_CENTER,
            &failure.message,
            FontId::proportional(12.0),
            colors::panel::PLACEHOLDER,
        );
    }

    // Loading message
    if let Some(elapsed) = elapsed {
        ui.add_space(5.0);
        ui.vertical_centered(|ui| {
            let color = ui
                .visuals()
                .text_color()
                .gamma_multiply(narration::phrase_opacity(elapsed));
            ui.label(
                RichText::new(narration::phrase_at(elapsed))
                    .size(17.6)
                    .color(color),
            );
        });
        ui.ctx().request_repaint_after(ANIMATION_FRAME);
    }

    // Reset button
    if state.query.can_reset() {
        ui.add_space(10.0);
        let label = format!(
            "{} Consultar por otra región",
            icons::ARROW_COUNTER_CLOCKWISE
        );
        let text = RichText::new(label).strong();
        let button = egui::Button::new(text).fill(colors::input::PRIMARY_FILL);
        if ui.add_sized([FORM_WIDTH, 32.0], button).clicked() {
            state.reset_requested = true;
        }
    }
}
