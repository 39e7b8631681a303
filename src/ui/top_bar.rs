//! Top bar UI: app title, query phase, and status.

use super::colors;
use crate::state::{AppState, QueryPhase};
use eframe::egui::{self, Color32, RichText};

pub fn render_top_bar(ctx: &egui::Context, state: &AppState) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                // App title
                ui.label(
                    RichText::new("Sky Region Workbench")
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                let phase = state.query.phase();
                ui.label(
                    RichText::new(phase.label().to_uppercase())
                        .monospace()
                        .size(12.0)
                        .color(phase_color(phase)),
                );

                ui.separator();

                // Status text
                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(Color32::GRAY),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(&state.settings.server_url)
                            .monospace()
                            .size(11.0)
                            .color(colors::ui::LABEL),
                    );
                });
            });
        });
}

fn phase_color(phase: QueryPhase) -> Color32 {
    match phase {
        QueryPhase::Idle => colors::phase::IDLE,
        QueryPhase::AwaitingRawImage | QueryPhase::AwaitingClassification => colors::phase::LOADING,
        QueryPhase::Ready => colors::phase::READY,
        QueryPhase::Failed => colors::phase::FAILED,
    }
}
