//! UI modules for the Sky Region Workbench application.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, query phase, status, and service address
//! - Central panel: the coordinate form while idle, otherwise the query view

mod colors;
mod image_panel;
mod query_view;
mod region_input;
mod top_bar;

pub use top_bar::render_top_bar;

use crate::classifier::PanelTextures;
use crate::state::AppState;
use eframe::egui;
use web_time::Instant;

/// Render the central panel with whichever view the query phase calls for.
pub fn render_central_panel(
    ctx: &egui::Context,
    state: &mut AppState,
    textures: &PanelTextures,
    now: Instant,
) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.set_max_width(region_input::FORM_WIDTH);

                if state.query.active().is_some() {
                    query_view::render_query_view(ui, state, textures, now);
                } else {
                    region_input::render_region_input(ui, state);
                }
            });
        });
    });
}
