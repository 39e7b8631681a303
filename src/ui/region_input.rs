//! Coordinate input group: two coordinate pairs, presets, info dialogs.

use super::colors;
use crate::state::input::CoordinateField;
use crate::state::region::Preset;
use crate::state::AppState;
use eframe::egui::{self, RichText, Stroke, StrokeKind};
use egui_phosphor::regular as icons;

/// Width of the form, matching the image slot below it.
pub const FORM_WIDTH: f32 = 500.0;

pub fn render_region_input(ui: &mut egui::Ui, state: &mut AppState) {
    ui.set_max_width(FORM_WIDTH);

    render_coordinate_field(
        ui,
        "first_coordinate",
        "Primer coordenada",
        &mut state.input.first,
    );
    ui.add_space(12.0);
    render_coordinate_field(
        ui,
        "second_coordinate",
        "Segunda coordenada",
        &mut state.input.second,
    );
    ui.add_space(18.0);

    let label = RichText::new("Consultar").strong();
    let submit = egui::Button::new(label).fill(colors::input::PRIMARY_FILL);
    if ui.add_sized([FORM_WIDTH, 32.0], submit).clicked() {
        match state.input.submit() {
            Some(query) => state.pending_submission = Some(query),
            None => state.status_message = "Complete ambas coordenadas".to_string(),
        }
    }

    ui.add_space(12.0);

    // Region shortcuts
    ui.horizontal(|ui| {
        let presets = Preset::all();
        let spacing = ui.spacing().item_spacing.x;
        let width = (FORM_WIDTH - spacing * (presets.len() as f32 - 1.0)) / presets.len() as f32;

        for preset in presets {
            let label = format!("{} {}", icons::PLANET, preset.name);
            let text = RichText::new(label).strong();
            let button = egui::Button::new(text).fill(colors::input::PRESET_FILL);

            if ui.add_sized([width, 32.0], button).clicked() {
                state.pending_submission = Some(state.input.select_preset(preset));
            }
        }
    });
}

fn render_coordinate_field(
    ui: &mut egui::Ui,
    id: &'static str,
    title: &str,
    field: &mut CoordinateField,
) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(title).color(colors::ui::TITLE));
        if ui
            .small_button(icons::INFO)
            .on_hover_text("Ingreso de coordenadas")
            .clicked()
        {
            field.info_open = true;
        }
    });

    ui.horizontal(|ui| {
        let width = FORM_WIDTH / 2.0 - ui.spacing().item_spacing.x;
        let ra = ui.add(
            egui::TextEdit::singleline(&mut field.ra_text)
                .hint_text("α  Ascensión recta")
                .desired_width(width),
        );
        let dec = ui.add(
            egui::TextEdit::singleline(&mut field.dec_text)
                .hint_text("δ  Declinación")
                .desired_width(width),
        );

        if field.error {
            let stroke = Stroke::new(1.5, colors::input::ERROR_STROKE);
            for response in [&ra, &dec] {
                ui.painter()
                    .rect_stroke(response.rect, 2.0, stroke, StrokeKind::Outside);
            }
        }
    });

    if field.error {
        ui.label(
            RichText::new("Ingrese ascensión recta y declinación")
                .small()
                .color(colors::ui::ERROR),
        );
    }

    if field.info_open {
        render_info_modal(ui.ctx(), id, field);
    }
}

/// Static help on entering equatorial coordinates.
fn render_info_modal(ctx: &egui::Context, id: &'static str, field: &mut CoordinateField) {
    let mut close_clicked = false;
    let modal = egui::Modal::new(egui::Id::new((id, "info"))).show(ctx, |ui| {
        ui.set_width(560.0);
        ui.heading(RichText::new("Ingreso de Coordenadas").strong());
        ui.add_space(10.0);

        ui.label(
            "Ambas coordenadas deben ser del sistema de coordenadas ecuatoriales, en grados. \
             La primer coordenada se corresponde con un extremo de la diagonal del rectángulo \
             de la región a estudiar y la segunda coordenada al extremo opuesto, sin importar \
             el orden.",
        );
        ui.add_space(10.0);
        ui.label(
            "Por ejemplo, para delimitar la región del Quinteto de Stephan se ingresan las \
             siguientes coordenadas:",
        );
        ui.add_space(14.0);

        ui.vertical_centered(|ui| {
            ui.label(RichText::new("α 339.0620  δ 33.9908").monospace());
            ui.label(RichText::new(icons::ARROWS_OUT_SIMPLE).size(28.0));
            ui.label(RichText::new("α 338.9563  δ 33.9296").monospace());
        });

        ui.add_space(14.0);
        ui.vertical_centered(|ui| {
            close_clicked = ui.button("Cerrar").clicked();
        });
    });

    if close_clicked || modal.should_close() {
        field.info_open = false;
    }
}
