use eframe::egui::{self, RichText, Ui};

use super::EguiApp;
use super::style;
use crate::crops;
use crate::predict::{NUTRIENT_RANGE, PH_RANGE};

impl EguiApp {
    pub(super) fn render_home(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.heading("🌾 Crop Recommendation");
        ui.label(
            RichText::new("Enter the soil readings of your field to get a crop suggestion.")
                .color(palette.text_muted),
        );
        ui.add_space(12.0);

        if let Some(reason) = &self.controller.ui.home.model_error {
            ui.colored_label(
                palette.warning,
                "Failed to load the model. Please try again later.",
            )
            .on_hover_text(reason.as_str());
            ui.add_space(8.0);
        }

        let reading = &mut self.controller.ui.home.reading;
        egui::Grid::new("soil_inputs")
            .num_columns(2)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                ui.label("Nitrogen (N) Content (mg/kg)");
                ui.add(
                    egui::DragValue::new(&mut reading.nitrogen)
                        .range(NUTRIENT_RANGE)
                        .speed(1.0)
                        .fixed_decimals(1),
                );
                ui.end_row();
                ui.label("Phosphorus (P) Content (mg/kg)");
                ui.add(
                    egui::DragValue::new(&mut reading.phosphorus)
                        .range(NUTRIENT_RANGE)
                        .speed(1.0)
                        .fixed_decimals(1),
                );
                ui.end_row();
                ui.label("Potassium (K) Content (mg/kg)");
                ui.add(
                    egui::DragValue::new(&mut reading.potassium)
                        .range(NUTRIENT_RANGE)
                        .speed(1.0)
                        .fixed_decimals(1),
                );
                ui.end_row();
                ui.label("Soil Acidity (pH Level)");
                ui.add(
                    egui::DragValue::new(&mut reading.ph)
                        .range(PH_RANGE)
                        .speed(0.1)
                        .fixed_decimals(1),
                );
                ui.end_row();
            });

        ui.add_space(12.0);
        if ui.button("Recommend Crop").clicked() {
            self.controller.recommend();
        }
        ui.add_space(12.0);

        let home = &self.controller.ui.home;
        if let Some(result) = &home.result {
            ui.label(
                RichText::new(format!(
                    "Recommended Crop: {}",
                    crops::decorated_name(&result.label)
                ))
                .heading()
                .color(palette.accent_leaf),
            );
            ui.label(format!("Probability: {:.2}", result.probability));
        }
        if let Some(error) = &home.error {
            ui.colored_label(palette.warning, error.as_str());
        }
    }
}
