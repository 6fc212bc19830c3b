use eframe::egui::{self, RichText, Ui};

use super::EguiApp;
use super::style;
use crate::ml::ModelKind;

impl EguiApp {
    pub(super) fn render_train(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let busy = self.controller.training_in_progress();
        ui.heading("Train on New Data");
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!busy, egui::Button::new("Choose CSV file…"))
                .clicked()
            {
                self.controller.pick_training_file();
            }
            let label = self
                .controller
                .ui
                .train
                .data_path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "No file selected".into());
            ui.label(RichText::new(label).color(palette.text_muted));
        });

        if let Some(preview) = &self.controller.ui.train.preview {
            ui.add_space(8.0);
            ui.label(format!(
                "Preview of Data ({} of {} rows):",
                preview.rows.len(),
                preview.total_rows
            ));
            egui::Grid::new("training_preview")
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for column in &preview.columns {
                        ui.label(RichText::new(column).strong());
                    }
                    ui.end_row();
                    for row in &preview.rows {
                        for cell in row {
                            ui.label(cell.as_str());
                        }
                        ui.end_row();
                    }
                });
        }

        ui.add_space(12.0);
        let mut kind = self.controller.ui.train.kind;
        egui::ComboBox::from_label("Model")
            .selected_text(kind.label())
            .show_ui(ui, |ui| {
                for option in ModelKind::ALL {
                    ui.selectable_value(&mut kind, option, option.label());
                }
            });
        if kind != self.controller.ui.train.kind {
            self.controller.set_training_kind(kind);
        }

        let can_train = !busy && self.controller.ui.train.preview.is_some();
        if ui
            .add_enabled(can_train, egui::Button::new("Train Model"))
            .clicked()
        {
            self.controller.start_training();
        }

        let train = &self.controller.ui.train;
        if let Some(progress) = train.progress {
            ui.add_space(8.0);
            let pct = (progress.fraction * 100.0).round().clamp(0.0, 100.0);
            ui.add(
                egui::ProgressBar::new(progress.fraction)
                    .desired_width(320.0)
                    .animate(busy)
                    .fill(style::status_badge_color(
                        crate::egui_app::state::StatusTone::Busy,
                    ))
                    .text(format!("{} {pct:.0}%", progress.stage)),
            );
        }
        if let Some(report) = &train.report {
            ui.add_space(8.0);
            ui.colored_label(palette.success, "Model trained successfully!");
            ui.label(format!(
                "{} crops, {} rows used ({} dropped), {} train / {} test",
                report.classes.len(),
                report.samples,
                report.dropped_rows,
                report.train_rows,
                report.test_rows
            ));
            if let Some(accuracy) = report.accuracy {
                ui.label(format!("Holdout accuracy: {:.2}%", accuracy * 100.0));
            }
            ui.label(
                RichText::new(format!("Saved to {}", report.model_path.display()))
                    .color(palette.text_muted),
            );
        }
        if let Some(error) = &train.error {
            ui.add_space(8.0);
            ui.colored_label(palette.warning, error.as_str());
        }
    }
}
