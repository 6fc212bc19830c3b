use eframe::egui::{self, Align2, FontId, RichText, Sense, StrokeKind, Ui};

use super::EguiApp;
use super::style;
use crate::analysis::Histogram;
use crate::crops;

const FEATURE_TITLES: [&str; 4] = [
    "Nitrogen (N)",
    "Phosphorus (P)",
    "Potassium (K)",
    "pH Value",
];

impl EguiApp {
    pub(super) fn render_analyze(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.heading("🌾 Crop Data Analysis");
        ui.horizontal(|ui| {
            let source = self
                .controller
                .ui
                .analyze
                .dataset_path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "No dataset loaded".into());
            ui.label(RichText::new(source).color(palette.text_muted));
            if ui.button("Choose dataset…").clicked() {
                self.controller.pick_reference_dataset();
            }
            if ui.button("Reload").clicked() {
                self.controller.load_reference_dataset();
            }
        });
        ui.add_space(8.0);

        if let Some(error) = &self.controller.ui.analyze.error {
            ui.colored_label(palette.warning, error.as_str());
            return;
        }
        if self.controller.ui.analyze.crops.is_empty() {
            ui.label("The dataset has no usable rows.");
            return;
        }

        let selected = self.controller.ui.analyze.selected.clone().unwrap_or_default();
        let mut chosen = None;
        egui::ComboBox::from_label("Select Crop")
            .selected_text(crops::display_name(&selected))
            .show_ui(ui, |ui| {
                for crop in &self.controller.ui.analyze.crops {
                    if ui
                        .selectable_label(*crop == selected, crops::display_name(crop))
                        .clicked()
                    {
                        chosen = Some(crop.clone());
                    }
                }
            });
        if let Some(crop) = chosen {
            self.controller.select_crop(&crop);
        }

        let Some(summary) = &self.controller.ui.analyze.summary else {
            return;
        };
        ui.add_space(8.0);
        ui.label(
            RichText::new(format!(
                "Average Nutrient Values for {}:",
                crops::decorated_name(&summary.crop)
            ))
            .heading(),
        );
        for (idx, (_, mean)) in summary.averages.iter().enumerate() {
            let title = FEATURE_TITLES.get(idx).copied().unwrap_or("Feature");
            ui.label(format!("{title}: {mean:.2}"));
        }
        ui.label(
            RichText::new(format!("{} rows", summary.rows)).color(palette.text_muted),
        );
        ui.add_space(12.0);

        let width = (ui.available_width() - 16.0).max(200.0) / 2.0;
        egui::Grid::new("nutrient_histograms")
            .num_columns(2)
            .spacing([16.0, 16.0])
            .show(ui, |ui| {
                for (idx, histogram) in summary.histograms.iter().enumerate() {
                    let title = FEATURE_TITLES.get(idx).copied().unwrap_or("Feature");
                    ui.vertical(|ui| {
                        ui.label(format!("{title} Distribution"));
                        render_histogram(ui, histogram, idx, width);
                    });
                    if idx % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
    }
}

fn render_histogram(ui: &mut Ui, histogram: &Histogram, feature_index: usize, width: f32) {
    let palette = style::palette();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 160.0), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, palette.bg_primary);
    painter.rect_stroke(rect, 0.0, style::inner_border(), StrokeKind::Inside);

    let plot = rect.shrink2(egui::vec2(6.0, 18.0));
    let peak = histogram.peak().max(1) as f32;
    let bins = histogram.counts.len().max(1);
    let bar_width = plot.width() / bins as f32;
    let color = style::histogram_color(feature_index);
    for (bin, &count) in histogram.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let height = plot.height() * count as f32 / peak;
        let left = plot.left() + bin as f32 * bar_width;
        let bar = egui::Rect::from_min_max(
            egui::pos2(left + 1.0, plot.bottom() - height),
            egui::pos2(left + bar_width - 1.0, plot.bottom()),
        );
        painter.rect_filled(bar, 0.0, color);
    }

    let font = FontId::proportional(11.0);
    painter.text(
        egui::pos2(plot.left(), rect.bottom() - 2.0),
        Align2::LEFT_BOTTOM,
        format!("{:.1}", histogram.min),
        font.clone(),
        palette.text_muted,
    );
    painter.text(
        egui::pos2(plot.right(), rect.bottom() - 2.0),
        Align2::RIGHT_BOTTOM,
        format!("{:.1}", histogram.max),
        font.clone(),
        palette.text_muted,
    );
    painter.text(
        egui::pos2(plot.left(), rect.top() + 2.0),
        Align2::LEFT_TOP,
        format!("max {}", histogram.peak()),
        font,
        palette.text_muted,
    );
}
