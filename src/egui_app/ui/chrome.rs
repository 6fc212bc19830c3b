use eframe::egui::{self, Frame, Margin, RichText, StrokeKind};

use super::EguiApp;
use super::style;
use crate::egui_app::state::Page;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

impl EguiApp {
    pub(super) fn render_sidebar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::SidePanel::left("navigation")
            .resizable(false)
            .default_width(180.0)
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(10, 12)),
            )
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("🌱 CropMate")
                        .heading()
                        .color(palette.accent_leaf),
                );
                ui.add_space(12.0);
                for page in Page::ALL {
                    let selected = self.controller.ui.page == page;
                    if ui.selectable_label(selected, page.label()).clicked() && !selected {
                        self.controller.navigate(page);
                    }
                }
                ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                    ui.label(RichText::new(APP_VERSION).color(palette.text_muted));
                });
            });
    }

    pub(super) fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.add_space(6.0);
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
                    ui.painter()
                        .rect_filled(badge_rect, 0.0, style::status_badge_color(status.tone));
                    ui.painter().rect_stroke(
                        badge_rect,
                        0.0,
                        style::inner_border(),
                        StrokeKind::Inside,
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(status.tone.label()).color(palette.text_primary));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(palette.text_primary));
                });
            });
    }
}
