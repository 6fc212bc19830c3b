//! egui renderer for the application UI.

mod analyze_page;
mod chrome;
mod home_page;
pub mod style;
mod train_page;

use eframe::egui::{self, Vec2};

use crate::config::AppSettings;
use crate::egui_app::controller::CropController;
use crate::egui_app::state::Page;

/// Smallest window that still fits the sidebar and a page.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(760.0, 520.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: CropController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create a new egui app, loading persisted configuration and the current model.
    pub fn new() -> Result<Self, String> {
        let mut controller = CropController::new(AppSettings::default());
        controller
            .load_configuration()
            .map_err(|err| format!("Failed to load config: {err}"))?;
        Ok(Self {
            controller,
            visuals_set: false,
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();
        self.render_status(ctx);
        self.render_sidebar(ctx);
        let page = self.controller.ui.page;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match page {
                Page::Home => self.render_home(ui),
                Page::Analyze => self.render_analyze(ui),
                Page::Train => self.render_train(ui),
            });
        });
        if self.controller.training_in_progress() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}
