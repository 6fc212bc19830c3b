use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

use crate::egui_app::state::StatusTone;

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub grid_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent_leaf: Color32,
    pub accent_soil: Color32,
    pub accent_ice: Color32,
    pub warning: Color32,
    pub success: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(12, 14, 12),
        bg_secondary: Color32::from_rgb(26, 30, 27),
        bg_tertiary: Color32::from_rgb(42, 48, 44),
        panel_outline: Color32::from_rgb(40, 48, 42),
        grid_soft: Color32::from_rgb(32, 36, 33),
        text_primary: Color32::from_rgb(192, 200, 190),
        text_muted: Color32::from_rgb(142, 150, 140),
        accent_leaf: Color32::from_rgb(126, 200, 112),
        accent_soil: Color32::from_rgb(195, 150, 100),
        accent_ice: Color32::from_rgb(167, 217, 255),
        warning: Color32::from_rgb(214, 120, 96),
        success: Color32::from_rgb(102, 176, 136),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent_ice;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.warning;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.bg_tertiary;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_leaf);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_rectilinear(&mut visuals.widgets.inactive, palette);
    set_rectilinear(&mut visuals.widgets.hovered, palette);
    set_rectilinear(&mut visuals.widgets.active, palette);
    set_rectilinear(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::ZERO;
    visuals.menu_corner_radius = CornerRadius::ZERO;
    visuals.popup_shadow = Shadow::NONE;
}

fn set_rectilinear(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::ZERO;
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.grid_soft;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

pub fn inner_border() -> Stroke {
    Stroke::new(1.0, palette().grid_soft)
}

pub fn section_stroke() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}

pub fn status_badge_color(tone: StatusTone) -> Color32 {
    let palette = palette();
    match tone {
        StatusTone::Idle => palette.text_muted,
        StatusTone::Info => palette.accent_ice,
        StatusTone::Busy => palette.accent_soil,
        StatusTone::Success => palette.success,
        StatusTone::Error => palette.warning,
    }
}

/// Bar colors for the four nutrient histograms, in feature order.
pub fn histogram_color(feature_index: usize) -> Color32 {
    const COLORS: [Color32; 4] = [
        Color32::from_rgb(102, 176, 96),
        Color32::from_rgb(230, 150, 60),
        Color32::from_rgb(200, 90, 90),
        Color32::from_rgb(90, 140, 220),
    ];
    COLORS[feature_index % COLORS.len()]
}
