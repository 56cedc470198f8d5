//! Application style configuration

use eframe::egui;

/// Dark theme with compact panels, so the viewport gets most of the window
pub fn configure_styles(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();
    style.visuals = egui::Visuals::dark();

    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.menu_corner_radius = egui::CornerRadius::same(4);
    for w in [
        &mut style.visuals.widgets.noninteractive,
        &mut style.visuals.widgets.inactive,
        &mut style.visuals.widgets.hovered,
        &mut style.visuals.widgets.active,
    ] {
        w.corner_radius = egui::CornerRadius::same(3);
    }

    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.button_padding = egui::vec2(6.0, 3.0);
    style.spacing.slider_width = 140.0;

    style.visuals.panel_fill = egui::Color32::from_rgb(24, 24, 28);
    // Same accent as the hovered target
    style.visuals.selection.bg_fill = egui::Color32::from_rgb(134, 10, 10);

    apply_text_styles(&mut style, font_size);
    ctx.set_style(style);
}

/// Apply font size to all text styles
pub fn apply_font_size(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();
    apply_text_styles(&mut style, font_size);
    ctx.set_style(style);
}

fn apply_text_styles(style: &mut egui::Style, font_size: f32) {
    use egui::{FontId, TextStyle};

    style.text_styles.insert(TextStyle::Body, FontId::proportional(font_size));
    style.text_styles.insert(TextStyle::Button, FontId::proportional(font_size));
    style.text_styles.insert(TextStyle::Small, FontId::proportional(font_size * 0.85));
    style.text_styles.insert(TextStyle::Heading, FontId::proportional(font_size * 1.2));
    style.text_styles.insert(TextStyle::Monospace, FontId::monospace(font_size));
}
