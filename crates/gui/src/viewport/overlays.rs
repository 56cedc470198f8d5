//! Viewport overlay drawing (target label, hints, painter fallback)

use egui::Painter;
use scene_demos_lib::scene::Instance;
use scene_demos_lib::scroll::SECTION_COUNT;

use crate::i18n::t;
use crate::state::{AppState, DemoKind};

use super::camera::ArcBallCamera;
use super::ndc_to_screen;

/// Largest number of particles drawn by the painter fallback
const FALLBACK_PARTICLES: usize = 5000;

/// Draw the target label centered on the target, scaled with it
pub fn draw_target_label(painter: &Painter, rect: egui::Rect, camera: &ArcBallCamera, state: &AppState) {
    let target = state.trainer.target();
    let config = state.trainer.config();
    let aspect = rect.width() / rect.height();

    let Some(ndc) = camera.project_ndc(target.position, aspect) else {
        return;
    };
    let Some(height) = camera.projected_height(target.position, config.label_size * target.scale, aspect) else {
        return;
    };

    let font_px = (height * 0.5 * rect.height()).max(1.0);
    let [r, g, b] = config.label_color.0;
    painter.text(
        ndc_to_screen(ndc, rect),
        egui::Align2::CENTER_CENTER,
        &target.label,
        egui::FontId::proportional(font_px),
        egui::Color32::from_rgb(r, g, b),
    );
}

/// Usage hint at the bottom of the viewport
pub fn draw_hint(painter: &Painter, rect: egui::Rect, demo: DemoKind) {
    let hint = match demo {
        DemoKind::AimTrainer => t("hint.aim"),
        DemoKind::Particles => t("hint.particles"),
        DemoKind::Scroll => t("hint.scroll"),
        DemoKind::Haunted => t("hint.haunted"),
    };
    painter.text(
        egui::pos2(rect.center().x, rect.bottom() - 20.0),
        egui::Align2::CENTER_BOTTOM,
        hint,
        egui::FontId::proportional(11.0),
        egui::Color32::from_rgb(100, 100, 110),
    );
}

/// "Section 2 / 3" in the top-left corner
pub fn draw_section_label(painter: &Painter, rect: egui::Rect, section: usize) {
    painter.text(
        rect.left_top() + egui::vec2(16.0, 16.0),
        egui::Align2::LEFT_TOP,
        format!("{} {} / {}", t("viewport.section"), section + 1, SECTION_COUNT),
        egui::FontId::proportional(18.0),
        egui::Color32::from_rgb(200, 200, 210),
    );
}

/// Painter-only target, used when no GL context is available
pub fn draw_target_fallback(painter: &Painter, rect: egui::Rect, camera: &ArcBallCamera, state: &AppState) {
    painter.rect_filled(rect, 0.0, background(state));

    let target = state.trainer.target();
    let aspect = rect.width() / rect.height();
    let radius = state.trainer.config().target_radius * target.scale;

    let (Some(center), Some(edge)) = (
        camera.project_ndc(target.position, aspect),
        camera.project_ndc(target.position + glam::Vec3::X * radius, aspect),
    ) else {
        return;
    };

    let center = ndc_to_screen(center, rect);
    let edge = ndc_to_screen(edge, rect);
    let [r, g, b] = state.trainer.target_color().0;
    painter.circle_filled(center, (edge - center).length(), egui::Color32::from_rgb(r, g, b));
}

/// Painter-only point cloud (subsampled)
pub fn draw_particles_fallback(painter: &Painter, rect: egui::Rect, camera: &ArcBallCamera, state: &AppState) {
    painter.rect_filled(rect, 0.0, background(state));

    let field = &state.particles;
    let aspect = rect.width() / rect.height();
    let step = (field.count() / FALLBACK_PARTICLES).max(1);

    for (p, c) in field
        .positions()
        .chunks_exact(3)
        .zip(field.colors().chunks_exact(3))
        .step_by(step)
    {
        let Some(ndc) = camera.project_ndc(glam::Vec3::new(p[0], p[1], p[2]), aspect) else {
            continue;
        };
        let pos = ndc_to_screen(ndc, rect);
        if !rect.contains(pos) {
            continue;
        }
        let color = egui::Color32::from_rgb((c[0] * 255.0) as u8, (c[1] * 255.0) as u8, (c[2] * 255.0) as u8);
        painter.circle_filled(pos, 1.5, color);
    }
}

/// Painter-only scene: one disc per instance, far ones first
pub fn draw_scene_fallback(
    painter: &Painter,
    rect: egui::Rect,
    camera: &ArcBallCamera,
    instances: &[Instance],
    background: egui::Color32,
) {
    painter.rect_filled(rect, 0.0, background);

    let aspect = rect.width() / rect.height();
    let eye = camera.eye_position();
    let mut visible: Vec<(f32, egui::Pos2, f32, egui::Color32)> = instances
        .iter()
        .filter_map(|inst| {
            let position = inst.position();
            let size = inst.model.x_axis.truncate().length();
            let ndc = camera.project_ndc(position, aspect)?;
            let height = camera.projected_height(position, size, aspect)?;
            let [r, g, b] = inst.color.0;
            Some((
                position.distance(eye),
                ndc_to_screen(ndc, rect),
                height * 0.25 * rect.height(),
                egui::Color32::from_rgb(r, g, b),
            ))
        })
        .collect();
    visible.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (_, center, radius, color) in visible {
        painter.circle_filled(center, radius.max(1.0), color);
    }
}

pub fn background(state: &AppState) -> egui::Color32 {
    let [r, g, b] = state.settings.viewport.background_color;
    egui::Color32::from_rgb(r, g, b)
}
