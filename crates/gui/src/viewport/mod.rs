//! 3D viewport panel with OpenGL rendering

mod gl_renderer;
mod overlays;
pub use scene_demos_lib::viewport::{camera, mesh};

use std::sync::{Arc, Mutex};

use egui::Ui;
use glam::{Mat4, Vec2, Vec3};

use crate::state::{AppState, DemoKind};
use camera::{ArcBallCamera, DEFAULT_DAMPING};
use gl_renderer::{GlRenderer, PointDraw, PointSet, RenderParams, SceneDraw, TargetDraw};
use scene_demos_lib::assets::AlphaMap;
use scene_demos_lib::{haunted, particles};

/// Sprite key of the built-in soft disc; particle themes start at 1
const SOFT_DISC_KEY: u8 = 0;
const SOFT_DISC_SIZE: u32 = 64;
/// World size of the ghost glow sprites
const GHOST_SIZE: f32 = 0.6;

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    /// Orbit camera of the particles demo; the trainer camera is fixed
    particle_camera: ArcBallCamera,
    /// Orbit camera of the haunted house
    haunted_camera: ArcBallCamera,
    soft_disc: Arc<AlphaMap>,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    /// Last viewport size reported to the trainer and the scroll scene
    last_size: Option<egui::Vec2>,
}

impl ViewportPanel {
    pub fn new(state: &AppState) -> Self {
        Self {
            particle_camera: particle_camera(state),
            haunted_camera: haunted_camera(state),
            soft_disc: Arc::new(AlphaMap::soft_disc(SOFT_DISC_SIZE)),
            gl_renderer: None,
            last_size: None,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("GL renderer unavailable, using painter fallback: {e}"),
        }
    }

    /// Release GL objects; the context is about to go away
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn reset_camera(&mut self, state: &AppState) {
        self.particle_camera = particle_camera(state);
        self.haunted_camera = haunted_camera(state);
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        if response.double_clicked() {
            toggle_fullscreen(ui.ctx());
        }

        self.track_resize(rect, state);

        match state.demo {
            DemoKind::AimTrainer => self.update_trainer(&response, rect, state),
            DemoKind::Particles => self.update_particles(&response, ui, state),
            DemoKind::Scroll => self.update_scroll(&response, rect, ui, state),
            DemoKind::Haunted => self.update_haunted(&response, ui, state),
        }

        if ui.is_rect_visible(rect) {
            match state.demo {
                DemoKind::AimTrainer => self.render_trainer(ui, rect, state),
                DemoKind::Particles => self.render_particles(ui, rect, state),
                DemoKind::Scroll => self.render_scroll(ui, rect, state),
                DemoKind::Haunted => self.render_haunted(ui, rect, state),
            }
        }

        // One frame tick per display frame
        ui.ctx().request_repaint();
    }

    fn track_resize(&mut self, rect: egui::Rect, state: &mut AppState) {
        let size = rect.size();
        if self.last_size == Some(size) {
            return;
        }
        match state
            .trainer
            .on_resize(size.x, size.y)
            .and_then(|()| state.scroll.on_resize(size.x, size.y))
        {
            Ok(()) => {
                tracing::debug!("Viewport resized to {:.0}x{:.0}", size.x, size.y);
                self.last_size = Some(size);
            }
            // Minimized window: keep the previous aspect
            Err(e) => tracing::debug!("Ignoring resize: {e}"),
        }
    }

    // ── Aim trainer ───────────────────────────────────────────

    fn update_trainer(&mut self, response: &egui::Response, rect: egui::Rect, state: &mut AppState) {
        if let Some(pos) = response.hover_pos() {
            let ndc = screen_to_ndc(pos, rect);
            state.trainer.on_pointer_move(ndc.x, ndc.y);
        }

        // A click is judged against the previous frame's intersection
        if response.clicked_by(egui::PointerButton::Primary) {
            let outcome = state.trainer.on_click();
            tracing::trace!("click: {outcome:?}");
        }

        let camera = state.trainer.camera();
        state.trainer.on_frame_tick(&camera);
    }

    fn render_trainer(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let camera = state.trainer.camera();
        let target = state.trainer.target();
        let config = state.trainer.config();

        if let Some(gl_renderer) = &self.gl_renderer {
            let renderer = gl_renderer.clone();
            let draw = TargetDraw {
                mesh: state.trainer.target_mesh().clone(),
                key: (config.target_radius.to_bits(), config.target_segments),
                model: Mat4::from_translation(target.position) * Mat4::from_scale(Vec3::splat(target.scale)),
                color: state.trainer.target_color().to_f32(),
            };
            let bg_color = state.settings.viewport.background_color;

            let callback = egui::PaintCallback {
                rect,
                callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                    let gl = painter.gl();
                    let params = RenderParams {
                        viewport: clip_viewport(&info),
                        bg_color,
                    };
                    if let Ok(mut r) = renderer.lock() {
                        if let Err(e) = r.sync_target(gl, &draw) {
                            tracing::error!("Target upload failed: {e}");
                            return;
                        }
                        r.paint_target(gl, &camera, &params, &draw);
                    }
                })),
            };
            ui.painter().add(callback);
        } else {
            overlays::draw_target_fallback(&ui.painter_at(rect), rect, &camera, state);
        }

        let painter = ui.painter_at(rect);
        overlays::draw_target_label(&painter, rect, &camera, state);
        overlays::draw_hint(&painter, rect, state.demo);
    }

    // ── Particles ─────────────────────────────────────────────

    fn update_particles(&mut self, response: &egui::Response, ui: &Ui, state: &mut AppState) {
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.particle_camera.rotate(delta.x * 0.5, delta.y * 0.5);
        }

        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll.abs() > 0.1 {
            self.particle_camera.zoom(scroll * 0.01);
        }

        self.particle_camera.update();
        state.particles.animate(ui.input(|i| i.time) as f32);
    }

    fn render_particles(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let camera = self.particle_camera;

        if let Some(gl_renderer) = &self.gl_renderer {
            let renderer = gl_renderer.clone();
            let field = &state.particles;
            let draw = PointDraw {
                set: PointSet::Particles,
                positions: field.shared_positions(),
                colors: field.shared_colors(),
                version: field.version(),
                size: field.config().size,
                sprite: Arc::clone(&state.sprite),
                sprite_key: field.config().theme,
            };
            let bg_color = state.settings.viewport.background_color;

            let callback = egui::PaintCallback {
                rect,
                callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                    let gl = painter.gl();
                    let params = RenderParams {
                        viewport: clip_viewport(&info),
                        bg_color,
                    };
                    if let Ok(mut r) = renderer.lock() {
                        if let Err(e) = r.sync_points(gl, &draw) {
                            tracing::error!("Particle upload failed: {e}");
                            return;
                        }
                        r.paint_particles(gl, &camera, &params, draw.size);
                    }
                })),
            };
            ui.painter().add(callback);
        } else {
            overlays::draw_particles_fallback(&ui.painter_at(rect), rect, &camera, state);
        }

        overlays::draw_hint(&ui.painter_at(rect), rect, state.demo);
    }

    // ── Scroll sections ───────────────────────────────────────

    fn update_scroll(&mut self, response: &egui::Response, rect: egui::Rect, ui: &Ui, state: &mut AppState) {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll.abs() > 0.1 {
            // Wheel down scrolls the page down
            state.scroll.on_scroll(-scroll);
        }

        if let Some(pos) = response.hover_pos() {
            state.scroll.on_pointer_move(
                (pos.x - rect.left()) / rect.width(),
                (pos.y - rect.top()) / rect.height(),
            );
        }

        state.scroll.update(frame_dt(ui));
    }

    fn render_scroll(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let scene = &state.scroll;
        let camera = scene.camera();
        let (positions, colors) = scene.shared_stars();
        let draw = SceneDraw {
            instances: scene.instances(),
            lighting: scene.lighting(),
            points: Some(PointDraw {
                set: PointSet::Stars,
                positions,
                colors,
                version: scene.version(),
                size: scene.config().star_size,
                sprite: Arc::clone(&self.soft_disc),
                sprite_key: SOFT_DISC_KEY,
            }),
        };

        self.paint_scene(ui, rect, state, camera, draw);

        let painter = ui.painter_at(rect);
        overlays::draw_section_label(&painter, rect, scene.current_section());
        overlays::draw_hint(&painter, rect, state.demo);
    }

    // ── Haunted house ─────────────────────────────────────────

    fn update_haunted(&mut self, response: &egui::Response, ui: &Ui, state: &mut AppState) {
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.haunted_camera.rotate(delta.x * 0.5, delta.y * 0.5);
        }

        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll.abs() > 0.1 {
            self.haunted_camera.zoom(scroll * 0.01);
        }

        self.haunted_camera.update();
        state.haunted.update(frame_dt(ui));
    }

    fn render_haunted(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let scene = &state.haunted;
        let (positions, colors) = scene.ghost_points();
        let draw = SceneDraw {
            instances: scene.instances(),
            lighting: scene.lighting(),
            points: Some(PointDraw {
                set: PointSet::Ghosts,
                positions: Arc::new(positions),
                colors: Arc::new(colors),
                version: 0,
                size: GHOST_SIZE,
                sprite: Arc::clone(&self.soft_disc),
                sprite_key: SOFT_DISC_KEY,
            }),
        };

        self.paint_scene(ui, rect, state, self.haunted_camera, draw);
        overlays::draw_hint(&ui.painter_at(rect), rect, state.demo);
    }

    /// Lit scene through the GL renderer, or flat shapes with the painter
    fn paint_scene(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState, camera: ArcBallCamera, draw: SceneDraw) {
        let Some(gl_renderer) = &self.gl_renderer else {
            overlays::draw_scene_fallback(&ui.painter_at(rect), rect, &camera, &draw.instances, overlays::background(state));
            return;
        };

        let renderer = gl_renderer.clone();
        let bg_color = match draw.lighting.fog {
            Some(fog) => fog.color.0,
            None => state.settings.viewport.background_color,
        };

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();
                let params = RenderParams {
                    viewport: clip_viewport(&info),
                    bg_color,
                };
                if let Ok(mut r) = renderer.lock() {
                    if let Err(e) = r.sync_scene(gl, &draw) {
                        tracing::error!("Scene upload failed: {e}");
                        return;
                    }
                    r.paint_scene(gl, &camera, &params, &draw);
                }
            })),
        };
        ui.painter().add(callback);
    }
}

/// Seconds since the previous frame, capped so a stalled frame does not jump
fn frame_dt(ui: &Ui) -> f32 {
    ui.input(|i| i.stable_dt).min(0.1)
}

fn haunted_camera(state: &AppState) -> ArcBallCamera {
    ArcBallCamera::from_eye(haunted::CAMERA_EYE, Vec3::ZERO, &state.haunted.config().camera)
        .with_damping(DEFAULT_DAMPING)
}

fn particle_camera(state: &AppState) -> ArcBallCamera {
    ArcBallCamera::from_eye(particles::CAMERA_EYE, Vec3::ZERO, &state.particles.config().camera)
        .with_damping(DEFAULT_DAMPING)
}

fn clip_viewport(info: &egui::PaintCallbackInfo) -> [f32; 4] {
    let clip = info.clip_rect_in_pixels();
    [
        clip.left_px as f32,
        clip.from_bottom_px as f32,
        clip.width_px as f32,
        clip.height_px as f32,
    ]
}

pub fn toggle_fullscreen(ctx: &egui::Context) {
    let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
    ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
}

/// Screen position to normalized device coordinates (x right, y up)
pub fn screen_to_ndc(pos: egui::Pos2, rect: egui::Rect) -> Vec2 {
    Vec2::new(
        (pos.x - rect.left()) / rect.width() * 2.0 - 1.0,
        1.0 - (pos.y - rect.top()) / rect.height() * 2.0,
    )
}

pub fn ndc_to_screen(ndc: Vec2, rect: egui::Rect) -> egui::Pos2 {
    egui::pos2(
        rect.left() + (ndc.x + 1.0) * 0.5 * rect.width(),
        rect.top() + (1.0 - ndc.y) * 0.5 * rect.height(),
    )
}
