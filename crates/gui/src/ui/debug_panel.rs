//! Debug panel: live tuning of the demo parameters
//!
//! Edits go to a draft and are applied when the widget is released
//! (slider drag stopped, text field committed). A rejected draft is
//! discarded and the error is shown under the section.

use egui::Ui;
use shared::{ConfigError, HauntedConfig, ParticleConfig, Rgb, ScrollConfig, TrainerConfig};

use crate::i18n::t;
use crate::state::{AppState, DemoKind};

#[derive(Default)]
pub struct DebugPanel {
    trainer: Draft<TrainerConfig>,
    particles: Draft<ParticleConfig>,
    scroll: Draft<ScrollConfig>,
    haunted: Draft<HauntedConfig>,
}

/// Edited copy of a config, kept only while a widget is being dragged
struct Draft<T> {
    value: Option<T>,
}

impl<T> Default for Draft<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T: Clone> Draft<T> {
    fn edit(&mut self, active: &T) -> &mut T {
        self.value.get_or_insert_with(|| active.clone())
    }

    fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}

/// What a widget did this frame
#[derive(Clone, Copy, PartialEq, Eq)]
enum Edit {
    None,
    Changing,
    Finished,
}

impl Edit {
    fn of(r: &egui::Response) -> Self {
        if r.drag_stopped() || r.lost_focus() || (r.changed() && !r.dragged()) {
            Edit::Finished
        } else if r.dragged() {
            Edit::Changing
        } else {
            Edit::None
        }
    }

    fn merge(self, other: Edit) -> Edit {
        match (self, other) {
            (Edit::Finished, _) | (_, Edit::Finished) => Edit::Finished,
            (Edit::Changing, _) | (_, Edit::Changing) => Edit::Changing,
            _ => Edit::None,
        }
    }
}

impl DebugPanel {
    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            match state.demo {
                DemoKind::AimTrainer => self.trainer_section(ui, state),
                DemoKind::Particles => self.particle_section(ui, state),
                DemoKind::Scroll => self.scroll_section(ui, state),
                DemoKind::Haunted => self.haunted_section(ui, state),
            }
            ui.add_space(10.0);
            viewport_section(ui, state);

            if let Some(err) = &state.last_error {
                ui.add_space(6.0);
                ui.colored_label(egui::Color32::from_rgb(255, 120, 100), err);
            }
        });
    }

    fn trainer_section(&mut self, ui: &mut Ui, state: &mut AppState) {
        ui.heading(t("dbg.trainer"));
        let cfg = self.trainer.edit(state.trainer.config());

        let mut edit = Edit::None;
        edit = edit.merge(slider_u32(ui, &mut cfg.trials_per_session, 1..=50, t("dbg.trials")));
        edit = edit.merge(slider_f32(ui, &mut cfg.spawn_radius_per_aspect, 0.5..=8.0, t("dbg.spawn_radius")));
        edit = edit.merge(slider_f32(ui, &mut cfg.scale_min, 0.1..=3.0, t("dbg.scale_min")));
        edit = edit.merge(slider_f32(ui, &mut cfg.scale_max, 0.1..=3.0, t("dbg.scale_max")));
        edit = edit.merge(slider_f32(ui, &mut cfg.target_radius, 0.1..=3.0, t("dbg.target_radius")));
        edit = edit.merge(slider_u32(ui, &mut cfg.target_segments, 3..=128, t("dbg.segments")));
        edit = edit.merge(slider_f32(ui, &mut cfg.label_size, 0.05..=1.0, t("dbg.label_size")));
        edit = edit.merge(color_row(ui, &mut cfg.idle_color, t("dbg.idle_color")));
        edit = edit.merge(color_row(ui, &mut cfg.hover_color, t("dbg.hover_color")));

        match edit {
            Edit::Finished => {
                if let Some(cfg) = self.trainer.take() {
                    rejected(state.apply_trainer_config(cfg));
                }
            }
            Edit::Changing => {}
            Edit::None => {
                self.trainer.take();
            }
        }

        ui.add_space(4.0);
        if ui.button(t("menu.reset_session")).clicked() {
            state.trainer.reset();
        }
        if ui.button(t("dbg.defaults")).clicked() {
            self.trainer.take();
            rejected(state.apply_trainer_config(TrainerConfig::default()));
        }
    }

    fn particle_section(&mut self, ui: &mut Ui, state: &mut AppState) {
        ui.heading(t("dbg.particles"));
        let cfg = self.particles.edit(state.particles.config());

        let mut edit = Edit::None;
        edit = edit.merge(Edit::of(&ui.add(
            egui::Slider::new(&mut cfg.count, ParticleConfig::COUNT_MIN..=ParticleConfig::COUNT_MAX)
                .step_by(ParticleConfig::COUNT_STEP as f64)
                .text(t("dbg.count")),
        )));
        edit = edit.merge(Edit::of(&ui.add(
            egui::Slider::new(&mut cfg.size, ParticleConfig::SIZE_MIN..=ParticleConfig::SIZE_MAX)
                .step_by(0.001)
                .text(t("dbg.size")),
        )));
        edit = edit.merge(Edit::of(&ui.add(
            egui::Slider::new(&mut cfg.theme, 1..=ParticleConfig::THEME_COUNT).text(t("dbg.theme")),
        )));

        match edit {
            Edit::Finished => {
                if let Some(cfg) = self.particles.take() {
                    rejected(state.apply_particle_config(cfg));
                }
            }
            Edit::Changing => {}
            Edit::None => {
                self.particles.take();
            }
        }

        ui.add_space(4.0);
        if ui.button(t("dbg.defaults")).clicked() {
            self.particles.take();
            rejected(state.apply_particle_config(ParticleConfig::default()));
        }
    }

    fn scroll_section(&mut self, ui: &mut Ui, state: &mut AppState) {
        ui.heading(t("dbg.scroll"));
        let cfg = self.scroll.edit(state.scroll.config());

        let mut edit = Edit::None;
        edit = edit.merge(slider_f32(ui, &mut cfg.section_distance, 1.0..=10.0, t("dbg.section_distance")));
        edit = edit.merge(slider_f32(ui, &mut cfg.parallax_amount, 0.0..=2.0, t("dbg.parallax")));
        edit = edit.merge(slider_f32(ui, &mut cfg.parallax_ease, 0.5..=20.0, t("dbg.parallax_ease")));
        edit = edit.merge(slider_f32(ui, &mut cfg.spin_seconds, 0.1..=5.0, t("dbg.spin_seconds")));
        edit = edit.merge(slider_u32(ui, &mut cfg.star_count, 0..=ScrollConfig::STAR_MAX, t("dbg.stars")));
        edit = edit.merge(Edit::of(&ui.add(
            egui::Slider::new(&mut cfg.star_size, ParticleConfig::SIZE_MIN..=ParticleConfig::SIZE_MAX)
                .step_by(0.001)
                .text(t("dbg.star_size")),
        )));
        edit = edit.merge(color_row(ui, &mut cfg.material_color, t("dbg.material_color")));

        match edit {
            Edit::Finished => {
                if let Some(cfg) = self.scroll.take() {
                    rejected(state.apply_scroll_config(cfg));
                }
            }
            Edit::Changing => {}
            Edit::None => {
                self.scroll.take();
            }
        }

        ui.add_space(4.0);
        if ui.button(t("dbg.defaults")).clicked() {
            self.scroll.take();
            rejected(state.apply_scroll_config(ScrollConfig::default()));
        }
    }

    fn haunted_section(&mut self, ui: &mut Ui, state: &mut AppState) {
        ui.heading(t("dbg.haunted"));
        let cfg = self.haunted.edit(state.haunted.config());

        let mut edit = Edit::None;
        edit = edit.merge(slider_u32(ui, &mut cfg.grave_count, 0..=HauntedConfig::GRAVE_MAX, t("dbg.graves")));
        edit = edit.merge(slider_f32(ui, &mut cfg.grave_radius_min, 0.1..=20.0, t("dbg.grave_radius_min")));
        edit = edit.merge(slider_f32(ui, &mut cfg.grave_radius_max, 0.0..=20.0, t("dbg.grave_radius_max")));
        edit = edit.merge(slider_f32(ui, &mut cfg.ghost_speed, 0.0..=5.0, t("dbg.ghost_speed")));
        edit = edit.merge(slider_f32(ui, &mut cfg.fog_near, 0.0..=30.0, t("dbg.fog_near")));
        edit = edit.merge(slider_f32(ui, &mut cfg.fog_far, 0.0..=60.0, t("dbg.fog_far")));
        edit = edit.merge(color_row(ui, &mut cfg.fog_color, t("dbg.fog_color")));

        match edit {
            Edit::Finished => {
                if let Some(cfg) = self.haunted.take() {
                    rejected(state.apply_haunted_config(cfg));
                }
            }
            Edit::Changing => {}
            Edit::None => {
                self.haunted.take();
            }
        }

        ui.add_space(4.0);
        if ui.button(t("dbg.defaults")).clicked() {
            self.haunted.take();
            rejected(state.apply_haunted_config(HauntedConfig::default()));
        }
    }
}

fn viewport_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading(t("dbg.viewport"));
    ui.horizontal(|ui| {
        ui.label(t("dbg.bg_color"));
        ui.color_edit_button_srgb(&mut state.settings.viewport.background_color);
    });
    ui.horizontal(|ui| {
        ui.label(t("dbg.font_size"));
        ui.add(
            egui::DragValue::new(&mut state.settings.ui.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
}

/// The error is already in `state.last_error`, shown under the sections
fn rejected(result: Result<(), ConfigError>) {
    if let Err(e) = result {
        tracing::debug!("Debug panel edit rejected: {e}");
    }
}

fn slider_f32(ui: &mut Ui, value: &mut f32, range: std::ops::RangeInclusive<f32>, label: &str) -> Edit {
    Edit::of(&ui.add(egui::Slider::new(value, range).step_by(0.01).text(label)))
}

fn slider_u32(ui: &mut Ui, value: &mut u32, range: std::ops::RangeInclusive<u32>, label: &str) -> Edit {
    Edit::of(&ui.add(egui::Slider::new(value, range).text(label)))
}

fn color_row(ui: &mut Ui, color: &mut Rgb, label: &str) -> Edit {
    ui.horizontal(|ui| {
        let r = ui.color_edit_button_srgb(&mut color.0);
        ui.label(label);
        if r.changed() {
            Edit::Finished
        } else {
            Edit::None
        }
    })
    .inner
}
