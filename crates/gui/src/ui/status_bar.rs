use egui::Ui;

use crate::i18n::t;
use crate::state::{AppState, DemoKind};

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        match state.demo {
            DemoKind::AimTrainer => show_trainer(ui, state),
            DemoKind::Particles => {
                ui.weak(format!("{}: {}", t("status.particles"), state.particles.count()));
            }
            DemoKind::Scroll => {
                let scene = &state.scroll;
                ui.weak(format!(
                    "{}: {}/{}",
                    t("status.section"),
                    scene.current_section() + 1,
                    scene.sections().len()
                ));
                if scene.sections().iter().any(|s| s.is_spinning()) {
                    ui.separator();
                    ui.weak(t("status.spinning"));
                }
            }
            DemoKind::Haunted => {
                ui.weak(format!("{}: {}", t("status.graves"), state.haunted.graves().len()));
                ui.separator();
                ui.weak(format!("{}: {:.1} s", t("status.time"), state.haunted.time()));
            }
        }

        if let Some(err) = &state.last_error {
            ui.separator();
            ui.colored_label(
                egui::Color32::from_rgb(255, 120, 100),
                format!("{}: {err}", t("status.error")),
            );
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("scene-demos v", env!("CARGO_PKG_VERSION")));
        });
    });
}

fn show_trainer(ui: &mut Ui, state: &AppState) {
    let session = state.trainer.session();
    let trials = state.trainer.config().trials_per_session;

    ui.weak(format!("{}: {}/{trials}", t("status.trial"), session.trial_index));

    if state.trainer.is_hovered() {
        ui.separator();
        ui.colored_label(egui::Color32::from_rgb(255, 200, 100), t("status.on_target"));
    }

    if !session.result_text.is_empty() {
        ui.separator();
        ui.label(format!("{}: {}", t("status.last"), session.result_text.replace('\n', " ")));
    }

    if let Some(best) = session.best {
        ui.separator();
        ui.label(format!("{}: {} ms", t("status.best"), best.as_millis()));
        ui.weak(format!("({} {})", session.completed_cycles, t("status.cycles")));
    }
}
