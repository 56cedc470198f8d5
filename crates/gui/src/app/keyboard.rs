//! Keyboard shortcut handling

use eframe::egui;

use crate::state::{AppState, DemoKind};
use crate::viewport;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (toggle_panel, reset, fullscreen, demo) = ctx.input(|i| {
        let demo = if i.key_pressed(egui::Key::Num1) {
            Some(DemoKind::AimTrainer)
        } else if i.key_pressed(egui::Key::Num2) {
            Some(DemoKind::Particles)
        } else if i.key_pressed(egui::Key::Num3) {
            Some(DemoKind::Scroll)
        } else if i.key_pressed(egui::Key::Num4) {
            Some(DemoKind::Haunted)
        } else {
            None
        };
        (
            i.key_pressed(egui::Key::H),
            i.key_pressed(egui::Key::R),
            i.key_pressed(egui::Key::F11),
            demo,
        )
    });

    // H: show / hide debug panel
    if toggle_panel {
        state.panels.debug = !state.panels.debug;
    }
    // R: restart the trainer session
    if reset && state.demo == DemoKind::AimTrainer {
        state.trainer.reset();
    }
    if fullscreen {
        viewport::toggle_fullscreen(ctx);
    }
    if let Some(demo) = demo {
        state.switch_demo(demo);
    }
}
