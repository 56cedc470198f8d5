//! Application menu bar

use eframe::egui;

use crate::i18n::{lang, set_lang, t, Lang};
use crate::state::{AppState, DemoKind};
use crate::viewport::{self, ViewportPanel};

/// Show the application menu
pub fn app_menu(ui: &mut egui::Ui, save: &mut bool) {
    ui.menu_button(t("menu.app"), |ui| {
        if ui.button(t("menu.save_settings")).clicked() {
            *save = true;
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the demo menu
pub fn demo_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.demo"), |ui| {
        for demo in DemoKind::ALL {
            let label = match demo {
                DemoKind::AimTrainer => t("menu.aim"),
                DemoKind::Particles => t("menu.particles"),
                DemoKind::Scroll => t("menu.scroll"),
                DemoKind::Haunted => t("menu.haunted"),
            };
            if ui.selectable_label(state.demo == demo, label).clicked() {
                state.switch_demo(demo);
                ui.close_menu();
            }
        }
        ui.separator();
        if ui
            .add_enabled(
                state.demo == DemoKind::AimTrainer,
                egui::Button::new(t("menu.reset_session")),
            )
            .clicked()
        {
            state.trainer.reset();
            ui.close_menu();
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.panels.debug, t("menu.debug_panel"));
        ui.checkbox(&mut state.panels.status_bar, t("menu.status_bar"));
        ui.separator();
        if ui.button(t("menu.fullscreen")).clicked() {
            viewport::toggle_fullscreen(ui.ctx());
            ui.close_menu();
        }
        if ui.button(t("menu.reset_camera")).clicked() {
            viewport.reset_camera(state);
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            if ui.selectable_label(lang() == Lang::Ru, "Русский").clicked() {
                set_lang(Lang::Ru);
                state.settings.ui.english = false;
                ui.close_menu();
            }
            if ui.selectable_label(lang() == Lang::En, "English").clicked() {
                set_lang(Lang::En);
                state.settings.ui.english = true;
                ui.close_menu();
            }
        });
    });
}
