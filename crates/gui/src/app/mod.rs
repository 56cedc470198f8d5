//! Main application module

mod keyboard;
mod menus;
mod styles;

use std::path::PathBuf;

use eframe::egui;

use crate::i18n::{set_lang, Lang};
use crate::state::{AppSettings, AppState, DemoKind};
use crate::ui::debug_panel::DebugPanel;
use crate::ui::status_bar;
use crate::viewport::ViewportPanel;

/// Start-up options from the command line
#[derive(Default)]
pub struct LaunchOptions {
    pub demo: Option<DemoKind>,
    /// Settings file used instead of the one in the user config dir
    pub settings_path: Option<PathBuf>,
}

/// Main application
pub struct DemoApp {
    state: AppState,
    viewport: ViewportPanel,
    debug_panel: DebugPanel,
    settings_path: Option<PathBuf>,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
    /// Settings as last written to disk
    last_saved: AppSettings,
}

impl DemoApp {
    pub fn new(cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let settings = match &options.settings_path {
            Some(path) => AppSettings::load_or_default(path),
            None => AppSettings::load(),
        };
        let last_saved = settings.clone();

        set_lang(if settings.ui.english { Lang::En } else { Lang::Ru });
        styles::configure_styles(&cc.egui_ctx, settings.ui.font_size);

        let mut state = AppState::from_settings(settings);
        if let Some(demo) = options.demo {
            state.switch_demo(demo);
        }

        let mut viewport = ViewportPanel::new(&state);
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        tracing::info!("Started with {:?}", state.demo);

        Self {
            last_font_size: state.settings.ui.font_size,
            state,
            viewport,
            debug_panel: DebugPanel::default(),
            settings_path: options.settings_path,
            last_saved,
        }
    }

    fn save_settings(&mut self) {
        match &self.settings_path {
            Some(path) => {
                if let Err(e) = self.state.settings.save_to(path) {
                    tracing::warn!("Failed to save settings to {}: {e}", path.display());
                }
            }
            None => self.state.settings.save(),
        }
        self.last_saved = self.state.settings.clone();
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.state.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.state.settings.ui.font_size);
            self.last_font_size = self.state.settings.ui.font_size;
        }

        keyboard::handle_keyboard(ctx, &mut self.state);

        // ── Menu bar ──────────────────────────────────────────
        let mut save = false;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::app_menu(ui, &mut save);
                menus::demo_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state, &mut self.viewport);
            });
        });

        // ── Status bar ───────────────────────────────────────
        if self.state.panels.status_bar {
            egui::TopBottomPanel::bottom("status_bar")
                .exact_height(22.0)
                .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)))
                .show(ctx, |ui| {
                    status_bar::show(ui, &self.state);
                });
        }

        // ── Right panel: debug controls ──────────────────────
        if self.state.panels.debug {
            egui::SidePanel::right("debug_panel")
                .default_width(280.0)
                .width_range(220.0..=420.0)
                .resizable(true)
                .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
                .show(ctx, |ui| {
                    self.debug_panel.show(ui, &mut self.state);
                });
        }

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });

        if save || self.state.settings != self.last_saved {
            self.save_settings();
        }
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
        tracing::info!("Shutting down");
    }
}
