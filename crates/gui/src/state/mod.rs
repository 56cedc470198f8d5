pub mod settings;

use std::str::FromStr;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use shared::{ConfigError, HauntedConfig, ParticleConfig, ScrollConfig, TrainerConfig};

use crate::assets::{self, AlphaMap};
use crate::haunted::HauntedScene;
use crate::particles::ParticleField;
use crate::scroll::ScrollScene;
use crate::trainer::LiveSession;
pub use settings::{AppSettings, SettingsError, UiSettings, ViewportSettings};

/// Which demo the viewport shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DemoKind {
    #[default]
    #[serde(rename = "aim")]
    AimTrainer,
    #[serde(rename = "particles")]
    Particles,
    #[serde(rename = "scroll")]
    Scroll,
    #[serde(rename = "haunted")]
    Haunted,
}

impl DemoKind {
    pub const ALL: [DemoKind; 4] = [
        DemoKind::AimTrainer,
        DemoKind::Particles,
        DemoKind::Scroll,
        DemoKind::Haunted,
    ];

    /// Command-line and settings name
    pub fn name(self) -> &'static str {
        match self {
            DemoKind::AimTrainer => "aim",
            DemoKind::Particles => "particles",
            DemoKind::Scroll => "scroll",
            DemoKind::Haunted => "haunted",
        }
    }
}

impl FromStr for DemoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| format!("unknown demo '{s}' (expected aim, particles, scroll or haunted)"))
    }
}

/// Panel visibility flags
pub struct PanelVisibility {
    pub debug: bool,
    pub status_bar: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            debug: true,
            status_bar: true,
        }
    }
}

/// Combined application state
pub struct AppState {
    pub settings: AppSettings,
    pub demo: DemoKind,
    pub panels: PanelVisibility,
    pub trainer: LiveSession,
    pub particles: ParticleField,
    /// Alpha map for the current particle theme
    pub sprite: Arc<AlphaMap>,
    pub scroll: ScrollScene,
    pub haunted: HauntedScene,
    /// Last rejected debug panel edit, shown until the next successful one
    pub last_error: Option<String>,
    rng: StdRng,
}

impl AppState {
    /// Build the demos from (already validated) settings.
    pub fn from_settings(settings: AppSettings) -> Self {
        let mut rng = StdRng::from_entropy();

        let trainer = LiveSession::live(settings.trainer.clone()).unwrap_or_else(|e| {
            tracing::warn!("Trainer settings rejected, using defaults: {e}");
            LiveSession::live_defaults()
        });
        let particles = ParticleField::generate(settings.particles.clone(), &mut rng)
            .unwrap_or_else(|e| {
                tracing::warn!("Particle settings rejected, using defaults: {e}");
                ParticleField::with_defaults(&mut rng)
            });
        let sprite = assets::load_theme_or_fallback(&settings.asset_dir(), particles.config().theme);
        let scroll = ScrollScene::new(settings.scroll.clone(), &mut rng).unwrap_or_else(|e| {
            tracing::warn!("Scroll settings rejected, using defaults: {e}");
            ScrollScene::with_defaults(&mut rng)
        });
        let haunted = HauntedScene::new(settings.haunted.clone(), &mut rng).unwrap_or_else(|e| {
            tracing::warn!("Haunted house settings rejected, using defaults: {e}");
            HauntedScene::with_defaults(&mut rng)
        });

        Self {
            demo: settings.demo,
            panels: PanelVisibility {
                debug: settings.viewport.debug_panel,
                ..Default::default()
            },
            settings,
            trainer,
            particles,
            sprite: Arc::new(sprite),
            scroll,
            haunted,
            last_error: None,
            rng,
        }
    }

    pub fn switch_demo(&mut self, demo: DemoKind) {
        if self.demo != demo {
            tracing::info!("Switching to {demo:?}");
            // No frame ticks reach the trainer while another demo is shown
            self.trainer.invalidate_hit();
            self.demo = demo;
            self.settings.demo = demo;
        }
    }

    /// Apply an edited trainer config. On error the previous one stays active.
    pub fn apply_trainer_config(&mut self, config: TrainerConfig) -> Result<(), ConfigError> {
        let result = self.trainer.set_config(config.clone());
        self.record(&result);
        if result.is_ok() {
            self.settings.trainer = config;
        }
        result
    }

    /// Apply an edited particle config: rebuild the field and, if the theme
    /// changed, reload the sprite.
    pub fn apply_particle_config(&mut self, config: ParticleConfig) -> Result<(), ConfigError> {
        let theme_changed = config.theme != self.particles.config().theme;
        let result = self.particles.regenerate(config.clone(), &mut self.rng);
        self.record(&result);
        if result.is_ok() {
            if theme_changed {
                self.sprite = Arc::new(assets::load_theme_or_fallback(&self.settings.asset_dir(), config.theme));
            }
            self.settings.particles = config;
        }
        result
    }

    /// Apply an edited scroll config; stars are scattered again.
    pub fn apply_scroll_config(&mut self, config: ScrollConfig) -> Result<(), ConfigError> {
        let result = self.scroll.set_config(config.clone(), &mut self.rng);
        self.record(&result);
        if result.is_ok() {
            self.settings.scroll = config;
        }
        result
    }

    /// Apply an edited haunted house config; graves are placed again.
    pub fn apply_haunted_config(&mut self, config: HauntedConfig) -> Result<(), ConfigError> {
        let result = self.haunted.set_config(config.clone(), &mut self.rng);
        self.record(&result);
        if result.is_ok() {
            self.settings.haunted = config;
        }
        result
    }

    fn record(&mut self, result: &Result<(), ConfigError>) {
        match result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                tracing::warn!("Rejected config change: {e}");
                self.last_error = Some(e.to_string());
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_settings(AppSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trainer::ClickOutcome;

    #[test]
    fn test_demo_kind_parse() {
        assert_eq!("aim".parse::<DemoKind>(), Ok(DemoKind::AimTrainer));
        assert_eq!("particles".parse::<DemoKind>(), Ok(DemoKind::Particles));
        assert_eq!("scroll".parse::<DemoKind>(), Ok(DemoKind::Scroll));
        assert_eq!("haunted".parse::<DemoKind>(), Ok(DemoKind::Haunted));
        assert!("haunted-house".parse::<DemoKind>().is_err());
    }

    #[test]
    fn test_demo_kind_json_names() {
        assert_eq!(serde_json::to_string(&DemoKind::AimTrainer).unwrap(), "\"aim\"");
        for demo in DemoKind::ALL {
            let json = serde_json::to_string(&demo).unwrap();
            assert_eq!(json, format!("\"{}\"", demo.name()));
        }
    }

    #[test]
    fn test_rejected_edit_keeps_previous() {
        let mut state = AppState::default();
        let bad = ParticleConfig {
            size: 5.0,
            ..Default::default()
        };
        assert!(state.apply_particle_config(bad).is_err());
        assert!(state.last_error.is_some());
        assert_eq!(state.particles.config(), &ParticleConfig::default());
        assert_eq!(state.settings.particles, ParticleConfig::default());
    }

    #[test]
    fn test_accepted_edit_clears_error() {
        let mut state = AppState::default();
        state.last_error = Some("old".into());
        let cfg = TrainerConfig {
            trials_per_session: 4,
            ..Default::default()
        };
        state.apply_trainer_config(cfg).unwrap();
        assert!(state.last_error.is_none());
        assert_eq!(state.settings.trainer.trials_per_session, 4);
        assert_eq!(state.trainer.config().trials_per_session, 4);
    }

    #[test]
    fn test_switch_demo_drops_stale_hover() {
        let mut state = AppState::default();
        state.trainer.on_resize(800.0, 600.0).unwrap();
        let camera = state.trainer.camera();
        let ndc = camera
            .project_ndc(state.trainer.target().position, state.trainer.aspect())
            .unwrap();
        state.trainer.on_pointer_move(ndc.x, ndc.y);
        assert!(state.trainer.on_frame_tick(&camera));

        state.switch_demo(DemoKind::Particles);
        state.switch_demo(DemoKind::AimTrainer);
        assert_eq!(state.trainer.on_click(), ClickOutcome::Missed);
        assert_eq!(state.trainer.session().trial_index, 0);
    }

    #[test]
    fn test_scene_edits_recorded() {
        let mut state = AppState::default();
        let graves = HauntedConfig {
            grave_count: 12,
            ..Default::default()
        };
        state.apply_haunted_config(graves).unwrap();
        assert_eq!(state.haunted.graves().len(), 12);
        assert_eq!(state.settings.haunted.grave_count, 12);

        let bad = ScrollConfig {
            section_distance: 0.0,
            ..Default::default()
        };
        assert!(state.apply_scroll_config(bad).is_err());
        assert!(state.last_error.as_deref().unwrap_or("").contains("section_distance"));
        assert_eq!(state.settings.scroll, ScrollConfig::default());
    }

    #[test]
    fn test_switch_demo_updates_settings() {
        let mut state = AppState::default();
        state.switch_demo(DemoKind::Particles);
        assert_eq!(state.demo, DemoKind::Particles);
        assert_eq!(state.settings.demo, DemoKind::Particles);
    }
}
