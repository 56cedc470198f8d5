//! Headless test harness for the aim trainer.
//!
//! Drives a `TargetSession` the way the viewport does (pointer move, frame
//! tick, click) but with a manual clock and a seeded generator.

use std::time::Duration;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{ConfigError, TrainerConfig};

use crate::clock::ManualClock;
use crate::trainer::{ClickOutcome, Session, Target, TargetSession};
use crate::viewport::camera::ArcBallCamera;

/// Pointer position that no target can reach (top-left corner of the view)
const AWAY: Vec2 = Vec2::new(-1.0, 1.0);

pub struct TrainerHarness {
    pub session: TargetSession<ManualClock, StdRng>,
    pub clock: ManualClock,
    camera: ArcBallCamera,
}

impl TrainerHarness {
    /// Default config, 800x600 viewport.
    pub fn new(seed: u64) -> Self {
        Self::with_config(TrainerConfig::default(), seed)
            .unwrap_or_else(|_| unreachable!("default trainer config is valid"))
    }

    pub fn with_config(config: TrainerConfig, seed: u64) -> Result<Self, ConfigError> {
        let clock = ManualClock::new();
        let mut session = TargetSession::new(config, clock.clone(), StdRng::seed_from_u64(seed))?;
        session.on_resize(800.0, 600.0)?;
        let camera = session.camera();
        Ok(Self {
            session,
            clock,
            camera,
        })
    }

    // ── Input ─────────────────────────────────────────────────

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        self.session.on_resize(width, height)
    }

    /// Move the pointer onto the projected target center.
    pub fn aim_at_target(&mut self) {
        let ndc = self
            .camera
            .project_ndc(self.session.target().position, self.session.aspect())
            .unwrap_or(AWAY);
        self.session.on_pointer_move(ndc.x, ndc.y);
    }

    pub fn aim_away(&mut self) {
        self.session.on_pointer_move(AWAY.x, AWAY.y);
    }

    pub fn point_at(&mut self, ndc: Vec2) {
        self.session.on_pointer_move(ndc.x, ndc.y);
    }

    /// One rendered frame
    pub fn tick(&mut self) -> bool {
        self.session.on_frame_tick(&self.camera)
    }

    pub fn click(&mut self) -> ClickOutcome {
        self.session.on_click()
    }

    /// Aim, tick, click: one valid hit
    pub fn hit(&mut self) -> ClickOutcome {
        self.aim_at_target();
        self.tick();
        self.click()
    }

    /// Aim away, tick, click: one miss
    pub fn miss(&mut self) -> ClickOutcome {
        self.aim_away();
        self.tick();
        self.click()
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.clock.advance_ms(ms);
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn state(&self) -> &Session {
        self.session.session()
    }

    pub fn target(&self) -> &Target {
        self.session.target()
    }

    pub fn trial_index(&self) -> u32 {
        self.session.session().trial_index
    }

    pub fn label(&self) -> &str {
        &self.session.target().label
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn camera(&self) -> &ArcBallCamera {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_harness_fresh_session() {
        let h = TrainerHarness::new(1);
        assert_eq!(h.trial_index(), 0);
        assert_eq!(h.label(), "start");
        assert!((h.session.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_hit_and_miss() {
        let mut h = TrainerHarness::new(2);
        assert_eq!(h.miss(), ClickOutcome::Missed);
        assert_eq!(h.hit(), ClickOutcome::Hit { trial: 1 });
        assert_eq!(h.label(), "1");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = TrainerConfig {
            trials_per_session: 0,
            ..Default::default()
        };
        assert!(TrainerHarness::with_config(cfg, 3).is_err());
    }
}
