//! Aim trainer session controller.
//!
//! Owns the trial counter, the single reusable target and the result of the
//! last pointer intersection test. The viewport feeds it pointer moves, clicks,
//! resizes and exactly one frame tick per rendered frame; nothing here knows
//! about egui.

use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{viewport_aspect, ConfigError, Rgb, TrainerConfig};

use crate::clock::{Clock, SystemClock};
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::mesh::{self, MeshData};
use crate::viewport::picking::{pick_mesh, Aabb, Ray, TriangleHit};

/// Label shown on the target before the first hit
pub const START_LABEL: &str = "start";

/// Where the aim trainer camera sits, looking at the origin
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 0.0, 8.0);

/// Session driven by the wall clock and an entropy-seeded generator
pub type LiveSession = TargetSession<SystemClock, StdRng>;

/// Visual state of the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Not yet tested against the pointer
    Initial,
    Idle,
    Hovered,
}

/// The one target of the session, moved in place after every hit
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub position: Vec3,
    pub scale: f32,
    pub label: String,
    pub highlight: Highlight,
}

/// Progress through the current cycle of trials
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Hits so far in the current cycle
    pub trial_index: u32,
    /// Time of the first hit of the cycle. Kept after a cycle completes,
    /// overwritten by the next cycle's first hit.
    pub start: Option<Instant>,
    /// Last result string, empty until a cycle completes
    pub result_text: String,
    pub completed_cycles: u32,
    pub best: Option<Duration>,
}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The pointer was not on the target at the last frame tick
    Missed,
    /// Trial `trial` (1-based) done, target moved
    Hit { trial: u32 },
    /// Last trial of the cycle done
    Completed { elapsed: Duration },
}

/// Format the result shown on the target after the last trial
pub fn format_result(elapsed: Duration) -> String {
    format!("Result\n{} ms", elapsed.as_millis())
}

pub struct TargetSession<C: Clock, R: Rng> {
    config: TrainerConfig,
    session: Session,
    target: Target,
    /// Target geometry in local space (scale 1, centered at the origin)
    mesh: MeshData,
    aabb: Aabb,
    /// Pointer in normalized device coordinates
    pointer: Vec2,
    aspect: f32,
    current_hit: Option<TriangleHit>,
    clock: C,
    rng: R,
}

impl LiveSession {
    pub fn live(config: TrainerConfig) -> Result<Self, ConfigError> {
        Self::new(config, SystemClock, StdRng::from_entropy())
    }

    pub fn live_defaults() -> Self {
        Self::with_defaults(SystemClock, StdRng::from_entropy())
    }
}

impl<C: Clock, R: Rng> TargetSession<C, R> {
    /// Create a session and place the target once.
    pub fn new(config: TrainerConfig, clock: C, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, clock, rng))
    }

    /// Session with the default configuration (always valid)
    pub fn with_defaults(clock: C, rng: R) -> Self {
        Self::build(TrainerConfig::default(), clock, rng)
    }

    fn build(config: TrainerConfig, clock: C, rng: R) -> Self {
        let mesh = target_mesh(&config);
        let aabb = Aabb::from_mesh(&mesh);
        let mut session = Self {
            config,
            session: Session::default(),
            target: Target {
                position: Vec3::ZERO,
                scale: 1.0,
                label: START_LABEL.to_string(),
                highlight: Highlight::Initial,
            },
            mesh,
            aabb,
            pointer: Vec2::ZERO,
            aspect: 1.0,
            current_hit: None,
            clock,
            rng,
        };
        session.relocate();
        session
    }

    // ── Input ─────────────────────────────────────────────────

    /// Store the pointer in normalized coordinates (x right, y up, [-1, 1]).
    pub fn on_pointer_move(&mut self, normalized_x: f32, normalized_y: f32) {
        self.pointer = Vec2::new(normalized_x, normalized_y);
    }

    /// Track the viewport aspect ratio, which bounds where targets spawn.
    pub fn on_resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        self.aspect = viewport_aspect(width, height)?;
        Ok(())
    }

    /// Intersection test for this frame. Must run once per rendered frame.
    pub fn on_frame_tick(&mut self, camera: &ArcBallCamera) -> bool {
        let hit = self.intersect(&camera.ndc_ray(self.pointer, self.aspect));

        match (self.current_hit, hit) {
            (None, Some(h)) => tracing::debug!(
                "pointer entered target (triangle {}, normal {:?})",
                h.triangle_index,
                h.normal
            ),
            (Some(_), None) => tracing::debug!("pointer left target"),
            _ => {}
        }

        self.current_hit = hit;
        self.target.highlight = if hit.is_some() {
            Highlight::Hovered
        } else {
            Highlight::Idle
        };
        hit.is_some()
    }

    /// Advance the session if the last frame tick found the pointer on the target.
    pub fn on_click(&mut self) -> ClickOutcome {
        if self.current_hit.is_none() {
            return ClickOutcome::Missed;
        }

        let now = self.clock.now();
        let trial = self.session.trial_index;
        if trial == 0 {
            self.session.start = Some(now);
        }

        self.relocate();
        self.target.label = (trial + 1).to_string();

        if trial + 1 >= self.config.trials_per_session {
            let elapsed = self
                .session
                .start
                .map(|start| now.saturating_duration_since(start))
                .unwrap_or_default();
            let text = format_result(elapsed);
            self.target.label = text.clone();
            self.session.result_text = text;
            self.session.trial_index = 0;
            self.session.completed_cycles += 1;
            if self.session.best.map_or(true, |best| elapsed < best) {
                self.session.best = Some(elapsed);
            }
            tracing::info!(
                "Session complete: {} ms over {} trials",
                elapsed.as_millis(),
                self.config.trials_per_session
            );
            ClickOutcome::Completed { elapsed }
        } else {
            self.session.trial_index += 1;
            tracing::debug!("Trial {} hit", trial + 1);
            ClickOutcome::Hit { trial: trial + 1 }
        }
    }

    /// Forget the last intersection. Used when frame ticks stop, so a
    /// later click is not judged against a stale hover.
    pub fn invalidate_hit(&mut self) {
        self.current_hit = None;
        if self.target.highlight == Highlight::Hovered {
            self.target.highlight = Highlight::Idle;
        }
    }

    // ── Control ───────────────────────────────────────────────

    /// Apply a new configuration. Changing the trial count restarts the cycle.
    pub fn set_config(&mut self, config: TrainerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let restart = config.trials_per_session != self.config.trials_per_session;
        let reshape = config.target_radius != self.config.target_radius
            || config.target_segments != self.config.target_segments;
        self.config = config;
        if reshape {
            self.mesh = target_mesh(&self.config);
            self.aabb = Aabb::from_mesh(&self.mesh);
            self.current_hit = None;
        }
        if restart {
            self.reset();
        }
        Ok(())
    }

    /// Start over: counter at 0, no start time, target back to "start".
    pub fn reset(&mut self) {
        let best = self.session.best;
        let completed_cycles = self.session.completed_cycles;
        self.session = Session {
            best,
            completed_cycles,
            ..Session::default()
        };
        self.target.label = START_LABEL.to_string();
        self.target.highlight = Highlight::Initial;
        self.current_hit = None;
        self.relocate();
        tracing::info!("Session reset");
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Target geometry in local space; world = position + scale * local
    pub fn target_mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn is_hovered(&self) -> bool {
        self.current_hit.is_some()
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Radius of the disc new targets spawn in
    pub fn spawn_radius(&self) -> f32 {
        self.config.spawn_radius_per_aspect * self.aspect
    }

    /// Current fill color of the target
    pub fn target_color(&self) -> Rgb {
        match self.target.highlight {
            Highlight::Initial => self.config.initial_color,
            Highlight::Idle => self.config.idle_color,
            Highlight::Hovered => self.config.hover_color,
        }
    }

    /// Camera looking at the spawn plane
    pub fn camera(&self) -> ArcBallCamera {
        ArcBallCamera::from_eye(CAMERA_EYE, Vec3::ZERO, &self.config.camera)
    }

    // ── Internals ─────────────────────────────────────────────

    fn intersect(&self, ray: &Ray) -> Option<TriangleHit> {
        let local = ray.to_local(self.target.position, self.target.scale);
        pick_mesh(&local, &self.mesh, &self.aabb)
    }

    /// Move the target to a random spot in the spawn disc with a random scale.
    fn relocate(&mut self) {
        let radius_bound = self.spawn_radius();
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let radius = self.rng.gen_range(-radius_bound..=radius_bound);
        self.target.position = Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0);
        self.target.scale = self
            .rng
            .gen_range(self.config.scale_min..=self.config.scale_max);
    }
}

fn target_mesh(config: &TrainerConfig) -> MeshData {
    mesh::circle(
        config.target_radius,
        config.target_segments,
        config.idle_color.to_f32(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn session(seed: u64) -> (TargetSession<ManualClock, StdRng>, ManualClock) {
        let clock = ManualClock::new();
        let s = TargetSession::new(
            TrainerConfig::default(),
            clock.clone(),
            StdRng::seed_from_u64(seed),
        )
        .unwrap();
        (s, clock)
    }

    fn aim_and_tick(s: &mut TargetSession<ManualClock, StdRng>) -> bool {
        let camera = s.camera();
        let ndc = camera
            .project_ndc(s.target().position, s.aspect())
            .expect("target in front of camera");
        s.on_pointer_move(ndc.x, ndc.y);
        s.on_frame_tick(&camera)
    }

    fn miss_and_tick(s: &mut TargetSession<ManualClock, StdRng>) -> bool {
        // Far corner of the view; targets never spawn there
        s.on_pointer_move(-1.0, 1.0);
        let camera = s.camera();
        s.on_frame_tick(&camera)
    }

    #[test]
    fn test_initial_state() {
        let (s, _) = session(1);
        assert_eq!(s.session().trial_index, 0);
        assert!(s.session().start.is_none());
        assert_eq!(s.target().label, START_LABEL);
        assert_eq!(s.target().highlight, Highlight::Initial);
        assert_eq!(s.target_color(), s.config().initial_color);
    }

    #[test]
    fn test_click_without_hit_is_ignored() {
        let (mut s, _) = session(2);
        assert!(!miss_and_tick(&mut s));
        let before = s.target().clone();

        assert_eq!(s.on_click(), ClickOutcome::Missed);
        assert_eq!(s.session().trial_index, 0);
        assert_eq!(s.target().position, before.position);
        assert_eq!(s.target().label, before.label);
        assert!(s.session().start.is_none());
    }

    #[test]
    fn test_first_hit_sets_start_and_label() {
        let (mut s, clock) = session(3);
        clock.advance_ms(40);
        assert!(aim_and_tick(&mut s));
        assert_eq!(s.target().highlight, Highlight::Hovered);

        assert_eq!(s.on_click(), ClickOutcome::Hit { trial: 1 });
        assert_eq!(s.session().trial_index, 1);
        assert_eq!(s.session().start, Some(clock.now()));
        assert_eq!(s.target().label, "1");
    }

    #[test]
    fn test_full_cycle_reports_elapsed() {
        let (mut s, clock) = session(4);
        let mut outcome = ClickOutcome::Missed;
        for _ in 0..10 {
            assert!(aim_and_tick(&mut s));
            outcome = s.on_click();
            clock.advance_ms(100);
        }

        assert_eq!(
            outcome,
            ClickOutcome::Completed {
                elapsed: Duration::from_millis(900)
            }
        );
        assert_eq!(s.session().trial_index, 0);
        assert!(s.target().label.contains("900"));
        assert_eq!(s.session().result_text, s.target().label);
        assert_eq!(s.session().completed_cycles, 1);
        assert_eq!(s.session().best, Some(Duration::from_millis(900)));
    }

    #[test]
    fn test_start_kept_after_wrap_until_next_first_hit() {
        let (mut s, clock) = session(5);
        for _ in 0..10 {
            aim_and_tick(&mut s);
            s.on_click();
            clock.advance_ms(10);
        }
        let first_start = s.session().start;
        assert!(first_start.is_some());

        clock.advance_ms(500);
        aim_and_tick(&mut s);
        s.on_click();
        assert_ne!(s.session().start, first_start);
        assert_eq!(s.session().start, Some(clock.now()));
    }

    #[test]
    fn test_stale_hit_counts_until_next_tick() {
        let (mut s, _) = session(6);
        aim_and_tick(&mut s);
        assert_eq!(s.on_click(), ClickOutcome::Hit { trial: 1 });
        // No frame in between: the last tick was still a hit
        assert_eq!(s.on_click(), ClickOutcome::Hit { trial: 2 });
    }

    #[test]
    fn test_relocation_stays_in_bounds() {
        let (mut s, _) = session(7);
        s.on_resize(1920.0, 1080.0).unwrap();
        let bound = s.spawn_radius();
        for _ in 0..500 {
            s.relocate();
            let t = s.target();
            assert!(t.position.length() <= bound + 1e-4);
            assert_eq!(t.position.z, 0.0);
            assert!((0.5..=1.5).contains(&t.scale));
        }
    }

    #[test]
    fn test_relocation_at_config_limits() {
        let config = TrainerConfig {
            spawn_radius_per_aspect: TrainerConfig::SPAWN_RADIUS_MAX,
            scale_max: TrainerConfig::SCALE_LIMIT,
            ..Default::default()
        };
        let mut s = TargetSession::new(config, ManualClock::new(), StdRng::seed_from_u64(12)).unwrap();
        s.on_resize(6400.0, 100.0).unwrap();
        for _ in 0..100 {
            s.relocate();
            assert!(s.target().position.is_finite());
            assert!(s.target().position.length() <= s.spawn_radius() * 1.0001);
        }
    }

    #[test]
    fn test_invalidated_hit_makes_click_miss() {
        let (mut s, _) = session(13);
        assert!(aim_and_tick(&mut s));
        s.invalidate_hit();
        assert!(!s.is_hovered());
        assert_eq!(s.target().highlight, Highlight::Idle);
        assert_eq!(s.on_click(), ClickOutcome::Missed);
        assert_eq!(s.session().trial_index, 0);
    }

    #[test]
    fn test_invalid_resize_rejected() {
        let (mut s, _) = session(8);
        s.on_resize(800.0, 600.0).unwrap();
        assert!(s.on_resize(800.0, 0.0).is_err());
        assert!((s.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_config_validates() {
        let (mut s, _) = session(9);
        let bad = TrainerConfig {
            scale_min: -1.0,
            ..Default::default()
        };
        assert!(s.set_config(bad).is_err());
        assert_eq!(s.config(), &TrainerConfig::default());
    }

    #[test]
    fn test_changing_trial_count_restarts_cycle() {
        let (mut s, _) = session(10);
        aim_and_tick(&mut s);
        s.on_click();
        assert_eq!(s.session().trial_index, 1);

        let shorter = TrainerConfig {
            trials_per_session: 3,
            ..Default::default()
        };
        s.set_config(shorter).unwrap();
        assert_eq!(s.session().trial_index, 0);
        assert_eq!(s.target().label, START_LABEL);

        for _ in 0..3 {
            aim_and_tick(&mut s);
            s.on_click();
        }
        assert_eq!(s.session().completed_cycles, 1);
    }

    #[test]
    fn test_reset_keeps_best() {
        let (mut s, clock) = session(11);
        for _ in 0..10 {
            aim_and_tick(&mut s);
            s.on_click();
            clock.advance_ms(50);
        }
        aim_and_tick(&mut s);
        s.on_click();
        s.reset();
        assert_eq!(s.session().trial_index, 0);
        assert!(s.session().start.is_none());
        assert_eq!(s.session().best, Some(Duration::from_millis(450)));
        assert_eq!(s.target().label, START_LABEL);
    }
}
