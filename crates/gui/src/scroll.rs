//! Scroll-through-sections demo.
//!
//! The page is `SECTION_COUNT` viewport heights tall. Scrolling moves the
//! camera down past one shape per section; entering a section starts a spin
//! of that section's shape. The pointer adds an eased parallax offset.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use rand::Rng;
use shared::{ConfigError, ScrollConfig};

use crate::scene::{Instance, Lighting};
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::mesh::Shape;

pub const SECTION_COUNT: usize = 3;

/// Camera distance in front of the shapes
pub const CAMERA_Z: f32 = 6.0;

/// Rotation added by one section-change spin (radians per axis)
pub const SPIN_DELTA: Vec3 = Vec3::new(6.0, 3.0, 1.5);

/// Continuous rotation of every shape (radians per second, X and Y)
pub const IDLE_SPIN: Vec2 = Vec2::new(0.1, 0.12);

const SHAPES: [Shape; SECTION_COUNT] = [Shape::Torus, Shape::Cone, Shape::TorusKnot];

/// Shapes alternate sides: right, left, right
const SIDE_X: [f32; SECTION_COUNT] = [2.0, -2.0, 2.0];

/// Horizontal extent of the star field
const STAR_SPREAD: f32 = 10.0;

/// Section under the viewport, `round(scroll / height)`
pub fn section_index(scroll_y: f32, viewport_height: f32) -> usize {
    if !(viewport_height > 0.0) || !(scroll_y > 0.0) {
        return 0;
    }
    ((scroll_y / viewport_height).round() as usize).min(SECTION_COUNT - 1)
}

/// Camera height for a scroll offset: one section per viewport height
pub fn camera_y(scroll_y: f32, viewport_height: f32, section_distance: f32) -> f32 {
    if !(viewport_height > 0.0) {
        return 0.0;
    }
    -scroll_y / viewport_height * section_distance
}

/// Where the parallax offset heads for a pointer in [-0.5, 0.5] (y down)
pub fn parallax_target(pointer: Vec2, amount: f32) -> Vec2 {
    Vec2::new(pointer.x * amount, -pointer.y * amount)
}

/// Move `current` towards `target` by `rate * dt` of the gap. A long frame
/// lands on the target instead of overshooting it.
pub fn ease_toward(current: Vec2, target: Vec2, rate: f32, dt: f32) -> Vec2 {
    let step = (rate * dt).clamp(0.0, 1.0);
    current + (target - current) * step
}

/// Quadratic ease-in-out on [0, 1]
pub fn power2_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// A running section-change spin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    elapsed: f32,
    duration: f32,
}

impl Spin {
    fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
        }
    }

    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Rotation added so far
    pub fn offset(&self) -> Vec3 {
        SPIN_DELTA * power2_in_out(self.progress())
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionMesh {
    pub shape: Shape,
    pub position: Vec3,
    /// Rotation without the running spin
    base_rotation: Vec3,
    spin: Option<Spin>,
}

impl SectionMesh {
    pub fn rotation(&self) -> Vec3 {
        self.base_rotation + self.spin.map_or(Vec3::ZERO, |s| s.offset())
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    /// Start a new spin from wherever the shape is now
    fn start_spin(&mut self, duration: f32) {
        if let Some(old) = self.spin.take() {
            self.base_rotation += old.offset();
        }
        self.spin = Some(Spin::new(duration));
    }

    fn advance(&mut self, dt: f32) {
        self.base_rotation.x += IDLE_SPIN.x * dt;
        self.base_rotation.y += IDLE_SPIN.y * dt;
        if let Some(spin) = self.spin.as_mut() {
            spin.elapsed += dt;
            if spin.is_done() {
                self.base_rotation += SPIN_DELTA;
                self.spin = None;
            }
        }
    }
}

pub struct ScrollScene {
    config: ScrollConfig,
    sections: Vec<SectionMesh>,
    stars: Arc<Vec<f32>>,
    star_colors: Arc<Vec<f32>>,
    /// Scroll offset in pixels, 0 at the top of the first section
    scroll_y: f32,
    viewport_height: f32,
    /// Pointer relative to the viewport center, [-0.5, 0.5], y down
    pointer: Vec2,
    parallax: Vec2,
    current_section: usize,
    version: u64,
}

impl ScrollScene {
    pub fn new<R: Rng>(config: ScrollConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    /// Scene with the default configuration (always valid)
    pub fn with_defaults<R: Rng>(rng: &mut R) -> Self {
        Self::build(ScrollConfig::default(), rng)
    }

    fn build<R: Rng>(config: ScrollConfig, rng: &mut R) -> Self {
        let sections = SHAPES
            .iter()
            .zip(SIDE_X)
            .enumerate()
            .map(|(i, (&shape, x))| SectionMesh {
                shape,
                position: Vec3::new(x, -config.section_distance * i as f32, 0.0),
                base_rotation: Vec3::ZERO,
                spin: None,
            })
            .collect();
        let stars = Arc::new(scatter_stars(&config, rng));
        let star_colors = star_colors(&config);

        Self {
            config,
            sections,
            stars,
            star_colors,
            scroll_y: 0.0,
            viewport_height: 1.0,
            pointer: Vec2::ZERO,
            parallax: Vec2::ZERO,
            current_section: 0,
            version: 0,
        }
    }

    /// Apply a new configuration. Stars are scattered again, scroll and
    /// spins carry over.
    pub fn set_config<R: Rng>(&mut self, config: ScrollConfig, rng: &mut R) -> Result<(), ConfigError> {
        config.validate()?;
        for (i, section) in self.sections.iter_mut().enumerate() {
            section.position.y = -config.section_distance * i as f32;
        }
        self.stars = Arc::new(scatter_stars(&config, rng));
        self.star_colors = star_colors(&config);
        self.config = config;
        self.version += 1;
        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────

    /// Keep the same place on the page when the viewport height changes.
    pub fn on_resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        shared::viewport_aspect(width, height)?;
        self.scroll_y *= height / self.viewport_height;
        self.viewport_height = height;
        Ok(())
    }

    /// Scroll by `delta` pixels (positive scrolls down the page).
    /// Returns the new section when the scroll crosses into one.
    pub fn on_scroll(&mut self, delta: f32) -> Option<usize> {
        if !delta.is_finite() {
            return None;
        }
        self.scroll_y = (self.scroll_y + delta).clamp(0.0, self.max_scroll());

        let section = section_index(self.scroll_y, self.viewport_height);
        if section == self.current_section {
            return None;
        }
        self.current_section = section;
        self.sections[section].start_spin(self.config.spin_seconds);
        tracing::debug!("Entered section {section}");
        Some(section)
    }

    /// Pointer in viewport fractions: (0, 0) top-left, (1, 1) bottom-right
    pub fn on_pointer_move(&mut self, fx: f32, fy: f32) {
        self.pointer = Vec2::new(fx - 0.5, fy - 0.5);
    }

    /// Advance animations by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        let target = parallax_target(self.pointer, self.config.parallax_amount);
        self.parallax = ease_toward(self.parallax, target, self.config.parallax_ease, dt);
        for section in &mut self.sections {
            section.advance(dt);
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn sections(&self) -> &[SectionMesh] {
        &self.sections
    }

    pub fn current_section(&self) -> usize {
        self.current_section
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn max_scroll(&self) -> f32 {
        (SECTION_COUNT - 1) as f32 * self.viewport_height
    }

    pub fn parallax(&self) -> Vec2 {
        self.parallax
    }

    /// 3 floats per star
    pub fn stars(&self) -> &[f32] {
        &self.stars
    }

    /// Star buffers for the renderer, shared without copying
    pub fn shared_stars(&self) -> (Arc<Vec<f32>>, Arc<Vec<f32>>) {
        (Arc::clone(&self.stars), Arc::clone(&self.star_colors))
    }

    /// Bumped whenever the stars are scattered again
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn camera_position(&self) -> Vec3 {
        let y = camera_y(self.scroll_y, self.viewport_height, self.config.section_distance);
        Vec3::new(self.parallax.x, y + self.parallax.y, CAMERA_Z)
    }

    /// Camera looking straight down -Z from `camera_position`
    pub fn camera(&self) -> ArcBallCamera {
        let eye = self.camera_position();
        ArcBallCamera::from_eye(eye, eye - Vec3::Z * CAMERA_Z, &self.config.camera)
    }

    pub fn instances(&self) -> Vec<Instance> {
        self.sections
            .iter()
            .map(|s| {
                Instance::new(s.shape, self.config.material_color).placed(s.position, s.rotation(), Vec3::ONE)
            })
            .collect()
    }

    /// White light from the upper right, three toon bands, no ambient
    pub fn lighting(&self) -> Lighting {
        Lighting {
            ambient: [0.0; 3],
            sun_direction: Vec3::new(1.0, 1.0, 0.0).normalize(),
            sun_color: [1.0; 3],
            toon_bands: 3,
            point_lights: Vec::new(),
            fog: None,
        }
    }
}

fn star_colors(config: &ScrollConfig) -> Arc<Vec<f32>> {
    let rgb = config.material_color.to_f32();
    Arc::new((0..config.star_count).flat_map(|_| rgb).collect())
}

/// Stars spread over the whole page height, from half a section above the
/// first shape to the bottom of the last section.
fn scatter_stars<R: Rng>(config: &ScrollConfig, rng: &mut R) -> Vec<f32> {
    let top = config.section_distance * 0.5;
    let depth = config.section_distance * SECTION_COUNT as f32;
    let mut stars = Vec::with_capacity(config.star_count as usize * 3);
    for _ in 0..config.star_count {
        stars.push((rng.gen::<f32>() - 0.5) * STAR_SPREAD);
        stars.push(top - rng.gen::<f32>() * depth);
        stars.push((rng.gen::<f32>() - 0.5) * STAR_SPREAD);
    }
    stars
}
