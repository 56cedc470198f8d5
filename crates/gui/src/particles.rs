//! Point-cloud demo: random positions and colors, animated as a sine wave along X.

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;
use shared::{ConfigError, ParticleConfig};

/// Where the particles camera sits, looking at the origin
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 5.0, 8.0);

/// CPU-side particle buffers: 3 floats per particle in each.
/// The buffers are shared with the renderer; `animate` copies the positions
/// only while a frame still holds the previous ones.
pub struct ParticleField {
    config: ParticleConfig,
    positions: Arc<Vec<f32>>,
    colors: Arc<Vec<f32>>,
    /// Bumped on every regeneration so the GPU side knows to re-upload
    version: u64,
}

impl ParticleField {
    pub fn generate<R: Rng>(config: ParticleConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng, 0))
    }

    /// Field with the default configuration (always valid)
    pub fn with_defaults<R: Rng>(rng: &mut R) -> Self {
        Self::build(ParticleConfig::default(), rng, 0)
    }

    fn build<R: Rng>(config: ParticleConfig, rng: &mut R, version: u64) -> Self {
        let len = config.count as usize * 3;
        let half = config.spread * 0.5;

        let mut positions = Vec::with_capacity(len);
        let mut colors = Vec::with_capacity(len);
        for _ in 0..len {
            positions.push(rng.gen_range(-half..half));
            colors.push(rng.gen::<f32>());
        }

        tracing::debug!("Generated {} particles (v{version})", config.count);
        Self {
            config,
            positions: Arc::new(positions),
            colors: Arc::new(colors),
            version,
        }
    }

    /// Throw the old buffers away and build new ones from `config`.
    /// An invalid config leaves the field untouched.
    pub fn regenerate<R: Rng>(&mut self, config: ParticleConfig, rng: &mut R) -> Result<(), ConfigError> {
        config.validate()?;
        *self = Self::build(config, rng, self.version + 1);
        Ok(())
    }

    /// Per-frame wave: y = sin(t + x) for every particle.
    pub fn animate(&mut self, elapsed_seconds: f32) {
        for p in Arc::make_mut(&mut self.positions).chunks_exact_mut(3) {
            p[1] = (elapsed_seconds + p[0]).sin();
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Handle to the position buffer as of now
    pub fn shared_positions(&self) -> Arc<Vec<f32>> {
        Arc::clone(&self.positions)
    }

    pub fn shared_colors(&self) -> Arc<Vec<f32>> {
        Arc::clone(&self.colors)
    }

    pub fn count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small() -> ParticleConfig {
        ParticleConfig {
            count: 500,
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let field = ParticleField::generate(small(), &mut rng).unwrap();

        assert_eq!(field.count(), 500);
        assert_eq!(field.colors().len(), 1500);
        assert!(field.positions().iter().all(|v| (-5.0..5.0).contains(v)));
        assert!(field.colors().iter().all(|c| (0.0..1.0).contains(c)));
    }

    #[test]
    fn test_animate_wave() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = ParticleField::generate(small(), &mut rng).unwrap();
        let before = field.positions().to_vec();

        field.animate(1.25);
        for (old, new) in before.chunks_exact(3).zip(field.positions().chunks_exact(3)) {
            assert_eq!(old[0], new[0]);
            assert_eq!(old[2], new[2]);
            assert!((new[1] - (1.25 + new[0]).sin()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_shared_buffers_copy_on_write() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut field = ParticleField::generate(small(), &mut rng).unwrap();

        // No outstanding handle: animated in place
        let before = Arc::as_ptr(&field.positions);
        field.animate(0.5);
        assert_eq!(Arc::as_ptr(&field.positions), before);

        // A frame still holds the old positions: they stay untouched
        let held = field.shared_positions();
        field.animate(2.0);
        assert!(!Arc::ptr_eq(&held, &field.shared_positions()));
        assert!((held[1] - (0.5 + held[0]).sin()).abs() < 1e-6);
        assert!(Arc::ptr_eq(&field.shared_colors(), &field.shared_colors()));
    }

    #[test]
    fn test_regenerate_bumps_version() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = ParticleField::generate(small(), &mut rng).unwrap();
        assert_eq!(field.version(), 0);

        let bigger = ParticleConfig {
            count: 2000,
            ..Default::default()
        };
        field.regenerate(bigger, &mut rng).unwrap();
        assert_eq!(field.version(), 1);
        assert_eq!(field.count(), 2000);
    }

    #[test]
    fn test_regenerate_rejects_invalid() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = ParticleField::generate(small(), &mut rng).unwrap();

        let bad = ParticleConfig {
            count: 10,
            ..Default::default()
        };
        assert!(field.regenerate(bad, &mut rng).is_err());
        assert_eq!(field.count(), 500);
        assert_eq!(field.version(), 0);
    }
}
