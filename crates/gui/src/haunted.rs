//! Haunted house demo: a house among scattered graves, three ghost lights
//! circling it on closed-form orbits, all under distance fog.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::Vec3;
use rand::Rng;
use shared::{ConfigError, HauntedConfig, Rgb};

use crate::scene::{Fog, Instance, Lighting, PointLight};
use crate::viewport::mesh::Shape;

/// Where the orbit camera starts, looking at the origin
pub const CAMERA_EYE: Vec3 = Vec3::new(3.0, 3.0, 10.0);

pub const GHOST_COLORS: [Rgb; 3] = [
    Rgb([0xff, 0x00, 0xff]),
    Rgb([0x00, 0xff, 0xff]),
    Rgb([0xff, 0xff, 0x00]),
];
pub const GHOST_INTENSITY: f32 = 2.0;
pub const GHOST_RANGE: f32 = 3.0;

const WALLS: Vec3 = Vec3::new(4.0, 2.5, 4.0);
const ROOF_RADIUS: f32 = 3.5;
const ROOF_HEIGHT: f32 = 1.0;
const DOOR_SIZE: f32 = 2.2;
const GRAVE: Vec3 = Vec3::new(0.6, 0.8, 0.2);
const FLOOR_SIZE: f32 = 20.0;

/// Tilt of a grave around Y and Z stays within +-0.2 rad
const GRAVE_TILT: f32 = 0.4;

const MOON_COLOR: Rgb = Rgb([0xb9, 0xd5, 0xff]);
const MOON_INTENSITY: f32 = 0.12;
const DOOR_LIGHT: PointLight = PointLight {
    position: Vec3::new(0.0, 2.2, 2.7),
    color: Rgb([0xff, 0x7d, 0x46]),
    intensity: 1.0,
    range: 7.0,
};

const WALL_COLOR: Rgb = Rgb([0xac, 0x8e, 0x82]);
const ROOF_COLOR: Rgb = Rgb([0xb3, 0x5f, 0x45]);
const DOOR_COLOR: Rgb = Rgb([0xaa, 0x7b, 0x7b]);
const BUSH_COLOR: Rgb = Rgb([0x89, 0xc8, 0x54]);
const GRASS_COLOR: Rgb = Rgb([0xa9, 0xc3, 0x88]);
const GRAVE_COLOR: Rgb = Rgb([0xb2, 0xb6, 0xb1]);

/// (position, uniform scale)
const BUSHES: [(Vec3, f32); 4] = [
    (Vec3::new(0.8, 0.2, 2.2), 0.5),
    (Vec3::new(1.4, 0.1, 2.1), 0.25),
    (Vec3::new(-0.8, 0.1, 2.2), 0.4),
    (Vec3::new(-1.0, 0.05, 2.6), 0.15),
];

/// Ghost positions at `t` seconds.
///
/// The first circles at radius 4. The second bobs on two sines at radius 5
/// and the third drifts between radius 6 and 8; those two turn the other way.
pub fn ghost_positions(t: f32) -> [Vec3; 3] {
    let a1 = t * 0.5;
    let a2 = -t * 0.32;
    let a3 = -t * 0.18;
    [
        Vec3::new(a1.cos() * 4.0, (t * 3.0).sin(), a1.sin() * 4.0),
        Vec3::new(
            a2.cos() * 5.0,
            (t * 4.0).sin() + (t * 2.5).sin(),
            a2.sin() * 5.0,
        ),
        Vec3::new(
            a3.cos() * (7.0 + (t * 0.32).sin()),
            (t * 3.0).sin(),
            a3.sin() * (7.0 + (t * 0.5).sin()),
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grave {
    pub position: Vec3,
    pub rotation_y: f32,
    pub rotation_z: f32,
}

/// Graves on a ring between `radius_min` and `radius_max` around the house
pub fn scatter_graves<R: Rng>(count: u32, radius_min: f32, radius_max: f32, rng: &mut R) -> Vec<Grave> {
    // Sunk a little into the ground
    let y = GRAVE.y / 1.9 - 0.1;
    (0..count)
        .map(|_| {
            let angle = rng.gen::<f32>() * TAU;
            let radius = radius_min + rng.gen::<f32>() * (radius_max - radius_min);
            Grave {
                position: Vec3::new(angle.sin() * radius, y, angle.cos() * radius),
                rotation_y: (rng.gen::<f32>() - 0.5) * GRAVE_TILT,
                rotation_z: (rng.gen::<f32>() - 0.5) * GRAVE_TILT,
            }
        })
        .collect()
}

pub struct HauntedScene {
    config: HauntedConfig,
    graves: Vec<Grave>,
    /// Scene time in seconds, scaled by `ghost_speed`
    time: f32,
}

impl HauntedScene {
    pub fn new<R: Rng>(config: HauntedConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    /// Scene with the default configuration (always valid)
    pub fn with_defaults<R: Rng>(rng: &mut R) -> Self {
        Self::build(HauntedConfig::default(), rng)
    }

    fn build<R: Rng>(config: HauntedConfig, rng: &mut R) -> Self {
        let graves = scatter_graves(config.grave_count, config.grave_radius_min, config.grave_radius_max, rng);
        tracing::debug!("Placed {} graves", graves.len());
        Self {
            config,
            graves,
            time: 0.0,
        }
    }

    /// Apply a new configuration, placing the graves again
    pub fn set_config<R: Rng>(&mut self, config: HauntedConfig, rng: &mut R) -> Result<(), ConfigError> {
        config.validate()?;
        let time = self.time;
        *self = Self::build(config, rng);
        self.time = time;
        Ok(())
    }

    /// Advance the ghosts by `dt` seconds of wall time
    pub fn update(&mut self, dt: f32) {
        self.time += dt.max(0.0) * self.config.ghost_speed;
    }

    pub fn config(&self) -> &HauntedConfig {
        &self.config
    }

    pub fn graves(&self) -> &[Grave] {
        &self.graves
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn ghosts(&self) -> [Vec3; 3] {
        ghost_positions(self.time)
    }

    pub fn instances(&self) -> Vec<Instance> {
        let mut out = vec![
            Instance::new(Shape::Plane, GRASS_COLOR).placed(
                Vec3::ZERO,
                Vec3::new(-FRAC_PI_2, 0.0, 0.0),
                Vec3::new(FLOOR_SIZE, FLOOR_SIZE, 1.0),
            ),
            Instance::new(Shape::Cube, WALL_COLOR).placed(Vec3::new(0.0, WALLS.y / 2.0, 0.0), Vec3::ZERO, WALLS),
            Instance::new(Shape::Pyramid, ROOF_COLOR).placed(
                Vec3::new(0.0, WALLS.y + ROOF_HEIGHT / 2.0, 0.0),
                Vec3::new(0.0, FRAC_PI_4, 0.0),
                Vec3::new(ROOF_RADIUS, ROOF_HEIGHT, ROOF_RADIUS),
            ),
            // Just in front of the wall
            Instance::new(Shape::Plane, DOOR_COLOR).placed(
                Vec3::new(0.0, 1.0, WALLS.z / 2.0 + 0.01),
                Vec3::ZERO,
                Vec3::new(DOOR_SIZE, DOOR_SIZE, 1.0),
            ),
        ];
        out.extend(BUSHES.iter().map(|&(position, scale)| {
            Instance::new(Shape::Sphere, BUSH_COLOR).placed(position, Vec3::ZERO, Vec3::splat(scale))
        }));
        out.extend(self.graves.iter().map(|g| {
            Instance::new(Shape::Cube, GRAVE_COLOR).placed(g.position, Vec3::new(0.0, g.rotation_y, g.rotation_z), GRAVE)
        }));
        out
    }

    /// Moonlight, the door lamp and the three ghosts, under fog
    pub fn lighting(&self) -> Lighting {
        let mut point_lights = vec![DOOR_LIGHT];
        point_lights.extend(self.ghosts().iter().zip(GHOST_COLORS).map(|(&position, color)| PointLight {
            position,
            color,
            intensity: GHOST_INTENSITY,
            range: GHOST_RANGE,
        }));

        let moon = crate::scene::light_color(MOON_COLOR, MOON_INTENSITY);
        Lighting {
            ambient: moon,
            sun_direction: Vec3::new(4.0, 5.0, -2.0).normalize(),
            sun_color: moon,
            toon_bands: 0,
            point_lights,
            fog: Some(Fog {
                color: self.config.fog_color,
                near: self.config.fog_near,
                far: self.config.fog_far,
            }),
        }
    }

    /// Ghost positions and colors as point buffers (3 floats each)
    pub fn ghost_points(&self) -> (Vec<f32>, Vec<f32>) {
        let positions = self.ghosts().iter().flat_map(|p| p.to_array()).collect();
        let colors = GHOST_COLORS.iter().flat_map(|c| c.to_f32()).collect();
        (positions, colors)
    }
}
