//! Renderer-agnostic description of a lit scene: placed primitives, lights, fog.

use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::Rgb;

use crate::viewport::mesh::Shape;

/// Lights beyond this count are ignored by the renderer
pub const MAX_POINT_LIGHTS: usize = 4;

/// One placed primitive
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub shape: Shape,
    pub model: Mat4,
    pub color: Rgb,
}

impl Instance {
    pub fn new(shape: Shape, color: Rgb) -> Self {
        Self {
            shape,
            model: Mat4::IDENTITY,
            color,
        }
    }

    /// Scale, then rotate (XYZ Euler angles), then translate
    pub fn placed(mut self, position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        self.model = placement(position, rotation, scale);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.model.w_axis.truncate()
    }
}

pub fn placement(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    let rotation = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
    Mat4::from_scale_rotation_translation(scale, rotation, position)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Rgb,
    pub intensity: f32,
    /// Distance at which the contribution reaches zero
    pub range: f32,
}

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Rgb,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// 0 before `near`, 1 past `far`
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return 0.0;
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub ambient: [f32; 3],
    /// Direction towards the directional light
    pub sun_direction: Vec3,
    pub sun_color: [f32; 3],
    /// Quantize diffuse light into this many bands; 0 for smooth shading
    pub toon_bands: u32,
    pub point_lights: Vec<PointLight>,
    pub fog: Option<Fog>,
}

/// Color scaled by an intensity, for light uniforms
pub fn light_color(color: Rgb, intensity: f32) -> [f32; 3] {
    color.to_f32().map(|c| c * intensity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fog_factor() {
        let fog = Fog {
            color: Rgb::WHITE,
            near: 1.0,
            far: 15.0,
        };
        assert_eq!(fog.factor(0.5), 0.0);
        assert_eq!(fog.factor(8.0), 0.5);
        assert_eq!(fog.factor(40.0), 1.0);
    }

    #[test]
    fn test_placement_order() {
        let inst = Instance::new(Shape::Cube, Rgb::WHITE).placed(
            Vec3::new(0.0, 1.25, 0.0),
            Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
            Vec3::new(4.0, 2.5, 1.0),
        );
        assert_eq!(inst.position(), Vec3::new(0.0, 1.25, 0.0));
        // +X corner of the unit cube: scaled to 2, then turned onto -Z
        let p = inst.model.transform_point3(Vec3::new(0.5, 0.0, 0.0));
        assert!((p - Vec3::new(0.0, 1.25, -2.0)).length() < 1e-5);
    }
}
