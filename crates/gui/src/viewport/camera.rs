use glam::{Mat4, Vec2, Vec3, Vec4};
use shared::CameraConfig;

use super::picking::Ray;

/// Orbit damping factor (fraction of the pending rotation applied per frame)
pub const DEFAULT_DAMPING: f32 = 0.05;

/// Arc-ball camera for the 3D viewport
#[derive(Clone, Copy, Debug)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// When set, `rotate` only queues a delta that `update` applies gradually
    pub damping: Option<f32>,
    /// Queued rotation (yaw, pitch) in radians
    pending: Vec2,
}

impl ArcBallCamera {
    /// Place the camera at `eye` looking at `target`.
    pub fn from_eye(eye: Vec3, target: Vec3, config: &CameraConfig) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(1e-3);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            target,
            fov: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
            damping: None,
            pending: Vec2::ZERO,
        }
    }

    pub fn with_damping(mut self, factor: f32) -> Self {
        self.damping = Some(factor.clamp(0.001, 1.0));
        self
    }

    /// Rotate by mouse delta (degrees)
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let delta = Vec2::new(dx.to_radians(), dy.to_radians());
        match self.damping {
            Some(_) => self.pending += delta,
            None => self.apply_rotation(delta),
        }
    }

    /// Advance damping by one frame. No-op without damping.
    pub fn update(&mut self) {
        if let Some(factor) = self.damping {
            let step = self.pending * factor;
            self.apply_rotation(step);
            self.pending *= 1.0 - factor;
            if self.pending.length_squared() < 1e-12 {
                self.pending = Vec2::ZERO;
            }
        }
    }

    pub fn is_settling(&self) -> bool {
        self.pending != Vec2::ZERO
    }

    fn apply_rotation(&mut self, delta: Vec2) {
        self.yaw += delta.x;
        self.pitch = (self.pitch + delta.y).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, self.far * 0.9);
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Project a world point to normalized device coordinates (x right, y up).
    /// None when the point is behind the camera.
    pub fn project_ndc(&self, point: Vec3, aspect: f32) -> Option<Vec2> {
        let p = self.view_projection(aspect) * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        Some(Vec2::new(p.x / p.w, p.y / p.w))
    }

    /// Cast a ray from normalized device coordinates into the scene
    pub fn ndc_ray(&self, ndc: Vec2, aspect: f32) -> Ray {
        let vp_inv = self.view_projection(aspect).inverse();

        // Unproject near and far points
        let near_world = vp_inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.eye_position(),
            direction: (far - near).normalize_or_zero(),
        }
    }

    /// Height in NDC units of a world-space segment of `size` standing upright at `point`
    pub fn projected_height(&self, point: Vec3, size: f32, aspect: f32) -> Option<f32> {
        let bottom = self.project_ndc(point, aspect)?;
        let top = self.project_ndc(point + Vec3::Y * size, aspect)?;
        Some((top - bottom).length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_camera() -> ArcBallCamera {
        ArcBallCamera::from_eye(Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO, &CameraConfig::default())
    }

    #[test]
    fn test_from_eye_roundtrip() {
        let eye = Vec3::new(0.0, 5.0, 8.0);
        let camera = ArcBallCamera::from_eye(eye, Vec3::ZERO, &CameraConfig::default());
        assert!((camera.eye_position() - eye).length() < 1e-4);
        assert!((camera.fov - 75f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = front_camera();
        let ray = camera.ndc_ray(Vec2::ZERO, 16.0 / 9.0);
        assert!((ray.origin - Vec3::new(0.0, 0.0, 8.0)).length() < 1e-4);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_project_then_ray_hits_point() {
        let camera = front_camera();
        let aspect = 1.5;
        let point = Vec3::new(2.0, -1.5, 0.0);
        let ndc = camera.project_ndc(point, aspect).unwrap();
        let ray = camera.ndc_ray(ndc, aspect);

        // Walk the ray to the z = 0 plane
        let t = -ray.origin.z / ray.direction.z;
        assert!((ray.at(t) - point).length() < 1e-3);
    }

    #[test]
    fn test_point_behind_camera_not_projected() {
        let camera = front_camera();
        assert!(camera.project_ndc(Vec3::new(0.0, 0.0, 20.0), 1.0).is_none());
    }

    #[test]
    fn test_damped_rotation_converges() {
        let mut camera = front_camera().with_damping(DEFAULT_DAMPING);
        camera.rotate(10.0, 0.0);
        assert_eq!(camera.yaw, 0.0);

        camera.update();
        assert!(camera.yaw > 0.0);
        for _ in 0..2000 {
            camera.update();
        }
        assert!(!camera.is_settling());
        assert!((camera.yaw - 10f32.to_radians()).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = front_camera();
        camera.zoom(0.99);
        assert!(camera.distance >= 0.5);
        camera.zoom(-1000.0);
        assert!(camera.distance <= camera.far);
    }
}
