use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::core::scene::Ray;

/// Perspective orbit camera.
/// Position and target are stored directly; orbit and zoom move the
/// position around the target in spherical coordinates.
#[derive(Debug, Clone)]
pub struct Camera3D {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera looks at (orbit centre).
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Allowed distance range from target for zoom.
    min_distance: f32,
    max_distance: f32,
}

/// GPU-side uniform data for the camera.
/// Wire format: 16 floats view-projection + 4 floats eye position.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 20;
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 50.0, 150.0),
            target: Vec3::ZERO,
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 5000.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}

impl Camera3D {
    const ORBIT_SENSITIVITY: f32 = 0.005;
    /// Keeps the polar angle off the poles so look_at never degenerates.
    const POLAR_EPSILON: f32 = 0.01;

    pub fn new(aspect: f32) -> Self {
        Self {
            aspect,
            ..Default::default()
        }
    }

    /// Update the aspect ratio from viewport pixels. Zero sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Set the allowed zoom range. The current distance is left alone
    /// and only clamped on the next zoom.
    pub fn set_distance_range(&mut self, min: f32, max: f32) {
        self.min_distance = min.min(max);
        self.max_distance = max.max(min);
    }

    pub fn distance_range(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    /// Distance between position and target.
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Orbit around the target by a pointer delta in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();

        azimuth -= dx * Self::ORBIT_SENSITIVITY;
        polar -= dy * Self::ORBIT_SENSITIVITY;
        polar = polar.clamp(Self::POLAR_EPSILON, std::f32::consts::PI - Self::POLAR_EPSILON);

        let sin_polar = polar.sin();
        self.position = self.target
            + radius * Vec3::new(sin_polar * azimuth.sin(), polar.cos(), sin_polar * azimuth.cos());
    }

    /// Zoom by a relative pinch factor (> 1 moves closer).
    /// Resulting distance is clamped to the distance range.
    pub fn zoom(&mut self, scale: f32) {
        if !(scale.is_finite() && scale > 0.0) {
            return;
        }
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let new_radius = (radius / scale).clamp(self.min_distance, self.max_distance);
        self.position = self.target + offset * (new_radius / radius);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Right-handed perspective, depth in [0, 1].
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
            eye: [self.position.x, self.position.y, self.position.z, 1.0],
        }
    }

    /// World-space picking ray through a point in normalized device
    /// coordinates (x right, y up, both in -1..1).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_proj().inverse();
        let near = inv * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Ray::new(self.position, far - near)
    }

    /// Project a world point into NDC. None if behind the camera.
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_proj() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }
}
