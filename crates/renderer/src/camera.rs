//! Orbit camera circling the planet.

use bytemuck::{Pod, Zeroable};
use engine_core::Ray;
use glam::{Mat4, Vec2, Vec3};

/// World up axis. The scene uses the ECEF convention (Z through the north pole).
pub const WORLD_UP: Vec3 = Vec3::Z;

/// Camera orbiting a target point, driven by pointer drags and the scroll wheel.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera looks at and orbits around.
    pub target: Vec3,
    /// Distance from the target.
    pub distance: f32,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Radians of rotation per pixel of pointer drag.
    pub sensitivity: f32,
    /// Fraction of the distance covered per scroll line.
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Azimuth around the up axis in radians.
    yaw: f32,
    /// Elevation above the equatorial plane in radians.
    pitch: f32,
    /// Free rotation and zoom are only applied while enabled.
    rotation_enabled: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 10.0,
            fov_degrees: 80.0,
            near: 1.0,
            far: 100_000.0,
            aspect: 16.0 / 9.0,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            min_distance: 1.0,
            max_distance: 100_000.0,
            yaw: 0.0,
            pitch: 0.0,
            rotation_enabled: true,
        }
    }
}

impl OrbitCamera {
    /// Place the camera at `position`, orbiting `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            target,
            ..Default::default()
        };
        camera.set_position(position);
        camera
    }

    /// Move the eye to `position` keeping the current target.
    pub fn set_position(&mut self, position: Vec3) {
        let offset = position - self.target;
        self.distance = offset.length().max(self.min_distance);
        let horizontal = Vec2::new(offset.x, offset.y).length();
        self.yaw = offset.y.atan2(offset.x);
        self.pitch = offset.z.atan2(horizontal);
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn set_rotation_enabled(&mut self, enabled: bool) {
        self.rotation_enabled = enabled;
    }

    pub fn is_rotation_enabled(&self) -> bool {
        self.rotation_enabled
    }

    /// Orbit by a pointer drag in pixels. Ignored while rotation is disabled.
    pub fn process_drag(&mut self, delta: Vec2) {
        if !self.rotation_enabled {
            return;
        }
        self.yaw -= delta.x * self.sensitivity;
        self.pitch += delta.y * self.sensitivity;

        // Clamp pitch to prevent flipping over the poles
        let max_pitch = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);
    }

    /// Zoom by scroll lines. Ignored while rotation is disabled.
    pub fn process_scroll(&mut self, lines: f32) {
        if !self.rotation_enabled || lines == 0.0 {
            return;
        }
        let factor = (1.0 - lines * self.zoom_speed).max(0.1);
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vec3::new(cos_pitch * cos_yaw, cos_pitch * sin_yaw, sin_pitch) * self.distance
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, WORLD_UP)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a pointer given in normalized device coordinates.
    pub fn screen_ray(&self, ndc: Vec2) -> Option<Ray> {
        if !ndc.is_finite() {
            return None;
        }
        // View-space point on the far plane; the eye sits at the view-space origin.
        let far_view = self
            .projection_matrix()
            .inverse()
            .project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let direction = self.view_matrix().inverse().transform_vector3(far_view);
        Ray::new(self.position(), direction)
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

/// Lights shared by every draw.
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    /// Point light position (the "star").
    pub star_position: Vec3,
    pub star_brightness: f32,
    pub ambient: f32,
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4], // w unused, padding
    /// xyz = star position, w = star brightness.
    pub light: [f32; 4],
    /// x = ambient brightness, yzw unused.
    pub ambient: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0; 4],
            light: [0.0; 4],
            ambient: [1.0, 0.0, 0.0, 0.0],
        }
    }

    pub fn update(&mut self, camera: &OrbitCamera, lighting: &Lighting) {
        self.view_proj = camera.view_projection_matrix().to_cols_array_2d();
        let eye = camera.position();
        self.eye = [eye.x, eye.y, eye.z, 1.0];
        let star = lighting.star_position;
        self.light = [star.x, star.y, star.z, lighting.star_brightness];
        self.ambient = [lighting.ambient, 0.0, 0.0, 0.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}
