//! Transform component and utilities for spatial positioning.

use glam::{Mat4, Quat, Vec3};

/// Default forward axis of scene objects (markers face +Z before rotation).
pub const OBJECT_FORWARD: Vec3 = Vec3::Z;

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Builder-style uniform scale.
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction (the rotated [`OBJECT_FORWARD`] axis).
    pub fn forward(&self) -> Vec3 {
        self.rotation * OBJECT_FORWARD
    }

    /// Rotate so the forward axis points along `direction`.
    ///
    /// Zero-length directions leave the rotation untouched.
    pub fn face_along(&mut self, direction: Vec3) {
        let dir = direction.normalize_or_zero();
        if dir.length_squared() > 0.0001 {
            self.rotation = Quat::from_rotation_arc(OBJECT_FORWARD, dir);
        }
    }
}
