//! Components stored on scene objects.

use glam::Vec3;

/// What kind of primitive an object draws as.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    /// Unit sphere scaled by the transform.
    Sphere,
    /// Unit cube scaled by the transform.
    Cube,
    /// Connected world-space line strip; the transform is ignored.
    Line { points: Vec<Vec3> },
}

/// Base colour plus emissive intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub color: [f32; 4],
    /// Emissive boost, 0 = fully lit by the scene lights.
    pub intensity: f32,
}

impl Tint {
    pub fn rgb(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self {
            color: [r, g, b, 1.0],
            intensity: 0.0,
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            intensity: 0.0,
        }
    }
}

/// Visibility flag; hidden objects stay in the world but are not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility(pub bool);

impl Default for Visibility {
    fn default() -> Self {
        Self(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_from_hex() {
        let t = Tint::rgb(0xff6600);
        assert_eq!(t.color[0], 1.0);
        assert!((t.color[1] - 0.4).abs() < 1e-6);
        assert_eq!(t.color[2], 0.0);
    }
}
