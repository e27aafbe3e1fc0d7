//! Scene storage: every drawable object lives in a `hecs` world.

use crate::vertex::{InstanceData, LineVertex};
use engine_core::{Drawable, Tint, Transform, Visibility};
use glam::Vec3;
use hecs::{Entity, World};

/// Handle to an object in the scene.
pub type ObjectId = Entity;

/// Everything the renderer draws, keyed by [`ObjectId`].
#[derive(Default)]
pub struct SceneGraph {
    world: World,
}

/// Instances grouped by primitive, ready for upload.
#[derive(Debug, Default)]
pub struct InstanceBatches {
    pub spheres: Vec<InstanceData>,
    pub cubes: Vec<InstanceData>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object. Objects start visible.
    pub fn spawn(&mut self, drawable: Drawable, transform: Transform, tint: Tint) -> ObjectId {
        self.world
            .spawn((drawable, transform, tint, Visibility::default()))
    }

    /// Remove an object. Returns false if it was already gone.
    pub fn despawn(&mut self, id: ObjectId) -> bool {
        self.world.despawn(id).is_ok()
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    pub fn set_visible(&mut self, id: ObjectId, visible: bool) {
        if let Ok(mut v) = self.world.get::<&mut Visibility>(id) {
            v.0 = visible;
        }
    }

    pub fn is_visible(&self, id: ObjectId) -> Option<bool> {
        self.world.get::<&Visibility>(id).ok().map(|v| v.0)
    }

    pub fn set_transform(&mut self, id: ObjectId, transform: Transform) {
        if let Ok(mut t) = self.world.get::<&mut Transform>(id) {
            *t = transform;
        }
    }

    pub fn transform(&self, id: ObjectId) -> Option<Transform> {
        self.world.get::<&Transform>(id).ok().map(|t| *t)
    }

    pub fn set_intensity(&mut self, id: ObjectId, intensity: f32) {
        if let Ok(mut t) = self.world.get::<&mut Tint>(id) {
            t.intensity = intensity;
        }
    }

    /// Replace the points of a line object. No-op for other drawables.
    pub fn set_line_points(&mut self, id: ObjectId, new_points: Vec<Vec3>) {
        if let Ok(mut d) = self.world.get::<&mut Drawable>(id) {
            if let Drawable::Line { points } = &mut *d {
                *points = new_points;
            }
        }
    }

    /// Collect visible spheres and cubes as instance data.
    pub fn instance_batches(&self) -> InstanceBatches {
        let mut batches = InstanceBatches::default();
        for (_, (drawable, transform, tint, visible)) in self
            .world
            .query::<(&Drawable, &Transform, &Tint, &Visibility)>()
            .iter()
        {
            if !visible.0 {
                continue;
            }
            let instance = InstanceData::new(
                transform.to_matrix().to_cols_array_2d(),
                tint.color,
                tint.intensity,
            );
            match drawable {
                Drawable::Sphere => batches.spheres.push(instance),
                Drawable::Cube => batches.cubes.push(instance),
                Drawable::Line { .. } => {}
            }
        }
        batches
    }

    /// Expand visible line strips into a line list.
    ///
    /// Strips are emitted in ascending tint intensity so highlighted lines
    /// are drawn over coincident plain ones.
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        let mut query = self.world.query::<(&Drawable, &Tint, &Visibility)>();
        let mut strips: Vec<(&[Vec3], Tint)> = query
            .iter()
            .filter(|(_, (_, _, visible))| visible.0)
            .filter_map(|(_, (drawable, tint, _))| match drawable {
                Drawable::Line { points } => Some((points.as_slice(), *tint)),
                _ => None,
            })
            .collect();
        strips.sort_by(|a, b| {
            a.1.intensity
                .partial_cmp(&b.1.intensity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut vertices = Vec::new();
        for (points, tint) in strips {
            for pair in points.windows(2) {
                vertices.push(LineVertex {
                    position: pair[0].into(),
                    color: tint.color,
                });
                vertices.push(LineVertex {
                    position: pair[1].into(),
                    color: tint.color,
                });
            }
        }
        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_objects_are_not_batched() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(Drawable::Sphere, Transform::default(), Tint::default());
        scene.spawn(Drawable::Cube, Transform::default(), Tint::default());
        scene.set_visible(a, false);

        let batches = scene.instance_batches();
        assert!(batches.spheres.is_empty());
        assert_eq!(batches.cubes.len(), 1);
        assert_eq!(scene.is_visible(a), Some(false));
    }

    #[test]
    fn despawn_removes_object() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn(Drawable::Sphere, Transform::default(), Tint::default());
        assert!(scene.despawn(a));
        assert!(!scene.despawn(a));
        assert!(scene.is_empty());
        assert_eq!(scene.is_visible(a), None);
    }

    #[test]
    fn line_strip_expands_to_segments() {
        let mut scene = SceneGraph::new();
        let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        scene.spawn(Drawable::Line { points }, Transform::default(), Tint::rgb(0xff0000));
        let verts = scene.line_vertices();
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(verts[2].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn brighter_lines_come_last() {
        let mut scene = SceneGraph::new();
        let seg = vec![Vec3::ZERO, Vec3::X];
        scene.spawn(
            Drawable::Line { points: seg.clone() },
            Transform::default(),
            Tint::rgb(0x00ff00).with_intensity(1.0),
        );
        scene.spawn(Drawable::Line { points: seg }, Transform::default(), Tint::rgb(0xff6600));
        let verts = scene.line_vertices();
        assert_eq!(verts[3].color, Tint::rgb(0x00ff00).color);
    }

    #[test]
    fn set_line_points_updates_strip() {
        let mut scene = SceneGraph::new();
        let id = scene.spawn(
            Drawable::Line { points: vec![] },
            Transform::default(),
            Tint::default(),
        );
        assert!(scene.line_vertices().is_empty());
        scene.set_line_points(id, vec![Vec3::ZERO, Vec3::Z]);
        assert_eq!(scene.line_vertices().len(), 2);
    }
}
