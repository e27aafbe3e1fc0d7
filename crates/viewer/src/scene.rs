//! Rendering collaborator: the narrow scene interface the interaction core drives.

use engine_core::{Drawable, Quat, Tint, Transform, Vec3};
use renderer::{ObjectId, SceneGraph};
use solver::NetworkSnapshot;

pub const SATELLITE_SIZE: f32 = 150.0;
pub const SATELLITE_COLOR: u32 = 0xcc0099;
pub const CONNECTION_COLOR: u32 = 0xff6600;
pub const SOLUTION_COLOR: u32 = 0x00ff00;
pub const START_COLOR: u32 = 0x00ff00;
pub const END_COLOR: u32 = 0xffff00;
pub const ARC_COLOR: u32 = 0xffffff;
pub const PLANET_COLOR: u32 = 0x2b5d9c;
/// Equator and prime-meridian rings.
pub const GUIDE_COLOR: u32 = 0xff00ff;
/// Height of the equator and prime-meridian rings above the surface.
pub const GUIDE_LIFT: f32 = 5.0;
const GUIDE_SEGMENTS: usize = 128;

/// Scene operations available to the interaction core. Calls are synchronous.
pub trait SceneCollaborator {
    fn add_to_scene(&mut self, drawable: Drawable, transform: Transform, tint: Tint) -> ObjectId;
    fn remove_from_scene(&mut self, objects: &[ObjectId]);
    fn set_visible(&mut self, objects: &[ObjectId], visible: bool);
    /// Build satellite, connection and solution-path objects for a snapshot.
    fn rebuild_network(&mut self, snapshot: &NetworkSnapshot) -> NetworkObjects;

    fn set_transform(&mut self, object: ObjectId, transform: Transform);
    fn set_intensity(&mut self, object: ObjectId, intensity: f32);
    fn set_line_points(&mut self, object: ObjectId, points: Vec<Vec3>);
}

/// Scene objects built from one network snapshot, grouped by display toggle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkObjects {
    pub satellites: Vec<ObjectId>,
    pub connections: Vec<ObjectId>,
    pub solution_path: Vec<ObjectId>,
}

impl NetworkObjects {
    pub fn all(&self) -> Vec<ObjectId> {
        self.satellites
            .iter()
            .chain(&self.connections)
            .chain(&self.solution_path)
            .copied()
            .collect()
    }
}

impl SceneCollaborator for SceneGraph {
    fn add_to_scene(&mut self, drawable: Drawable, transform: Transform, tint: Tint) -> ObjectId {
        self.spawn(drawable, transform, tint)
    }

    fn remove_from_scene(&mut self, objects: &[ObjectId]) {
        for &id in objects {
            self.despawn(id);
        }
    }

    fn set_visible(&mut self, objects: &[ObjectId], visible: bool) {
        for &id in objects {
            SceneGraph::set_visible(self, id, visible);
        }
    }

    fn rebuild_network(&mut self, snapshot: &NetworkSnapshot) -> NetworkObjects {
        let mut objects = NetworkObjects::default();

        // Terminals are drawn by the endpoint markers.
        for node in snapshot.nodes.iter().filter(|n| !n.is_endpoint()) {
            let transform =
                Transform::from_position(node.position()).with_uniform_scale(SATELLITE_SIZE);
            objects
                .satellites
                .push(self.spawn(Drawable::Cube, transform, Tint::rgb(SATELLITE_COLOR)));
        }

        for edge in &snapshot.edges {
            let points = vec![edge.a.position(), edge.b.position()];
            objects.connections.push(self.spawn(
                Drawable::Line {
                    points: points.clone(),
                },
                Transform::default(),
                Tint::rgb(CONNECTION_COLOR),
            ));
            if edge.is_solution_path {
                objects.solution_path.push(self.spawn(
                    Drawable::Line { points },
                    Transform::default(),
                    Tint::rgb(SOLUTION_COLOR).with_intensity(1.0),
                ));
            }
        }

        log::debug!(
            "Built {} satellites, {} connections, {} solution segments",
            objects.satellites.len(),
            objects.connections.len(),
            objects.solution_path.len()
        );
        objects
    }

    fn set_transform(&mut self, object: ObjectId, transform: Transform) {
        SceneGraph::set_transform(self, object, transform);
    }

    fn set_intensity(&mut self, object: ObjectId, intensity: f32) {
        SceneGraph::set_intensity(self, object, intensity);
    }

    fn set_line_points(&mut self, object: ObjectId, points: Vec<Vec3>) {
        SceneGraph::set_line_points(self, object, points);
    }
}

/// Coordinate helpers: axes, equator and prime meridian.
#[derive(Debug, Clone, Copy)]
pub struct GuideObjects {
    pub axes: [ObjectId; 3],
    pub equator: ObjectId,
    pub prime_meridian: ObjectId,
}

impl GuideObjects {
    /// Add the helpers to the scene, hidden.
    pub fn build(scene: &mut dyn SceneCollaborator, planet_radius: f32, axis_length: f32) -> Self {
        let axes = [
            add_line(scene, vec![Vec3::ZERO, Vec3::X * axis_length], 0xff0000),
            add_line(scene, vec![Vec3::ZERO, Vec3::Y * axis_length], 0x00ff00),
            add_line(scene, vec![Vec3::ZERO, Vec3::Z * axis_length], 0x0000ff),
        ];

        let ring_radius = planet_radius + GUIDE_LIFT;
        let equator = add_line(scene, ring(ring_radius, Quat::IDENTITY), GUIDE_COLOR);
        // XZ plane: the XY circle turned a quarter about X.
        let meridian = ring(ring_radius, Quat::from_rotation_x(std::f32::consts::FRAC_PI_2));
        let prime_meridian = add_line(scene, meridian, GUIDE_COLOR);

        let guides = Self {
            axes,
            equator,
            prime_meridian,
        };
        scene.set_visible(&guides.axes, false);
        scene.set_visible(&[equator, prime_meridian], false);
        guides
    }
}

fn add_line(scene: &mut dyn SceneCollaborator, points: Vec<Vec3>, color: u32) -> ObjectId {
    scene.add_to_scene(Drawable::Line { points }, Transform::default(), Tint::rgb(color))
}

/// Closed circle in the XY plane rotated by `rotation`.
pub fn ring(radius: f32, rotation: Quat) -> Vec<Vec3> {
    (0..=GUIDE_SEGMENTS)
        .map(|i| {
            let angle = i as f32 / GUIDE_SEGMENTS as f32 * std::f32::consts::TAU;
            rotation * Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0)
        })
        .collect()
}
