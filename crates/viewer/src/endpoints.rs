//! The two route endpoints and the planet surface they live on.

use crate::projector::{corrected_normal, SurfaceHit};
use crate::scene::{SceneCollaborator, ARC_COLOR, END_COLOR, START_COLOR};
use engine_core::{Drawable, Quat, Ray, Sphere, Tint, Transform, Vec3};
use renderer::ObjectId;
use solver::{END_NODE, START_NODE};

/// Samples along the START-END preview arc.
const ARC_SEGMENTS: usize = 64;
/// Lift of the preview arc above the markers' shell so it is not buried in the planet.
const ARC_LIFT: f32 = 10.0;

/// Which route terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointId {
    Start,
    End,
}

impl EndpointId {
    pub const ALL: [EndpointId; 2] = [EndpointId::Start, EndpointId::End];

    /// Node name used on the wire.
    pub fn node_name(self) -> &'static str {
        match self {
            EndpointId::Start => START_NODE,
            EndpointId::End => END_NODE,
        }
    }

    pub fn from_node_name(name: &str) -> Option<Self> {
        match name {
            START_NODE => Some(EndpointId::Start),
            END_NODE => Some(EndpointId::End),
            _ => None,
        }
    }
}

/// Emissive level of an endpoint marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    /// Move mode is off.
    Inactive,
    /// Move mode is on; the marker can be grabbed.
    Active,
    /// Under the pointer or being dragged.
    Grabbed,
}

impl Intensity {
    pub fn level(self) -> f32 {
        match self {
            Intensity::Inactive => 0.0,
            Intensity::Active => 0.35,
            Intensity::Grabbed => 0.8,
        }
    }
}

/// Planet sphere plus the orientation its mesh was authored in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetSurface {
    pub center: Vec3,
    pub radius: f32,
    /// Rotation applied to the Y-up planet mesh.
    pub orientation: Quat,
    /// Height of endpoint markers above the surface.
    pub surface_offset: f32,
}

impl PlanetSurface {
    /// Planet at the origin with its poles on world Z.
    pub fn new(radius: f32, surface_offset: f32) -> Self {
        Self {
            center: Vec3::ZERO,
            radius,
            orientation: Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
            surface_offset,
        }
    }

    pub fn sphere(&self) -> Sphere {
        Sphere::new(self.center, self.radius)
    }

    /// Nearest ray hit on the planet.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let hit = self.sphere().intersect(ray)?;
        Some(SurfaceHit {
            distance: hit.distance,
            point: hit.point,
            normal: hit.normal,
            corrected_normal: corrected_normal(hit.normal, self.orientation),
        })
    }

    /// Outward unit normal below `point`.
    pub fn normal_at(&self, point: Vec3) -> Option<Vec3> {
        (point - self.center).try_normalize()
    }

    /// Point on the surface at geodetic latitude / longitude (degrees), ECEF axes.
    pub fn lat_lon(&self, lat_deg: f32, lon_deg: f32) -> Vec3 {
        let (lat, lon) = (lat_deg.to_radians(), lon_deg.to_radians());
        self.center
            + Vec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()) * self.radius
    }

    /// Scene transform of the planet mesh.
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.center, self.orientation)
            .with_uniform_scale(self.radius)
    }
}

/// A route terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub id: EndpointId,
    pub position: Vec3,
    /// Corrected surface normal the marker faces along.
    pub normal: Vec3,
    /// True while armed or dragged.
    pub highlighted: bool,
    pub intensity: Intensity,
    marker: Option<ObjectId>,
}

impl Endpoint {
    pub fn marker(&self) -> Option<ObjectId> {
        self.marker
    }
}

/// An endpoint marker under a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointHit {
    pub id: EndpointId,
    pub distance: f32,
    /// Stored surface position of the endpoint that was hit.
    pub position: Vec3,
}

/// Holds START and END. Positions change only through [`EndpointStore::relocate`].
#[derive(Debug, Clone)]
pub struct EndpointStore {
    planet: PlanetSurface,
    endpoints: [Endpoint; 2],
    marker_radius: f32,
    arc: Option<ObjectId>,
}

impl EndpointStore {
    pub fn new(planet: PlanetSurface, start: Vec3, end: Vec3, marker_radius: f32) -> Self {
        let endpoint = |id, position: Vec3| Endpoint {
            id,
            position,
            normal: planet
                .normal_at(position)
                .map(|n| corrected_normal(n, planet.orientation))
                .unwrap_or(Vec3::Z),
            highlighted: false,
            intensity: Intensity::Inactive,
            marker: None,
        };
        Self {
            planet,
            endpoints: [endpoint(EndpointId::Start, start), endpoint(EndpointId::End, end)],
            marker_radius,
            arc: None,
        }
    }

    /// Endpoints placed at `[lat, lon]` degree pairs.
    pub fn from_lat_lon(
        planet: PlanetSurface,
        start: [f32; 2],
        end: [f32; 2],
        marker_radius: f32,
    ) -> Self {
        let start = planet.lat_lon(start[0], start[1]);
        let end = planet.lat_lon(end[0], end[1]);
        Self::new(planet, start, end, marker_radius)
    }

    pub fn planet(&self) -> &PlanetSurface {
        &self.planet
    }

    pub fn get(&self, id: EndpointId) -> &Endpoint {
        &self.endpoints[index(id)]
    }

    pub fn position(&self, id: EndpointId) -> Vec3 {
        self.get(id).position
    }

    /// The endpoint currently armed or dragged, if any.
    pub fn highlighted(&self) -> Option<EndpointId> {
        self.endpoints.iter().find(|e| e.highlighted).map(|e| e.id)
    }

    /// Add both markers and the preview arc to the scene.
    pub fn attach(&mut self, scene: &mut dyn SceneCollaborator) {
        for id in EndpointId::ALL {
            let color = match id {
                EndpointId::Start => START_COLOR,
                EndpointId::End => END_COLOR,
            };
            let tint = Tint::rgb(color).with_intensity(self.get(id).intensity.level());
            let marker = scene.add_to_scene(Drawable::Sphere, self.marker_transform(id), tint);
            self.endpoints[index(id)].marker = Some(marker);
        }
        self.arc = Some(scene.add_to_scene(
            Drawable::Line {
                points: self.arc_points(),
            },
            Transform::default(),
            Tint::rgb(ARC_COLOR),
        ));
    }

    /// Move an endpoint and face its marker along `normal`. Refreshes the preview arc.
    pub fn relocate(
        &mut self,
        id: EndpointId,
        position: Vec3,
        normal: Vec3,
        scene: &mut dyn SceneCollaborator,
    ) {
        if !position.is_finite() {
            log::warn!("Ignoring non-finite position for {:?}", id);
            return;
        }
        let endpoint = &mut self.endpoints[index(id)];
        endpoint.position = position;
        if let Some(n) = normal.try_normalize() {
            endpoint.normal = n;
        }
        log::debug!("Relocated {:?} to {:?}", id, position);

        if let Some(marker) = self.get(id).marker() {
            scene.set_transform(marker, self.marker_transform(id));
        }
        if let Some(arc) = self.arc {
            scene.set_line_points(arc, self.arc_points());
        }
    }

    pub fn set_intensity(
        &mut self,
        id: EndpointId,
        intensity: Intensity,
        scene: &mut dyn SceneCollaborator,
    ) {
        let endpoint = &mut self.endpoints[index(id)];
        endpoint.intensity = intensity;
        endpoint.highlighted = intensity == Intensity::Grabbed;
        if let Some(marker) = endpoint.marker {
            scene.set_intensity(marker, intensity.level());
        }
    }

    pub fn set_all_intensity(&mut self, intensity: Intensity, scene: &mut dyn SceneCollaborator) {
        for id in EndpointId::ALL {
            self.set_intensity(id, intensity, scene);
        }
    }

    /// Nearest marker hit by `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<EndpointHit> {
        self.endpoints
            .iter()
            .filter_map(|e| {
                let centre = self.marker_transform(e.id).position;
                Sphere::new(centre, self.marker_radius)
                    .intersect(ray)
                    .map(|hit| EndpointHit {
                        id: e.id,
                        distance: hit.distance,
                        position: e.position,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Marker placement: lifted off the surface, forward axis along the stored normal.
    pub fn marker_transform(&self, id: EndpointId) -> Transform {
        let endpoint = self.get(id);
        let lift = self
            .planet
            .normal_at(endpoint.position)
            .unwrap_or(Vec3::ZERO)
            * self.planet.surface_offset;
        let mut transform = Transform::from_position(endpoint.position + lift)
            .with_uniform_scale(self.marker_radius);
        transform.face_along(endpoint.normal);
        transform
    }

    /// Great-circle arc between START and END, recomputed from the live positions.
    pub fn arc_points(&self) -> Vec<Vec3> {
        let center = self.planet.center;
        let (Some(a), Some(b)) = (
            (self.position(EndpointId::Start) - center).try_normalize(),
            (self.position(EndpointId::End) - center).try_normalize(),
        ) else {
            return Vec::new();
        };
        let radius = self.planet.radius + self.planet.surface_offset + ARC_LIFT;
        let sweep = Quat::from_rotation_arc(a, b);
        (0..=ARC_SEGMENTS)
            .map(|i| {
                let t = i as f32 / ARC_SEGMENTS as f32;
                center + Quat::IDENTITY.slerp(sweep, t) * a * radius
            })
            .collect()
    }
}

pub(crate) fn index(id: EndpointId) -> usize {
    match id {
        EndpointId::Start => 0,
        EndpointId::End => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeScene;

    const R: f32 = 6371.0;

    fn store() -> EndpointStore {
        EndpointStore::from_lat_lon(PlanetSurface::new(R, 0.0), [0.0, 0.0], [0.0, 90.0], 75.0)
    }

    #[test]
    fn lat_lon_follows_ecef_axes() {
        let planet = PlanetSurface::new(R, 0.0);
        assert!((planet.lat_lon(0.0, 0.0) - Vec3::new(R, 0.0, 0.0)).length() < 1e-2);
        assert!((planet.lat_lon(0.0, 90.0) - Vec3::new(0.0, R, 0.0)).length() < 1e-2);
        assert!((planet.lat_lon(90.0, 0.0) - Vec3::new(0.0, 0.0, R)).length() < 1e-2);
    }

    #[test]
    fn relocate_round_trips_position() {
        let mut scene = FakeScene::default();
        let mut endpoints = store();
        endpoints.attach(&mut scene);

        let end_before = endpoints.position(EndpointId::End);
        let p = PlanetSurface::new(R, 0.0).lat_lon(12.5, -40.0);
        endpoints.relocate(EndpointId::Start, p, p.normalize(), &mut scene);
        assert!((endpoints.position(EndpointId::Start) - p).length() < 1e-3);
        assert_eq!(endpoints.position(EndpointId::End), end_before);
    }

    #[test]
    fn relocate_updates_marker_and_arc() {
        let mut scene = FakeScene::default();
        let mut endpoints = store();
        endpoints.attach(&mut scene);
        let marker = endpoints.get(EndpointId::End).marker().unwrap();

        let p = Vec3::new(0.0, 0.0, R);
        endpoints.relocate(EndpointId::End, p, Vec3::Z, &mut scene);

        let t = scene.transforms[&marker];
        assert!((t.position - p).length() < 1e-3);
        assert!((t.forward() - Vec3::Z).length() < 1e-5);

        let arc = scene.last_line_points().unwrap();
        assert!((arc.last().unwrap().normalize() - Vec3::Z).length() < 1e-4);
        assert!(arc.iter().all(|q| (q.length() - (R + ARC_LIFT)).abs() < 0.5));
    }

    #[test]
    fn non_finite_relocation_is_ignored() {
        let mut scene = FakeScene::default();
        let mut endpoints = store();
        let before = endpoints.position(EndpointId::Start);
        endpoints.relocate(EndpointId::Start, Vec3::NAN, Vec3::Z, &mut scene);
        assert_eq!(endpoints.position(EndpointId::Start), before);
    }

    #[test]
    fn pick_returns_nearest_marker() {
        let planet = PlanetSurface::new(R, 0.0);
        let near = Vec3::new(R, 0.0, 0.0);
        let far = Vec3::new(R - 100.0, 0.0, 0.0);
        let endpoints = EndpointStore::new(planet, far, near, 75.0);
        let ray = Ray::new(Vec3::new(3.0 * R, 0.0, 0.0), Vec3::NEG_X).unwrap();
        let hit = endpoints.pick(&ray).unwrap();
        assert_eq!(hit.id, EndpointId::End);
        assert_eq!(hit.position, near);

        let miss = Ray::new(Vec3::new(3.0 * R, 500.0, 0.0), Vec3::NEG_X).unwrap();
        assert!(endpoints.pick(&miss).is_none());
    }

    #[test]
    fn grabbed_intensity_sets_highlight() {
        let mut scene = FakeScene::default();
        let mut endpoints = store();
        endpoints.attach(&mut scene);
        endpoints.set_intensity(EndpointId::Start, Intensity::Grabbed, &mut scene);
        assert!(endpoints.get(EndpointId::Start).highlighted);

        assert_eq!(endpoints.highlighted(), Some(EndpointId::Start));

        endpoints.set_all_intensity(Intensity::Active, &mut scene);
        assert_eq!(endpoints.highlighted(), None);
        let marker = endpoints.get(EndpointId::Start).marker().unwrap();
        assert_eq!(scene.intensities[&marker], Intensity::Active.level());
    }

    #[test]
    fn node_names_round_trip() {
        for id in EndpointId::ALL {
            assert_eq!(EndpointId::from_node_name(id.node_name()), Some(id));
        }
        assert_eq!(EndpointId::from_node_name("7"), None);
    }
}
