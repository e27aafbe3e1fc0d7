//! Pointer to planet-surface projection.

use crate::endpoints::{EndpointHit, EndpointStore, PlanetSurface};
use engine_core::{Quat, Vec2, Vec3};
use renderer::OrbitCamera;

/// A pointer ray landing on the planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub distance: f32,
    pub point: Vec3,
    /// Outward world-space normal.
    pub normal: Vec3,
    /// Normal remapped into the markers' frame; markers face along this.
    pub corrected_normal: Vec3,
}

/// Everything under the pointer this event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerProbe {
    pub endpoint: Option<EndpointHit>,
    pub planet: Option<SurfaceHit>,
}

impl PointerProbe {
    /// Nothing under the pointer.
    pub fn miss() -> Self {
        Self::default()
    }

    /// An endpoint that can be grabbed: the ray touches its marker and the planet.
    pub fn grabbable(&self) -> Option<EndpointHit> {
        self.planet.and(self.endpoint)
    }
}

/// Remap a world normal for marker orientation.
///
/// The normal is taken into the planet mesh's local frame, then z is negated and
/// swapped with y. With the planet at its default ECEF orientation this yields
/// the world normal again.
pub fn corrected_normal(world_normal: Vec3, planet_orientation: Quat) -> Vec3 {
    let local = planet_orientation.inverse() * world_normal;
    Vec3::new(local.x, -local.z, local.y)
}

/// Casts pointer rays from the camera. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerProjector;

impl PointerProjector {
    /// Planet intersection under a pointer given in NDC, or `None` over empty space.
    pub fn project(
        &self,
        ndc: Vec2,
        camera: &OrbitCamera,
        planet: &PlanetSurface,
    ) -> Option<SurfaceHit> {
        let ray = camera.screen_ray(ndc)?;
        planet.intersect(&ray)
    }

    /// Marker and planet hits under the pointer. A missing pointer probes nothing.
    ///
    /// Markers behind the planet are not reported.
    pub fn probe(
        &self,
        ndc: Option<Vec2>,
        camera: &OrbitCamera,
        endpoints: &EndpointStore,
    ) -> PointerProbe {
        let Some(ndc) = ndc else {
            return PointerProbe::miss();
        };
        let planet = self.project(ndc, camera, endpoints.planet());
        let endpoint = camera
            .screen_ray(ndc)
            .and_then(|ray| endpoints.pick(&ray))
            .filter(|e| planet.map_or(true, |p| e.distance <= p.distance));
        PointerProbe { endpoint, planet }
    }
}
