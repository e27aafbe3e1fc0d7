//! Interaction session: arbiter, endpoints and sync wired to the camera, scene and solver.

use crate::arbiter::{Effect, InputArbiter, PointerEvent};
use crate::controls::{adjust_radius, Command, DisplayToggles, Toggle};
use crate::endpoints::{EndpointId, EndpointStore};
use crate::projector::PointerProjector;
use crate::scene::{GuideObjects, SceneCollaborator};
use crate::sync::{SyncCoordinator, SyncOutcome};
use engine_core::Vec2;
use renderer::OrbitCamera;
use solver::{GenerateRequest, Polyhedron, SolverTransport};

/// Mutable collaborators the session works on, owned by the application root.
pub struct SessionContext<'a> {
    pub camera: &'a mut OrbitCamera,
    pub scene: &'a mut dyn SceneCollaborator,
    pub solver: &'a mut dyn SolverTransport,
}

/// Parameters of generation requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub satellite_count: u32,
    pub min_altitude: f32,
    pub max_altitude: f32,
    /// Altitude of polyhedron layouts.
    pub altitude: f32,
}

pub struct InteractionSession {
    arbiter: InputArbiter,
    endpoints: EndpointStore,
    sync: SyncCoordinator,
    toggles: DisplayToggles,
    projector: PointerProjector,
    generation: GenerationSettings,
    /// Planet radius sent with requests.
    request_radius: f32,
    guides: Option<GuideObjects>,
}

impl InteractionSession {
    pub fn new(endpoints: EndpointStore, generation: GenerationSettings) -> Self {
        let request_radius = endpoints.planet().radius;
        Self {
            arbiter: InputArbiter::new(),
            endpoints,
            sync: SyncCoordinator::new(),
            toggles: DisplayToggles::default(),
            projector: PointerProjector,
            generation,
            request_radius,
            guides: None,
        }
    }

    pub fn arbiter(&self) -> &InputArbiter {
        &self.arbiter
    }

    pub fn endpoints(&self) -> &EndpointStore {
        &self.endpoints
    }

    pub fn sync(&self) -> &SyncCoordinator {
        &self.sync
    }

    pub fn request_radius(&self) -> f32 {
        self.request_radius
    }

    /// Put markers, preview arc and guides into the scene.
    pub fn attach(&mut self, scene: &mut dyn SceneCollaborator, axis_length: f32) {
        self.endpoints.attach(scene);
        self.guides = Some(GuideObjects::build(
            scene,
            self.endpoints.planet().radius,
            axis_length,
        ));
    }

    pub fn pointer_moved(&mut self, ndc: Option<Vec2>, ctx: &mut SessionContext) {
        if !self.arbiter.is_listening() {
            return;
        }
        let probe = self.projector.probe(ndc, ctx.camera, &self.endpoints);
        self.dispatch(PointerEvent::Moved(probe), ctx);
    }

    pub fn pointer_pressed(&mut self, ndc: Option<Vec2>, ctx: &mut SessionContext) {
        if !self.arbiter.is_listening() {
            return;
        }
        let probe = self.projector.probe(ndc, ctx.camera, &self.endpoints);
        self.dispatch(PointerEvent::Pressed(probe), ctx);
    }

    pub fn pointer_released(&mut self, ctx: &mut SessionContext) {
        self.dispatch(PointerEvent::Released, ctx);
    }

    pub fn set_move_mode(&mut self, on: bool, ctx: &mut SessionContext) {
        self.dispatch(PointerEvent::MoveModeToggled(on), ctx);
    }

    fn dispatch(&mut self, event: PointerEvent, ctx: &mut SessionContext) {
        for effect in self.arbiter.handle(event) {
            match effect {
                Effect::CameraRotation(enabled) => ctx.camera.set_rotation_enabled(enabled),
                Effect::Highlight(id, intensity) => {
                    self.endpoints.set_intensity(id, intensity, ctx.scene)
                }
                Effect::HighlightAll(intensity) => {
                    self.endpoints.set_all_intensity(intensity, ctx.scene)
                }
                Effect::Relocate { id, point, normal } => {
                    self.endpoints.relocate(id, point, normal, ctx.scene)
                }
                Effect::RequestResolve => {
                    self.sync
                        .request_resolve(&self.endpoints, self.request_radius, ctx.solver);
                }
            }
        }
    }

    pub fn run_command(&mut self, command: Command, ctx: &mut SessionContext) {
        match command {
            Command::ToggleMoveMode => {
                let on = !self.arbiter.is_listening();
                self.set_move_mode(on, ctx);
            }
            Command::GenerateRandom => {
                let request = GenerateRequest::Random {
                    satellite_count: self.generation.satellite_count,
                    min_altitude: self.generation.min_altitude,
                    max_altitude: self.generation.max_altitude,
                    planet_radius: self.request_radius,
                    start: self.endpoints.position(EndpointId::Start),
                    end: self.endpoints.position(EndpointId::End),
                };
                self.sync.request_generate(request, ctx.solver);
            }
            Command::GeneratePolyhedron(polyhedron) => self.generate_polyhedron(polyhedron, ctx),
            Command::Toggle(toggle) => self.toggle(toggle, ctx.scene),
            Command::AdjustPlanetRadius(delta) => {
                self.request_radius = adjust_radius(self.request_radius, delta);
                log::info!("Request planet radius: {} km", self.request_radius);
            }
        }
    }

    fn generate_polyhedron(&mut self, polyhedron: Polyhedron, ctx: &mut SessionContext) {
        let request = GenerateRequest::Polyhedron {
            polyhedron,
            altitude: self.generation.altitude,
            planet_radius: self.request_radius,
            start: self.endpoints.position(EndpointId::Start),
            end: self.endpoints.position(EndpointId::End),
        };
        self.sync.request_generate(request, ctx.solver);
    }

    fn toggle(&mut self, toggle: Toggle, scene: &mut dyn SceneCollaborator) {
        let on = self.toggles.flip(toggle);
        log::info!("{:?}: {}", toggle, if on { "shown" } else { "hidden" });
        match toggle {
            Toggle::Satellites | Toggle::Connections | Toggle::SolutionPath => {
                self.sync.apply_visibility(scene, &self.toggles)
            }
            Toggle::Axes => {
                if let Some(guides) = &self.guides {
                    scene.set_visible(&guides.axes, on);
                }
            }
            Toggle::Equator => {
                if let Some(guides) = &self.guides {
                    scene.set_visible(&[guides.equator], on);
                }
            }
            Toggle::PrimeMeridian => {
                if let Some(guides) = &self.guides {
                    scene.set_visible(&[guides.prime_meridian], on);
                }
            }
        }
    }

    /// Apply solver replies that arrived since the last frame.
    pub fn pump_replies(&mut self, ctx: &mut SessionContext) -> Vec<SyncOutcome> {
        self.sync.pump(ctx.solver, ctx.scene, &self.toggles)
    }
}
