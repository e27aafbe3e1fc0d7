//! relayview - satellite relay network viewer with draggable route endpoints

mod arbiter;
mod config;
mod controls;
mod endpoints;
mod events;
mod projector;
mod scene;
mod session;
mod sync;
#[cfg(test)]
mod testing;

use anyhow::Result;
use engine_core::{Drawable, Tint, Vec3};
use input::{InputState, MouseButton};
use renderer::{Lighting, OrbitCamera, Renderer, SceneGraph};
use solver::HttpSolver;
use std::sync::Arc;
use std::time::Duration;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use config::ViewerConfig;
use endpoints::{EndpointStore, PlanetSurface};
use scene::PLANET_COLOR;
use session::{GenerationSettings, InteractionSession, SessionContext};
use sync::SyncOutcome;

/// Everything owned by the running viewer.
pub struct ViewerState {
    renderer: Renderer,
    scene: SceneGraph,
    camera: OrbitCamera,
    lighting: Lighting,
    input: InputState,
    session: InteractionSession,
    solver: HttpSolver,
    planet_name: String,
    /// Result of the last solver reply, shown in the title bar.
    last_event: String,
    title: String,
    running: bool,
}

impl ViewerState {
    async fn new(window: Arc<Window>, config: &ViewerConfig) -> Result<Self> {
        let renderer = Renderer::new(window, config.vsync).await?;
        let (width, height) = renderer.dimensions();
        let radius = config.planet_radius;

        let planet = PlanetSurface::new(radius, config.surface_offset);
        let mut scene = SceneGraph::new();
        scene.spawn(Drawable::Sphere, planet.transform(), Tint::rgb(PLANET_COLOR));
        log::info!("Planet {} loaded, radius {} km", config.planet_name, radius);

        let endpoints =
            EndpointStore::from_lat_lon(planet, config.start, config.end, config.marker_radius);
        let mut session = InteractionSession::new(
            endpoints,
            GenerationSettings {
                satellite_count: config.satellite_count,
                min_altitude: config.min_altitude,
                max_altitude: config.max_altitude,
                altitude: config.altitude,
            },
        );
        session.attach(&mut scene, config.far);

        let mut camera =
            OrbitCamera::looking_at(Vec3::new(1.5 * radius, 1.5 * radius, 0.0), Vec3::ZERO);
        camera.fov_degrees = config.fov_degrees;
        camera.near = config.near;
        camera.far = config.far;
        camera.sensitivity = config.orbit_sensitivity;
        camera.zoom_speed = config.zoom_speed;
        camera.min_distance = radius * 1.05;
        camera.max_distance = config.far * 0.5;
        camera.set_aspect(width, height);

        let mut input = InputState::new();
        input.set_viewport(width, height);

        let lighting = Lighting {
            star_position: Vec3::new(20.0, 10.0, 5.0) * radius,
            star_brightness: config.star_light,
            ambient: config.ambient_light,
        };

        let solver = HttpSolver::spawn(
            &config.solver_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        Ok(Self {
            renderer,
            scene,
            camera,
            lighting,
            input,
            session,
            solver,
            planet_name: config.planet_name.clone(),
            last_event: String::from("no network loaded"),
            title: String::new(),
            running: true,
        })
    }

    /// Split borrow: the session plus the collaborators it drives.
    fn context(&mut self) -> (&mut InteractionSession, SessionContext<'_>) {
        (
            &mut self.session,
            SessionContext {
                camera: &mut self.camera,
                scene: &mut self.scene,
                solver: &mut self.solver,
            },
        )
    }

    fn update(&mut self) {
        let (session, mut ctx) = self.context();
        let outcomes = session.pump_replies(&mut ctx);
        if let Some(outcome) = outcomes.last() {
            self.last_event = describe(outcome);
        }

        debug_assert_eq!(
            self.session.arbiter().camera_enabled(),
            self.camera.is_rotation_enabled()
        );
        // Both are no-ops while the arbiter holds the pointer.
        if self.input.is_mouse_held(MouseButton::Left) {
            self.camera.process_drag(self.input.mouse_delta());
        }
        self.camera.process_scroll(self.input.scroll());

        self.refresh_title();
        self.input.begin_frame();
    }

    fn status_line(&self) -> String {
        let arbiter = self.session.arbiter();
        let endpoints = self.session.endpoints();
        let snapshot = self.session.sync().snapshot();

        let mode = match (arbiter.drag_session(), endpoints.highlighted()) {
            (Some(drag), _) if drag.dirty => format!("dragging {}*", drag.target.node_name()),
            (Some(drag), _) => format!("dragging {}", drag.target.node_name()),
            (None, Some(id)) => format!("{} {}", arbiter.mode().name(), id.node_name()),
            (None, None) => arbiter.mode().name().to_string(),
        };
        let move_mode = if arbiter.is_listening() { "on" } else { "off" };

        format!(
            "relayview | {} r={} km | {} nodes, {} edges | move {} ({}) | #{} {}",
            self.planet_name,
            self.session.request_radius(),
            snapshot.nodes.len(),
            snapshot.edges.len(),
            move_mode,
            mode,
            self.session.sync().latest_ticket(),
            self.last_event
        )
    }

    fn refresh_title(&mut self) {
        let title = self.status_line();
        if title != self.title {
            self.renderer.window.set_title(&title);
            self.title = title;
        }
    }

    fn render(&mut self) -> Result<()> {
        self.renderer.update_camera(&self.camera, &self.lighting);
        self.renderer.render(&self.scene)
    }
}

fn describe(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Applied { kind, nodes, edges } => {
            format!("{} ok: {} nodes, {} edges", kind, nodes, edges)
        }
        SyncOutcome::Rejected(message) => format!("solver rejected request: {}", message),
        SyncOutcome::Failed(message) => format!("solver error: {}", message),
        SyncOutcome::Stale { ticket, latest } => {
            format!("dropped reply #{} (waiting for #{})", ticket, latest)
        }
    }
}

/// Application handler for winit.
struct App {
    config: ViewerConfig,
    state: Option<ViewerState>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("relayview")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                ));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(ViewerState::new(window.clone(), &self.config)) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize viewer: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    controls::print_controls();
    let config = ViewerConfig::load();
    log::info!("Starting relayview, solver at {}", config.solver_url);

    let event_loop = EventLoop::new()?;
    // Poll: the frame loop also drains solver replies, so it must not wait for input.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
