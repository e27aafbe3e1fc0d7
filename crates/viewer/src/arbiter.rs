//! Pointer ownership between camera orbiting and endpoint dragging.
//!
//! [`InputArbiter::handle`] is a pure dispatch: it takes a pointer event with the
//! hits already computed, updates the mode, and returns the effects the caller
//! must apply. It never touches the camera, the scene or the network itself.

use crate::endpoints::{EndpointId, Intensity};
use crate::projector::PointerProbe;
use engine_core::Vec3;

/// Pointer moves shorter than this do not count as relocating an endpoint.
const MOVE_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(PointerProbe),
    Pressed(PointerProbe),
    Released,
    /// Operator flipped the "move endpoints" switch.
    MoveModeToggled(bool),
}

/// An in-progress drag of one endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub target: EndpointId,
    /// Set once the endpoint has actually moved.
    pub dirty: bool,
    /// Where the endpoint currently sits; starts at its stored position.
    last_point: Vec3,
}

/// Who owns the pointer. A drag session exists only inside `Dragging`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Orbit,
    Armed { target: EndpointId },
    Dragging(DragSession),
}

impl InputMode {
    pub fn name(&self) -> &'static str {
        match self {
            InputMode::Orbit => "ORBIT",
            InputMode::Armed { .. } => "ARMED",
            InputMode::Dragging(_) => "DRAGGING",
        }
    }
}

/// Work requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    CameraRotation(bool),
    Highlight(EndpointId, Intensity),
    HighlightAll(Intensity),
    Relocate {
        id: EndpointId,
        point: Vec3,
        normal: Vec3,
    },
    RequestResolve,
}

#[derive(Debug, Clone)]
pub struct InputArbiter {
    mode: InputMode,
    move_enabled: bool,
}

impl Default for InputArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl InputArbiter {
    pub fn new() -> Self {
        Self {
            mode: InputMode::Orbit,
            move_enabled: false,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Whether the "move endpoints" switch is on. Pointer events are ignored while off.
    pub fn is_listening(&self) -> bool {
        self.move_enabled
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        match &self.mode {
            InputMode::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Camera rotation is free exactly in `Orbit`.
    pub fn camera_enabled(&self) -> bool {
        matches!(self.mode, InputMode::Orbit)
    }

    pub fn handle(&mut self, event: PointerEvent) -> Vec<Effect> {
        if let PointerEvent::MoveModeToggled(on) = event {
            return self.toggle_move_mode(on);
        }
        if !self.move_enabled {
            return Vec::new();
        }

        let before = self.mode;
        let effects = match (self.mode, event) {
            (InputMode::Orbit, PointerEvent::Moved(probe)) => match probe.grabbable() {
                Some(hit) => {
                    self.mode = InputMode::Armed { target: hit.id };
                    vec![
                        Effect::CameraRotation(false),
                        Effect::Highlight(hit.id, Intensity::Grabbed),
                    ]
                }
                None => Vec::new(),
            },

            (InputMode::Armed { target }, PointerEvent::Moved(probe)) => match probe.grabbable() {
                Some(hit) if hit.id == target => Vec::new(),
                Some(hit) => {
                    self.mode = InputMode::Armed { target: hit.id };
                    vec![
                        Effect::Highlight(target, Intensity::Active),
                        Effect::Highlight(hit.id, Intensity::Grabbed),
                    ]
                }
                None => {
                    self.mode = InputMode::Orbit;
                    vec![
                        Effect::CameraRotation(true),
                        Effect::HighlightAll(Intensity::Active),
                    ]
                }
            },

            (InputMode::Armed { target }, PointerEvent::Pressed(probe)) => match probe.endpoint {
                Some(hit) => {
                    self.mode = InputMode::Dragging(DragSession {
                        target: hit.id,
                        dirty: false,
                        last_point: hit.position,
                    });
                    if hit.id == target {
                        Vec::new()
                    } else {
                        vec![
                            Effect::Highlight(target, Intensity::Active),
                            Effect::Highlight(hit.id, Intensity::Grabbed),
                        ]
                    }
                }
                None => Vec::new(),
            },

            (InputMode::Dragging(mut session), PointerEvent::Moved(probe)) => match probe.planet {
                Some(surface) => {
                    session.dirty |= session.last_point.distance(surface.point) > MOVE_EPSILON;
                    session.last_point = surface.point;
                    self.mode = InputMode::Dragging(session);
                    vec![Effect::Relocate {
                        id: session.target,
                        point: surface.point,
                        normal: surface.corrected_normal,
                    }]
                }
                None => Vec::new(),
            },

            (InputMode::Dragging(session), PointerEvent::Released) => {
                self.mode = InputMode::Orbit;
                let mut effects = Vec::new();
                if session.dirty {
                    effects.push(Effect::RequestResolve);
                }
                effects.push(Effect::CameraRotation(true));
                effects.push(Effect::HighlightAll(Intensity::Active));
                effects
            }

            _ => Vec::new(),
        };

        if before.name() != self.mode.name() {
            log::debug!("{} -> {}", before.name(), self.mode.name());
        }
        effects
    }

    fn toggle_move_mode(&mut self, on: bool) -> Vec<Effect> {
        if on == self.move_enabled {
            return Vec::new();
        }
        self.move_enabled = on;
        if on {
            log::info!("Endpoint move mode on");
            return vec![Effect::HighlightAll(Intensity::Active)];
        }

        if let InputMode::Dragging(session) = self.mode {
            log::debug!(
                "Cancelled drag of {:?}{}",
                session.target,
                if session.dirty { ", discarding move" } else { "" }
            );
        }
        self.mode = InputMode::Orbit;
        log::info!("Endpoint move mode off");
        vec![
            Effect::CameraRotation(true),
            Effect::HighlightAll(Intensity::Inactive),
        ]
    }
}
