//! Pointer and keyboard state for the viewer window.

use glam::Vec2;
use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,

    /// Cursor position in window pixels (origin top-left).
    mouse_position: Vec2,
    /// Whether a cursor position has been reported yet.
    has_position: bool,
    /// Cursor movement accumulated since the last frame.
    accumulated_delta: Vec2,
    /// Cursor movement of the last frame.
    mouse_delta: Vec2,

    /// Scroll lines accumulated this frame (positive = away from the user).
    scroll: f32,

    /// Window size in physical pixels.
    viewport: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process cursor position update.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        let next = Vec2::new(position.0 as f32, position.1 as f32);
        if self.has_position {
            self.accumulated_delta += next - self.mouse_position;
        }
        self.mouse_position = next;
        self.has_position = true;
    }

    /// Cursor left the window; the next position report starts a fresh delta.
    pub fn process_cursor_left(&mut self) {
        self.has_position = false;
    }

    /// Accumulate scroll wheel lines.
    pub fn process_scroll(&mut self, lines: f32) {
        self.scroll += lines;
    }

    /// Record the window size used for NDC conversion.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
    }

    // Query methods

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Get the mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll lines for this frame.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Current pointer in normalized device coordinates, if a position and viewport are known.
    pub fn pointer_ndc(&self) -> Option<Vec2> {
        if !self.has_position {
            return None;
        }
        window_to_ndc(self.mouse_position, self.viewport)
    }
}

/// Convert a window pixel position to normalized device coordinates
/// (x right, y up, both in [-1, 1] inside the window).
pub fn window_to_ndc(position: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        (position.x / viewport.x) * 2.0 - 1.0,
        1.0 - (position.y / viewport.y) * 2.0,
    ))
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
