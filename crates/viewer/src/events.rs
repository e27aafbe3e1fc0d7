//! Window event handling for ViewerState.
//! Pointer events go straight to the interaction session so their order is kept.

use input::{ElementState, MouseButton};
use winit::event::{MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

use crate::controls;

/// Pixels of touchpad scroll counted as one wheel line.
const PIXELS_PER_LINE: f32 = 40.0;

impl crate::ViewerState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.camera.set_aspect(size.width, size.height);
                self.input.set_viewport(size.width, size.height);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if event.state.is_pressed() && !event.repeat {
                        if let Some(command) = controls::command_for_key(key) {
                            let (session, mut ctx) = self.context();
                            session.run_command(command, &mut ctx);
                        }
                    }
                }
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
                if button == MouseButton::Left {
                    let ndc = self.input.pointer_ndc();
                    let (session, mut ctx) = self.context();
                    match state {
                        ElementState::Pressed => session.pointer_pressed(ndc, &mut ctx),
                        ElementState::Released => session.pointer_released(&mut ctx),
                    }
                }
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.process_cursor_position((position.x, position.y));
                let ndc = self.input.pointer_ndc();
                let (session, mut ctx) = self.context();
                session.pointer_moved(ndc, &mut ctx);
                false
            }
            WindowEvent::CursorLeft { .. } => {
                self.input.process_cursor_left();
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.input.process_scroll(lines);
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    log::error!("Render error: {}", e);
                }
                self.renderer.window.request_redraw();
                false
            }
            _ => false,
        }
    }
}
