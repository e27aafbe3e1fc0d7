//! Operator key bindings and display toggles.

use input::KeyCode;
use solver::Polyhedron;

pub const RADIUS_STEP: f32 = 100.0;
pub const MIN_PLANET_RADIUS: f32 = 100.0;
pub const MAX_PLANET_RADIUS: f32 = 20_000.0;

/// Something that can be shown or hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Satellites,
    Connections,
    SolutionPath,
    Axes,
    Equator,
    PrimeMeridian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayToggles {
    pub satellites: bool,
    pub connections: bool,
    pub solution_path: bool,
    pub axes: bool,
    pub equator: bool,
    pub prime_meridian: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            satellites: true,
            connections: true,
            solution_path: true,
            axes: false,
            equator: false,
            prime_meridian: false,
        }
    }
}

impl DisplayToggles {
    /// Flip a toggle and return its new state.
    pub fn flip(&mut self, toggle: Toggle) -> bool {
        let slot = match toggle {
            Toggle::Satellites => &mut self.satellites,
            Toggle::Connections => &mut self.connections,
            Toggle::SolutionPath => &mut self.solution_path,
            Toggle::Axes => &mut self.axes,
            Toggle::Equator => &mut self.equator,
            Toggle::PrimeMeridian => &mut self.prime_meridian,
        };
        *slot = !*slot;
        *slot
    }
}

/// Operator commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    ToggleMoveMode,
    GenerateRandom,
    GeneratePolyhedron(Polyhedron),
    Toggle(Toggle),
    /// Change the planet radius sent with requests by this many kilometres.
    AdjustPlanetRadius(f32),
}

pub fn command_for_key(key: KeyCode) -> Option<Command> {
    let command = match key {
        KeyCode::KeyM => Command::ToggleMoveMode,
        KeyCode::KeyG => Command::GenerateRandom,
        KeyCode::Digit1 => Command::GeneratePolyhedron(Polyhedron::Tetrahedron),
        KeyCode::Digit2 => Command::GeneratePolyhedron(Polyhedron::Cube),
        KeyCode::Digit3 => Command::GeneratePolyhedron(Polyhedron::Octahedron),
        KeyCode::Digit4 => Command::GeneratePolyhedron(Polyhedron::Dodecahedron),
        KeyCode::Digit5 => Command::GeneratePolyhedron(Polyhedron::Icosahedron),
        KeyCode::KeyS => Command::Toggle(Toggle::Satellites),
        KeyCode::KeyC => Command::Toggle(Toggle::Connections),
        KeyCode::KeyP => Command::Toggle(Toggle::SolutionPath),
        KeyCode::KeyA => Command::Toggle(Toggle::Axes),
        KeyCode::KeyE => Command::Toggle(Toggle::Equator),
        KeyCode::KeyR => Command::Toggle(Toggle::PrimeMeridian),
        KeyCode::Equal | KeyCode::NumpadAdd => Command::AdjustPlanetRadius(RADIUS_STEP),
        KeyCode::Minus | KeyCode::NumpadSubtract => Command::AdjustPlanetRadius(-RADIUS_STEP),
        _ => return None,
    };
    Some(command)
}

pub fn adjust_radius(current: f32, delta: f32) -> f32 {
    (current + delta).clamp(MIN_PLANET_RADIUS, MAX_PLANET_RADIUS)
}

pub fn print_controls() {
    println!("relayview controls");
    println!("  Drag        - orbit camera      Scroll - zoom");
    println!("  M           - move endpoints on/off (drag START / END over the planet)");
    println!("  G           - random constellation");
    println!("  1..5        - tetrahedron, cube, octahedron, dodecahedron, icosahedron");
    println!("  S / C / P   - satellites / connections / solution path");
    println!("  A / E / R   - axes / equator / prime meridian");
    println!("  + / -       - planet radius for requests");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_show_network_only() {
        let t = DisplayToggles::default();
        assert!(t.satellites && t.connections && t.solution_path);
        assert!(!t.axes && !t.equator && !t.prime_meridian);
    }

    #[test]
    fn flip_returns_new_state() {
        let mut t = DisplayToggles::default();
        assert!(!t.flip(Toggle::Connections));
        assert!(!t.connections);
        assert!(t.flip(Toggle::Connections));
    }

    #[test]
    fn digits_pick_polyhedra_in_order() {
        let keys = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
        ];
        for (key, shape) in keys.into_iter().zip(Polyhedron::ALL) {
            assert_eq!(command_for_key(key), Some(Command::GeneratePolyhedron(shape)));
        }
        assert_eq!(command_for_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn radius_is_clamped() {
        assert_eq!(adjust_radius(6371.0, RADIUS_STEP), 6471.0);
        assert_eq!(adjust_radius(150.0, -RADIUS_STEP), MIN_PLANET_RADIUS);
        assert_eq!(adjust_radius(19_950.0, RADIUS_STEP), MAX_PLANET_RADIUS);
    }
}
