//! Viewer configuration (window, solver service, planet, endpoints). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};

/// Persistent viewer settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_true")]
    pub vsync: bool,

    /// Base URL of the generator / solver service.
    #[serde(default = "default_solver_url")]
    pub solver_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_planet_name")]
    pub planet_name: String,
    /// Planet radius in kilometres.
    #[serde(default = "default_planet_radius")]
    pub planet_radius: f32,
    /// Height of the endpoint markers above the surface.
    #[serde(default)]
    pub surface_offset: f32,
    #[serde(default = "default_ambient")]
    pub ambient_light: f32,
    #[serde(default = "default_star_light")]
    pub star_light: f32,

    /// START endpoint as `[latitude, longitude]` in degrees.
    #[serde(default = "default_start")]
    pub start: [f32; 2],
    /// END endpoint as `[latitude, longitude]` in degrees.
    #[serde(default = "default_end")]
    pub end: [f32; 2],
    #[serde(default = "default_marker_radius")]
    pub marker_radius: f32,

    // Generation
    #[serde(default = "default_satellite_count")]
    pub satellite_count: u32,
    #[serde(default = "default_min_altitude")]
    pub min_altitude: f32,
    #[serde(default = "default_max_altitude")]
    pub max_altitude: f32,
    /// Altitude of polyhedron layouts.
    #[serde(default)]
    pub altitude: f32,

    // Camera
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Radians of orbit per pixel of pointer drag.
    #[serde(default = "default_orbit_sensitivity")]
    pub orbit_sensitivity: f32,
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_solver_url() -> String {
    "http://127.0.0.1:5000/".to_string()
}
fn default_request_timeout() -> u64 {
    10
}
fn default_planet_name() -> String {
    "EARTH".to_string()
}
fn default_planet_radius() -> f32 {
    6371.0
}
fn default_ambient() -> f32 {
    0.4
}
fn default_star_light() -> f32 {
    1.0
}
fn default_start() -> [f32; 2] {
    [60.17, 24.94]
}
fn default_end() -> [f32; 2] {
    [-33.87, 151.21]
}
fn default_marker_radius() -> f32 {
    75.0
}
fn default_satellite_count() -> u32 {
    5
}
fn default_min_altitude() -> f32 {
    300.0
}
fn default_max_altitude() -> f32 {
    700.0
}
fn default_fov() -> f32 {
    80.0
}
fn default_near() -> f32 {
    1.0
}
fn default_far() -> f32 {
    100_000.0
}
fn default_orbit_sensitivity() -> f32 {
    0.005
}
fn default_zoom_speed() -> f32 {
    0.1
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            solver_url: default_solver_url(),
            request_timeout_secs: default_request_timeout(),
            planet_name: default_planet_name(),
            planet_radius: default_planet_radius(),
            surface_offset: 0.0,
            ambient_light: default_ambient(),
            star_light: default_star_light(),
            start: default_start(),
            end: default_end(),
            marker_radius: default_marker_radius(),
            satellite_count: default_satellite_count(),
            min_altitude: default_min_altitude(),
            max_altitude: default_max_altitude(),
            altitude: 0.0,
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            orbit_sensitivity: default_orbit_sensitivity(),
            zoom_speed: default_zoom_speed(),
        }
    }
}

impl ViewerConfig {
    /// Load config from `config.ron`. A missing file is written out with defaults;
    /// an invalid one is left alone and defaults are used.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => match Self::parse(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => {
                log::info!("No config at {:?}, writing defaults", path);
                Self::default().save();
            }
        }
        Self::default()
    }

    fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = ViewerConfig::parse("(planet_radius: 3389.5, solver_url: \"http://solver:8080/\")")
            .unwrap();
        assert_eq!(cfg.planet_radius, 3389.5);
        assert_eq!(cfg.solver_url, "http://solver:8080/");
        assert_eq!(cfg.window_width, 1280);
        assert_eq!(cfg.start, [60.17, 24.94]);
        assert_eq!(cfg.marker_radius, 75.0);
    }

    #[test]
    fn pretty_output_parses_back() {
        let cfg = ViewerConfig {
            satellite_count: 42,
            ..Default::default()
        };
        let text = ron::ser::to_string_pretty(&cfg, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(ViewerConfig::parse(&text).unwrap(), cfg);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(ViewerConfig::parse("not ron at all {").is_err());
    }
}
