//! Core spatial types shared by the relay viewer crates.
//!
//! This crate provides the foundational types used across all viewer systems:
//! - Transform and marker orientation
//! - Rays, spheres and ray/sphere intersection
//! - Scene components stored in the `hecs` world the renderer draws from

pub mod components;
pub mod geometry;
pub mod transform;

pub use components::*;
pub use geometry::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
