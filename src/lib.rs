//! Lander - A thruster-steered lander in the browser
//!
//! Core modules:
//! - `sim`: Pure per-tick logic (input flags, thrust, camera, terrain, frame limiter)
//! - `world`: rapier2d physics world and scene assembly
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Data-driven tuning persisted to LocalStorage

pub mod renderer;
pub mod settings;
pub mod sim;
pub mod world;

pub use settings::{SceneKind, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target simulation rate
    pub const TARGET_FPS: f32 = 60.0;
    /// Engine time scale (0.5 = half speed, heavier feel)
    pub const TIME_SCALE: f32 = 0.5;

    /// Thrust per nozzle in engine units (mass * px / ms²)
    pub const THRUST_MAGNITUDE: f32 = 0.008;
    /// Angular offset added to each thruster (radians)
    pub const THRUST_THROW_ANGLE: f32 = 0.28;

    /// Gravity in engine units (y points down)
    pub const GRAVITY_Y: f32 = 1.0;
    pub const GRAVITY_SCALE: f32 = 0.001;
    /// Velocity loss per step at unit time scale
    pub const AIR_FRICTION: f32 = 0.01;
    pub const SURFACE_FRICTION: f32 = 0.1;

    /// Engine units are per ms², rapier works per s²
    pub const MS2_TO_S2: f32 = 1.0e6;

    /// Ship parts (centre x, centre y, width, height)
    pub const SHIP_HULL: [f32; 4] = [350.0, 200.0, 15.0, 35.0];
    pub const SHIP_THRUSTER: [f32; 4] = [350.0, 220.0, 15.0, 5.0];
    pub const SHIP_DENSITY: f32 = 0.01;
    pub const DEFAULT_DENSITY: f32 = 0.001;

    /// Terrain chunk defaults
    pub const CHUNK_WIDTH: f32 = 4000.0;
    pub const CHUNK_HEIGHT: f32 = 1000.0;
    pub const LAND_GRAN: f32 = 20.0;
    pub const LAND_VARIATION: f32 = 15.0;
}

/// Rotate a vector by `angle` radians (clockwise on screen, since y points down)
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Area-weighted centroid of axis-aligned rectangles given as (cx, cy, w, h)
pub fn rect_centroid(parts: &[[f32; 4]]) -> Vec2 {
    let mut area_sum = 0.0;
    let mut weighted = Vec2::ZERO;
    for &[cx, cy, w, h] in parts {
        let area = w * h;
        area_sum += area;
        weighted += Vec2::new(cx, cy) * area;
    }
    if area_sum > 0.0 {
        weighted / area_sum
    } else {
        Vec2::ZERO
    }
}
