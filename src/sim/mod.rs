//! Per-tick game logic
//!
//! Everything here is pure and platform-free:
//! - Input flags are plain data, mutated only by the input handlers
//! - The step turns (input, ship pose, camera) into a force and a camera delta
//! - Terrain takes its random source from the caller
//!
//! Side effects (applying forces, stepping bodies) live in `crate::world`.

pub mod camera;
pub mod clock;
pub mod input;
pub mod step;
pub mod terrain;

pub use camera::{Bounds, camera_follow};
pub use clock::FrameLimiter;
pub use input::{InputState, TOUCH_EVENTS, touch_pressed};
pub use step::{ShipPose, StepOutput, ThrustTuning, step, thrust_forces};
pub use terrain::{TerrainError, TerrainParams, TerrainProfile, generate_terrain};
