//! Per-tick update
//!
//! Input flags + ship pose + camera in, thrust forces + camera delta out.
//! Nothing here touches the physics engine; `world::World::apply`
//! performs the side effects.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::{Bounds, camera_follow};
use super::input::InputState;
use crate::consts::{THRUST_MAGNITUDE, THRUST_THROW_ANGLE};
use crate::rotate;

/// Thruster tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrustTuning {
    /// Force per nozzle, engine units
    pub magnitude: f32,
    /// Offset from the ship axis per nozzle (radians)
    pub throw_angle: f32,
}

impl Default for ThrustTuning {
    fn default() -> Self {
        Self {
            magnitude: THRUST_MAGNITUDE,
            throw_angle: THRUST_THROW_ANGLE,
        }
    }
}

/// Ship state as reported by the physics engine before the tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipPose {
    /// Body origin (centre of mass)
    pub position: Vec2,
    /// Heading in radians, 0 = upright
    pub angle: f32,
    /// World position of the thruster part
    pub thruster: Vec2,
}

/// Everything one tick wants done to the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutput {
    /// Force from the left nozzle, if held
    pub left: Option<Vec2>,
    /// Force from the right nozzle, if held
    pub right: Option<Vec2>,
    /// Where the forces act (thruster position)
    pub point: Vec2,
    /// Translation that re-centres the camera on the ship
    pub camera_delta: Vec2,
}

impl StepOutput {
    /// Sum of both nozzle forces (they share an application point)
    pub fn total_force(&self) -> Vec2 {
        self.left.unwrap_or(Vec2::ZERO) + self.right.unwrap_or(Vec2::ZERO)
    }

    pub fn is_thrusting(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }
}

/// Nozzle forces for the held thrusters at the given heading.
///
/// Thrust points straight up the ship axis, then each nozzle tilts it by the
/// throw angle: left by -throw, right by +throw.
pub fn thrust_forces(
    input: &InputState,
    angle: f32,
    tuning: &ThrustTuning,
) -> (Option<Vec2>, Option<Vec2>) {
    let base = rotate(Vec2::new(0.0, -tuning.magnitude), angle);

    let left = input.thrust_left.then(|| rotate(base, -tuning.throw_angle));
    let right = input.thrust_right.then(|| rotate(base, tuning.throw_angle));

    (left, right)
}

/// Advance the tick logic: thrust from the held keys, camera onto the ship
pub fn step(
    input: &InputState,
    ship: &ShipPose,
    bounds: &Bounds,
    tuning: &ThrustTuning,
) -> StepOutput {
    let (left, right) = thrust_forces(input, ship.angle, tuning);

    StepOutput {
        left,
        right,
        point: ship.thruster,
        camera_delta: camera_follow(bounds, ship.position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    fn pose(angle: f32) -> ShipPose {
        ShipPose {
            position: Vec2::new(350.0, 202.5),
            angle,
            thruster: Vec2::new(350.0, 220.0),
        }
    }

    fn view() -> Bounds {
        Bounds::new(Vec2::ZERO, Vec2::new(400.0, 600.0))
    }

    /// Angle of a force measured the same way as ship headings (0 = straight up)
    fn heading_of(v: Vec2) -> f32 {
        v.x.atan2(-v.y)
    }

    #[test]
    fn test_no_input_no_force() {
        let out = step(&InputState::default(), &pose(0.3), &view(), &ThrustTuning::default());
        assert_eq!(out.left, None);
        assert_eq!(out.right, None);
        assert_eq!(out.total_force(), Vec2::ZERO);
        assert!(!out.is_thrusting());
    }

    #[test]
    fn test_left_thrust_upright() {
        let input = InputState {
            thrust_left: true,
            thrust_right: false,
        };
        let out = step(&input, &pose(0.0), &view(), &ThrustTuning::default());

        let f = out.left.expect("left thrust");
        assert!(out.right.is_none());
        assert!((f.length() - 0.008).abs() < 1e-7);
        assert!((heading_of(f) - (-0.28)).abs() < 1e-5);
        // Mostly upward, tilted toward -x
        assert!(f.y < 0.0 && f.x < 0.0);
        assert_eq!(out.point, Vec2::new(350.0, 220.0));
    }

    #[test]
    fn test_right_thrust_tilts_positive() {
        let input = InputState {
            thrust_left: false,
            thrust_right: true,
        };
        let out = step(&input, &pose(0.0), &view(), &ThrustTuning::default());

        let f = out.right.expect("right thrust");
        assert!((heading_of(f) - 0.28).abs() < 1e-5);
        assert!(f.x > 0.0);
    }

    #[test]
    fn test_both_thrusters_cancel_sideways() {
        let input = InputState {
            thrust_left: true,
            thrust_right: true,
        };
        let out = step(&input, &pose(0.0), &view(), &ThrustTuning::default());

        let total = out.total_force();
        assert!(total.x.abs() < 1e-7);
        assert!((total.y + 2.0 * 0.008 * 0.28f32.cos()).abs() < 1e-7);
    }

    #[test]
    fn test_camera_delta_centres_ship() {
        let ship = pose(0.0);
        let mut bounds = view();
        let out = step(&InputState::default(), &ship, &bounds, &ThrustTuning::default());
        bounds.translate(out.camera_delta);
        assert!((bounds.center() - ship.position).length() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_left_force_follows_heading(angle in -PI..PI) {
            let input = InputState { thrust_left: true, thrust_right: false };
            let tuning = ThrustTuning::default();
            let (left, right) = thrust_forces(&input, angle, &tuning);

            prop_assert!(right.is_none());
            let f = left.unwrap();
            prop_assert!((f.length() - tuning.magnitude).abs() < 1e-6);

            let expected = rotate(Vec2::new(0.0, -tuning.magnitude), angle - tuning.throw_angle);
            prop_assert!((f - expected).length() < 1e-6);
        }

        #[test]
        fn prop_magnitude_fixed(angle in -PI..PI, left in any::<bool>(), right in any::<bool>()) {
            let input = InputState { thrust_left: left, thrust_right: right };
            let (l, r) = thrust_forces(&input, angle, &ThrustTuning::default());
            prop_assert_eq!(l.is_some(), left);
            prop_assert_eq!(r.is_some(), right);
            for f in l.into_iter().chain(r) {
                prop_assert!((f.length() - 0.008).abs() < 1e-6);
            }
        }
    }
}
