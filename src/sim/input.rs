//! Thruster input flags
//!
//! Keyboard and touch handlers write here; the step reads it once per tick.

use serde::{Deserialize, Serialize};

/// Touch event types the canvas listens for, paired with whether they press.
///
/// The OS cancels touches for system gestures; a cancel lets go like touchend.
pub const TOUCH_EVENTS: [(&str, bool); 3] = [
    ("touchstart", true),
    ("touchend", false),
    ("touchcancel", false),
];

/// Whether a touch event type presses (`Some(true)`) or releases a thruster
pub fn touch_pressed(event_type: &str) -> Option<bool> {
    TOUCH_EVENTS
        .iter()
        .find(|(name, _)| *name == event_type)
        .map(|(_, pressed)| *pressed)
}

/// Which thrusters the player is currently holding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub thrust_left: bool,
    pub thrust_right: bool,
}

impl InputState {
    /// Apply a keydown (`pressed = true`) or keyup event.
    ///
    /// Returns false for keys that don't map to a thruster, which are left alone.
    pub fn key(&mut self, key: &str, pressed: bool) -> bool {
        match key {
            "ArrowLeft" => self.thrust_left = pressed,
            "ArrowRight" => self.thrust_right = pressed,
            _ => return false,
        }
        true
    }

    /// Apply a touchstart (`pressed = true`) or touchend for one changed touch.
    ///
    /// The left half of the canvas drives the left thruster, the rest the right one.
    pub fn touch(&mut self, client_x: f32, canvas_width: f32, pressed: bool) {
        if client_x < canvas_width / 2.0 {
            self.thrust_left = pressed;
        } else {
            self.thrust_right = pressed;
        }
    }

    /// Drop both thrusters (focus lost, keyup may never arrive)
    pub fn release_all(&mut self) {
        self.thrust_left = false;
        self.thrust_right = false;
    }

    pub fn any(&self) -> bool {
        self.thrust_left || self.thrust_right
    }
}
