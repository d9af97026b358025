//! Raw key and touch state
//!
//! Keys are tracked by their raw identifier so rebinding only touches
//! [`KeyBindings`]. Pause is edge-triggered; everything else is level.

use std::collections::HashSet;

use crate::settings::{Action, KeyBindings};
use crate::shooter::TickInput;

/// Joystick deflection below this is ignored
pub const JOYSTICK_DEAD_ZONE: f32 = 0.3;

#[derive(Debug, Clone, Default)]
pub struct KeyState {
    pressed: HashSet<String>,
    /// Pause pressed since the last tick
    pause_queued: bool,
    /// Horizontal joystick deflection (-1.0 left .. 1.0 right)
    joystick_x: f32,
    fire_button: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is bound to an action (host should prevent default)
    pub fn key_down(&mut self, key: &str, bindings: &KeyBindings) -> bool {
        let action = bindings.action_for(key);
        // Auto-repeat arrives as repeated keydowns; only the first one toggles pause
        let fresh = self.pressed.insert(key.to_string());
        if fresh && action == Some(Action::Pause) {
            self.pause_queued = true;
        }
        action.is_some()
    }

    pub fn key_up(&mut self, key: &str, bindings: &KeyBindings) -> bool {
        self.pressed.remove(key);
        bindings.action_for(key).is_some()
    }

    /// Window lost focus: drop everything held
    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.joystick_x = 0.0;
        self.fire_button = false;
    }

    pub fn set_joystick(&mut self, x: f32) {
        self.joystick_x = if x.is_finite() { x.clamp(-1.0, 1.0) } else { 0.0 };
    }

    pub fn set_fire_button(&mut self, down: bool) {
        self.fire_button = down;
    }

    fn held(&self, bindings: &KeyBindings, action: Action) -> bool {
        self.pressed
            .iter()
            .any(|k| bindings.action_for(k) == Some(action))
    }

    /// Input for one tick. Consumes a queued pause.
    pub fn to_tick_input(&mut self, bindings: &KeyBindings, time_ms: f64) -> TickInput {
        let input = TickInput {
            left: self.held(bindings, Action::Left) || self.joystick_x < -JOYSTICK_DEAD_ZONE,
            right: self.held(bindings, Action::Right) || self.joystick_x > JOYSTICK_DEAD_ZONE,
            fire: self.held(bindings, Action::Fire) || self.fire_button,
            pause: self.pause_queued,
            time_ms,
        };
        self.pause_queued = false;
        input
    }
}
