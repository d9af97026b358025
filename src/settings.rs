//! Player settings and preferences
//!
//! Persisted separately from the high score: LocalStorage in the browser,
//! an optional JSON file on native.

use serde::{Deserialize, Serialize};

use crate::consts::TURN_SPEED;
#[cfg(target_arch = "wasm32")]
use crate::persistence::StoreError;
use crate::shooter::RenderOptions;

/// Raw key identifiers (`KeyboardEvent.key` values) bound to each action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub fire: Vec<String>,
    pub pause: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |ks: &[&str]| ks.iter().map(|k| k.to_string()).collect();
        Self {
            left: keys(&["ArrowLeft", "a"]),
            right: keys(&["ArrowRight", "d"]),
            fire: keys(&[" "]),
            pause: keys(&["Escape"]),
        }
    }
}

/// Game actions a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Fire,
    Pause,
}

impl KeyBindings {
    /// Action bound to a raw key, if any. Single letters match case-insensitively.
    pub fn action_for(&self, key: &str) -> Option<Action> {
        let matches = |bound: &[String]| {
            bound
                .iter()
                .any(|b| b == key || (b.len() == 1 && b.eq_ignore_ascii_case(key)))
        };
        if matches(&self.left) {
            Some(Action::Left)
        } else if matches(&self.right) {
            Some(Action::Right)
        } else if matches(&self.fire) {
            Some(Action::Fire)
        } else if matches(&self.pause) {
            Some(Action::Pause)
        } else {
            None
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,

    // === Visual Effects ===
    /// Explosion particles
    pub particles: bool,
    /// Scrolling star background
    pub starfield: bool,
    /// Neon glow around ships and text
    pub glow: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (static starfield, no glow)
    pub reduced_motion: bool,

    // === Cube ===
    /// Layer turn speed (radians/sec)
    pub cube_turn_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keys: KeyBindings::default(),

            // Visual effects - all on by default
            particles: true,
            starfield: true,
            glow: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,

            cube_turn_speed: TURN_SPEED,
        }
    }
}

impl Settings {
    /// Render toggles after accessibility overrides
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            starfield: self.starfield && !self.reduced_motion,
            glow: self.glow && !self.reduced_motion,
            particles: self.particles,
        }
    }

    /// Turn speed clamped to something that still lands
    pub fn effective_turn_speed(&self) -> f32 {
        if self.cube_turn_speed.is_finite() && self.cube_turn_speed > 0.0 {
            self.cube_turn_speed
        } else {
            TURN_SPEED
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "arcade_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {err}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        let json = self.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| StoreError::Storage(format!("{e:?}")))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Load from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("Using default settings");
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring {}: {err}", path.display());
                Self::default()
            }
        }
    }
}
