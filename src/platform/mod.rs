//! Platform abstraction layer
//!
//! Browser event handlers only record raw input here; the frame loop turns
//! it into a [`TickInput`](crate::shooter::TickInput) once per tick.

pub mod input;

pub use input::{JOYSTICK_DEAD_ZONE, KeyState};

/// Milliseconds since page load (`performance.now()`)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Milliseconds since the first call
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}
