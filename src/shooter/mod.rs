//! Space shooter simulation
//!
//! All gameplay logic lives here and stays platform free:
//! - One tick per rendered frame, movement in fixed per-tick steps
//! - Seeded RNG only
//! - Rendering goes through the host's [`DrawSurface`]

pub mod collision;
pub mod render;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use render::{Color, DrawSurface, RenderOptions, render};
pub use state::{Bullet, Enemy, Particle, Player, ShooterEvent, ShooterPhase, ShooterState};
pub use tick::{ShooterEngine, TickInput};
