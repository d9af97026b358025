//! Arcade Cabinet - the mini-games behind the portfolio arcade
//!
//! Core modules:
//! - `shooter`: Space shooter simulation (tick, collisions, rendering to a 2D surface)
//! - `cube`: 3x3x3 puzzle cube with click-to-turn layer rotations
//! - `session`: Wires the shooter to high scores and sound
//! - `persistence`: High score storage backends
//! - `platform`: Raw input translation

pub mod audio;
pub mod cube;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod shooter;

pub use highscores::HighScore;
pub use session::ArcadeSession;
pub use settings::{KeyBindings, Settings};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (logical canvas units)
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 500.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_START_X: f32 = 200.0;
    /// Horizontal movement per tick
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const START_LIVES: u8 = 3;

    /// Enemies are square
    pub const ENEMY_SIZE: f32 = 25.0;
    pub const ENEMY_MIN_SPEED: f32 = 1.0;
    pub const ENEMY_MAX_SPEED: f32 = 3.0;
    /// An enemy spawns once the spawn timer exceeds this many ticks
    pub const SPAWN_INTERVAL_TICKS: u32 = 60;

    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 12.0;
    /// Upward movement per tick
    pub const BULLET_SPEED: f32 = 8.0;
    /// Gap between the bullet spawn point and the top of the ship
    pub const BULLET_NOSE_OFFSET: f32 = 10.0;
    /// Minimum wall-clock gap between shots (ms)
    pub const FIRE_INTERVAL_MS: f64 = 200.0;

    pub const KILL_SCORE: u64 = 100;

    /// Explosion burst
    pub const PARTICLES_PER_BURST: usize = 15;
    pub const PARTICLE_LIFE: u32 = 30;
    pub const PARTICLE_MAX_SPEED: f32 = 4.0;

    /// Delay between game over and handing control back to the host (ms)
    pub const GAME_OVER_EXIT_DELAY_MS: f64 = 3000.0;

    /// Puzzle cube geometry
    pub const CUBELET_SIZE: f32 = 0.95;
    /// Distance between neighbouring cubelet centers
    pub const CUBELET_SPACING: f32 = 1.05;
    /// Default layer turn speed (radians/sec, ~0.5s per quarter turn)
    pub const TURN_SPEED: f32 = 3.2;
    pub const QUARTER_TURN: f32 = std::f32::consts::FRAC_PI_2;
}
