//! Shooter game state and entity types
//!
//! Everything here is owned by one engine instance and mutated in place
//! once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShooterPhase {
    /// Active gameplay
    Running,
    /// Frozen until pause is toggled again
    Paused,
    /// Run ended (terminal)
    GameOver,
}

/// Notifications queued for the host, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShooterEvent {
    /// A bullet left the ship
    Shot,
    /// A bullet destroyed an enemy
    EnemyDestroyed { score: u64, at: Vec2 },
    /// An enemy rammed the player
    PlayerHit { lives: u8 },
    /// Lives ran out
    GameOver { score: u64 },
}

/// The player's ship. Only the horizontal position moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self { x: PLAYER_START_X }
    }
}

impl Player {
    /// Fixed vertical position (top edge of the ship)
    pub const Y: f32 = PLAYFIELD_HEIGHT - PLAYER_HEIGHT;

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, Self::Y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Move by `dx`, staying inside the playfield
    pub fn shift(&mut self, dx: f32) {
        self.x = (self.x + dx).clamp(0.0, PLAYFIELD_WIDTH - PLAYER_WIDTH);
    }

    /// Where a new bullet appears: centered on the ship, just above its nose
    pub fn nose(&self) -> Vec2 {
        Vec2::new(
            self.x + PLAYER_WIDTH / 2.0 - BULLET_WIDTH / 2.0,
            Self::Y - BULLET_NOSE_OFFSET,
        )
    }
}

/// A descending invader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Downward movement per tick
    pub speed: f32,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, Vec2::splat(ENEMY_SIZE))
    }
}

/// A player shot travelling straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
}

impl Bullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, BULLET_WIDTH, BULLET_HEIGHT)
    }
}

/// Explosion debris (visual only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining
    pub life: u32,
}

impl Particle {
    /// Opacity for rendering, proportional to remaining life
    pub fn alpha(&self) -> f32 {
        self.life as f32 / PARTICLE_LIFE as f32
    }
}

/// Complete shooter state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShooterState {
    pub phase: ShooterPhase,
    pub score: u64,
    pub lives: u8,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    /// Ticks since the last enemy spawn
    pub spawn_timer: u32,
    /// Wall-clock time of the last shot (ms), None before the first shot
    pub last_shot_ms: Option<f64>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl Default for ShooterState {
    fn default() -> Self {
        Self::new()
    }
}

impl ShooterState {
    pub fn new() -> Self {
        Self {
            phase: ShooterPhase::Running,
            score: 0,
            lives: START_LIVES,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            spawn_timer: 0,
            last_shot_ms: None,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place an enemy directly (spawning normally goes through the engine's RNG)
    pub fn push_enemy(&mut self, pos: Vec2, speed: f32) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy { id, pos, speed });
        id
    }

    pub fn push_bullet(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.bullets.push(Bullet { id, pos });
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == ShooterPhase::GameOver
    }
}
