//! Per-frame shooter simulation
//!
//! One call to [`ShooterEngine::tick`] advances the game by one rendered
//! frame. Movement is per tick; only the fire rate limiter looks at wall-clock
//! time supplied by the host.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Particle, ShooterEvent, ShooterPhase, ShooterState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Fire held
    pub fire: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Host wall-clock time in milliseconds
    pub time_ms: f64,
}

/// Owns the shooter state, its RNG and the pending host events
#[derive(Debug, Clone)]
pub struct ShooterEngine {
    state: ShooterState,
    rng: Pcg32,
    events: Vec<ShooterEvent>,
}

impl ShooterEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_state(ShooterState::new(), seed)
    }

    /// Start from a prepared state (used by tests and replays)
    pub fn with_state(state: ShooterState, seed: u64) -> Self {
        Self {
            state,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &ShooterState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ShooterState {
        &mut self.state
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<ShooterEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the game by one frame
    pub fn tick(&mut self, input: &TickInput) {
        if input.pause {
            match self.state.phase {
                ShooterPhase::Running => {
                    self.state.phase = ShooterPhase::Paused;
                    return;
                }
                ShooterPhase::Paused => self.state.phase = ShooterPhase::Running,
                ShooterPhase::GameOver => {}
            }
        }

        if self.state.phase != ShooterPhase::Running {
            return;
        }

        self.state.time_ticks += 1;

        self.move_player(input);
        if input.fire {
            self.try_fire(input.time_ms);
        }
        self.update_spawner();
        self.update_enemies();
        self.update_bullets();
        self.update_particles();

        // Reported last so the score includes kills from the final tick
        if self.state.phase == ShooterPhase::GameOver {
            self.events.push(ShooterEvent::GameOver {
                score: self.state.score,
            });
            log::info!("Game over with score {}", self.state.score);
        }
    }

    fn move_player(&mut self, input: &TickInput) {
        if input.left {
            self.state.player.shift(-PLAYER_SPEED);
        }
        if input.right {
            self.state.player.shift(PLAYER_SPEED);
        }
    }

    /// Rate limited: at most one bullet per FIRE_INTERVAL_MS, nothing queued
    fn try_fire(&mut self, now_ms: f64) {
        let ready = match self.state.last_shot_ms {
            Some(last) => now_ms - last >= FIRE_INTERVAL_MS,
            None => true,
        };
        if !ready {
            return;
        }
        let nose = self.state.player.nose();
        self.state.push_bullet(nose);
        self.state.last_shot_ms = Some(now_ms);
        self.events.push(ShooterEvent::Shot);
    }

    fn update_spawner(&mut self) {
        self.state.spawn_timer += 1;
        if self.state.spawn_timer > SPAWN_INTERVAL_TICKS {
            self.spawn_enemy();
            self.state.spawn_timer = 0;
        }
    }

    fn spawn_enemy(&mut self) {
        let x = self.rng.random_range(0.0..PLAYFIELD_WIDTH - ENEMY_SIZE);
        let speed = self.rng.random_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED);
        let id = self.state.push_enemy(Vec2::new(x, -ENEMY_SIZE), speed);
        log::debug!("Spawned enemy {} at x={:.1} speed={:.2}", id, x, speed);
    }

    fn update_enemies(&mut self) {
        let player = self.state.player.bounds();
        let mut rammed = Vec::new();

        self.state.enemies.retain_mut(|enemy| {
            enemy.pos.y += enemy.speed;
            let bounds = enemy.bounds();
            if bounds.overlaps(&player) {
                rammed.push(bounds.center());
                return false;
            }
            // Escaped off the bottom: no penalty
            enemy.pos.y <= PLAYFIELD_HEIGHT
        });

        for at in rammed {
            self.explode(at);
            if self.state.phase == ShooterPhase::GameOver {
                continue;
            }
            self.state.lives = self.state.lives.saturating_sub(1);
            self.events.push(ShooterEvent::PlayerHit {
                lives: self.state.lives,
            });
            if self.state.lives == 0 {
                self.state.phase = ShooterPhase::GameOver;
            }
        }
    }

    fn update_bullets(&mut self) {
        let enemies = &mut self.state.enemies;
        let mut kills = Vec::new();

        self.state.bullets.retain_mut(|bullet| {
            bullet.pos.y -= BULLET_SPEED;
            let bounds = bullet.bounds();
            // First surviving enemy hit takes the bullet; removal is immediate so
            // a later bullet in the same tick cannot hit the same enemy.
            if let Some(idx) = enemies.iter().position(|e| e.bounds().overlaps(&bounds)) {
                let enemy = enemies.remove(idx);
                kills.push(enemy.bounds().center());
                return false;
            }
            bullet.pos.y >= 0.0
        });

        for at in kills {
            self.state.score += KILL_SCORE;
            self.explode(at);
            self.events.push(ShooterEvent::EnemyDestroyed {
                score: self.state.score,
                at,
            });
        }
    }

    fn update_particles(&mut self) {
        self.state.particles.retain_mut(|p| {
            p.pos += p.vel;
            p.life = p.life.saturating_sub(1);
            p.life > 0
        });
    }

    /// Spawn an explosion burst centered on `at`
    fn explode(&mut self, at: Vec2) {
        for _ in 0..PARTICLES_PER_BURST {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
                (self.rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
            );
            let id = self.state.next_entity_id();
            self.state.particles.push(Particle {
                id,
                pos: at,
                vel,
                life: PARTICLE_LIFE,
            });
        }
    }
}
