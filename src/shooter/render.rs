//! Frame rendering onto a host-provided 2D surface
//!
//! The engine never owns a canvas. The host implements [`DrawSurface`]
//! (a browser 2D context, a test recorder, ...) and calls [`render`] after
//! each tick. Draw order is back to front.

use glam::Vec2;

use super::state::{Player, ShooterState};
use crate::consts::*;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    /// CSS hex form, e.g. `#00ffff`
    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0 & 0xff_ffff)
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = Color(0x000000);
    pub const STAR: Color = Color(0xffffff);
    pub const SHIP: Color = Color(0x00ffff);
    pub const SHIP_WINGS: Color = Color(0x0088ff);
    pub const ENEMY: Color = Color(0xff00ff);
    pub const ENEMY_EYES: Color = Color(0x000000);
    pub const BULLET: Color = Color(0xffff00);
    pub const PARTICLE: Color = Color(0xff8800);
    pub const SCORE_TEXT: Color = Color(0x00ffff);
    pub const LIVES_TEXT: Color = Color(0xff00ff);
}

/// Minimal immediate-mode drawing API the shooter needs
pub trait DrawSurface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color);
    /// Global opacity for subsequent draws (0.0 - 1.0)
    fn set_alpha(&mut self, alpha: f32);
    /// Neon glow for subsequent draws; `blur == 0.0` disables it
    fn set_glow(&mut self, color: Color, blur: f32);
}

/// What to draw beyond the bare game objects
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub starfield: bool,
    pub glow: bool,
    pub particles: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            starfield: true,
            glow: true,
            particles: true,
        }
    }
}

const STAR_COUNT: u32 = 50;
/// Starfield scroll speed (units per ms)
const STAR_SCROLL: f64 = 0.05;

/// Draw one frame. `time_ms` only drives the starfield scroll.
pub fn render(state: &ShooterState, surface: &mut impl DrawSurface, time_ms: f64, opts: RenderOptions) {
    let glow = opts.glow;

    surface.fill_rect(0.0, 0.0, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT, colors::BACKGROUND);
    if opts.starfield {
        draw_stars(surface, time_ms);
    }

    // Ship
    set_glow(surface, glow, colors::SHIP, 15.0);
    let x = state.player.x;
    surface.fill_triangle(
        Vec2::new(x + PLAYER_WIDTH / 2.0, Player::Y),
        Vec2::new(x, PLAYFIELD_HEIGHT - 5.0),
        Vec2::new(x + PLAYER_WIDTH, PLAYFIELD_HEIGHT - 5.0),
        colors::SHIP,
    );
    surface.fill_rect(x - 5.0, PLAYFIELD_HEIGHT - 15.0, 10.0, 10.0, colors::SHIP_WINGS);
    surface.fill_rect(x + PLAYER_WIDTH - 5.0, PLAYFIELD_HEIGHT - 15.0, 10.0, 10.0, colors::SHIP_WINGS);
    set_glow(surface, glow, colors::SHIP, 0.0);

    // Invaders
    set_glow(surface, glow, colors::ENEMY, 15.0);
    for enemy in &state.enemies {
        let p = enemy.pos;
        surface.fill_rect(p.x, p.y, ENEMY_SIZE, ENEMY_SIZE, colors::ENEMY);
        surface.fill_rect(p.x + 5.0, p.y + 5.0, 5.0, 5.0, colors::ENEMY_EYES);
        surface.fill_rect(p.x + 15.0, p.y + 5.0, 5.0, 5.0, colors::ENEMY_EYES);
        surface.fill_rect(p.x + 8.0, p.y + 15.0, 10.0, 5.0, colors::ENEMY_EYES);
    }
    set_glow(surface, glow, colors::ENEMY, 0.0);

    set_glow(surface, glow, colors::BULLET, 10.0);
    for bullet in &state.bullets {
        surface.fill_rect(bullet.pos.x, bullet.pos.y, BULLET_WIDTH, BULLET_HEIGHT, colors::BULLET);
    }
    set_glow(surface, glow, colors::BULLET, 0.0);

    if opts.particles {
        for particle in &state.particles {
            surface.set_alpha(particle.alpha());
            surface.fill_rect(particle.pos.x, particle.pos.y, 3.0, 3.0, colors::PARTICLE);
        }
        surface.set_alpha(1.0);
    }

    // HUD
    set_glow(surface, glow, colors::SCORE_TEXT, 10.0);
    surface.fill_text(&format!("SCORE: {}", state.score), 10.0, 30.0, colors::SCORE_TEXT);
    set_glow(surface, glow, colors::LIVES_TEXT, 10.0);
    surface.fill_text(
        &format!("LIVES: {}", state.lives),
        PLAYFIELD_WIDTH - 120.0,
        30.0,
        colors::LIVES_TEXT,
    );
    set_glow(surface, glow, colors::LIVES_TEXT, 0.0);
}

fn set_glow(surface: &mut impl DrawSurface, enabled: bool, color: Color, blur: f32) {
    if enabled {
        surface.set_glow(color, blur);
    }
}

fn draw_stars(surface: &mut impl DrawSurface, time_ms: f64) {
    let w = PLAYFIELD_WIDTH as f64;
    let h = PLAYFIELD_HEIGHT as f64;
    for i in 0..STAR_COUNT {
        let i = i as f64;
        let x = (i * 37.0) % w;
        let y = (i * 73.0 + time_ms * STAR_SCROLL) % h;
        surface.fill_rect(x as f32, y as f32, 1.0, 1.0, colors::STAR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shooter::state::Particle;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Rect(Color),
        Triangle(Color),
        Text(String),
        Alpha(f32),
        Glow,
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl DrawSurface for Recorder {
        fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, color: Color) {
            self.ops.push(Op::Rect(color));
        }
        fn fill_triangle(&mut self, _a: Vec2, _b: Vec2, _c: Vec2, color: Color) {
            self.ops.push(Op::Triangle(color));
        }
        fn fill_text(&mut self, text: &str, _x: f32, _y: f32, _color: Color) {
            self.ops.push(Op::Text(text.to_string()));
        }
        fn set_alpha(&mut self, alpha: f32) {
            self.ops.push(Op::Alpha(alpha));
        }
        fn set_glow(&mut self, _color: Color, _blur: f32) {
            self.ops.push(Op::Glow);
        }
    }

    fn position(ops: &[Op], wanted: &Op) -> usize {
        ops.iter()
            .position(|op| op == wanted)
            .unwrap_or_else(|| panic!("{wanted:?} not drawn"))
    }

    #[test]
    fn test_draw_order_back_to_front() {
        let mut state = ShooterState::new();
        state.push_enemy(Vec2::new(10.0, 10.0), 1.0);
        state.push_bullet(Vec2::new(50.0, 50.0));
        state.particles.push(Particle {
            id: 99,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 15,
        });
        state.score = 300;

        let mut rec = Recorder::default();
        render(&state, &mut rec, 0.0, RenderOptions::default());

        assert_eq!(rec.ops[0], Op::Rect(colors::BACKGROUND));
        let ship = position(&rec.ops, &Op::Triangle(colors::SHIP));
        let enemy = position(&rec.ops, &Op::Rect(colors::ENEMY));
        let bullet = position(&rec.ops, &Op::Rect(colors::BULLET));
        let particle = position(&rec.ops, &Op::Rect(colors::PARTICLE));
        let score = position(&rec.ops, &Op::Text("SCORE: 300".to_string()));
        let lives = position(&rec.ops, &Op::Text("LIVES: 3".to_string()));
        assert!(ship < enemy && enemy < bullet && bullet < particle && particle < score);
        assert!(score < lives);
    }

    #[test]
    fn test_particle_alpha_follows_life() {
        let mut state = ShooterState::new();
        state.particles.push(Particle {
            id: 1,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 15,
        });
        let mut rec = Recorder::default();
        render(&state, &mut rec, 0.0, RenderOptions::default());
        assert!(rec.ops.contains(&Op::Alpha(0.5)));
        // Alpha restored afterwards
        assert!(rec.ops.contains(&Op::Alpha(1.0)));
    }

    #[test]
    fn test_options_disable_extras() {
        let state = ShooterState::new();
        let mut rec = Recorder::default();
        let opts = RenderOptions {
            starfield: false,
            glow: false,
            particles: false,
        };
        render(&state, &mut rec, 0.0, opts);
        assert!(!rec.ops.contains(&Op::Rect(colors::STAR)));
        assert!(!rec.ops.contains(&Op::Glow));
    }

    #[test]
    fn test_css_color() {
        assert_eq!(colors::SHIP_WINGS.to_css(), "#0088ff");
        assert_eq!(colors::BACKGROUND.to_css(), "#000000");
    }
}
