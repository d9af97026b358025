//! One play session of the shooter
//!
//! Wires the engine to the stored high score and a sound sink. The best
//! score is read once when the session starts and written back once, at
//! game over, only if beaten. The host keeps showing the final frame until
//! [`ArcadeSession::ready_to_exit`] reports the exit delay has passed.

use crate::audio::{SoundEffect, SoundSink};
use crate::consts::GAME_OVER_EXIT_DELAY_MS;
use crate::highscores::HighScore;
use crate::persistence::ScoreStore;
use crate::settings::Settings;
use crate::shooter::{DrawSurface, RenderOptions, ShooterEngine, ShooterEvent, TickInput, render};

pub struct ArcadeSession<S: ScoreStore, A: SoundSink> {
    engine: ShooterEngine,
    high_score: HighScore,
    store: S,
    sound: A,
    render_options: RenderOptions,
    /// Host time of the tick that ended the game
    game_over_at: Option<f64>,
    new_record: bool,
}

impl<S: ScoreStore, A: SoundSink> ArcadeSession<S, A> {
    pub fn new(seed: u64, store: S, sound: A, settings: &Settings) -> Self {
        Self::with_engine(ShooterEngine::new(seed), store, sound, settings)
    }

    pub fn with_engine(engine: ShooterEngine, store: S, sound: A, settings: &Settings) -> Self {
        let high_score = HighScore::load(&store);
        Self {
            engine,
            high_score,
            store,
            sound,
            render_options: settings.render_options(),
            game_over_at: None,
            new_record: false,
        }
    }

    pub fn engine(&self) -> &ShooterEngine {
        &self.engine
    }

    pub fn high_score(&self) -> HighScore {
        self.high_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sound(&self) -> &A {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut A {
        &mut self.sound
    }

    /// True once this session's score beat the stored record
    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    /// Pick up changed settings (toggles, reduced motion) without a restart
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.render_options = settings.render_options();
    }

    /// Advance one frame and return what happened in it
    pub fn tick(&mut self, input: &TickInput) -> Vec<ShooterEvent> {
        self.engine.tick(input);
        let events = self.engine.drain_events();

        for event in &events {
            match *event {
                ShooterEvent::Shot => self.sound.play(SoundEffect::Shoot),
                ShooterEvent::EnemyDestroyed { .. } => self.sound.play(SoundEffect::Explosion),
                ShooterEvent::PlayerHit { .. } => self.sound.play(SoundEffect::PlayerHit),
                ShooterEvent::GameOver { score } => self.on_game_over(score, input.time_ms),
            }
        }
        events
    }

    fn on_game_over(&mut self, score: u64, time_ms: f64) {
        if self.game_over_at.is_some() {
            return;
        }
        self.game_over_at = Some(time_ms);
        self.sound.play(SoundEffect::GameOver);

        if self.high_score.record(score) {
            self.new_record = true;
            self.sound.play(SoundEffect::HighScore);
            log::info!("New high score: {score}");
            if let Err(err) = self.high_score.save(&mut self.store) {
                log::warn!("Failed to save high score: {err}");
            }
        }
    }

    pub fn render(&self, surface: &mut impl DrawSurface, time_ms: f64) {
        render(self.engine.state(), surface, time_ms, self.render_options);
    }

    /// Whether the host may leave the game screen
    pub fn ready_to_exit(&self, now_ms: f64) -> bool {
        self.game_over_at
            .is_some_and(|at| now_ms - at >= GAME_OVER_EXIT_DELAY_MS)
    }

    /// Start over with a fresh engine, re-reading the stored record
    pub fn restart(&mut self, seed: u64) {
        self.engine = ShooterEngine::new(seed);
        self.high_score = HighScore::load(&self.store);
        self.game_over_at = None;
        self.new_record = false;
    }
}
