//! Sound effects
//!
//! The session reports what happened through a [`SoundSink`]. In the browser
//! [`WebAudioSink`] synthesizes each effect with Web Audio oscillators, so no
//! sample files are needed. Headless hosts use [`NullSink`].

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired a bullet
    Shoot,
    /// Enemy destroyed by a bullet
    Explosion,
    /// Enemy rammed the ship
    PlayerHit,
    GameOver,
    /// New best score at game over
    HighScore,
}

/// Anything that can play a [`SoundEffect`]
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SoundSink for NullSink {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Volume levels shared by every sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    pub master: f32,
    pub sfx: f32,
    pub muted: bool,
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            master: 0.8,
            sfx: 1.0,
            muted: false,
        }
    }
}

impl Volume {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master: settings.master_volume.clamp(0.0, 1.0),
            sfx: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master * self.sfx
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, SoundSink, Volume};

    /// Web Audio synthesizer
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
        pub volume: Volume,
    }

    impl WebAudioSink {
        pub fn new(volume: Volume) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short falling square blip
        fn play_shoot(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 880.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(880.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(440.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Low sawtooth rumble plus a high crack
        fn play_explosion(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();

            if let Some((osc2, gain2)) = Self::create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain2.gain().set_value_at_time(vol * 0.2, t).ok();
                gain2
                    .gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc2.start().ok();
                osc2.stop_with_when(t + 0.15).ok();
            }
        }

        /// Heavy thump
        fn play_player_hit(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 150.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// One note every `step` seconds
        fn play_sequence(ctx: &AudioContext, vol: f32, notes: &[f32], step: f64, len: f64, osc_type: OscillatorType) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * step;
                if let Some((osc, gain)) = Self::create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + len)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + len + 0.1).ok();
                }
            }
        }
    }

    impl SoundSink for WebAudioSink {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.volume.effective();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Shoot => Self::play_shoot(ctx, vol),
                SoundEffect::Explosion => Self::play_explosion(ctx, vol),
                SoundEffect::PlayerHit => Self::play_player_hit(ctx, vol),
                SoundEffect::GameOver => Self::play_sequence(
                    ctx,
                    vol * 0.3,
                    &[400.0, 350.0, 300.0, 200.0],
                    0.2,
                    0.3,
                    OscillatorType::Sine,
                ),
                SoundEffect::HighScore => Self::play_sequence(
                    ctx,
                    vol * 0.25,
                    &[500.0, 600.0, 700.0, 800.0, 1000.0],
                    0.08,
                    0.25,
                    OscillatorType::Triangle,
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        let vol = Volume::default();
        assert!((vol.effective() - 0.8).abs() < 1e-6);

        let muted = Volume { muted: true, ..vol };
        assert_eq!(muted.effective(), 0.0);
    }

    #[test]
    fn test_volume_from_settings_clamps() {
        let settings = Settings {
            master_volume: 1.5,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        let vol = Volume::from_settings(&settings);
        assert_eq!(vol.master, 1.0);
        assert!((vol.effective() - 0.5).abs() < 1e-6);
    }
}
