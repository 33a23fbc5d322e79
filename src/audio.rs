//! Audio playback using Web Audio API
//!
//! Plays `feedback::Cue`s as procedurally generated tones. Every tone of a cue
//! is scheduled up front on the audio context clock at its offset, so no
//! timers are needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::feedback::{Cue, Tone, Waveform};

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(volume: f32) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set output volume (0.0 - 1.0), mute already applied
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Play every tone of a cue at its offset
    pub fn play_cue(&self, cue: &Cue) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let now = ctx.current_time();
        for scheduled in cue.tones {
            self.play_tone(ctx, &scheduled.tone, now + scheduled.offset_ms / 1000.0);
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
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

    /// Single tone with an exponential fade, starting at context time `t`
    fn play_tone(&self, ctx: &AudioContext, tone: &Tone, t: f64) {
        let Some((osc, gain)) = self.create_osc(ctx, tone.freq_hz, oscillator_type(tone.waveform))
        else {
            return;
        };
        let end = t + tone.duration as f64;

        gain.gain().set_value_at_time(tone.volume * self.volume, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.001, end).ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(end).ok();
    }
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
    }
}
