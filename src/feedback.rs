//! Sound and haptic cues for gameplay events
//!
//! Each event maps to a `Cue`: a short list of tones with start offsets plus an
//! optional vibration pulse. Cues are plain data; playing them is up to the
//! platform (Web Audio on wasm32, `FeedbackSequencer` for anything that only
//! has a clock).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// One synthesized tone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub freq_hz: f32,
    /// Seconds, including the exponential fade
    pub duration: f32,
    pub waveform: Waveform,
    /// Peak gain before master/sfx volume
    pub volume: f32,
}

/// A tone and its offset from the start of the cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTone {
    pub offset_ms: f64,
    pub tone: Tone,
}

/// Sound (and vibration) for one event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub tones: &'static [ScheduledTone],
    pub vibrate_ms: Option<u32>,
}

const fn at(offset_ms: f64, freq_hz: f32, duration: f32, waveform: Waveform, volume: f32) -> ScheduledTone {
    ScheduledTone {
        offset_ms,
        tone: Tone {
            freq_hz,
            duration,
            waveform,
            volume,
        },
    }
}

use Waveform::*;

const EAT: &[ScheduledTone] = &[
    at(0.0, 587.0, 0.08, Square, 0.12),
    at(60.0, 784.0, 0.1, Square, 0.12),
];

const BOOST: &[ScheduledTone] = &[
    at(0.0, 523.0, 0.06, Sawtooth, 0.1),
    at(50.0, 659.0, 0.06, Sawtooth, 0.1),
    at(100.0, 880.0, 0.12, Sawtooth, 0.1),
];

const SHIELD_GAIN: &[ScheduledTone] = &[
    at(0.0, 440.0, 0.1, Sine, 0.15),
    at(80.0, 660.0, 0.15, Sine, 0.15),
    at(160.0, 880.0, 0.2, Sine, 0.12),
];

const SHIELD_BREAK: &[ScheduledTone] = &[
    at(0.0, 800.0, 0.05, Square, 0.12),
    at(40.0, 400.0, 0.15, Square, 0.1),
];

const DEATH: &[ScheduledTone] = &[
    at(0.0, 300.0, 0.15, Sawtooth, 0.2),
    at(100.0, 200.0, 0.2, Sawtooth, 0.2),
    at(200.0, 100.0, 0.4, Sawtooth, 0.15),
];

const MOVE: &[ScheduledTone] = &[at(0.0, 120.0, 0.03, Sine, 0.03)];

/// C major arpeggio
const START: &[ScheduledTone] = &[
    at(0.0, 523.0, 0.12, Square, 0.1),
    at(80.0, 659.0, 0.12, Square, 0.1),
    at(160.0, 784.0, 0.12, Square, 0.1),
    at(240.0, 1047.0, 0.12, Square, 0.1),
];

/// Cue for an event. Move ticks always get one; throttle them with `MoveThrottle`.
pub fn cue_for(event: &GameEvent) -> Cue {
    let (tones, vibrate_ms) = match event {
        GameEvent::SessionStart => (START, None),
        GameEvent::MoveTick { .. } => (MOVE, None),
        GameEvent::Eat { .. } => (EAT, Some(10)),
        GameEvent::Boost { .. } => (BOOST, Some(15)),
        GameEvent::ShieldGain { .. } => (SHIELD_GAIN, Some(15)),
        GameEvent::ShieldBreak { .. } => (SHIELD_BREAK, Some(40)),
        GameEvent::Death { .. } => (DEATH, Some(120)),
    };
    Cue { tones, vibrate_ms }
}

/// Lets only every n-th move tick make a sound
#[derive(Debug, Clone)]
pub struct MoveThrottle {
    interval: u32,
    count: u32,
}

impl MoveThrottle {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            count: 0,
        }
    }

    /// Count one move; true when this one should be audible
    pub fn allow(&mut self) -> bool {
        self.count = self.count.wrapping_add(1);
        self.count.is_multiple_of(self.interval)
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// Cue selection with move throttling; what a feedback sink plays for an event
#[derive(Debug, Clone)]
pub struct CuePicker {
    throttle: MoveThrottle,
}

impl CuePicker {
    pub fn new(move_sound_interval: u32) -> Self {
        Self {
            throttle: MoveThrottle::new(move_sound_interval),
        }
    }

    pub fn pick(&mut self, event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::MoveTick { .. } if !self.throttle.allow() => None,
            GameEvent::SessionStart => {
                self.throttle.reset();
                Some(cue_for(event))
            }
            _ => Some(cue_for(event)),
        }
    }
}

/// Releases cue tones when they fall due on the caller's clock
#[derive(Debug, Clone, Default)]
pub struct FeedbackSequencer {
    /// (due time, tone), kept sorted by due time
    pending: VecDeque<(f64, Tone)>,
}

impl FeedbackSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule every tone of `cue` relative to `now_ms`
    pub fn schedule(&mut self, cue: &Cue, now_ms: f64) {
        for scheduled in cue.tones {
            let due = now_ms + scheduled.offset_ms;
            let idx = self.pending.partition_point(|(t, _)| *t <= due);
            self.pending.insert(idx, (due, scheduled.tone));
        }
    }

    /// Tones whose start time has been reached, in order
    pub fn poll(&mut self, now_ms: f64) -> Vec<Tone> {
        let mut due = Vec::new();
        while let Some(&(t, tone)) = self.pending.front() {
            if t > now_ms {
                break;
            }
            self.pending.pop_front();
            due.push(tone);
        }
        due
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
