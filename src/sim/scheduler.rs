//! Fixed-timestep tick scheduling
//!
//! Render callbacks arrive at whatever rate the display runs at. Elapsed time
//! is accumulated and drained in whole ticks, so the snake moves at the same
//! speed on a 60 Hz and a 144 Hz screen.

use super::state::{GameEvent, GamePhase, GameState};
use super::tick::{tick, tick_duration_ms};

/// Accumulator that turns frame timestamps into simulation ticks
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    accumulator_ms: f64,
    last_frame_ms: Option<f64>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget accumulated time and treat `now_ms` as the previous frame
    pub fn reset(&mut self, now_ms: f64) {
        self.accumulator_ms = 0.0;
        self.last_frame_ms = Some(now_ms);
    }

    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Time since the previous frame; the first frame and clock hiccups count as zero
    fn elapsed(&mut self, now_ms: f64) -> f64 {
        let elapsed = match self.last_frame_ms {
            Some(last) => now_ms - last,
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        if elapsed.is_finite() && elapsed > 0.0 {
            elapsed
        } else {
            0.0
        }
    }

    /// Run as many ticks as the elapsed time allows.
    ///
    /// `on_tick` is called after every tick with the events it produced, so a
    /// new best score can be written through before the next tick runs.
    /// Returns the number of ticks executed.
    pub fn frame<F>(&mut self, state: &mut GameState, now_ms: f64, mut on_tick: F) -> u32
    where
        F: FnMut(&GameState, &[GameEvent]),
    {
        let elapsed = self.elapsed(now_ms);
        if state.phase != GamePhase::Running {
            // Paused time is dropped, not replayed on resume
            return 0;
        }

        self.accumulator_ms += elapsed;
        let tick_ms = tick_duration_ms(state, now_ms);

        let mut ticks = 0;
        while self.accumulator_ms >= tick_ms {
            self.accumulator_ms -= tick_ms;
            let events = tick(state, now_ms);
            ticks += 1;
            on_tick(state, &events);
            if state.phase == GamePhase::Over {
                break;
            }
        }
        ticks
    }
}
