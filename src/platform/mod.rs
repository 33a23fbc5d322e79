//! Platform abstraction layer
//!
//! What the game needs from its host:
//! - Time (`Clock`)
//! - Input intents (keyboard/touch mapped to `InputIntent`)
//! - A place to draw snapshots (`RenderSink`)
//! - A place to send sound/haptic events (`FeedbackSink`)

use crate::session::Session;
use crate::sim::{Direction, GameEvent, Snapshot};

/// Swipes shorter than this (px) are treated as taps
pub const SWIPE_MIN_PX: f32 = 10.0;

/// Discrete player intent, independent of the input device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputIntent {
    Direction(Direction),
    TogglePause,
    ToggleMute,
    Start,
}

/// Monotonic milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock advanced by hand (tests, headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now_ms: f64,
}

impl ManualClock {
    pub fn new(now_ms: f64) -> Self {
        Self { now_ms }
    }

    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

/// Consumes one snapshot per frame
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot);
}

/// Consumes gameplay events (audio, haptics); fire-and-forget
pub trait FeedbackSink {
    fn dispatch(&mut self, event: &GameEvent, now_ms: f64);
}

/// Map a keyboard event (`KeyboardEvent.key` / `.code`) to an intent.
///
/// Arrows and WASD steer, Space pauses, M mutes, Enter starts.
pub fn intent_from_key(key: &str, code: &str) -> Option<InputIntent> {
    if code == "Space" || key == " " {
        return Some(InputIntent::TogglePause);
    }
    let direction = match key {
        "ArrowUp" => Direction::Up,
        "ArrowDown" => Direction::Down,
        "ArrowLeft" => Direction::Left,
        "ArrowRight" => Direction::Right,
        "Enter" => return Some(InputIntent::Start),
        _ => match key.to_lowercase().as_str() {
            "w" => Direction::Up,
            "s" => Direction::Down,
            "a" => Direction::Left,
            "d" => Direction::Right,
            "m" => return Some(InputIntent::ToggleMute),
            _ => return None,
        },
    };
    Some(InputIntent::Direction(direction))
}

/// Map an on-screen pad button (`data-dir`) to an intent
pub fn intent_from_pad(dir: &str) -> Option<InputIntent> {
    let direction = match dir {
        "up" => Direction::Up,
        "down" => Direction::Down,
        "left" => Direction::Left,
        "right" => Direction::Right,
        _ => return None,
    };
    Some(InputIntent::Direction(direction))
}

/// Map a swipe (end - start, screen px) to a direction. The longer axis wins.
pub fn intent_from_swipe(dx: f32, dy: f32) -> Option<InputIntent> {
    if dx.abs().max(dy.abs()) < SWIPE_MIN_PX {
        return None;
    }
    let direction = if dx.abs() > dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(InputIntent::Direction(direction))
}

/// One display callback: advance the session, dispatch its events, render once.
/// Returns the number of events dispatched.
pub fn run_frame<R, F>(session: &mut Session, now_ms: f64, render: &mut R, feedback: &mut F) -> usize
where
    R: RenderSink + ?Sized,
    F: FeedbackSink + ?Sized,
{
    let events = session.frame(now_ms);
    for event in &events {
        feedback.dispatch(event, now_ms);
    }
    render.render(&session.snapshot(now_ms));
    events.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::settings::Settings;

    #[test]
    fn test_keys() {
        assert_eq!(
            intent_from_key("ArrowUp", "ArrowUp"),
            Some(InputIntent::Direction(Direction::Up))
        );
        assert_eq!(
            intent_from_key("D", "KeyD"),
            Some(InputIntent::Direction(Direction::Right))
        );
        assert_eq!(intent_from_key(" ", "Space"), Some(InputIntent::TogglePause));
        assert_eq!(intent_from_key("Enter", "Enter"), Some(InputIntent::Start));
        assert_eq!(intent_from_key("M", "KeyM"), Some(InputIntent::ToggleMute));
        assert_eq!(intent_from_key("q", "KeyQ"), None);
    }

    #[test]
    fn test_pad_buttons() {
        assert_eq!(intent_from_pad("left"), Some(InputIntent::Direction(Direction::Left)));
        assert_eq!(intent_from_pad("down"), Some(InputIntent::Direction(Direction::Down)));
        assert_eq!(intent_from_pad("Up"), None);
        assert_eq!(intent_from_pad(""), None);
    }

    #[test]
    fn test_swipes() {
        assert_eq!(
            intent_from_swipe(40.0, -5.0),
            Some(InputIntent::Direction(Direction::Right))
        );
        assert_eq!(
            intent_from_swipe(-3.0, -30.0),
            Some(InputIntent::Direction(Direction::Up))
        );
        // Ties go vertical
        assert_eq!(
            intent_from_swipe(20.0, 20.0),
            Some(InputIntent::Direction(Direction::Down))
        );
        assert_eq!(intent_from_swipe(2.0, 1.0), None);
    }

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        events: Vec<&'static str>,
    }

    impl RenderSink for Recorder {
        fn render(&mut self, _snapshot: &Snapshot) {
            self.frames += 1;
        }
    }

    impl FeedbackSink for Recorder {
        fn dispatch(&mut self, event: &GameEvent, _now_ms: f64) {
            self.events.push(event.name());
        }
    }

    #[test]
    fn test_run_frame_renders_once() {
        let mut session = Session::with_seed(Box::new(MemoryStore::new(0)), Settings::default(), 4);
        let mut clock = ManualClock::new(0.0);
        session.start(clock.now_ms());

        let mut render = Recorder::default();
        let mut feedback = Recorder::default();

        clock.advance(16.0);
        assert_eq!(run_frame(&mut session, clock.now_ms(), &mut render, &mut feedback), 0);
        clock.advance(250.0);
        let dispatched = run_frame(&mut session, clock.now_ms(), &mut render, &mut feedback);

        assert_eq!(render.frames, 2);
        assert_eq!(dispatched, 2);
        assert_eq!(feedback.events.len(), 2);
    }
}
