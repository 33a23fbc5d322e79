//! Snake Pro entry point
//!
//! On the web this boots the browser front end. Natively it runs a headless
//! autopilot game and prints the final board.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    snake_pro::web::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use snake_pro::feedback::{CuePicker, FeedbackSequencer};
    use snake_pro::persistence::FileStore;
    use snake_pro::platform::{Clock, FeedbackSink, InputIntent, ManualClock, RenderSink, run_frame};
    use snake_pro::sim::{GameEvent, GamePhase, Snapshot, autopilot};
    use snake_pro::{QualityPreset, Session, Settings};

    /// Simulated display refresh
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after this much simulated time
    const MAX_RUN_MS: f64 = 5.0 * 60.0 * 1000.0;

    /// Logs cues the way a speaker would play them
    struct LogFeedback {
        picker: CuePicker,
        sequencer: FeedbackSequencer,
    }

    impl FeedbackSink for LogFeedback {
        fn dispatch(&mut self, event: &GameEvent, now_ms: f64) {
            if !matches!(event, GameEvent::MoveTick { .. }) {
                log::info!("{:>8.0} ms  {}", now_ms, event.name());
            }
            if let Some(cue) = self.picker.pick(event) {
                self.sequencer.schedule(&cue, now_ms);
            }
            for tone in self.sequencer.poll(now_ms) {
                log::trace!("tone {:.0} Hz ({:?})", tone.freq_hz, tone.waveform);
            }
        }
    }

    /// Keeps the latest snapshot for printing at the end
    #[derive(Default)]
    struct LastFrame {
        snapshot: Option<Snapshot>,
        frames: u64,
    }

    impl RenderSink for LastFrame {
        fn render(&mut self, snapshot: &Snapshot) {
            self.snapshot = Some(snapshot.clone());
            self.frames += 1;
        }
    }

    /// `snake-pro [save-dir] [seed] [low|medium|high]`
    pub fn run() {
        let mut args = std::env::args().skip(1);
        let dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
        let seed = args.next().and_then(|s| s.parse::<u64>().ok());

        let mut settings = Settings::load_from(&dir.join("snake_pro_settings.json"));
        if let Some(arg) = args.next() {
            match QualityPreset::parse(&arg) {
                Some(quality) => settings.quality = quality,
                None => log::warn!("Unknown quality preset {:?}, keeping {}", arg, settings.quality.as_str()),
            }
        }
        log::info!(
            "Quality {} ({} particles max)",
            settings.quality.as_str(),
            settings.max_particles()
        );
        let store = Box::new(FileStore::in_dir(&dir));
        let mut session = match seed {
            Some(seed) => Session::with_seed(store, settings.clone(), seed),
            None => Session::new(store, settings.clone()),
        };

        let mut clock = ManualClock::new(0.0);
        let mut feedback = LogFeedback {
            picker: CuePicker::new(settings.move_sound_interval),
            sequencer: FeedbackSequencer::new(),
        };
        let mut screen = LastFrame::default();

        for event in session.handle(InputIntent::Start, clock.now_ms()) {
            feedback.dispatch(&event, clock.now_ms());
        }

        while session.phase() == GamePhase::Running && clock.now_ms() < MAX_RUN_MS {
            clock.advance(FRAME_MS);
            if session.state().input.is_empty() {
                if let Some(direction) = autopilot::suggest(session.state()) {
                    session.submit(direction);
                }
            }
            run_frame(&mut session, clock.now_ms(), &mut screen, &mut feedback);
        }

        if let Some(snapshot) = &screen.snapshot {
            println!("{}", snapshot.to_ascii());
        }
        println!(
            "Score: {}  Best: {}  ({} ticks, {:.1}s, {} frames)",
            session.score(),
            session.best(),
            session.state().time_ticks,
            clock.now_ms() / 1000.0,
            screen.frames
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Snake Pro (native) starting...");
    log::info!("Headless autopilot run - build for wasm32 to play in a browser");
    headless::run();
}
