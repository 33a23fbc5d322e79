//! Session lifecycle
//!
//! A `Session` owns the game state, the tick scheduler, the particle system
//! and the best score boundary. Platform code talks to the game only through
//! it: feed it input intents and frame timestamps, dispatch the events it
//! returns, render its snapshots.

use crate::fx::ParticleSystem;
use crate::persistence::{BestScoreKeeper, BestScoreStore};
use crate::platform::InputIntent;
use crate::settings::Settings;
use crate::sim::{Direction, GameEvent, GamePhase, GameState, Snapshot, TickScheduler};

pub struct Session {
    state: GameState,
    scheduler: TickScheduler,
    particles: ParticleSystem,
    best: BestScoreKeeper,
    settings: Settings,
}

impl Session {
    pub fn new(store: Box<dyn BestScoreStore>, settings: Settings) -> Self {
        let best = BestScoreKeeper::new(store);
        Self {
            state: GameState::new(best.best()),
            scheduler: TickScheduler::new(),
            particles: ParticleSystem::new(settings.max_particles()),
            best,
            settings,
        }
    }

    /// Session with fixed RNG seeds (tests, headless runs)
    pub fn with_seed(store: Box<dyn BestScoreStore>, settings: Settings, seed: u64) -> Self {
        let best = BestScoreKeeper::new(store);
        Self {
            state: GameState::with_seed(seed, best.best()),
            scheduler: TickScheduler::new(),
            particles: ParticleSystem::with_seed(seed ^ 0x9e37_79b9, settings.max_particles()),
            best,
            settings,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn best(&self) -> u64 {
        self.best.best()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.particles.set_max_particles(settings.max_particles());
        self.settings = settings;
    }

    /// Start (or restart) a run at `now_ms`
    pub fn start(&mut self, now_ms: f64) -> Vec<GameEvent> {
        self.state.best = self.best.reload();
        self.state.reset();
        self.scheduler.reset(now_ms);
        self.particles.clear();
        log::info!("Session started (best {})", self.state.best);
        vec![GameEvent::SessionStart]
    }

    /// Pause/resume. Only valid while running or paused; returns whether it applied.
    pub fn toggle_pause(&mut self) -> bool {
        self.state.phase = match self.state.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::Idle | GamePhase::Over => return false,
        };
        log::info!("{}", if self.is_paused() { "Paused" } else { "Resumed" });
        true
    }

    /// Pause if running (focus loss); never resumes
    pub fn pause(&mut self) -> bool {
        self.state.phase == GamePhase::Running && self.toggle_pause()
    }

    pub fn is_paused(&self) -> bool {
        self.state.phase == GamePhase::Paused
    }

    /// Queue a direction change; ignored outside a run
    pub fn submit(&mut self, direction: Direction) -> bool {
        match self.state.phase {
            GamePhase::Running | GamePhase::Paused => self.state.input.submit(direction),
            GamePhase::Idle | GamePhase::Over => false,
        }
    }

    /// Apply one input intent. `Start` only works when no run is in progress.
    pub fn handle(&mut self, intent: InputIntent, now_ms: f64) -> Vec<GameEvent> {
        match intent {
            InputIntent::Direction(direction) => {
                self.submit(direction);
            }
            InputIntent::TogglePause => {
                self.toggle_pause();
            }
            InputIntent::ToggleMute => {
                let settings = Settings {
                    muted: !self.settings.muted,
                    ..self.settings.clone()
                };
                log::info!("Sound {}", if settings.muted { "muted" } else { "on" });
                self.set_settings(settings);
            }
            InputIntent::Start => {
                if matches!(self.state.phase, GamePhase::Idle | GamePhase::Over) {
                    return self.start(now_ms);
                }
            }
        }
        Vec::new()
    }

    /// One render callback: run due ticks, update particles.
    ///
    /// Returns the events of every tick that ran, in order. A new best score
    /// is written to the store right after the tick that reached it.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Self {
            state,
            scheduler,
            best,
            ..
        } = self;
        scheduler.frame(state, now_ms, |state, tick_events| {
            if best.offer(state.best) {
                log::debug!("New best score {}", state.best);
            }
            events.extend_from_slice(tick_events);
        });

        if self.state.phase != GamePhase::Idle {
            for event in &events {
                self.particles.burst_for(event, self.settings.cell_size);
            }
            self.particles.advance();
        }
        events
    }

    /// Current view for a render sink; taking it changes nothing
    pub fn snapshot(&self, now_ms: f64) -> Snapshot {
        Snapshot::capture(&self.state, self.particles.particles(), now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Food, FoodKind};
    use glam::IVec2;

    fn session(store: &MemoryStore) -> Session {
        Session::with_seed(Box::new(store.clone()), Settings::default(), 77)
    }

    #[test]
    fn test_lifecycle() {
        let store = MemoryStore::new(0);
        let mut s = session(&store);
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(!s.toggle_pause());
        assert!(s.frame(1000.0).is_empty());

        assert_eq!(s.start(0.0), vec![GameEvent::SessionStart]);
        assert_eq!(s.phase(), GamePhase::Running);

        assert!(s.toggle_pause());
        assert!(s.is_paused());
        assert!(s.frame(500.0).is_empty());
        assert_eq!(s.state().head(), IVec2::new(10, 10));

        assert!(s.toggle_pause());
        assert_eq!(s.phase(), GamePhase::Running);
    }

    #[test]
    fn test_pause_ignored_when_over() {
        let store = MemoryStore::new(0);
        let mut s = session(&store);
        s.start(0.0);
        s.state.snake = [IVec2::new(20, 1), IVec2::new(19, 1), IVec2::new(18, 1)].into();

        let events = s.frame(120.0);
        assert_eq!(events, vec![GameEvent::Death { at: IVec2::new(20, 1) }]);
        assert_eq!(s.phase(), GamePhase::Over);
        assert!(!s.toggle_pause());
        assert!(!s.pause());
        assert!(!s.submit(Direction::Up));
        assert_eq!(s.phase(), GamePhase::Over);

        // Restart from Over
        assert_eq!(s.handle(InputIntent::Start, 200.0), vec![GameEvent::SessionStart]);
        assert_eq!(s.phase(), GamePhase::Running);
        assert_eq!(s.state().snake.len(), START_LENGTH);
    }

    #[test]
    fn test_start_ignored_mid_run() {
        let store = MemoryStore::new(0);
        let mut s = session(&store);
        s.handle(InputIntent::Start, 0.0);
        s.state.score = 30;
        assert!(s.handle(InputIntent::Start, 10.0).is_empty());
        assert_eq!(s.score(), 30);
    }

    #[test]
    fn test_best_written_through_and_kept() {
        let store = MemoryStore::new(15);
        let mut s = session(&store);
        s.start(0.0);
        assert_eq!(s.state().best, 15);

        s.state.food = Food {
            cell: IVec2::new(11, 10),
            kind: FoodKind::Boost,
        };
        s.frame(120.0);
        assert_eq!(s.score(), 20);
        assert_eq!(store.value(), 20);
        assert_eq!(s.best(), 20);

        // A new session keeps the best even though the score restarts
        s.start(500.0);
        assert_eq!(s.score(), 0);
        assert_eq!(s.state().best, 20);
        assert_eq!(s.snapshot(500.0).best, 20);
    }

    #[test]
    fn test_best_not_written_when_not_beaten() {
        let store = MemoryStore::new(500);
        let mut s = session(&store);
        s.start(0.0);
        s.state.food = Food {
            cell: IVec2::new(11, 10),
            kind: FoodKind::Normal,
        };
        s.frame(120.0);
        assert_eq!(s.score(), 10);
        assert_eq!(store.value(), 500);
    }

    #[test]
    fn test_input_applied_on_next_tick() {
        let store = MemoryStore::new(0);
        let mut s = session(&store);
        s.start(0.0);
        s.state.food = Food {
            cell: IVec2::new(0, 0),
            kind: FoodKind::Normal,
        };
        s.handle(InputIntent::Direction(Direction::Down), 10.0);
        assert!(!s.submit(Direction::Up));
        s.frame(120.0);
        assert_eq!(s.state().head(), IVec2::new(10, 11));
    }

    #[test]
    fn test_snapshot_idempotent_and_particles_per_frame() {
        let store = MemoryStore::new(0);
        let mut s = session(&store);
        s.start(0.0);
        s.state.food = Food {
            cell: IVec2::new(11, 10),
            kind: FoodKind::Normal,
        };
        s.frame(120.0);
        let a = s.snapshot(130.0);
        let b = s.snapshot(130.0);
        assert_eq!(a, b);
        assert_eq!(a.particles.len(), 14);

        // Paused frames still animate particles
        s.toggle_pause();
        let before = s.snapshot(140.0).particles[0].life;
        s.frame(140.0);
        assert_eq!(s.snapshot(140.0).particles[0].life, before - 1.0);
    }

    #[test]
    fn test_toggle_mute_any_phase() {
        let store = MemoryStore::new(0);
        let mut s = session(&store);
        assert!(s.handle(InputIntent::ToggleMute, 0.0).is_empty());
        assert!(s.settings().muted);
        assert_eq!(s.settings().effective_volume(), 0.0);
        assert_eq!(s.phase(), GamePhase::Idle);

        s.start(0.0);
        s.handle(InputIntent::ToggleMute, 10.0);
        assert!(!s.settings().muted);
        assert_eq!(s.phase(), GamePhase::Running);
    }

    #[test]
    fn test_set_settings_caps_particles() {
        let store = MemoryStore::new(0);
        let mut s = session(&store);
        s.start(0.0);
        s.set_settings(Settings {
            particles: false,
            ..Settings::default()
        });
        s.state.food = Food {
            cell: IVec2::new(11, 10),
            kind: FoodKind::Normal,
        };
        s.frame(120.0);
        assert!(s.snapshot(120.0).particles.is_empty());
    }

    #[test]
    fn test_particles_disabled() {
        let store = MemoryStore::new(0);
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        let mut s = Session::with_seed(Box::new(store), settings, 1);
        s.start(0.0);
        s.frame(360.0);
        assert!(s.snapshot(360.0).particles.is_empty());
    }
}
