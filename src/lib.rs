//! Snake Pro - A grid snake arcade game
//!
//! Core modules:
//! - `sim`: Tick-based simulation (grid, input buffer, step, scheduler)
//! - `fx`: Cosmetic particle bursts
//! - `feedback`: Sound/haptic cues for gameplay events
//! - `session`: Start/pause/game-over lifecycle tying everything together
//! - `persistence`: Best score storage
//! - `platform`: Contracts for clocks, input, render and feedback sinks

pub mod feedback;
pub mod fx;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use session::Session;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Grid is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: i32 = 21;

    /// Tick duration without a speed boost (ms)
    pub const BASE_TICK_MS: f64 = 120.0;
    /// Tick duration while a speed boost is active (ms)
    pub const BOOST_TICK_MS: f64 = 80.0;
    /// How long a boost pickup lasts (ms)
    pub const BOOST_DURATION_MS: f64 = 7000.0;

    /// Obstacles stop growing here
    pub const MAX_OBSTACLES: usize = 12;
    /// Pending direction changes kept by the input buffer
    pub const INPUT_QUEUE_CAPACITY: usize = 3;
    /// An obstacle is added whenever the score lands on a multiple of this
    pub const OBSTACLE_SCORE_STEP: u64 = 50;

    /// Snake length at spawn
    pub const START_LENGTH: usize = 3;

    /// Random probes before falling back to a grid scan
    pub const MAX_SAMPLE_ATTEMPTS: u32 = 1024;

    /// Storage key for the best score
    pub const BEST_SCORE_KEY: &str = "snake_best_v1";
}
