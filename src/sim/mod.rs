//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Discrete grid ticks only
//! - Randomness flows through the state's own RNG
//! - Side effects are returned as `GameEvent`s, never performed
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod grid;
pub mod input;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use grid::{Cell, Direction, in_bounds, random_empty_cell};
pub use input::InputBuffer;
pub use scheduler::TickScheduler;
pub use snapshot::Snapshot;
pub use state::{Food, FoodKind, GameEvent, GamePhase, GameState};
pub use tick::{Collision, classify, tick, tick_duration_ms};
