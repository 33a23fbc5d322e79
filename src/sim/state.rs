//! Game state and core simulation types
//!
//! Everything a session needs lives in `GameState`; it is reset wholesale
//! between runs. Only `best` carries over.

use std::collections::VecDeque;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction, random_empty_cell};
use super::input::InputBuffer;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start
    Idle,
    /// Ticks are executing
    Running,
    /// Ticks suspended, render only
    Paused,
    /// Run ended, waiting for a restart
    Over,
}

/// Food variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FoodKind {
    #[default]
    Normal,
    /// Shortens the tick for a while
    Boost,
    /// Grants one shield charge
    Shield,
}

impl FoodKind {
    /// Pick a kind from a uniform roll in [0, 1): 12% boost, 8% shield
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.12 {
            FoodKind::Boost
        } else if roll < 0.2 {
            FoodKind::Shield
        } else {
            FoodKind::Normal
        }
    }

    /// Points awarded when eaten
    pub fn points(&self) -> u64 {
        match self {
            FoodKind::Normal => 10,
            FoodKind::Boost => 20,
            FoodKind::Shield => 15,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodKind::Normal => "normal",
            FoodKind::Boost => "boost",
            FoodKind::Shield => "shield",
        }
    }
}

/// The single food item on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub cell: Cell,
    pub kind: FoodKind,
}

/// Something that happened during a tick, for audio/haptics/particles.
///
/// Events carry the cell they happened at so visual effects can be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStart,
    /// Plain move without eating
    MoveTick { at: Cell, boosted: bool },
    Eat { at: Cell },
    Boost { at: Cell },
    ShieldGain { at: Cell },
    /// A shield charge absorbed a collision
    ShieldBreak { at: Cell },
    Death { at: Cell },
}

impl GameEvent {
    /// Stable event name for feedback collaborators
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::SessionStart => "session-start",
            GameEvent::MoveTick { .. } => "move-tick",
            GameEvent::Eat { .. } => "eat",
            GameEvent::Boost { .. } => "boost",
            GameEvent::ShieldGain { .. } => "shield-gain",
            GameEvent::ShieldBreak { .. } => "shield-break",
            GameEvent::Death { .. } => "death",
        }
    }

    pub fn cell(&self) -> Option<Cell> {
        match *self {
            GameEvent::SessionStart => None,
            GameEvent::MoveTick { at, .. }
            | GameEvent::Eat { at }
            | GameEvent::Boost { at }
            | GameEvent::ShieldGain { at }
            | GameEvent::ShieldBreak { at }
            | GameEvent::Death { at } => Some(at),
        }
    }

    /// Impacts that should shake the playfield
    pub fn shakes(&self) -> bool {
        matches!(self, GameEvent::ShieldBreak { .. } | GameEvent::Death { .. })
    }
}

/// Spawn position of the head; the body trails to the left
pub const SPAWN_HEAD: IVec2 = IVec2::new(10, 10);
/// Initial heading
pub const SPAWN_DIRECTION: Direction = Direction::Right;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Body cells, head first
    pub snake: VecDeque<Cell>,
    /// Pending and current direction
    pub input: InputBuffer,
    pub food: Food,
    /// Grows during a run, never shrinks
    pub obstacles: Vec<Cell>,
    /// Shield charges (0 or 1)
    pub shield: u8,
    /// Boost active while `now < boost_until_ms`
    pub boost_until_ms: f64,
    pub score: u64,
    /// Best score ever reached (carried across resets)
    pub best: u64,
    pub phase: GamePhase,
    /// Ticks executed this session
    pub time_ticks: u64,
    rng: Pcg32,
}

impl GameState {
    /// Fresh idle state with an entropy-seeded RNG
    pub fn new(best: u64) -> Self {
        Self::with_seed(rand::random(), best)
    }

    /// Fresh idle state with a fixed seed (tests, headless runs)
    pub fn with_seed(seed: u64, best: u64) -> Self {
        let mut state = Self {
            snake: VecDeque::new(),
            input: InputBuffer::new(SPAWN_DIRECTION),
            food: Food {
                cell: IVec2::splat(-1),
                kind: FoodKind::Normal,
            },
            obstacles: Vec::new(),
            shield: 0,
            boost_until_ms: 0.0,
            score: 0,
            best,
            phase: GamePhase::Idle,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.reset_board();
        state
    }

    /// Start a new run: everything but `best` goes back to spawn values
    pub fn reset(&mut self) {
        self.reset_board();
        self.phase = GamePhase::Running;
    }

    fn reset_board(&mut self) {
        let step = SPAWN_DIRECTION.delta();
        self.snake = (0..START_LENGTH as i32)
            .map(|i| SPAWN_HEAD - step * i)
            .collect();
        self.input.clear(SPAWN_DIRECTION);
        self.obstacles.clear();
        self.shield = 0;
        self.boost_until_ms = 0.0;
        self.score = 0;
        self.time_ticks = 0;
        let spawned = self.spawn_food();
        debug_assert!(spawned, "empty board must have room for food");
    }

    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    pub fn is_boosted(&self, now_ms: f64) -> bool {
        now_ms < self.boost_until_ms
    }

    /// Move the food to a random empty cell with a freshly rolled kind.
    ///
    /// Returns false (food unchanged) if the board has no empty cell left.
    pub fn spawn_food(&mut self) -> bool {
        let Self {
            rng,
            snake,
            obstacles,
            food,
            ..
        } = self;
        let Some(cell) = random_empty_cell(rng, |c| !occupied(snake, obstacles, food, c)) else {
            return false;
        };
        let kind = FoodKind::from_roll(rng.random());
        *food = Food { cell, kind };
        true
    }

    /// Place one obstacle on a random empty cell, up to `MAX_OBSTACLES`
    pub fn add_obstacle(&mut self) -> bool {
        if self.obstacles.len() >= MAX_OBSTACLES {
            return false;
        }
        let Self {
            rng,
            snake,
            obstacles,
            food,
            ..
        } = self;
        let Some(cell) = random_empty_cell(rng, |c| !occupied(snake, obstacles, food, c)) else {
            return false;
        };
        obstacles.push(cell);
        log::debug!("Obstacle {} placed at ({}, {})", obstacles.len(), cell.x, cell.y);
        true
    }
}

fn occupied(snake: &VecDeque<Cell>, obstacles: &[Cell], food: &Food, cell: Cell) -> bool {
    food.cell == cell || snake.contains(&cell) || obstacles.contains(&cell)
}
