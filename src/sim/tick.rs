//! One discrete simulation step
//!
//! Core state transition: advances the snake by exactly one cell and resolves
//! whatever that move runs into.

use super::grid::{Cell, in_bounds};
use super::state::{FoodKind, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// What a candidate head position runs into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBody,
    Obstacle,
}

/// Classify a candidate head position (wall, then body, then obstacle)
pub fn classify(state: &GameState, head: Cell) -> Option<Collision> {
    if !in_bounds(head) {
        Some(Collision::Wall)
    } else if state.snake.contains(&head) {
        Some(Collision::SelfBody)
    } else if state.obstacles.contains(&head) {
        Some(Collision::Obstacle)
    } else {
        None
    }
}

/// Tick length at `now_ms`: shorter while a speed boost is active
pub fn tick_duration_ms(state: &GameState, now_ms: f64) -> f64 {
    if state.is_boosted(now_ms) {
        BOOST_TICK_MS
    } else {
        BASE_TICK_MS
    }
}

/// Advance the game state by one grid tick.
///
/// Returns the feedback events produced. Does nothing unless the session is
/// running. `best` is raised in place; persisting it is the caller's job.
pub fn tick(state: &mut GameState, now_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }
    state.time_ticks += 1;

    let direction = state.input.drain_one();
    let old_head = state.head();
    let head = old_head + direction.delta();

    if let Some(collision) = classify(state, head) {
        if state.shield > 0 {
            // Absorbed: the snake stays where it is this tick
            state.shield -= 1;
            log::debug!("Shield absorbed {:?} collision at tick {}", collision, state.time_ticks);
            events.push(GameEvent::ShieldBreak { at: old_head });
        } else {
            log::info!(
                "Game over: {:?} collision at ({}, {}), score {}",
                collision,
                head.x,
                head.y,
                state.score
            );
            events.push(GameEvent::Death { at: old_head });
            state.phase = GamePhase::Over;
        }
        return events;
    }

    state.snake.push_front(head);

    if head == state.food.cell {
        let kind = state.food.kind;
        state.score += kind.points();
        log::debug!("Ate {} food, score {}", kind.as_str(), state.score);
        match kind {
            FoodKind::Normal => events.push(GameEvent::Eat { at: head }),
            FoodKind::Boost => {
                state.boost_until_ms = now_ms + BOOST_DURATION_MS;
                events.push(GameEvent::Boost { at: head });
            }
            FoodKind::Shield => {
                state.shield = 1;
                events.push(GameEvent::ShieldGain { at: head });
            }
        }

        if state.score.is_multiple_of(OBSTACLE_SCORE_STEP) {
            state.add_obstacle();
        }

        if !state.spawn_food() {
            log::info!("Board full at score {}", state.score);
            state.phase = GamePhase::Over;
        }
    } else {
        state.snake.pop_back();
        events.push(GameEvent::MoveTick {
            at: head,
            boosted: state.is_boosted(now_ms),
        });
    }

    if state.score > state.best {
        state.best = state.score;
    }

    events
}
