//! Simple autopilot for demo runs
//!
//! Greedy: of the moves that don't crash on the next tick, take the one that
//! gets closest to the food, preferring cells with more open neighbors.

use super::grid::{Cell, Direction};
use super::state::GameState;
use super::tick::classify;

fn open_neighbors(state: &GameState, cell: Cell) -> usize {
    Direction::ALL
        .iter()
        .filter(|d| classify(state, cell + d.delta()).is_none())
        .count()
}

/// Suggest the next direction, or `None` if every move is fatal
pub fn suggest(state: &GameState) -> Option<Direction> {
    let heading = state.input.last_planned();
    let head = state.head();
    let food = state.food.cell;

    Direction::ALL
        .into_iter()
        .filter(|d| !d.is_reverse_of(heading))
        .map(|d| (d, head + d.delta()))
        .filter(|&(_, next)| classify(state, next).is_none())
        .min_by_key(|&(_, next)| {
            let distance = (food - next).abs().element_sum();
            // Dead ends sort last
            let open = open_neighbors(state, next);
            (open == 0, distance, std::cmp::Reverse(open))
        })
        .map(|(d, _)| d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Food, FoodKind, GamePhase};
    use crate::sim::tick::tick;
    use glam::IVec2;

    #[test]
    fn test_heads_for_food() {
        let mut state = GameState::with_seed(1, 0);
        state.reset();
        state.food = Food {
            cell: IVec2::new(10, 3),
            kind: FoodKind::Normal,
        };
        assert_eq!(suggest(&state), Some(Direction::Up));
    }

    #[test]
    fn test_avoids_wall() {
        let mut state = GameState::with_seed(1, 0);
        state.reset();
        state.snake = [IVec2::new(20, 0), IVec2::new(19, 0), IVec2::new(18, 0)].into();
        state.food = Food {
            cell: IVec2::new(20, 20),
            kind: FoodKind::Normal,
        };
        assert_eq!(suggest(&state), Some(Direction::Down));
    }

    #[test]
    fn test_survives_and_scores() {
        let mut state = GameState::with_seed(42, 0);
        state.reset();
        for _ in 0..300 {
            if let Some(dir) = suggest(&state) {
                state.input.submit(dir);
            }
            tick(&mut state, 0.0);
            if state.phase != GamePhase::Running {
                break;
            }
        }
        assert!(state.score >= 10, "autopilot scored {}", state.score);
    }
}
