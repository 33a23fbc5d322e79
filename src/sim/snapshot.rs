//! Read-only view of a session for render sinks

use serde::Serialize;

use super::grid::Cell;
use super::state::{Food, FoodKind, GamePhase, GameState};
use crate::consts::GRID_SIZE;
use crate::fx::Particle;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub grid_size: i32,
    /// Head first
    pub snake: Vec<Cell>,
    pub food: Food,
    pub obstacles: Vec<Cell>,
    pub particles: Vec<Particle>,
    pub phase: GamePhase,
    pub score: u64,
    pub best: u64,
    pub shield: u8,
    pub boosted: bool,
}

impl Snapshot {
    /// Capture the current state. Never mutates anything.
    pub fn capture(state: &GameState, particles: &[Particle], now_ms: f64) -> Self {
        Self {
            grid_size: GRID_SIZE,
            snake: state.snake.iter().copied().collect(),
            food: state.food,
            obstacles: state.obstacles.clone(),
            particles: particles.to_vec(),
            phase: state.phase,
            score: state.score,
            best: state.best,
            shield: state.shield,
            boosted: state.is_boosted(now_ms),
        }
    }

    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    pub fn paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Text rendering of the board, one line per row.
    ///
    /// `@` head, `o` body, `#` obstacle, `*`/`!`/`+` normal/boost/shield food.
    pub fn to_ascii(&self) -> String {
        let size = self.grid_size as usize;
        let mut rows = vec![vec!['.'; size]; size];
        let mut put = |cell: Cell, ch: char| {
            if let (Ok(x), Ok(y)) = (usize::try_from(cell.x), usize::try_from(cell.y)) {
                if x < size && y < size {
                    rows[y][x] = ch;
                }
            }
        };

        for &cell in &self.obstacles {
            put(cell, '#');
        }
        put(
            self.food.cell,
            match self.food.kind {
                FoodKind::Normal => '*',
                FoodKind::Boost => '!',
                FoodKind::Shield => '+',
            },
        );
        for (i, &cell) in self.snake.iter().enumerate().rev() {
            put(cell, if i == 0 { '@' } else { 'o' });
        }

        rows.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_capture_is_idempotent() {
        let mut state = GameState::with_seed(3, 70);
        state.reset();
        let a = Snapshot::capture(&state, &[], 0.0);
        let b = Snapshot::capture(&state, &[], 0.0);
        assert_eq!(a, b);
        assert_eq!(a.head(), Some(IVec2::new(10, 10)));
        assert_eq!(a.best, 70);
        assert!(!a.paused());
        assert!(!a.game_over());
    }

    #[test]
    fn test_ascii() {
        let mut state = GameState::with_seed(3, 0);
        state.food = Food {
            cell: IVec2::new(0, 0),
            kind: FoodKind::Boost,
        };
        state.obstacles.push(IVec2::new(20, 20));
        let text = Snapshot::capture(&state, &[], 0.0).to_ascii();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 21);
        assert!(rows[0].starts_with('!'));
        assert!(rows[20].ends_with('#'));
        assert_eq!(&rows[10][8..11], "oo@");
    }
}
