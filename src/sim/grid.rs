//! Grid geometry: cells, directions and empty-cell search
//!
//! The playfield is a fixed `GRID_SIZE` x `GRID_SIZE` square. Cells are
//! integer pairs with (0, 0) in the top-left corner and y growing downward.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{GRID_SIZE, MAX_SAMPLE_ATTEMPTS};

/// A grid cell (x, y)
pub type Cell = IVec2;

/// Unit movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in grid space (screen coordinates, y down)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True if `other` would turn the snake straight back on itself
    pub fn is_reverse_of(self, other: Direction) -> bool {
        self.opposite() == other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Whether a cell lies inside the playfield
#[inline]
pub fn in_bounds(cell: Cell) -> bool {
    (0..GRID_SIZE).contains(&cell.x) && (0..GRID_SIZE).contains(&cell.y)
}

/// Uniformly random cell anywhere on the grid
pub fn random_cell<R: Rng + ?Sized>(rng: &mut R) -> Cell {
    IVec2::new(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE))
}

/// Find a random cell for which `is_free` holds.
///
/// Rejection sampling is tried first; the grid is mostly empty so it almost
/// always succeeds within a few probes. After `MAX_SAMPLE_ATTEMPTS` misses the
/// whole grid is scanned starting at a random offset, so a crowded board still
/// terminates. Returns `None` only when no free cell exists.
pub fn random_empty_cell<R, F>(rng: &mut R, is_free: F) -> Option<Cell>
where
    R: Rng + ?Sized,
    F: Fn(Cell) -> bool,
{
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let cell = random_cell(rng);
        if is_free(cell) {
            return Some(cell);
        }
    }

    let total = GRID_SIZE * GRID_SIZE;
    let start = rng.random_range(0..total);
    (0..total)
        .map(|i| {
            let idx = (start + i) % total;
            IVec2::new(idx % GRID_SIZE, idx / GRID_SIZE)
        })
        .find(|&cell| is_free(cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.delta() + dir.opposite().delta(), IVec2::ZERO);
            assert!(dir.is_reverse_of(dir.opposite()));
            assert!(!dir.is_reverse_of(dir));
        }
    }

    #[test]
    fn test_bounds() {
        assert!(in_bounds(IVec2::new(0, 0)));
        assert!(in_bounds(IVec2::new(GRID_SIZE - 1, GRID_SIZE - 1)));
        assert!(!in_bounds(IVec2::new(-1, 5)));
        assert!(!in_bounds(IVec2::new(5, GRID_SIZE)));
    }

    #[test]
    fn test_random_empty_cell_respects_filter() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let cell = random_empty_cell(&mut rng, |c| c.x > 15 && c.y < 3).unwrap();
            assert!(cell.x > 15 && cell.y < 3);
        }
    }

    #[test]
    fn test_random_empty_cell_single_hole() {
        // Only one free cell: sampling will usually miss, the scan must find it
        let hole = IVec2::new(13, 4);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(random_empty_cell(&mut rng, |c| c == hole), Some(hole));
    }

    #[test]
    fn test_random_empty_cell_full_grid() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(random_empty_cell(&mut rng, |_| false), None);
    }
}
