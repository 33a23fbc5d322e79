//! Buffered direction input
//!
//! Players often press two keys within one tick (e.g. Up then Left to make a
//! tight turn). Queuing them instead of keeping only the latest makes both
//! turns happen on consecutive ticks.

use std::collections::VecDeque;

use super::grid::Direction;
use crate::consts::INPUT_QUEUE_CAPACITY;

/// Bounded FIFO of pending direction changes plus the direction in effect
#[derive(Debug, Clone)]
pub struct InputBuffer {
    current: Direction,
    queue: VecDeque<Direction>,
}

impl InputBuffer {
    pub fn new(current: Direction) -> Self {
        Self {
            current,
            queue: VecDeque::with_capacity(INPUT_QUEUE_CAPACITY),
        }
    }

    /// Direction applied on the most recent tick
    pub fn direction(&self) -> Direction {
        self.current
    }

    /// Direction the snake will be heading once the queue has drained
    pub fn last_planned(&self) -> Direction {
        self.queue.back().copied().unwrap_or(self.current)
    }

    /// Queue a direction change.
    ///
    /// Returns false (and changes nothing) for an exact reversal of the last
    /// planned direction. When full, the oldest pending entry is evicted.
    pub fn submit(&mut self, direction: Direction) -> bool {
        if direction.is_reverse_of(self.last_planned()) {
            log::trace!("Rejected reversing input {}", direction.as_str());
            return false;
        }
        if self.queue.len() >= INPUT_QUEUE_CAPACITY {
            self.queue.pop_front();
        }
        self.queue.push_back(direction);
        true
    }

    /// Apply the oldest pending change (if any), once per tick.
    ///
    /// Eviction can leave an entry at the front that reverses `current` (it was
    /// only checked against the entry it followed); such an entry is consumed
    /// without effect.
    pub fn drain_one(&mut self) -> Direction {
        if let Some(next) = self.queue.pop_front() {
            if next.is_reverse_of(self.current) {
                log::trace!("Dropped stale reversing input {}", next.as_str());
            } else {
                self.current = next;
            }
        }
        self.current
    }

    pub fn pending(&self) -> impl Iterator<Item = Direction> + '_ {
        self.queue.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop all pending input and face `direction` (session reset)
    pub fn clear(&mut self, direction: Direction) {
        self.queue.clear();
        self.current = direction;
    }
}
