/// Per-direction repeat guard for held directional input.
///
/// A raw "direction is down" signal arrives every frame while a key is held.
/// The guard admits the first one immediately and then at most one per
/// `interval`, measured from the last *admitted* input of that direction.
/// Dropped inputs are not queued.

use std::time::{Duration, Instant};

/// Vertical menu direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Clone, Debug)]
pub struct RepeatGuard {
    interval: Duration,
    last_up: Option<Instant>,
    last_down: Option<Instant>,
}

impl RepeatGuard {
    pub fn new(interval: Duration) -> Self {
        RepeatGuard {
            interval,
            last_up: None,
            last_down: None,
        }
    }

    /// Returns true and records `now` if `dir` may fire at `now`.
    pub fn admit(&mut self, dir: Direction, now: Instant) -> bool {
        let interval = self.interval;
        let slot = match dir {
            Direction::Up => &mut self.last_up,
            Direction::Down => &mut self.last_down,
        };
        let ready = slot
            .map(|t| now.saturating_duration_since(t) >= interval)
            .unwrap_or(true);
        if ready {
            *slot = Some(now);
        }
        ready
    }
}
