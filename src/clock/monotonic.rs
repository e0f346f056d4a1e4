/*!
 * Monotonic Clock
 * Readings relative to a fixed origin, immune to wall-clock adjustment
 */

use super::types::TimingSample;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait MonotonicClock: Send + Sync {
    /// Current reading; never decreases between calls
    fn now(&self) -> TimingSample;

    /// `now() - since` with borrow arithmetic, clamped at zero
    fn elapsed(&self, since: TimingSample) -> TimingSample {
        self.now().saturating_sub(since)
    }
}

/// Clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    #[inline]
    fn now(&self) -> TimingSample {
        TimingSample::from(self.origin.elapsed())
    }
}

/// Hand-advanced clock for deterministic timing
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    current: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current = current.saturating_add(by);
    }
}

impl MonotonicClock for ManualClock {
    fn now(&self) -> TimingSample {
        TimingSample::from(*self.current.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_never_decreases() {
        let clock = SystemClock::new();
        let mut previous = clock.now();
        for _ in 0..1_000 {
            let next = clock.now();
            assert!(next >= previous);
            previous = next;
        }
    }

    #[test]
    fn test_manual_clock_elapsed() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(2_250));

        let elapsed = clock.elapsed(start);
        assert_eq!(elapsed.seconds(), 2);
        assert_eq!(elapsed.nanoseconds(), 250_000_000);
    }
}
