/*!
 * Timing Types
 * High-resolution (seconds, nanoseconds) readings
 */

use crate::core::limits::NANOS_PER_SEC;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A monotonic reading or an elapsed duration split into whole seconds and
/// the nanosecond remainder
///
/// Invariant: `nanoseconds < 1_000_000_000`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimingSample {
    seconds: u64,
    nanoseconds: u32,
}

impl TimingSample {
    pub const ZERO: TimingSample = TimingSample {
        seconds: 0,
        nanoseconds: 0,
    };

    /// Build a sample, carrying excess nanoseconds into seconds
    pub fn new(seconds: u64, nanoseconds: u32) -> Self {
        let carry = u64::from(nanoseconds / NANOS_PER_SEC);
        Self {
            seconds: seconds.saturating_add(carry),
            nanoseconds: nanoseconds % NANOS_PER_SEC,
        }
    }

    #[inline]
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    #[inline]
    pub fn nanoseconds(&self) -> u32 {
        self.nanoseconds
    }

    /// Total nanoseconds (the `hrtime.bigint()` form)
    #[inline]
    pub fn as_nanos(&self) -> u128 {
        u128::from(self.seconds) * u128::from(NANOS_PER_SEC) + u128::from(self.nanoseconds)
    }

    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + f64::from(self.nanoseconds) / f64::from(NANOS_PER_SEC)
    }

    /// `self - earlier`, borrowing a second when the nanosecond part underflows.
    /// Returns `None` when `earlier` is later than `self`.
    pub fn checked_sub(&self, earlier: TimingSample) -> Option<TimingSample> {
        if *self < earlier {
            return None;
        }

        let (seconds, nanoseconds) = if self.nanoseconds >= earlier.nanoseconds {
            (
                self.seconds - earlier.seconds,
                self.nanoseconds - earlier.nanoseconds,
            )
        } else {
            (
                self.seconds - earlier.seconds - 1,
                self.nanoseconds + NANOS_PER_SEC - earlier.nanoseconds,
            )
        };

        Some(TimingSample {
            seconds,
            nanoseconds,
        })
    }

    /// `self - earlier`, clamped to zero
    pub fn saturating_sub(&self, earlier: TimingSample) -> TimingSample {
        self.checked_sub(earlier).unwrap_or(TimingSample::ZERO)
    }
}

impl From<Duration> for TimingSample {
    fn from(duration: Duration) -> Self {
        Self {
            seconds: duration.as_secs(),
            nanoseconds: duration.subsec_nanos(),
        }
    }
}

impl From<TimingSample> for Duration {
    fn from(sample: TimingSample) -> Self {
        Duration::new(sample.seconds, sample.nanoseconds)
    }
}

impl fmt::Display for TimingSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.seconds, self.nanoseconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_carries_nanoseconds() {
        let sample = TimingSample::new(1, 2_500_000_000);
        assert_eq!(sample.seconds(), 3);
        assert_eq!(sample.nanoseconds(), 500_000_000);
    }

    #[test]
    fn test_sub_borrows_from_seconds() {
        let later = TimingSample::new(5, 100);
        let earlier = TimingSample::new(3, 900_000_000);
        let delta = later.checked_sub(earlier).unwrap();
        assert_eq!(delta.seconds(), 1);
        assert_eq!(delta.nanoseconds(), 100_000_100);
    }

    #[test]
    fn test_sub_of_later_sample_saturates() {
        let earlier = TimingSample::new(1, 0);
        let later = TimingSample::new(2, 0);
        assert!(earlier.checked_sub(later).is_none());
        assert_eq!(earlier.saturating_sub(later), TimingSample::ZERO);
    }

    #[test]
    fn test_duration_conversion() {
        let sample = TimingSample::from(Duration::from_millis(1_500));
        assert_eq!(sample.seconds(), 1);
        assert_eq!(sample.nanoseconds(), 500_000_000);
        assert_eq!(Duration::from(sample), Duration::from_millis(1_500));
        assert_eq!(sample.as_nanos(), 1_500_000_000);
    }
}
