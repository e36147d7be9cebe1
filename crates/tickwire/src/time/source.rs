//! Monotonic time sources for [`Clock`](super::Clock).
//!
//! - [`SteadyClock`]: real monotonic time (`std::time::Instant`), measured
//!   from the moment the source was created.
//! - [`ManualClock`]: time that only moves when told to. Clones share the
//!   same reading, so a test or replay driver can keep a handle and advance
//!   the clock it handed to a `Clock`.

use super::Duration;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A monotonic source of real time.
pub trait TimeSource {
    /// Time elapsed since the source's epoch.
    fn now(&self) -> Duration;
}

/// Monotonic wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct SteadyClock {
    epoch: Instant,
}

impl SteadyClock {
    /// Creates a source whose epoch is now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SteadyClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SteadyClock {
    #[inline]
    fn now(&self) -> Duration {
        Duration::from(self.epoch.elapsed())
    }
}

/// Manually advanced time, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    // f64 nanoseconds, stored as bits
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a source reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source reading `now`.
    pub fn starting_at(now: Duration) -> Self {
        let clock = Self::new();
        clock.set(now);
        clock
    }

    /// Jumps to `now`.
    pub fn set(&self, now: Duration) {
        self.nanos.store(now.as_nanos().to_bits(), Ordering::Release);
    }

    /// Moves forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.set(self.now() + delta);
    }
}

impl TimeSource for ManualClock {
    #[inline]
    fn now(&self) -> Duration {
        Duration::from_nanos(f64::from_bits(self.nanos.load(Ordering::Acquire)))
    }
}

impl<S: TimeSource + ?Sized> TimeSource for &S {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let driver = ManualClock::new();
        let handed_out = driver.clone();
        assert_eq!(handed_out.now(), Duration::ZERO);

        driver.set(Duration::from_nanos(42.0));
        assert_eq!(handed_out.now(), Duration::from_nanos(42.0));

        driver.advance(Duration::from_nanos(8.0));
        assert_eq!(handed_out.now(), Duration::from_nanos(50.0));
    }

    #[test]
    fn test_steady_clock_is_monotonic() {
        let clock = SteadyClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
        assert!(first >= Duration::ZERO);
    }
}
