use super::Duration;

/// Point-in-time capture of every clock-derived quantity.
///
/// Produced by [`Clock::snapshot`](super::Clock::snapshot) and stored in a
/// [`SnapshotCache`](super::SnapshotCache) so asynchronous events can later
/// be correlated with the simulation frame they happened in.
///
/// Aligned to a cache line so neighbouring cache slots never share one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    any(
        target_arch = "x86_64",
        target_arch = "aarch64",
        target_arch = "powerpc64",
    ),
    repr(align(128))
)]
#[cfg_attr(target_arch = "s390x", repr(align(256)))]
#[cfg_attr(
    not(any(
        target_arch = "x86_64",
        target_arch = "aarch64",
        target_arch = "powerpc64",
        target_arch = "s390x",
    )),
    repr(align(64))
)]
pub struct Snapshot {
    /// Raw monotonic time when the snapshot was taken.
    pub real_time: Duration,
    /// Length of one simulation tick.
    pub tick_duration: Duration,
    /// Time scale in effect.
    pub time_scale: f64,
    /// Scaled time frozen at the last time-scale change.
    pub elapsed_time: Duration,
    /// Tick count frozen at the last time-scale change.
    pub elapsed_ticks: u64,
    /// Tick count at capture time.
    pub frame: u64,
    /// Scaled time accumulated toward the next tick.
    pub accumulated_time: Duration,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            real_time: Duration::ZERO,
            tick_duration: Duration::ZERO,
            time_scale: 1.0,
            elapsed_time: Duration::ZERO,
            elapsed_ticks: 0,
            frame: 0,
            accumulated_time: Duration::ZERO,
        }
    }
}

impl Snapshot {
    /// Simulation time at capture: `frame * tick_duration`.
    #[inline]
    pub fn game_time(&self) -> Duration {
        self.tick_duration * self.frame
    }

    /// Fraction of the next tick already accumulated, in `[0, 1)`.
    ///
    /// Useful as the interpolation factor between the previous and current
    /// simulation states when rendering.
    pub fn alpha(&self) -> f64 {
        if self.tick_duration.is_zero() {
            0.0
        } else {
            self.accumulated_time / self.tick_duration
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CACHELINE_SIZE;
    use std::mem::{align_of, size_of};

    #[test]
    fn test_snapshot_fills_whole_cache_lines() {
        assert_eq!(align_of::<Snapshot>() % CACHELINE_SIZE, 0);
        assert_eq!(size_of::<Snapshot>() % CACHELINE_SIZE, 0);
    }
}
