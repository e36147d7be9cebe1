//! Fixed-rate simulation clock with a pausable, scalable speed.

use super::{Duration, Hertz, ManualClock, Snapshot, SteadyClock, TimeSource};
use crate::{ClockConfig, TimeError};
use tracing::{debug, warn};

// =============================================================================
// TICK ARITHMETIC
// =============================================================================
//
// Two anchors, frozen at every `set_time_scale`, make scale changes seamless:
//
//   elapsed_ticks  ticks counted up to the last scale change
//   elapsed_time   real_time * new_scale at that instant
//
// From then on:
//
//   ticks = elapsed_ticks + floor(max(0, real_time * scale - elapsed_time) / tick)
//
// Right after a change `real_time * scale == elapsed_time`, so the floor term
// is zero and `ticks()` equals the frozen count. With `scale == 0` both sides
// stay at zero and the clock is paused.
//
// =============================================================================

/// Deterministic, scalable simulation clock.
///
/// Converts samples of a monotonic [`TimeSource`] into a whole number of
/// fixed-length ticks.
///
/// ```
/// use tickwire::{Clock, Duration, Hertz, ManualClock};
///
/// let time = ManualClock::new();
/// let mut clock = Clock::with_source(Hertz::new(10).unwrap(), time.clone());
///
/// time.set(Duration::from_millis(250.0));
/// assert_eq!(clock.ticks(), 2);
///
/// clock.set_time_scale(0.0).unwrap(); // pause
/// time.advance(Duration::from_secs_f64(5.0));
/// assert_eq!(clock.ticks(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Clock<S = SteadyClock> {
    source: S,
    tick_duration: Duration,
    time_scale: f64,
    elapsed_time: Duration,
    elapsed_ticks: u64,
}

impl Clock<SteadyClock> {
    /// Creates a real-time clock ticking at `rate`.
    pub fn new(rate: Hertz) -> Self {
        Self::with_source(rate, SteadyClock::new())
    }
}

impl Clock<ManualClock> {
    /// Creates a clock driven by a [`ManualClock`] starting at zero.
    ///
    /// Returns the clock and a handle for advancing its time.
    pub fn manual(rate: Hertz) -> (Self, ManualClock) {
        let time = ManualClock::new();
        (Self::with_source(rate, time.clone()), time)
    }
}

impl<S: TimeSource> Clock<S> {
    /// Creates a clock ticking at `rate`, sampling `source`.
    pub fn with_source(rate: Hertz, source: S) -> Self {
        Self {
            source,
            tick_duration: rate.period(),
            time_scale: 1.0,
            elapsed_time: Duration::ZERO,
            elapsed_ticks: 0,
        }
    }

    /// Creates a clock from a [`ClockConfig`].
    ///
    /// Fails if the tick rate is zero or the time scale is invalid.
    pub fn from_config(config: ClockConfig, source: S) -> Result<Self, TimeError> {
        let rate = Hertz::new(u64::from(config.tick_rate_hz))?;
        let mut clock = Self::with_source(rate, source);
        clock.set_time_scale(config.time_scale)?;
        Ok(clock)
    }

    /// Raw monotonic time from the source.
    #[inline]
    pub fn real_time(&self) -> Duration {
        self.source.now()
    }

    /// Whole ticks elapsed in scaled time.
    pub fn ticks(&self) -> u64 {
        self.ticks_at(self.real_time())
    }

    /// Simulation time: `ticks() * tick_duration()`.
    pub fn game_time(&self) -> Duration {
        self.tick_duration * self.ticks()
    }

    /// Length of one tick.
    #[inline]
    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Current time scale.
    #[inline]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Returns `true` when the time scale is zero.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.time_scale == 0.0
    }

    /// The underlying time source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Changes the speed of simulation time relative to real time.
    ///
    /// `0.0` pauses; `1.0` is real time. The tick count is frozen at the
    /// moment of the call, so it never jumps when the scale changes. Negative,
    /// NaN and infinite scales are rejected and leave the clock untouched.
    pub fn set_time_scale(&mut self, scale: f64) -> Result<(), TimeError> {
        if !(scale.is_finite() && scale >= 0.0) {
            warn!(scale, "rejected time scale");
            return Err(TimeError::InvalidTimeScale(scale));
        }

        let now = self.real_time();
        self.elapsed_ticks = self.ticks_at(now);
        self.elapsed_time = now * scale;
        self.time_scale = scale;

        debug!(
            scale,
            ticks = self.elapsed_ticks,
            real_time = %now,
            "time scale changed"
        );
        Ok(())
    }

    /// Captures all derived quantities from a single time sample.
    pub fn snapshot(&self) -> Snapshot {
        let real_time = self.real_time();
        let accumulated = self.accumulated_at(real_time);
        let whole_ticks = accumulated.whole_periods(self.tick_duration);

        Snapshot {
            real_time,
            tick_duration: self.tick_duration,
            time_scale: self.time_scale,
            elapsed_time: self.elapsed_time,
            elapsed_ticks: self.elapsed_ticks,
            frame: self.elapsed_ticks + whole_ticks,
            accumulated_time: accumulated - self.tick_duration * whole_ticks,
        }
    }

    /// Scaled time since the last anchor, never negative.
    #[inline]
    fn accumulated_at(&self, real_time: Duration) -> Duration {
        (real_time * self.time_scale).saturating_sub(self.elapsed_time)
    }

    #[inline]
    fn ticks_at(&self, real_time: Duration) -> u64 {
        self.elapsed_ticks + self.accumulated_at(real_time).whole_periods(self.tick_duration)
    }
}
