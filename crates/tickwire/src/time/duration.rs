use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

const NANOS_PER_MICRO: f64 = 1e3;
const NANOS_PER_MILLI: f64 = 1e6;
const NANOS_PER_SEC: f64 = 1e9;

/// A span of time with a floating-point nanosecond representation.
///
/// Tick periods such as 1/60 s are not whole nanoseconds, and tick counting
/// floors `elapsed / period`, so the clock works in `f64` rather than
/// `std::time::Duration`'s integer nanoseconds. Values may be negative as
/// intermediates; the clock and timers clamp where it matters.
#[derive(Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration {
    nanos: f64,
}

impl Duration {
    /// Zero-length duration.
    pub const ZERO: Duration = Duration { nanos: 0.0 };

    /// Creates a duration of `nanos` nanoseconds.
    #[inline]
    pub const fn from_nanos(nanos: f64) -> Self {
        Self { nanos }
    }

    #[inline]
    pub fn from_micros(micros: f64) -> Self {
        Self::from_nanos(micros * NANOS_PER_MICRO)
    }

    #[inline]
    pub fn from_millis(millis: f64) -> Self {
        Self::from_nanos(millis * NANOS_PER_MILLI)
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        Self::from_nanos(secs * NANOS_PER_SEC)
    }

    #[inline]
    pub const fn as_nanos(self) -> f64 {
        self.nanos
    }

    #[inline]
    pub fn as_micros(self) -> f64 {
        self.nanos / NANOS_PER_MICRO
    }

    #[inline]
    pub fn as_millis(self) -> f64 {
        self.nanos / NANOS_PER_MILLI
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.nanos / NANOS_PER_SEC
    }

    /// Returns the larger of two durations.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if other.nanos > self.nanos {
            other
        } else {
            self
        }
    }

    /// Returns the smaller of two durations.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        if other.nanos < self.nanos {
            other
        } else {
            self
        }
    }

    /// `self - rhs`, clamped at zero.
    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        (self - rhs).max(Self::ZERO)
    }

    /// Number of whole `period`s in `self`, rounding toward negative infinity
    /// and clamping negative spans to zero.
    #[inline]
    pub fn whole_periods(self, period: Self) -> u64 {
        (self.nanos / period.nanos).floor().max(0.0) as u64
    }

    /// Returns `true` for exactly zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.nanos == 0.0
    }

    /// Converts to `std::time::Duration`, saturating negative values at zero.
    pub fn to_std(self) -> std::time::Duration {
        std::time::Duration::from_nanos(self.nanos.max(0.0) as u64)
    }

    /// Total order for sorting; NaN sorts last.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.nanos.total_cmp(&other.nanos)
    }
}

impl From<std::time::Duration> for Duration {
    fn from(duration: std::time::Duration) -> Self {
        Self::from_nanos(duration.as_nanos() as f64)
    }
}

impl Add for Duration {
    type Output = Duration;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_nanos(self.nanos + rhs.nanos)
    }
}

impl AddAssign for Duration {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.nanos += rhs.nanos;
    }
}

impl Sub for Duration {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_nanos(self.nanos - rhs.nanos)
    }
}

impl SubAssign for Duration {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.nanos -= rhs.nanos;
    }
}

impl Mul<f64> for Duration {
    type Output = Duration;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::from_nanos(self.nanos * rhs)
    }
}

impl Mul<u64> for Duration {
    type Output = Duration;

    #[inline]
    fn mul(self, rhs: u64) -> Self {
        Self::from_nanos(self.nanos * rhs as f64)
    }
}

impl Div<f64> for Duration {
    type Output = Duration;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::from_nanos(self.nanos / rhs)
    }
}

/// Ratio of two durations.
impl Div for Duration {
    type Output = f64;

    #[inline]
    fn div(self, rhs: Self) -> f64 {
        self.nanos / rhs.nanos
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.nanos)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.nanos.abs();
        if nanos >= NANOS_PER_SEC {
            write!(f, "{:.3}s", self.as_secs_f64())
        } else if nanos >= NANOS_PER_MILLI {
            write!(f, "{:.3}ms", self.as_millis())
        } else if nanos >= NANOS_PER_MICRO {
            write!(f, "{:.3}us", self.as_micros())
        } else {
            write!(f, "{}ns", self.nanos)
        }
    }
}
