use super::Duration;
use crate::TimeError;

/// A tick frequency in whole cycles per second.
///
/// Always non-zero and at most `u16::MAX`; construction rejects anything
/// else.
///
/// ```
/// use tickwire::Hertz;
///
/// let rate = Hertz::new(60).unwrap();
/// assert!((rate.period().as_millis() - 16.666_666_666_7).abs() < 1e-6);
/// assert!(Hertz::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hertz {
    cycles: u16,
}

impl Hertz {
    /// Creates a frequency of `cycles` per second.
    pub fn new(cycles: u64) -> Result<Self, TimeError> {
        if cycles == 0 {
            return Err(TimeError::NonPositiveFrequency(0));
        }
        let cycles = u16::try_from(cycles).map_err(|_| TimeError::FrequencyOverflow(cycles))?;
        Ok(Self { cycles })
    }

    /// Cycles per second.
    #[inline]
    pub const fn cycles(self) -> u16 {
        self.cycles
    }

    /// Length of one cycle.
    #[inline]
    pub fn period(self) -> Duration {
        Duration::from_nanos(1e9 / f64::from(self.cycles))
    }
}

impl TryFrom<u64> for Hertz {
    type Error = TimeError;

    fn try_from(cycles: u64) -> Result<Self, Self::Error> {
        Self::new(cycles)
    }
}

impl TryFrom<i64> for Hertz {
    type Error = TimeError;

    fn try_from(cycles: i64) -> Result<Self, Self::Error> {
        if cycles <= 0 {
            return Err(TimeError::NonPositiveFrequency(cycles));
        }
        Self::new(cycles as u64)
    }
}

impl From<Hertz> for Duration {
    fn from(hertz: Hertz) -> Self {
        hertz.period()
    }
}
