//! Error types for rejected arguments.
//!
//! Only programmer-error preconditions are errors. Eviction, overwrite and
//! stale cache lookups are ordinary outcomes and never show up here.

use thiserror::Error;

/// Errors from the time-keeping types.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimeError {
    /// Time scale was negative, NaN or infinite.
    #[error("invalid time scale {0}: must be finite and >= 0")]
    InvalidTimeScale(f64),

    /// A frequency of zero (or less) cycles per second.
    #[error("refusing to construct hertz with {0} cycles: must be greater than zero")]
    NonPositiveFrequency(i64),

    /// A frequency too large for the cycle counter.
    #[error("refusing to construct hertz with {0} cycles: exceeds {max}", max = u16::MAX)]
    FrequencyOverflow(u64),
}

impl TimeError {
    /// Returns `true` if this error came from `Clock::set_time_scale`.
    #[inline]
    pub fn is_time_scale(&self) -> bool {
        matches!(self, Self::InvalidTimeScale(_))
    }

    /// Returns `true` if this error came from constructing a `Hertz`.
    #[inline]
    pub fn is_frequency(&self) -> bool {
        matches!(
            self,
            Self::NonPositiveFrequency(_) | Self::FrequencyOverflow(_)
        )
    }
}

/// Errors from bounds-checked ring buffer access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingBufferError {
    /// A slot index at or beyond the ring's capacity.
    #[error("invalid argument: index {index} is not less than ring buffer capacity {capacity}")]
    IndexOutOfBounds {
        /// The rejected index.
        index: u64,
        /// Capacity of the ring buffer.
        capacity: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_error_classification() {
        assert!(TimeError::InvalidTimeScale(-1.0).is_time_scale());
        assert!(!TimeError::InvalidTimeScale(-1.0).is_frequency());
        assert!(TimeError::NonPositiveFrequency(0).is_frequency());
        assert!(TimeError::FrequencyOverflow(65_536).is_frequency());
    }

    #[test]
    fn test_messages_name_the_argument() {
        let msg = TimeError::FrequencyOverflow(70_000).to_string();
        assert!(msg.contains("70000"));
        assert!(msg.contains("65535"));

        let msg = RingBufferError::IndexOutOfBounds {
            index: 99,
            capacity: 2,
        }
        .to_string();
        assert!(msg.starts_with("invalid argument"));
        assert!(msg.contains("99"));
    }
}
