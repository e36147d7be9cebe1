//! Atomic capability used by every container in the crate.
//!
//! Containers are generic over [`Atomic<T>`] rather than hard-wiring
//! `std::sync::atomic` so the same code runs against the platform atomics in
//! production, loom's atomics under model checking, and deterministic fakes
//! or call-scripting mocks in protocol tests.

use std::sync::atomic::Ordering;

/// Load / store / weak CAS on a single machine word, with explicit ordering.
pub trait Atomic<T: Copy> {
    /// Creates a new atomic holding `value`.
    fn new(value: T) -> Self;

    /// Loads the current value.
    fn load(&self, order: Ordering) -> T;

    /// Stores `value`.
    fn store(&self, value: T, order: Ordering);

    /// Weak compare-and-swap: may fail spuriously.
    ///
    /// Returns `Ok(previous)` on success and `Err(observed)` on failure, the
    /// same contract as `std::sync::atomic::AtomicU64::compare_exchange_weak`.
    fn compare_exchange_weak(
        &self,
        current: T,
        new: T,
        success: Ordering,
        failure: Ordering,
    ) -> Result<T, T>;
}

macro_rules! impl_atomic {
    ($atomic:ty, $value:ty) => {
        impl Atomic<$value> for $atomic {
            #[inline]
            fn new(value: $value) -> Self {
                <$atomic>::new(value)
            }

            #[inline]
            fn load(&self, order: Ordering) -> $value {
                <$atomic>::load(self, order)
            }

            #[inline]
            fn store(&self, value: $value, order: Ordering) {
                <$atomic>::store(self, value, order)
            }

            #[inline]
            fn compare_exchange_weak(
                &self,
                current: $value,
                new: $value,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$value, $value> {
                <$atomic>::compare_exchange_weak(self, current, new, success, failure)
            }
        }
    };
}

impl_atomic!(std::sync::atomic::AtomicU64, u64);

#[cfg(feature = "loom")]
impl_atomic!(loom::sync::atomic::AtomicU64, u64);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;

    fn bump<A: Atomic<u64>>(atomic: &A) -> u64 {
        let current = atomic.load(Ordering::Acquire);
        atomic.store(current + 1, Ordering::Release);
        atomic.load(Ordering::Acquire)
    }

    #[test]
    fn test_std_atomic_through_trait() {
        let atomic = <AtomicU64 as Atomic<u64>>::new(41);
        assert_eq!(bump(&atomic), 42);
    }

    #[test]
    fn test_compare_exchange_reports_observed_value() {
        let atomic = <AtomicU64 as Atomic<u64>>::new(1);
        let result =
            Atomic::compare_exchange_weak(&atomic, 0, 5, Ordering::Release, Ordering::Acquire);
        assert_eq!(result, Err(1));
        assert_eq!(Atomic::load(&atomic, Ordering::Acquire), 1);
    }
}
