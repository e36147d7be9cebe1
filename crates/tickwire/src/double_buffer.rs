//! Single-writer, multi-reader value cell built from two cache-line slots.
//!
//! The [`Buffer`] trait is the seam the ring buffer and snapshot cache store
//! their entries through; [`DoubleBuffer`] is the production implementation.

use crate::invariants::debug_assert_advances;
use crate::{Atomic, CachelineSlot};
use crossbeam_utils::Backoff;
use std::cell::UnsafeCell;
use std::fmt;
use std::ptr;
use std::sync::atomic::{fence, AtomicU64, Ordering};

// =============================================================================
// MEMORY ORDERING
// =============================================================================
//
// Two slots and a u64 publish sequence. The readable slot is `sequence & 1`.
//
// **Writer:**
// 1. Load `sequence` with Acquire (value `s`)
// 2. Release fence (the store of `s` is visible before any slot byte changes)
// 3. Copy the value into slot `(s + 1) & 1`
// 4. Store `s + 1` with Release (publishes the slot)
//
// **Reader:**
// 1. Load `sequence` with Acquire (value `s1`, pairs with step 4)
// 2. Copy slot `s1 & 1`
// 3. Acquire fence, then load `sequence` again (value `s2`)
// 4. If `s2 != s1`, retry
//
// Slot `s1 & 1` is next rewritten for sequence `s1 + 2`, and that write only
// starts after `s1 + 1` is visible. A reader that still sees `s1` after its
// copy therefore copied a slot nobody touched. A reader never blocks the
// writer; it only retries when a publish lands during its copy.
//
// =============================================================================

/// Capability of a single-writer, multi-reader value cell.
pub trait Buffer<T> {
    /// Returns a copy of the most recently published value.
    fn read(&self) -> T;

    /// Publishes `value`. Only one thread may write.
    fn write(&self, value: T);
}

/// Tear-free single-writer, multi-reader cell.
///
/// The writer fills the slot readers are not using and flips a sequence
/// number to publish it. A reader that was overtaken mid-copy notices the
/// sequence moved and copies again, so a read is always one whole published
/// value.
///
/// ```
/// use tickwire::{Buffer, DoubleBuffer};
///
/// let buffer = DoubleBuffer::new((0u32, 0u32));
/// buffer.write((1, 1));
/// assert_eq!(buffer.read(), (1, 1));
/// ```
pub struct DoubleBuffer<T, A = AtomicU64> {
    slots: [CachelineSlot<UnsafeCell<T>>; 2],
    sequence: CachelineSlot<A>,
}

// Safety: slots are only written by the single writer into the slot readers
// are not directed to, and every read is validated against `sequence` before
// its copy is returned.
unsafe impl<T: Copy + Send, A: Send> Send for DoubleBuffer<T, A> {}
unsafe impl<T: Copy + Send, A: Sync> Sync for DoubleBuffer<T, A> {}

impl<T: Copy> DoubleBuffer<T> {
    /// Creates a buffer with both slots holding `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_atomic(initial)
    }
}

impl<T: Copy, A: Atomic<u64>> DoubleBuffer<T, A> {
    /// Creates a buffer over a chosen [`Atomic`] implementation.
    pub fn with_atomic(initial: T) -> Self {
        Self {
            slots: [
                CachelineSlot::new(UnsafeCell::new(initial)),
                CachelineSlot::new(UnsafeCell::new(initial)),
            ],
            sequence: CachelineSlot::new(A::new(0)),
        }
    }

    /// Number of values published so far.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }

    #[inline]
    fn slot(&self, sequence: u64) -> *mut T {
        self.slots[(sequence & 1) as usize].get()
    }
}

impl<T: Copy, A: Atomic<u64>> Buffer<T> for DoubleBuffer<T, A> {
    #[inline]
    fn read(&self) -> T {
        let backoff = Backoff::new();
        loop {
            let before = self.sequence.load(Ordering::Acquire);
            // SAFETY: the pointer is valid for the buffer's lifetime. The copy
            // may overlap a write; it is discarded below unless `sequence`
            // shows no publish happened while it was taken.
            let value = unsafe { ptr::read_volatile(self.slot(before)) };
            fence(Ordering::Acquire);
            if self.sequence.load(Ordering::Relaxed) == before {
                return value;
            }
            backoff.spin();
        }
    }

    #[inline]
    fn write(&self, value: T) {
        let current = self.sequence.load(Ordering::Acquire);
        let next = current.wrapping_add(1);
        fence(Ordering::Release);
        // SAFETY: single writer; readers validate their copies against
        // `sequence`, which already shows `current` published.
        unsafe { ptr::write_volatile(self.slot(next), value) };
        debug_assert_advances!("sequence", current, next);
        self.sequence.store(next, Ordering::Release);
    }
}

impl<T: Copy + Default, A: Atomic<u64>> Default for DoubleBuffer<T, A> {
    fn default() -> Self {
        Self::with_atomic(T::default())
    }
}

impl<T: Copy + fmt::Debug, A: Atomic<u64>> fmt::Debug for DoubleBuffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleBuffer")
            .field("value", &self.read())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, load, store, FakeAtomic, ScriptedAtomic};

    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    struct Pair {
        a: i32,
        b: i32,
    }

    #[test]
    fn test_default_is_readable() {
        let buffer = DoubleBuffer::<Pair>::default();
        assert_eq!(buffer.read(), Pair::default());
        assert_eq!(buffer.sequence(), 0);
    }

    #[test]
    fn test_new_seeds_both_slots() {
        let buffer = DoubleBuffer::<Pair, FakeAtomic<u64>>::with_atomic(Pair { a: 7, b: 8 });
        assert_eq!(buffer.read(), Pair { a: 7, b: 8 });
        buffer.sequence.store(1, Ordering::Relaxed);
        assert_eq!(buffer.read(), Pair { a: 7, b: 8 });
    }

    #[test]
    fn test_read_returns_last_write() {
        let buffer = DoubleBuffer::new(Pair::default());
        for i in 0..10 {
            buffer.write(Pair { a: i, b: -i });
            assert_eq!(buffer.read(), Pair { a: i, b: -i });
            assert_eq!(buffer.read(), Pair { a: i, b: -i });
        }
        assert_eq!(buffer.sequence(), 10);
    }

    #[test]
    fn test_write_alternates_slots() {
        let buffer = DoubleBuffer::<u32, FakeAtomic<u64>>::default();
        buffer.write(1);
        buffer.write(2);
        assert_eq!(buffer.sequence(), 2);
        assert_eq!(unsafe { *buffer.slot(1) }, 1);
        assert_eq!(unsafe { *buffer.slot(2) }, 2);
        assert_eq!(buffer.read(), 2);
    }

    // ---------------------------------------------------------------------
    // PROTOCOL (scripted atomics)
    // ---------------------------------------------------------------------

    #[test]
    fn test_read_validates_sequence_after_copy() {
        let buffer = DoubleBuffer::<u32, ScriptedAtomic>::with_atomic(5);
        testing::expect([load(Ordering::Acquire, 0), load(Ordering::Relaxed, 0)]);
        assert_eq!(buffer.read(), 5);
        testing::verify();
    }

    #[test]
    fn test_write_publishes_next_sequence_with_release() {
        let buffer = DoubleBuffer::<u32, ScriptedAtomic>::with_atomic(0);

        testing::expect([load(Ordering::Acquire, 0), store(1, Ordering::Release)]);
        buffer.write(10);
        testing::verify();

        testing::expect([load(Ordering::Acquire, 1), load(Ordering::Relaxed, 1)]);
        assert_eq!(buffer.read(), 10);
        testing::verify();

        testing::expect([load(Ordering::Acquire, 1), store(2, Ordering::Release)]);
        buffer.write(20);
        testing::verify();

        testing::expect([load(Ordering::Acquire, 2), load(Ordering::Relaxed, 2)]);
        assert_eq!(buffer.read(), 20);
        testing::verify();
    }

    #[test]
    fn test_overtaken_read_retries_on_new_slot() {
        let scripted = DoubleBuffer::<u32, ScriptedAtomic>::with_atomic(0);
        unsafe {
            *scripted.slot(1) = 10;
            *scripted.slot(2) = 20;
        }

        // copied slot 1 while the writer published 2 and then 3
        testing::expect([
            load(Ordering::Acquire, 1),
            load(Ordering::Relaxed, 3),
            load(Ordering::Acquire, 2),
            load(Ordering::Relaxed, 2),
        ]);
        assert_eq!(scripted.read(), 20);
        testing::verify();

        // a single publish during the copy also forces a retry
        testing::expect([
            load(Ordering::Acquire, 1),
            load(Ordering::Relaxed, 2),
            load(Ordering::Acquire, 2),
            load(Ordering::Relaxed, 2),
        ]);
        assert_eq!(scripted.read(), 20);
        testing::verify();
    }

    #[test]
    fn test_slots_are_cacheline_separated() {
        let buffer = DoubleBuffer::<u8>::default();
        let first = buffer.slots[0].get() as usize;
        let second = buffer.slots[1].get() as usize;
        assert!(second - first >= crate::CACHELINE_SIZE);
    }
}
