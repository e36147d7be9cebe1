//! Single-producer, multi-consumer broadcast ring.
//!
//! [`RingBuffer`] keeps the last `N` entries; every [`Cursor`] walks them at
//! its own pace and skips ahead when the producer laps it.

use crate::invariants::debug_assert_advances;
use crate::{Atomic, Buffer, CachelineSlot, DoubleBuffer, RingBufferError};
use crossbeam_utils::Backoff;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

// =============================================================================
// MEMORY ORDERING
// =============================================================================
//
// `write_head` is an unbounded u64 sequence; the slot for sequence `s` is
// `s mod N`. Only the producer writes it.
//
// **Producer:**
// 1. Load `write_head` with Relaxed (only the producer writes it)
// 2. `Buffer::write` into slot `write_head mod N` (tear-free per slot)
// 3. Store `write_head + 1` with Release (publishes the slot)
//
// **Consumers (any number):**
// 1. Load `write_head` with Acquire (pairs with the producer's Release)
// 2. `Buffer::read` any slot below it
//
// Nothing stops the producer from lapping a consumer. Entries older than
// `write_head - N` are gone; a `Cursor` notices and skips ahead.
//
// =============================================================================

/// Single-producer, multi-consumer broadcast ring.
///
/// Every consumer sees every entry that is still inside the last `N` writes;
/// the producer never waits. Slots are [`Buffer`]s (a [`DoubleBuffer`] by
/// default), so a read never observes a half-written value.
///
/// ```
/// use tickwire::RingBuffer;
///
/// let ring = RingBuffer::<u32, 4>::new();
/// let mut cursor = ring.cursor();
/// ring.push(1);
/// ring.push(2);
/// assert_eq!(cursor.next(), Some(1));
/// assert_eq!(cursor.next(), Some(2));
/// assert_eq!(cursor.next(), None);
/// ```
pub struct RingBuffer<T, const N: usize, A = AtomicU64, B = DoubleBuffer<T>> {
    write_head: CachelineSlot<A>,
    slots: Box<[B]>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, const N: usize, A, B> RingBuffer<T, N, A, B>
where
    T: Copy,
    A: Atomic<u64>,
    B: Buffer<T> + Default,
{
    const NON_EMPTY: () = assert!(N > 0, "RingBuffer capacity must be non-zero");

    /// Creates a ring with every slot holding `B::default()`.
    pub fn new() -> Self {
        let () = Self::NON_EMPTY;
        Self {
            write_head: CachelineSlot::new(A::new(0)),
            slots: (0..N).map(|_| B::default()).collect(),
            _marker: PhantomData,
        }
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Publishes `value`, overwriting the entry `N` writes back.
    #[inline]
    pub fn push(&self, value: T) {
        let head = self.write_head.load(Ordering::Relaxed);
        self.slot(head).write(value);

        let next = head + 1;
        debug_assert_advances!("write_head", head, next);
        self.write_head.store(next, Ordering::Release);
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Total number of entries ever pushed.
    #[inline]
    pub fn write_head(&self) -> u64 {
        self.write_head.load(Ordering::Acquire)
    }

    /// Reads slot `index mod N`.
    ///
    /// # Panics
    ///
    /// With the `sanity-checks` feature, panics if `index >= N`.
    #[inline]
    pub fn read(&self, index: u64) -> T {
        #[cfg(feature = "sanity-checks")]
        if let Err(err) = self.check_index(index) {
            panic!("{err}");
        }
        self.slot(index).read()
    }

    /// Reads slot `index`, rejecting indices outside `0..N`.
    pub fn checked_read(&self, index: u64) -> Result<T, RingBufferError> {
        self.check_index(index)?;
        Ok(self.slot(index).read())
    }

    /// Number of slots.
    #[inline]
    pub const fn capacity(&self) -> u64 {
        N as u64
    }

    /// A consumer that will see only entries pushed from now on.
    pub fn cursor(&self) -> Cursor<'_, T, N, A, B> {
        self.cursor_at(self.write_head())
    }

    /// A consumer starting at sequence `position`.
    ///
    /// A position older than the live window is caught up on first read.
    pub fn cursor_at(&self, position: u64) -> Cursor<'_, T, N, A, B> {
        Cursor {
            ring: self,
            position,
            missed: 0,
        }
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn slot(&self, sequence: u64) -> &B {
        &self.slots[(sequence % N as u64) as usize]
    }

    fn check_index(&self, index: u64) -> Result<(), RingBufferError> {
        if index >= self.capacity() {
            return Err(RingBufferError::IndexOutOfBounds {
                index,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}

impl<T, const N: usize, A, B> Default for RingBuffer<T, N, A, B>
where
    T: Copy,
    A: Atomic<u64>,
    B: Buffer<T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize, A, B> fmt::Debug for RingBuffer<T, N, A, B>
where
    T: Copy,
    A: Atomic<u64>,
    B: Buffer<T> + Default,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &N)
            .field("write_head", &self.write_head())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// CURSOR
// =============================================================================

/// A consumer's private read position in a [`RingBuffer`].
///
/// Cursors never block the producer or each other. If the producer laps a
/// cursor, the next read jumps to the oldest entry still live and the skipped
/// count is added to [`missed`](Cursor::missed).
pub struct Cursor<'a, T, const N: usize, A = AtomicU64, B = DoubleBuffer<T>> {
    ring: &'a RingBuffer<T, N, A, B>,
    position: u64,
    missed: u64,
}

impl<T, const N: usize, A, B> Cursor<'_, T, N, A, B>
where
    T: Copy,
    A: Atomic<u64>,
    B: Buffer<T> + Default,
{
    /// Sequence of the next entry this cursor will read.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Entries overwritten before this cursor could read them.
    #[inline]
    pub fn missed(&self) -> u64 {
        self.missed
    }

    /// Entries readable right now, at most `N`.
    pub fn pending(&self) -> u64 {
        self.ring
            .write_head()
            .saturating_sub(self.position)
            .min(self.ring.capacity())
    }

    /// Like [`Iterator::next`], but spins and yields for a bounded while
    /// before reporting that nothing arrived.
    pub fn next_with_backoff(&mut self) -> Option<T> {
        let backoff = Backoff::new();
        loop {
            if let Some(value) = self.next() {
                return Some(value);
            }
            if backoff.is_completed() {
                return None;
            }
            backoff.snooze();
        }
    }

    fn skip_lapped(&mut self, head: u64) {
        let oldest = head.saturating_sub(self.ring.capacity());
        if self.position < oldest {
            let skipped = oldest - self.position;
            debug!(
                position = self.position,
                write_head = head,
                skipped,
                "cursor lapped by producer"
            );
            self.missed += skipped;
            self.position = oldest;
        }
    }
}

impl<T, const N: usize, A, B> Iterator for Cursor<'_, T, N, A, B>
where
    T: Copy,
    A: Atomic<u64>,
    B: Buffer<T> + Default,
{
    type Item = T;

    /// Reads the next entry, or `None` when caught up with the producer.
    fn next(&mut self) -> Option<T> {
        loop {
            let head = self.ring.write_head();
            if self.position >= head {
                return None;
            }
            self.skip_lapped(head);

            let value = self.ring.slot(self.position).read();

            // The producer may have reused the slot while it was being read.
            if self.ring.write_head() - self.position > self.ring.capacity() {
                continue;
            }

            self.position += 1;
            return Some(value);
        }
    }
}

impl<T, const N: usize, A, B> fmt::Debug for Cursor<'_, T, N, A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("missed", &self.missed)
            .finish_non_exhaustive()
    }
}
