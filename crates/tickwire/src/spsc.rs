//! Bounded single-producer, single-consumer queue with overwrite-oldest.
//!
//! The producer never waits: pushing into a full queue evicts the oldest
//! entry. Both sides move `head` only by compare-and-swap, so an eviction and
//! a pop can never both claim the same entry.

use crate::invariants::{debug_assert_advances, debug_assert_bounded_count};
use crate::{Atomic, CachelineSlot};
use std::cell::UnsafeCell;
use std::fmt;
use std::ptr;
use std::sync::atomic::{fence, AtomicU64, Ordering};
use tracing::trace;

// =============================================================================
// MEMORY ORDERING & OVERWRITE PROTOCOL
// =============================================================================
//
// `head` and `tail` are unbounded u64 sequences; slot index is `seq mod N`.
// The producer owns `tail`. `head` is advanced by the consumer when it pops
// and by the producer when it evicts, always from an observed value `h` to
// `h + 1` by CAS, so `head` never moves backwards and each entry is claimed
// by exactly one side.
//
// **Producer (push):**
// 1. Load `tail` with Acquire
// 2. Load `head` with Acquire
// 3. If `tail - head >= N`, CAS `head` -> `head + 1` (Release / Acquire).
//    On failure the CAS reports the head it saw. If that is already
//    `>= head + 1`, the consumer popped in the meantime and room exists, so
//    the loop stops without evicting anything more. Otherwise (spurious
//    failure) it retries.
// 4. Release fence, then write slot `tail mod N`
// 5. Store `tail + 1` with Release (publishes the slot)
//
// **Consumer (pop_front):**
// 1. Load `head` with Acquire, load `tail` with Acquire; equal means empty
// 2. Copy slot `head mod N`
// 3. CAS `head` -> `head + 1` (Release / Acquire). Success means the copy
//    was taken before the producer could reuse the slot. Failure means the
//    producer evicted this entry first; the copy is dropped and the pop
//    starts over from the new head.
//
// `front` copies the head slot and re-checks `head` after an Acquire fence;
// if it moved, the slot may have been reused and the copy is retaken.
//
// =============================================================================

/// Bounded single-producer, single-consumer FIFO that overwrites the oldest
/// entry instead of rejecting a push when full.
///
/// ```
/// use tickwire::Queue;
///
/// let queue = Queue::<u32, 2>::new();
/// queue.push(1);
/// queue.push(2);
/// queue.push(3); // evicts 1
/// assert_eq!(queue.pop_front(), Some(2));
/// assert_eq!(queue.pop_front(), Some(3));
/// assert!(queue.empty());
/// ```
pub struct Queue<T, const N: usize, A = AtomicU64> {
    head: CachelineSlot<A>,
    tail: CachelineSlot<A>,
    slots: Box<[CachelineSlot<UnsafeCell<T>>]>,
}

// Safety: one producer writes slots and publishes them with a Release store
// of `tail`; one consumer reads `T: Copy` values after an Acquire load.
unsafe impl<T: Copy + Send, const N: usize, A: Send> Send for Queue<T, N, A> {}
unsafe impl<T: Copy + Send, const N: usize, A: Sync> Sync for Queue<T, N, A> {}

impl<T: Copy + Default, const N: usize, A: Atomic<u64>> Queue<T, N, A> {
    const NON_EMPTY: () = assert!(N > 0, "Queue capacity must be non-zero");

    /// Creates an empty queue with every slot holding `T::default()`.
    pub fn new() -> Self {
        let () = Self::NON_EMPTY;
        Self {
            head: CachelineSlot::new(A::new(0)),
            tail: CachelineSlot::new(A::new(0)),
            slots: (0..N)
                .map(|_| CachelineSlot::new(UnsafeCell::new(T::default())))
                .collect(),
        }
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Number of slots.
    #[inline]
    pub const fn capacity(&self) -> u64 {
        N as u64
    }

    /// Returns `true` if nothing is queued.
    #[inline]
    pub fn empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Number of queued entries, never more than [`capacity`](Self::capacity).
    ///
    /// `head` is sampled before `tail`, so a push or eviction racing with this
    /// call can only make the count look larger, and it is clamped to `N`.
    #[inline]
    pub fn size(&self) -> u64 {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        tail.saturating_sub(head).min(self.capacity())
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Appends `value`, evicting the oldest entry if the queue is full.
    pub fn push(&self, value: T) {
        let tail = self.tail.load(Ordering::Acquire);
        let mut head = self.head.load(Ordering::Acquire);

        if tail.saturating_sub(head) >= self.capacity() {
            let desired = head + 1;
            head = loop {
                match self.head.compare_exchange_weak(
                    head,
                    desired,
                    Ordering::Release,
                    Ordering::Acquire,
                ) {
                    Ok(evicted) => {
                        trace!(evicted, "queue full, dropped oldest entry");
                        break desired;
                    }
                    Err(observed) if observed < desired => head = observed,
                    Err(observed) => {
                        trace!(head = observed, "consumer made room during push");
                        break observed;
                    }
                }
            };
        }

        fence(Ordering::Release);
        // SAFETY: only the producer writes slots; the slot at `tail` is
        // outside `[head, tail)` until the store below publishes it. A
        // consumer still copying an evicted entry discards that copy.
        unsafe { ptr::write_volatile(self.slot(tail), value) };

        let next = tail + 1;
        debug_assert_advances!("tail", tail, next);
        debug_assert_bounded_count!(next.saturating_sub(head), self.capacity());
        self.tail.store(next, Ordering::Release);
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Copy of the oldest entry.
    ///
    /// On an empty queue this is whatever the head slot last held, which is
    /// `T::default()` for a slot that was never written.
    pub fn front(&self) -> T {
        loop {
            let head = self.head.load(Ordering::Acquire);
            let value = self.copy_slot(head);
            fence(Ordering::Acquire);
            if self.head.load(Ordering::Relaxed) == head {
                return value;
            }
        }
    }

    /// Drops the oldest entry. Does nothing on an empty queue.
    ///
    /// If an overflowing push evicts the oldest entry first, that eviction
    /// counts as the drop.
    #[inline]
    pub fn pop(&self) {
        let head = self.head.load(Ordering::Acquire);
        if head == self.tail.load(Ordering::Acquire) {
            return;
        }
        self.try_advance_head(head);
    }

    /// Removes and returns the oldest entry, or `None` if empty.
    pub fn pop_front(&self) -> Option<T> {
        loop {
            let head = self.head.load(Ordering::Acquire);
            if head == self.tail.load(Ordering::Acquire) {
                return None;
            }
            let value = self.copy_slot(head);
            if self.try_advance_head(head) {
                return Some(value);
            }
        }
    }

    /// Claims the entry at `head` for the consumer.
    ///
    /// Returns `false` if the producer evicted it first.
    fn try_advance_head(&self, head: u64) -> bool {
        let next = head + 1;
        debug_assert_advances!("head", head, next);
        loop {
            match self.head.compare_exchange_weak(
                head,
                next,
                Ordering::Release,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) if observed == head => {}
                Err(observed) => {
                    trace!(head, observed, "entry evicted before pop");
                    return false;
                }
            }
        }
    }

    #[inline]
    fn copy_slot(&self, sequence: u64) -> T {
        // SAFETY: the pointer is valid for the queue's lifetime. A copy that
        // overlaps the producer reusing the slot is discarded by the caller's
        // check of `head`.
        unsafe { ptr::read_volatile(self.slot(sequence)) }
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn slot(&self, sequence: u64) -> *mut T {
        self.slots[(sequence % N as u64) as usize].get()
    }
}

impl<T: Copy + Default, const N: usize, A: Atomic<u64>> Default for Queue<T, N, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default, const N: usize, A: Atomic<u64>> fmt::Debug for Queue<T, N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("capacity", &N)
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}
