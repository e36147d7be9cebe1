//! Ring of recent clock snapshots, searchable by real time.
//!
//! Lookups start at the newest entry and walk backwards, since events are
//! usually matched against the last few frames.

use super::{Duration, Snapshot};
use crate::invariants::debug_assert_advances;
use crate::{Atomic, Buffer, CachelineSlot, DoubleBuffer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// How a [`SnapshotCache`] lookup relates to what the cache holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CacheMatchStatus {
    /// The returned snapshot covers the query.
    Matched,
    /// The query is newer than anything cached; the newest snapshot is
    /// returned. An empty cache also reports this.
    Ahead,
    /// The query is older than anything cached; the oldest snapshot is
    /// returned.
    Evicted,
}

/// Fixed-size history of clock [`Snapshot`]s.
///
/// The game loop pushes one snapshot per iteration; any number of readers
/// look up the snapshot in effect at a given real time (to stamp input or
/// network events with a frame) or at a given frame. Same single-writer
/// protocol as [`RingBuffer`](crate::RingBuffer): the writer publishes
/// `write_index` with Release, readers Acquire it, and each slot is a
/// tear-free [`Buffer`].
pub struct SnapshotCache<const N: usize, B = DoubleBuffer<Snapshot>, A = AtomicU64> {
    slots: Box<[CachelineSlot<B>]>,
    write_index: CachelineSlot<A>,
}

impl<const N: usize, B, A> SnapshotCache<N, B, A>
where
    B: Buffer<Snapshot> + Default,
    A: Atomic<u64>,
{
    const NON_EMPTY: () = assert!(N > 0, "SnapshotCache capacity must be non-zero");

    pub fn new() -> Self {
        let () = Self::NON_EMPTY;
        Self {
            slots: (0..N).map(|_| CachelineSlot::new(B::default())).collect(),
            write_index: CachelineSlot::new(A::new(0)),
        }
    }

    /// Number of slots.
    #[inline]
    pub const fn capacity(&self) -> u64 {
        N as u64
    }

    /// Total number of snapshots ever pushed.
    #[inline]
    pub fn write_index(&self) -> u64 {
        self.write_index.load(Ordering::Acquire)
    }

    /// Number of snapshots currently held, at most `N`.
    #[inline]
    pub fn len(&self) -> u64 {
        self.write_index().min(self.capacity())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.write_index() == 0
    }

    /// Records `snapshot`, evicting the oldest once the cache is full.
    pub fn push(&self, snapshot: Snapshot) {
        let index = self.write_index.load(Ordering::Acquire);
        self.slot(index).write(snapshot);

        let next = index + 1;
        debug_assert_advances!("write_index", index, next);
        self.write_index.store(next, Ordering::Release);
    }

    /// Newest snapshot taken at or before `real_time`.
    ///
    /// If every cached snapshot is newer than `real_time`, returns the oldest
    /// with [`CacheMatchStatus::Evicted`].
    pub fn find_by_time(&self, real_time: Duration) -> (Snapshot, CacheMatchStatus) {
        let write_index = self.write_index();
        let Some(window) = self.window(write_index) else {
            return (Snapshot::default(), CacheMatchStatus::Ahead);
        };

        if let Some(snapshot) = window
            .clone()
            .rev()
            .map(|sequence| self.slot(sequence).read())
            .find(|snapshot| snapshot.real_time <= real_time)
        {
            return (snapshot, CacheMatchStatus::Matched);
        }

        let oldest = self.slot(window.start).read();
        trace!(query = %real_time, oldest = %oldest.real_time, "snapshot evicted");
        (oldest, CacheMatchStatus::Evicted)
    }

    /// Snapshot for `frame`.
    ///
    /// A frame past the newest snapshot returns the newest with
    /// [`CacheMatchStatus::Ahead`]; one before the oldest returns the oldest
    /// with [`CacheMatchStatus::Evicted`]. When pushes skipped frames, the
    /// newest snapshot at or before `frame` is the match.
    pub fn find_by_frame(&self, frame: u64) -> (Snapshot, CacheMatchStatus) {
        let write_index = self.write_index();
        let Some(window) = self.window(write_index) else {
            return (Snapshot::default(), CacheMatchStatus::Ahead);
        };

        let newest = self.slot(window.end - 1).read();
        if newest.frame < frame {
            trace!(query = frame, newest = newest.frame, "frame ahead of cache");
            return (newest, CacheMatchStatus::Ahead);
        }

        let oldest = self.slot(window.start).read();
        if oldest.frame > frame {
            trace!(query = frame, oldest = oldest.frame, "frame evicted");
            return (oldest, CacheMatchStatus::Evicted);
        }

        // one snapshot per frame puts `frame` in slot `frame mod N`
        if frame % self.capacity() < window.end - window.start {
            let direct = self.slot(frame).read();
            if direct.frame == frame {
                return (direct, CacheMatchStatus::Matched);
            }
        }

        let snapshot = window
            .rev()
            .map(|sequence| self.slot(sequence).read())
            .find(|snapshot| snapshot.frame <= frame)
            .unwrap_or(oldest);
        (snapshot, CacheMatchStatus::Matched)
    }

    /// Sequences of the live entries, oldest first. `None` when empty.
    #[inline]
    fn window(&self, write_index: u64) -> Option<std::ops::Range<u64>> {
        if write_index == 0 {
            return None;
        }
        Some(write_index.saturating_sub(self.capacity())..write_index)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn slot(&self, sequence: u64) -> &B {
        &self.slots[(sequence % N as u64) as usize]
    }
}

impl<const N: usize, B, A> Default for SnapshotCache<N, B, A>
where
    B: Buffer<Snapshot> + Default,
    A: Atomic<u64>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, B, A> fmt::Debug for SnapshotCache<N, B, A>
where
    B: Buffer<Snapshot> + Default,
    A: Atomic<u64>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("capacity", &N)
            .field("write_index", &self.write_index())
            .finish_non_exhaustive()
    }
}
