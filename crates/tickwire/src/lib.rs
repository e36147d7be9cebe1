//! tickwire - Lock-free engine plumbing and deterministic simulation time
//!
//! Cache-aware single-writer containers for moving events between engine
//! threads, plus a pausable, scalable fixed-rate clock for driving a
//! deterministic simulation.
//!
//! # Key Features
//!
//! - Cache-line padded slots (128 bytes on x86_64/aarch64) against false sharing
//! - Tear-free [`DoubleBuffer`] for single-writer, many-reader values
//! - SPMC broadcast [`RingBuffer`] with lapping-aware consumer [`Cursor`]s
//! - SPSC [`Queue`] that overwrites the oldest entry instead of blocking
//! - [`Clock`] converting wall time into whole ticks at any time scale
//! - [`SnapshotCache`] mapping real timestamps back to simulation frames
//! - [`ScheduledAction`] countdown timers with pause / cancel / reset
//!
//! Every container is generic over the [`Atomic`] capability so the same code
//! runs on platform atomics, loom atomics, and scripted test doubles.
//!
//! # Example
//!
//! ```
//! use tickwire::{CacheMatchStatus, Clock, Duration, Hertz, Queue, SnapshotCache};
//!
//! #[derive(Debug, Clone, Copy, Default, PartialEq)]
//! enum Input {
//!     #[default]
//!     None,
//!     Jump { at: Duration },
//! }
//!
//! let (clock, time) = Clock::manual(Hertz::new(60).unwrap());
//! let snapshots = SnapshotCache::<16>::new();
//! let inputs = Queue::<Input, 64>::new();
//!
//! for _ in 0..4 {
//!     time.advance(Duration::from_millis(16.7));
//!     snapshots.push(clock.snapshot());
//! }
//! inputs.push(Input::Jump { at: Duration::from_millis(40.0) });
//!
//! if let Some(Input::Jump { at }) = inputs.pop_front() {
//!     let (snapshot, status) = snapshots.find_by_time(at);
//!     assert_eq!(status, CacheMatchStatus::Matched);
//!     assert_eq!(snapshot.frame, 2);
//! }
//! ```

mod atomic;
mod cacheline;
mod config;
mod double_buffer;
mod error;
mod invariants;
mod scheduled_action;
mod spmc;
mod spsc;
pub mod time;

#[cfg(test)]
pub(crate) mod testing;

pub use atomic::Atomic;
pub use cacheline::{CachelineSlot, CACHELINE_SIZE};
pub use config::{ClockConfig, FIXED_120HZ_CONFIG, FIXED_30HZ_CONFIG, FIXED_60HZ_CONFIG};
pub use double_buffer::{Buffer, DoubleBuffer};
pub use error::{RingBufferError, TimeError};
pub use scheduled_action::{ActionStatus, ScheduledAction};
pub use spmc::{Cursor, RingBuffer};
pub use spsc::Queue;
pub use time::{
    CacheMatchStatus, Clock, Duration, Hertz, ManualClock, Snapshot, SnapshotCache, SteadyClock,
    TimeSource,
};
