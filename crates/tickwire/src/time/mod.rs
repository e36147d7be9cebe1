//! Deterministic simulation time.
//!
//! A [`Clock`] turns samples of a monotonic [`TimeSource`] into whole ticks of
//! a fixed [`Hertz`] rate, with a pausable, scalable speed. Each engine
//! iteration takes one [`Snapshot`] of the clock and stores it in a
//! [`SnapshotCache`] so events stamped with real time can be matched to the
//! frame they belong to.

mod clock;
mod duration;
mod hertz;
mod snapshot;
mod snapshot_cache;
mod source;

pub use clock::Clock;
pub use duration::Duration;
pub use hertz::Hertz;
pub use snapshot::Snapshot;
pub use snapshot_cache::{CacheMatchStatus, SnapshotCache};
pub use source::{ManualClock, SteadyClock, TimeSource};
