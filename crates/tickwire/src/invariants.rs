//! Debug assertion macros for cursor and buffer invariants.
//!
//! Only active in debug builds (`debug_assert!`), so release builds pay
//! nothing. Used by `DoubleBuffer`, `RingBuffer`, `Queue` and `SnapshotCache`.

// =============================================================================
// Monotonic Cursors
// =============================================================================

/// Assert that a cursor only moves forward.
///
/// **Invariant**: `new_value > old_value` for every published cursor
/// (`sequence`, `write_head`, `write_index`, `head`, `tail`). Cursors are
/// `u64` sequence numbers and never wrap in practice.
macro_rules! debug_assert_advances {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new > $old,
            "{} must advance: went from {} to {}",
            $name,
            $old,
            $new
        )
    };
}

// =============================================================================
// Bounded Occupancy
// =============================================================================

/// Assert that a queue never holds more than its capacity.
///
/// **Invariant**: `tail - head ≤ capacity` after a push has made room.
///
/// `head` may have been advanced by the consumer past the value observed here,
/// so only an upper bound is asserted.
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "occupancy {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

pub(crate) use debug_assert_advances;
pub(crate) use debug_assert_bounded_count;
