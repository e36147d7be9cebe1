//! Countdown timers driven by simulation time.

use crate::Duration;
use std::fmt;
use tracing::debug;

/// Lifecycle of a [`ScheduledAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionStatus {
    /// Counting is suspended; `update` is ignored.
    Paused,
    /// Counting down.
    #[default]
    Active,
    /// Stopped before completion. Terminal until `reset`.
    Canceled,
    /// Wait elapsed and the callback ran. Terminal until `reset`.
    Complete,
}

/// A countdown timer driven by elapsed time, with an optional callback that
/// runs once when the wait runs out.
///
/// Time only passes through [`update`](Self::update), so the game loop decides
/// what "elapsed" means (real, scaled, or per-tick).
///
/// ```
/// use std::cell::Cell;
/// use tickwire::{ActionStatus, Duration, ScheduledAction};
///
/// let fired = Cell::new(false);
/// let mut respawn = ScheduledAction::with_action(Duration::from_millis(3.0), || fired.set(true));
///
/// respawn.update(Duration::from_millis(2.0));
/// assert_eq!(respawn.status(), ActionStatus::Active);
/// respawn.update(Duration::from_millis(2.0));
/// assert_eq!(respawn.status(), ActionStatus::Complete);
/// assert!(fired.get());
/// ```
pub struct ScheduledAction<F = fn()> {
    remaining: Duration,
    status: ActionStatus,
    action: Option<F>,
}

impl ScheduledAction {
    /// A timer with no callback.
    pub fn new(wait: Duration) -> Self {
        Self {
            remaining: wait,
            status: ActionStatus::Active,
            action: None,
        }
    }
}

impl<F: FnMut()> ScheduledAction<F> {
    /// A timer that runs `action` once `wait` has elapsed.
    pub fn with_action(wait: Duration, action: F) -> Self {
        Self {
            remaining: wait,
            status: ActionStatus::Active,
            action: Some(action),
        }
    }

    #[inline]
    pub fn status(&self) -> ActionStatus {
        self.status
    }

    /// Time left before completion.
    #[inline]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// `true` once completed or canceled.
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self.status, ActionStatus::Complete | ActionStatus::Canceled)
    }

    /// Suspends an active timer.
    pub fn pause(&mut self) {
        if self.status == ActionStatus::Active {
            self.status = ActionStatus::Paused;
        }
    }

    /// Continues a paused timer.
    pub fn resume(&mut self) {
        if self.status == ActionStatus::Paused {
            self.status = ActionStatus::Active;
        }
    }

    /// Stops the timer without running the callback. A completed timer stays
    /// complete.
    pub fn cancel(&mut self) {
        if self.status != ActionStatus::Complete {
            debug!(remaining = %self.remaining, "scheduled action canceled");
            self.status = ActionStatus::Canceled;
        }
    }

    /// Restarts the countdown from `wait`, whatever the current state.
    pub fn reset(&mut self, wait: Duration) {
        debug!(wait = %wait, previous = ?self.status, "scheduled action reset");
        self.remaining = wait;
        self.status = ActionStatus::Active;
    }

    /// Adds `additional` to the remaining wait without changing state.
    pub fn extend(&mut self, additional: Duration) {
        self.remaining += additional;
    }

    /// Counts `elapsed` off an active timer, completing it (and running the
    /// callback) when nothing remains.
    pub fn update(&mut self, elapsed: Duration) {
        if self.status != ActionStatus::Active {
            return;
        }

        self.remaining = self.remaining.saturating_sub(elapsed.max(Duration::ZERO));
        if self.remaining > Duration::ZERO {
            return;
        }

        self.status = ActionStatus::Complete;
        debug!("scheduled action complete");
        if let Some(action) = self.action.as_mut() {
            action();
        }
    }
}

impl<F> Default for ScheduledAction<F> {
    fn default() -> Self {
        Self {
            remaining: Duration::ZERO,
            status: ActionStatus::Active,
            action: None,
        }
    }
}

impl<F> fmt::Debug for ScheduledAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledAction")
            .field("remaining", &self.remaining)
            .field("status", &self.status)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}
