//! Test doubles for the [`Atomic`] and [`Buffer`] capabilities.
//!
//! - [`FakeAtomic`]: single-threaded atomic that ignores orderings.
//! - [`FakeBuffer`]: plain cell standing in for a double buffer.
//! - [`ScriptedAtomic`]: strict mock. Every call is checked, in order,
//!   against a per-thread script of expected calls shared by all
//!   `ScriptedAtomic` instances (so `head` and `tail` of one queue interleave
//!   in the same script).

use crate::{Atomic, Buffer};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::atomic::Ordering;

// =============================================================================
// FAKES
// =============================================================================

#[derive(Debug, Default)]
pub(crate) struct FakeAtomic<T: Copy> {
    value: Cell<T>,
}

impl<T: Copy + PartialEq> Atomic<T> for FakeAtomic<T> {
    fn new(value: T) -> Self {
        Self {
            value: Cell::new(value),
        }
    }

    fn load(&self, _order: Ordering) -> T {
        self.value.get()
    }

    fn store(&self, value: T, _order: Ordering) {
        self.value.set(value);
    }

    fn compare_exchange_weak(
        &self,
        current: T,
        new: T,
        _success: Ordering,
        _failure: Ordering,
    ) -> Result<T, T> {
        let observed = self.value.get();
        if observed == current {
            self.value.set(new);
            Ok(observed)
        } else {
            Err(observed)
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeBuffer<T: Copy> {
    value: Cell<T>,
}

impl<T: Copy> Buffer<T> for FakeBuffer<T> {
    fn read(&self) -> T {
        self.value.get()
    }

    fn write(&self, value: T) {
        self.value.set(value);
    }
}

// =============================================================================
// SCRIPTED MOCK
// =============================================================================

/// One expected call on a [`ScriptedAtomic`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Call {
    Load {
        order: Ordering,
        returns: u64,
    },
    Store {
        value: u64,
        order: Ordering,
    },
    CompareExchangeWeak {
        current: u64,
        new: u64,
        success: Ordering,
        failure: Ordering,
        returns: Result<u64, u64>,
    },
}

thread_local! {
    static SCRIPT: RefCell<VecDeque<Call>> = const { RefCell::new(VecDeque::new()) };
}

/// Appends calls to this thread's script.
pub(crate) fn expect(calls: impl IntoIterator<Item = Call>) {
    SCRIPT.with(|script| script.borrow_mut().extend(calls));
}

/// Asserts every scripted call was consumed, then clears the script.
pub(crate) fn verify() {
    let leftover = SCRIPT.with(|script| script.borrow_mut().drain(..).collect::<Vec<_>>());
    assert!(leftover.is_empty(), "unconsumed scripted calls: {leftover:?}");
}

fn next_call() -> Call {
    SCRIPT
        .with(|script| script.borrow_mut().pop_front())
        .unwrap_or_else(|| panic!("unexpected atomic call: script exhausted"))
}

#[derive(Debug, Default)]
pub(crate) struct ScriptedAtomic;

impl ScriptedAtomic {
    fn scripted_load(order: Ordering) -> u64 {
        match next_call() {
            Call::Load {
                order: expected,
                returns,
            } => {
                assert_eq!(order, expected, "load ordering");
                returns
            }
            other => panic!("expected {other:?}, got load({order:?})"),
        }
    }

    fn scripted_store(value: u64, order: Ordering) {
        match next_call() {
            Call::Store {
                value: expected_value,
                order: expected_order,
            } => {
                assert_eq!(value, expected_value, "stored value");
                assert_eq!(order, expected_order, "store ordering");
            }
            other => panic!("expected {other:?}, got store({value}, {order:?})"),
        }
    }

    fn scripted_cas(current: u64, new: u64, success: Ordering, failure: Ordering) -> Result<u64, u64> {
        match next_call() {
            Call::CompareExchangeWeak {
                current: expected_current,
                new: expected_new,
                success: expected_success,
                failure: expected_failure,
                returns,
            } => {
                assert_eq!(current, expected_current, "CAS current");
                assert_eq!(new, expected_new, "CAS new");
                assert_eq!(success, expected_success, "CAS success ordering");
                assert_eq!(failure, expected_failure, "CAS failure ordering");
                returns
            }
            other => panic!("expected {other:?}, got compare_exchange_weak({current}, {new})"),
        }
    }
}

impl Atomic<u64> for ScriptedAtomic {
    fn new(_value: u64) -> Self {
        Self
    }

    fn load(&self, order: Ordering) -> u64 {
        Self::scripted_load(order)
    }

    fn store(&self, value: u64, order: Ordering) {
        Self::scripted_store(value, order);
    }

    fn compare_exchange_weak(
        &self,
        current: u64,
        new: u64,
        success: Ordering,
        failure: Ordering,
    ) -> Result<u64, u64> {
        Self::scripted_cas(current, new, success, failure)
    }
}

/// Shorthand for an expected `load`.
pub(crate) fn load(order: Ordering, returns: u64) -> Call {
    Call::Load { order, returns }
}

/// Shorthand for an expected `store`.
pub(crate) fn store(value: u64, order: Ordering) -> Call {
    Call::Store { value, order }
}
