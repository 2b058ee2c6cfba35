// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal reactive cells: change-detecting sources and a memoized derivation.
//!
//! The placement pipeline is a two-level graph. Layout inputs are [`Signal`]s;
//! the resolved placement is a [`Memo`] that recomputes only after one of its
//! inputs reported a change. There is no subscription list: owners poll, which
//! keeps everything single-owner and `no_std`.

/// A source value that knows whether a write actually changed it.
///
/// Writing a value equal to the current one is not a change.
///
/// ```
/// use understory_popover::signal::Signal;
///
/// let mut s = Signal::new(1);
/// assert!(!s.set(1));
/// assert!(s.set(2));
/// assert_eq!(*s.get(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Signal<T> {
    value: T,
}

impl<T: PartialEq> Signal<T> {
    /// Create a signal holding `value`.
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store `value`, returning whether it differed from the previous one.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }
}

impl<T: PartialEq + Copy> Signal<T> {
    /// Copy out the current value.
    #[inline]
    pub fn value(&self) -> T {
        self.value
    }
}

/// A cached derived value.
///
/// The owner decides when the cache is stale (typically "some input signal
/// changed") and passes that to [`Memo::get_or_update`].
#[derive(Clone, Debug, Default)]
pub struct Memo<T> {
    cached: Option<T>,
    computations: u64,
}

impl<T: Copy> Memo<T> {
    /// An empty memo; the first read always computes.
    pub const fn new() -> Self {
        Self {
            cached: None,
            computations: 0,
        }
    }

    /// Return the cached value, recomputing it first when `stale` or empty.
    pub fn get_or_update(&mut self, stale: bool, compute: impl FnOnce() -> T) -> T {
        match self.cached {
            Some(v) if !stale => v,
            _ => {
                let v = compute();
                self.cached = Some(v);
                self.computations = self.computations.wrapping_add(1);
                v
            }
        }
    }

    /// How many times the derivation ran.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}
