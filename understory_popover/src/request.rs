// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popover requests: what to render, how to align it, and who to tell.

use alloc::boxed::Box;

use crate::coordinator::Coordinator;
use crate::types::{ConfigOverrides, PopoverId};

/// Token handed to a render function so the content can close its own popover.
///
/// Bound to one committed popover: once that popover has been closed or
/// replaced, [`close`](Self::close) does nothing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ClosePopover {
    pub(crate) popover: PopoverId,
}

impl ClosePopover {
    /// The popover this token closes.
    pub fn popover(self) -> PopoverId {
        self.popover
    }

    /// Close the popover if it is still the active one.
    ///
    /// Returns whether a close happened.
    pub fn close<K: Eq, C>(self, coordinator: &mut Coordinator<K, C>) -> bool {
        coordinator.close_popover(self.popover)
    }
}

/// A request to show content anchored to a trigger.
///
/// Built by the trigger's owner and moved into the
/// [`Coordinator`] on open, which owns it until the popover is closed or
/// replaced.
///
/// The optional activation callback is invoked with `true` when the request
/// becomes active and with `false` exactly once when it is deactivated.
pub struct PopoverRequest<C> {
    render: Box<dyn Fn(ClosePopover) -> C>,
    overrides: ConfigOverrides,
    on_active: Option<Box<dyn FnMut(bool)>>,
    notified: bool,
}

impl<C> core::fmt::Debug for PopoverRequest<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PopoverRequest")
            .field("overrides", &self.overrides)
            .field("on_active", &self.on_active.is_some())
            .field("notified", &self.notified)
            .finish_non_exhaustive()
    }
}

impl<C> PopoverRequest<C> {
    /// Create a request that renders with `render` and uses the root defaults.
    pub fn new(render: impl Fn(ClosePopover) -> C + 'static) -> Self {
        Self {
            render: Box::new(render),
            overrides: ConfigOverrides::NONE,
            on_active: None,
            notified: false,
        }
    }

    /// Set per-request configuration overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Set the activation callback.
    #[must_use]
    pub fn on_active(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.on_active = Some(Box::new(callback));
        self
    }

    /// Per-request configuration overrides.
    pub fn overrides(&self) -> &ConfigOverrides {
        &self.overrides
    }

    /// Build the content, handing it a token that closes this popover.
    pub fn render(&self, close: ClosePopover) -> C {
        (self.render)(close)
    }

    /// Take over the render function and overrides of `next`, keeping this
    /// request's activation callback and state.
    pub(crate) fn refresh(&mut self, next: Self) {
        self.render = next.render;
        self.overrides = next.overrides;
    }

    pub(crate) fn activate(&mut self) {
        if self.notified {
            return;
        }
        self.notified = true;
        if let Some(cb) = &mut self.on_active {
            cb(true);
        }
    }

    pub(crate) fn deactivate(&mut self) {
        if !self.notified {
            return;
        }
        self.notified = false;
        if let Some(cb) = &mut self.on_active {
            cb(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn activation_is_paired_and_never_repeats() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut r = PopoverRequest::new(|_| ()).on_active(move |a| sink.borrow_mut().push(a));
        r.deactivate();
        r.activate();
        r.activate();
        r.deactivate();
        r.deactivate();
        assert_eq!(*log.borrow(), [true, false]);
    }

    #[test]
    fn refresh_keeps_the_original_callback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&log);
        let second = Rc::clone(&log);
        let mut r = PopoverRequest::new(|_| 1_u8).on_active(move |a| first.borrow_mut().push((1, a)));
        r.activate();
        r.refresh(
            PopoverRequest::new(|_| 2_u8)
                .with_overrides(ConfigOverrides::default().padding(0.0))
                .on_active(move |a| second.borrow_mut().push((2, a))),
        );
        let close = ClosePopover {
            popover: PopoverId(0),
        };
        assert_eq!(r.render(close), 2);
        assert_eq!(r.overrides().padding, Some(0.0));
        r.deactivate();
        assert_eq!(*log.borrow(), [(1, true), (1, false)]);
    }
}
