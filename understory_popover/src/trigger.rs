// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger-side helper: an identity plus an "am I open" flag.
//!
//! A [`Trigger`] builds requests whose activation callback writes a shared
//! flag, so the trigger's owner can read [`Trigger::is_active`] without
//! asking the coordinator.
//!
//! ```
//! use kurbo::Rect;
//! use understory_popover::coordinator::Coordinator;
//! use understory_popover::trigger::Trigger;
//! use understory_popover::types::ConfigOverrides;
//!
//! let mut c: Coordinator<u32, String> = Coordinator::default();
//! let a = Trigger::new(1_u32);
//! let b = Trigger::new(2_u32);
//!
//! let origin = Some(Rect::new(0.0, 0.0, 10.0, 10.0));
//! a.open_popover(&mut c, |_| "a".to_string(), ConfigOverrides::NONE, origin);
//! assert!(a.is_active());
//!
//! b.open_popover(&mut c, |_| "b".to_string(), ConfigOverrides::NONE, origin);
//! assert!(!a.is_active());
//! assert!(b.is_active());
//!
//! b.close_popover(&mut c);
//! assert!(!b.is_active());
//! ```

use alloc::rc::Rc;
use core::cell::Cell;

use kurbo::Rect;

use crate::coordinator::Coordinator;
use crate::request::{ClosePopover, PopoverRequest};
use crate::types::{ConfigOverrides, MeasureTicket, PopoverId};

/// A trigger identity and its activation flag.
#[derive(Clone, Debug)]
pub struct Trigger<K> {
    key: K,
    active: Rc<Cell<bool>>,
}

impl<K: Clone + Eq> Trigger<K> {
    /// Create a trigger for `key`, initially inactive.
    pub fn new(key: K) -> Self {
        Self {
            key,
            active: Rc::new(Cell::new(false)),
        }
    }

    /// The identity this trigger opens with.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Whether this trigger currently owns the active popover.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Build a request wired to this trigger's activation flag.
    pub fn request<C>(
        &self,
        render: impl Fn(ClosePopover) -> C + 'static,
        overrides: ConfigOverrides,
    ) -> PopoverRequest<C> {
        let flag = Rc::clone(&self.active);
        PopoverRequest::new(render)
            .with_overrides(overrides)
            .on_active(move |a| flag.set(a))
    }

    /// Start opening; redeem the ticket once the host measured this trigger.
    ///
    /// Returns `None` when this trigger is already open, in which case the
    /// request refreshes the open popover.
    #[must_use = "the open only commits when the ticket is redeemed with `finish_open`"]
    pub fn begin_open<C>(
        &self,
        coordinator: &mut Coordinator<K, C>,
        render: impl Fn(ClosePopover) -> C + 'static,
        overrides: ConfigOverrides,
    ) -> Option<MeasureTicket> {
        coordinator.begin_open(self.key.clone(), self.request(render, overrides))
    }

    /// Open with an origin measured synchronously.
    pub fn open_popover<C>(
        &self,
        coordinator: &mut Coordinator<K, C>,
        render: impl Fn(ClosePopover) -> C + 'static,
        overrides: ConfigOverrides,
        origin: Option<Rect>,
    ) -> Option<PopoverId> {
        coordinator.open(self.key.clone(), self.request(render, overrides), origin)
    }

    /// Push changed render inputs to the open popover, if this trigger owns it.
    pub fn sync<C>(
        &self,
        coordinator: &mut Coordinator<K, C>,
        render: impl Fn(ClosePopover) -> C + 'static,
        overrides: ConfigOverrides,
    ) -> bool {
        coordinator.update_if_active(&self.key, self.request(render, overrides))
    }

    /// Close the active popover.
    ///
    /// Like the coordinator's close, this closes whichever popover is open.
    pub fn close_popover<C>(&self, coordinator: &mut Coordinator<K, C>) -> bool {
        coordinator.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlwaysMounted;
    use alloc::format;
    use alloc::string::String;
    use kurbo::Size;

    fn origin() -> Option<Rect> {
        Some(Rect::from_origin_size((100.0, 50.0), (40.0, 20.0)))
    }

    #[test]
    fn flags_follow_replacement() {
        let mut c: Coordinator<&'static str, ()> = Coordinator::default();
        let a = Trigger::new("a");
        let b = Trigger::new("b");
        a.open_popover(&mut c, |_| (), ConfigOverrides::NONE, origin());
        assert!(a.is_active() && !b.is_active());
        b.open_popover(&mut c, |_| (), ConfigOverrides::NONE, origin());
        assert!(!a.is_active() && b.is_active());
        // The pointer-down path closes through the coordinator; the flag follows.
        c.pointer_down_outside();
        assert!(!a.is_active() && !b.is_active());
    }

    #[test]
    fn sync_updates_content_without_reopening() {
        let mut c: Coordinator<u8, String> = Coordinator::default();
        c.set_container_size(Size::new(400.0, 300.0));
        let t = Trigger::new(1_u8);
        let mut counter = 0;
        let render = |n: i32| move |_: ClosePopover| format!("count {n}");

        assert!(!t.sync(&mut c, render(counter), ConfigOverrides::NONE));
        let id = t
            .open_popover(&mut c, render(counter), ConfigOverrides::NONE, origin())
            .unwrap();
        c.set_content_size(id, Size::new(30.0, 10.0));
        let before = c.placement();

        counter += 1;
        assert!(t.sync(&mut c, render(counter), ConfigOverrides::NONE));
        assert_eq!(c.render().as_deref(), Some("count 1"));
        assert_eq!(c.active_id(), Some(id));
        assert_eq!(c.placement(), before);
        assert!(t.is_active());
    }

    #[test]
    fn async_open_sets_flag_only_on_commit() {
        let mut c: Coordinator<u8, ()> = Coordinator::default();
        let t = Trigger::new(3_u8);
        let ticket = t.begin_open(&mut c, |_| (), ConfigOverrides::NONE).unwrap();
        assert!(!t.is_active());
        c.finish_open(ticket, origin(), &AlwaysMounted);
        assert!(t.is_active());
        assert!(t.close_popover(&mut c));
        assert!(!t.is_active());
    }

    #[test]
    fn content_can_close_itself() {
        let mut c: Coordinator<u8, ClosePopover> = Coordinator::default();
        let t = Trigger::new(9_u8);
        t.open_popover(&mut c, |close| close, ConfigOverrides::NONE, origin());
        let close = c.render().unwrap();
        assert!(close.close(&mut c));
        assert!(!t.is_active());
    }
}
