// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinator: the single-active-popover state machine.
//!
//! ## Overview
//!
//! One coordinator serves one composition subtree. Every trigger in that
//! subtree opens and closes through it, so at most one popover is active.
//! The coordinator is an explicit value owned by the subtree's root; drop it
//! with the subtree.
//!
//! ## Opening
//!
//! Measuring a trigger is asynchronous in most hosts, so opening is split:
//!
//! 1) [`Coordinator::begin_open`] records a pending open and returns a [`MeasureTicket`].
//! 2) The host measures the trigger relative to the container.
//! 3) [`Coordinator::finish_open`] commits the measured origin, unless the ticket
//!    went stale (a newer open, a close), the measurement failed, or the trigger
//!    was unmounted in the meantime. Abandoned opens leave no trace in the state.
//!
//! On commit, the previous popover (if any) is deactivated before the new one is
//! activated; there is no instant at which both are active.
//!
//! Opening a trigger that already owns the active popover refreshes the request
//! in place instead (see [`Coordinator::update_if_active`]).
//!
//! ## Origin staleness
//!
//! The origin rectangle is captured once per committed open. If the trigger
//! moves while its popover is open, the popover stays where it was until the
//! next open. Refreshing a request never re-measures.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_popover::coordinator::Coordinator;
//! use understory_popover::request::PopoverRequest;
//! use understory_popover::types::AlwaysMounted;
//!
//! let mut c: Coordinator<u32, &'static str> = Coordinator::default();
//! c.set_container_size(Size::new(400.0, 300.0));
//!
//! let ticket = c.begin_open(7, PopoverRequest::new(|_| "hello")).unwrap();
//! let trigger = Rect::from_origin_size((100.0, 50.0), (40.0, 20.0));
//! let id = c.finish_open(ticket, Some(trigger), &AlwaysMounted).unwrap();
//!
//! assert!(c.is_active(&7));
//! assert_eq!(c.render(), Some("hello"));
//! assert!(!c.placement().is_visible());
//!
//! c.set_content_size(id, Size::new(30.0, 10.0));
//! assert!(c.placement().is_visible());
//!
//! c.close();
//! assert_eq!(c.render(), None);
//! ```

use alloc::boxed::Box;
use kurbo::{Point, Rect, Size};

use crate::measure::{GeometrySnapshot, Inputs, Pipeline, Placement};
use crate::request::{ClosePopover, PopoverRequest};
use crate::trace::{AbandonReason, CommitEvent, TraceSink};
use crate::types::{AlwaysMounted, AnchorConfig, MeasureTicket, MountLookup, PopoverId};

struct Active<K, C> {
    trigger: K,
    id: PopoverId,
    request: PopoverRequest<C>,
}

struct Pending<K, C> {
    trigger: K,
    ticket: MeasureTicket,
    request: PopoverRequest<C>,
}

/// Tracks the active trigger and request, and drives the placement pipeline.
///
/// `K` identifies triggers and is only ever compared. `C` is whatever the
/// render functions produce.
pub struct Coordinator<K, C> {
    defaults: AnchorConfig,
    active: Option<Active<K, C>>,
    pending: Option<Pending<K, C>>,
    next_ticket: u64,
    next_popover: u64,
    pipeline: Pipeline,
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl<K, C> core::fmt::Debug for Coordinator<K, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Coordinator")
            .field("defaults", &self.defaults)
            .field("active", &self.active.as_ref().map(|a| a.id))
            .field("pending", &self.pending.as_ref().map(|p| p.ticket))
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl<K: Eq, C> Default for Coordinator<K, C> {
    fn default() -> Self {
        Self::new(AnchorConfig::default())
    }
}

impl<K: Eq, C> Coordinator<K, C> {
    /// Create a coordinator with the given root defaults.
    pub fn new(defaults: AnchorConfig) -> Self {
        Self {
            defaults,
            active: None,
            pending: None,
            next_ticket: 0,
            next_popover: 0,
            pipeline: Pipeline::new(),
            #[cfg(feature = "trace")]
            sink: None,
        }
    }

    /// Install a diagnostics sink. Ignored unless the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        #[cfg(feature = "trace")]
        {
            self.sink = Some(sink);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
        }
    }

    #[inline]
    fn trace(&mut self, emit: impl FnOnce(&mut dyn TraceSink)) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            emit(s.as_mut());
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = emit;
        }
    }

    /// Root defaults applied beneath per-request overrides.
    pub fn defaults(&self) -> &AnchorConfig {
        &self.defaults
    }

    /// Replace the root defaults; the open popover (if any) is re-aligned.
    pub fn set_defaults(&mut self, defaults: AnchorConfig) {
        self.defaults = defaults;
        if let Some(a) = &self.active {
            let config = self.defaults.merged(a.request.overrides());
            self.pipeline.set_config(config);
        }
    }

    /// Begin opening a popover for `trigger`.
    ///
    /// Returns a ticket to redeem once the trigger's origin is measured.
    /// Any open still pending is superseded.
    ///
    /// If `trigger` already owns the active popover, the request is applied as
    /// an in-place refresh and `None` is returned: there is nothing to measure.
    /// That still counts as the newest open, so a pending open of another
    /// trigger is superseded either way.
    #[must_use = "the open only commits when the ticket is redeemed with `finish_open`"]
    pub fn begin_open(&mut self, trigger: K, request: PopoverRequest<C>) -> Option<MeasureTicket> {
        self.abandon_pending(AbandonReason::Superseded);
        if self.is_active(&trigger) {
            self.update_if_active(&trigger, request);
            return None;
        }
        let ticket = MeasureTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.pending = Some(Pending {
            trigger,
            ticket,
            request,
        });
        self.trace(|s| s.on_open_requested(ticket));
        Some(ticket)
    }

    /// Complete a pending open with the measured origin rectangle.
    ///
    /// `origin` is in container coordinates; `None` means the host failed to
    /// measure. `mounts` is consulted to make sure the trigger still exists.
    ///
    /// Returns the id of the newly active popover, or `None` if the open was
    /// abandoned. Abandoning never touches the active popover.
    pub fn finish_open(
        &mut self,
        ticket: MeasureTicket,
        origin: Option<Rect>,
        mounts: &impl MountLookup<K>,
    ) -> Option<PopoverId> {
        // A stale ticket was already reported when it was superseded or cancelled.
        if self.pending.as_ref().map(|p| p.ticket) != Some(ticket) {
            return None;
        }
        let pending = self.pending.take()?;
        let Some(origin) = origin else {
            self.trace(|s| s.on_open_abandoned(ticket, AbandonReason::MeasureFailed));
            return None;
        };
        if !mounts.is_mounted(&pending.trigger) {
            self.trace(|s| s.on_open_abandoned(ticket, AbandonReason::Unmounted));
            return None;
        }
        Some(self.commit(pending.trigger, origin, pending.request))
    }

    /// Open with an origin that is already measured.
    ///
    /// Equivalent to [`begin_open`](Self::begin_open) followed immediately by
    /// [`finish_open`](Self::finish_open). Returns the active popover id, which
    /// is the existing one when `trigger` was already active.
    pub fn open(
        &mut self,
        trigger: K,
        request: PopoverRequest<C>,
        origin: Option<Rect>,
    ) -> Option<PopoverId> {
        match self.begin_open(trigger, request) {
            Some(ticket) => self.finish_open(ticket, origin, &AlwaysMounted),
            None => self.active_id(),
        }
    }

    fn commit(&mut self, trigger: K, origin: Rect, request: PopoverRequest<C>) -> PopoverId {
        let id = PopoverId(self.next_popover);
        self.next_popover = self.next_popover.wrapping_add(1);

        let replaced = self.active.take().map(|mut prev| {
            prev.request.deactivate();
            prev.id
        });
        if let Some(prev) = replaced {
            self.trace(|s| s.on_closed(prev));
        }

        let config = self.defaults.merged(request.overrides());
        self.pipeline.begin(origin, config);
        let mut active = Active {
            trigger,
            id,
            request,
        };
        active.request.activate();
        self.active = Some(active);
        self.trace(|s| {
            s.on_open_committed(&CommitEvent {
                popover: id,
                replaced,
                origin,
            });
        });
        id
    }

    /// Replace the active request if `trigger` owns it.
    ///
    /// Keeps the measured origin, the reveal state, and the activation
    /// callback of the original open; only the render function and overrides
    /// change. Returns whether a refresh happened.
    pub fn update_if_active(&mut self, trigger: &K, request: PopoverRequest<C>) -> bool {
        let Some(a) = &mut self.active else {
            return false;
        };
        if a.trigger != *trigger {
            return false;
        }
        a.request.refresh(request);
        let id = a.id;
        let config = self.defaults.merged(a.request.overrides());
        self.pipeline.set_config(config);
        self.trace(|s| s.on_request_updated(id));
        true
    }

    fn abandon_pending(&mut self, reason: AbandonReason) -> bool {
        let Some(p) = self.pending.take() else {
            return false;
        };
        let ticket = p.ticket;
        self.trace(|s| s.on_open_abandoned(ticket, reason));
        true
    }

    /// Drop a pending open without touching the active popover.
    pub fn cancel_pending(&mut self) -> bool {
        self.abandon_pending(AbandonReason::Cancelled)
    }

    /// Close whatever is open and cancel any pending open.
    ///
    /// Idempotent. Returns whether an active popover was closed.
    pub fn close(&mut self) -> bool {
        self.abandon_pending(AbandonReason::Cancelled);
        let Some(mut prev) = self.active.take() else {
            return false;
        };
        self.pipeline.end();
        prev.request.deactivate();
        let id = prev.id;
        self.trace(|s| s.on_closed(id));
        true
    }

    /// Close only if `popover` is still the active one.
    pub fn close_popover(&mut self, popover: PopoverId) -> bool {
        if self.active_id() != Some(popover) {
            return false;
        }
        self.close()
    }

    /// Notification from the gesture layer that a press landed outside the overlay.
    pub fn pointer_down_outside(&mut self) {
        self.close();
    }

    /// Close on a press at `point` (container coordinates) unless it lands on the
    /// visible overlay. Returns whether a close happened.
    ///
    /// A press while the overlay is still hidden always closes.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        if let Some(rect) = self.overlay_rect()
            && rect.contains(point)
        {
            return false;
        }
        self.close()
    }

    /// Whether `trigger` owns the active popover.
    pub fn is_active(&self, trigger: &K) -> bool {
        self.active.as_ref().is_some_and(|a| a.trigger == *trigger)
    }

    /// The trigger owning the active popover.
    pub fn active_trigger(&self) -> Option<&K> {
        self.active.as_ref().map(|a| &a.trigger)
    }

    /// Id of the active popover.
    pub fn active_id(&self) -> Option<PopoverId> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Ticket of the open currently waiting for its measurement.
    pub fn pending_ticket(&self) -> Option<MeasureTicket> {
        self.pending.as_ref().map(|p| p.ticket)
    }

    /// Render the active popover's content.
    pub fn render(&self) -> Option<C> {
        let a = self.active.as_ref()?;
        Some(a.request.render(ClosePopover { popover: a.id }))
    }

    /// Record a container layout.
    pub fn set_container_size(&mut self, size: Size) {
        self.pipeline.set_container_size(size);
    }

    /// Record a content layout of `popover`'s overlay.
    ///
    /// Reports for a popover that is no longer active are ignored. Returns
    /// whether this layout revealed the overlay.
    pub fn set_content_size(&mut self, popover: PopoverId, size: Size) -> bool {
        if self.active_id() != Some(popover) {
            return false;
        }
        let revealed = self.pipeline.set_content_size(size);
        if revealed {
            self.trace(|s| s.on_revealed(popover, size));
        }
        revealed
    }

    /// Current overlay placement.
    pub fn placement(&mut self) -> Placement {
        let before = self.pipeline.computations();
        let placement = self.pipeline.placement();
        if self.pipeline.computations() != before {
            let id = self.active_id();
            self.trace(|s| s.on_placement(id, &placement));
        }
        placement
    }

    /// Container-space rectangle of the visible overlay.
    pub fn overlay_rect(&mut self) -> Option<Rect> {
        let content = self.pipeline.content_size()?;
        let placement = self.placement();
        placement
            .is_visible()
            .then(|| Rect::from_origin_size(placement.offset, content))
    }

    /// Copy of the current geometry inputs; `None` while closed.
    pub fn snapshot(&self) -> Option<GeometrySnapshot> {
        self.pipeline.snapshot()
    }

    /// Placement inputs changed since the previous call.
    pub fn take_changes(&mut self) -> Inputs {
        self.pipeline.take_changes()
    }

    /// The measurement pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}
