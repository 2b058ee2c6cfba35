// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle diagnostics for the coordinator.
//!
//! Implement [`TraceSink`] and install it with
//! [`Coordinator::set_trace_sink`](crate::coordinator::Coordinator::set_trace_sink).
//! All methods default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! When the `trace` feature is **off**, the coordinator drops the sink and
//! every emission compiles to nothing. When **on**, each emission is a single
//! `Option` branch before dispatching.

use kurbo::{Rect, Size};

use crate::measure::Placement;
use crate::types::{MeasureTicket, PopoverId};

/// Why a pending open never became active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbandonReason {
    /// The trigger was unmounted before its measurement resolved.
    Unmounted,
    /// The host could not measure the trigger.
    MeasureFailed,
    /// A newer open began before this one resolved.
    Superseded,
    /// The coordinator was closed (or the pending open cancelled) while measuring.
    Cancelled,
}

/// Emitted when an open commits and a popover becomes active.
#[derive(Clone, Copy, Debug)]
pub struct CommitEvent {
    /// The new active popover.
    pub popover: PopoverId,
    /// The popover it replaced, if one was open.
    pub replaced: Option<PopoverId>,
    /// Origin rectangle captured for the trigger.
    pub origin: Rect,
}

/// Receives coordinator lifecycle events.
pub trait TraceSink {
    /// An open began measuring its trigger.
    fn on_open_requested(&mut self, ticket: MeasureTicket) {
        _ = ticket;
    }

    /// A pending open was dropped.
    fn on_open_abandoned(&mut self, ticket: MeasureTicket, reason: AbandonReason) {
        _ = (ticket, reason);
    }

    /// An open committed.
    fn on_open_committed(&mut self, e: &CommitEvent) {
        _ = e;
    }

    /// The active request was refreshed in place.
    fn on_request_updated(&mut self, popover: PopoverId) {
        _ = popover;
    }

    /// The first content layout revealed the overlay.
    fn on_revealed(&mut self, popover: PopoverId, content: Size) {
        _ = (popover, content);
    }

    /// The placement was recomputed.
    fn on_placement(&mut self, popover: Option<PopoverId>, placement: &Placement) {
        _ = (popover, placement);
    }

    /// A popover was deactivated (closed or replaced).
    fn on_closed(&mut self, popover: PopoverId) {
        _ = popover;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}
