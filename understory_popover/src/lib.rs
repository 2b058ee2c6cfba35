// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_popover --heading-base-level=0

//! Understory Popover: single-popover coordination and anchor geometry.
//!
//! ## Overview
//!
//! This crate decides which trigger owns the one visible popover and where that popover goes.
//! It does not render, lay out, or recognize gestures.
//! Instead, the host feeds it measurements (trigger origin, container size, content size) and
//! press notifications, and reads back a [`Placement`](crate::measure::Placement) to paint.
//!
//! ## Components
//!
//! - [`Coordinator`](crate::coordinator::Coordinator): the state machine. Tracks the active
//!   trigger and its [`PopoverRequest`](crate::request::PopoverRequest), the pending open, and
//!   activation notifications. One per composition subtree, passed explicitly to triggers.
//! - [`Pipeline`](crate::measure::Pipeline): collects layout inputs, gates the first paint on
//!   the content measurement, and memoizes the placement.
//! - [`resolve`](crate::geometry::resolve): the pure geometry function. Aligns a content anchor
//!   to an origin anchor, applies offsets, and clamps into the container minus padding.
//! - [`Trigger`](crate::trigger::Trigger): a trigger identity with an "am I open" flag.
//!
//! ## Workflow
//!
//! 1) Report the container size on every container layout.
//! 2) On a trigger press, call [`begin_open`](crate::coordinator::Coordinator::begin_open),
//!    measure the trigger relative to the container, then
//!    [`finish_open`](crate::coordinator::Coordinator::finish_open). Opens whose trigger was
//!    unmounted, whose measurement failed, or that were overtaken by a close or a newer open
//!    are dropped silently.
//! 3) Mount the overlay with [`render`](crate::coordinator::Coordinator::render) whenever the
//!    [`active_id`](crate::coordinator::Coordinator::active_id) changes. It starts hidden.
//! 4) Report its layout with [`set_content_size`](crate::coordinator::Coordinator::set_content_size).
//!    The first report reveals it at its final position.
//! 5) Each frame, paint with [`placement`](crate::coordinator::Coordinator::placement). It is only
//!    recomputed when an input changed.
//! 6) Forward presses outside the overlay to
//!    [`pointer_down_outside`](crate::coordinator::Coordinator::pointer_down_outside), or let
//!    [`pointer_down`](crate::coordinator::Coordinator::pointer_down) hit-test for you.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_popover::coordinator::Coordinator;
//! use understory_popover::trigger::Trigger;
//! use understory_popover::types::{AnchorConfig, ConfigOverrides};
//!
//! let mut popovers: Coordinator<u32, &'static str> = Coordinator::new(AnchorConfig::default());
//! popovers.set_container_size(Size::new(400.0, 300.0));
//!
//! let menu = Trigger::new(1_u32);
//! let origin = Rect::from_origin_size((100.0, 50.0), (40.0, 20.0));
//! let overrides = ConfigOverrides::default().offset_y(5.0);
//! let id = menu
//!     .open_popover(&mut popovers, |_| "menu", overrides, Some(origin))
//!     .unwrap();
//!
//! // Mounted but not painted until the content is measured.
//! assert!(!popovers.placement().is_visible());
//! popovers.set_content_size(id, Size::new(30.0, 10.0));
//!
//! let placement = popovers.placement();
//! assert!(placement.is_visible());
//! assert_eq!(placement.offset, Point::new(105.0, 75.0));
//!
//! // A press elsewhere closes it.
//! assert!(popovers.pointer_down(Point::new(5.0, 5.0)));
//! assert!(!menu.is_active());
//! ```
//!
//! ## Crate features
//!
//! - `std` (enabled by default): Enables `std` support in dependencies.
//! - `libm`: `no_std` float support for Kurbo.
//! - `trace`: Dispatches lifecycle events to an installed [`TraceSink`](crate::trace::TraceSink).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod coordinator;
pub mod geometry;
pub mod measure;
pub mod request;
pub mod signal;
pub mod trace;
pub mod trigger;
pub mod types;
