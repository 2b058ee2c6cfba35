// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement pipeline: collect layout inputs and derive the overlay placement.
//!
//! ## Inputs
//!
//! - Container size, reported on every container layout. Starts unbounded.
//! - Origin rectangle, captured once per committed open.
//! - Content size, reported by the overlay's layout callbacks.
//! - Hidden flag, set on every committed open and cleared by the first content layout.
//! - Effective anchor configuration of the active request (`None` when closed).
//!
//! ## Two-phase reveal
//!
//! A freshly opened overlay is mounted with opacity `0` so it still takes part
//! in layout. Its first content layout records the size and clears the hidden
//! flag in the same step, so the first visible frame already has the final
//! position. Later content layouts only move the overlay; they never re-hide it.
//!
//! ## Derivation
//!
//! Every effective input change marks a bit in [`Inputs`]. [`Pipeline::placement`]
//! recomputes only when some bit is set and otherwise returns the cached value.

use bitflags::bitflags;
use kurbo::{Point, Rect, Size};

use crate::geometry::resolve;
use crate::signal::{Memo, Signal};
use crate::types::AnchorConfig;

bitflags! {
    /// Placement inputs that changed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Inputs: u8 {
        /// Origin rectangle of the trigger.
        const ORIGIN    = 0b0000_0001;
        /// Measured content size.
        const CONTENT   = 0b0000_0010;
        /// Measured container size.
        const CONTAINER = 0b0000_0100;
        /// Hidden flag.
        const HIDDEN    = 0b0000_1000;
        /// Effective anchor configuration (including open/closed).
        const CONFIG    = 0b0001_0000;
    }
}

/// Where and how to paint the overlay.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Translation of the content's top-left corner in container coordinates.
    pub offset: Point,
    /// `0.0` while hidden or closed, `1.0` once revealed.
    pub opacity: f64,
    /// Whether the overlay should be painted (and hit-tested).
    pub visible: bool,
}

impl Placement {
    /// Placement used while nothing is open.
    pub const CLOSED: Self = Self {
        offset: Point::ZERO,
        opacity: 0.0,
        visible: false,
    };

    /// Whether the overlay should be painted.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Immutable copy of every geometry input at one instant.
///
/// Snapshots are plain data; they can be handed to another execution context
/// (a render thread, an animation driver) and resolved there.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeometrySnapshot {
    /// Origin rectangle, if captured.
    pub origin: Option<Rect>,
    /// Content size, if measured.
    pub content: Option<Size>,
    /// Container size.
    pub container: Size,
    /// Effective anchor configuration.
    pub config: AnchorConfig,
}

impl GeometrySnapshot {
    /// Resolve the content's top-left position for this snapshot.
    #[inline]
    pub fn resolve(&self) -> Point {
        resolve(self.origin, self.content, self.container, &self.config)
    }
}

/// Layout inputs and the memoized placement of one overlay surface.
#[derive(Clone, Debug)]
pub struct Pipeline {
    origin: Signal<Option<Rect>>,
    content: Signal<Option<Size>>,
    container: Signal<Size>,
    hidden: Signal<bool>,
    config: Signal<Option<AnchorConfig>>,
    dirty: Inputs,
    changes: Inputs,
    placement: Memo<Placement>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create a pipeline with an unbounded container and nothing open.
    pub fn new() -> Self {
        Self {
            origin: Signal::new(None),
            content: Signal::new(None),
            container: Signal::new(Size::new(f64::INFINITY, f64::INFINITY)),
            hidden: Signal::new(true),
            config: Signal::new(None),
            dirty: Inputs::empty(),
            changes: Inputs::empty(),
            placement: Memo::new(),
        }
    }

    fn mark(&mut self, changed: bool, input: Inputs) {
        if changed {
            self.dirty |= input;
            self.changes |= input;
        }
    }

    /// Record a container layout.
    pub fn set_container_size(&mut self, size: Size) {
        let changed = self.container.set(size);
        self.mark(changed, Inputs::CONTAINER);
    }

    /// Start a new reveal cycle for a freshly committed open.
    ///
    /// Stores the origin, forgets any previous content size and hides the
    /// overlay until its first content layout.
    pub fn begin(&mut self, origin: Rect, config: AnchorConfig) {
        let c = self.origin.set(Some(origin));
        self.mark(c, Inputs::ORIGIN);
        let c = self.content.set(None);
        self.mark(c, Inputs::CONTENT);
        let c = self.hidden.set(true);
        self.mark(c, Inputs::HIDDEN);
        let c = self.config.set(Some(config));
        self.mark(c, Inputs::CONFIG);
    }

    /// Replace the effective configuration of the open popover.
    ///
    /// Does nothing while closed.
    pub fn set_config(&mut self, config: AnchorConfig) {
        if self.config.get().is_none() {
            return;
        }
        let c = self.config.set(Some(config));
        self.mark(c, Inputs::CONFIG);
    }

    /// Tear down the current cycle: hide, drop the content size and config.
    ///
    /// The origin is kept; it is only replaced by the next [`begin`](Self::begin).
    pub fn end(&mut self) {
        let c = self.hidden.set(true);
        self.mark(c, Inputs::HIDDEN);
        let c = self.content.set(None);
        self.mark(c, Inputs::CONTENT);
        let c = self.config.set(None);
        self.mark(c, Inputs::CONFIG);
    }

    /// Record a content layout. Returns `true` if this layout revealed the overlay.
    ///
    /// Ignored while closed.
    pub fn set_content_size(&mut self, size: Size) -> bool {
        if self.config.get().is_none() {
            return false;
        }
        let c = self.content.set(Some(size));
        self.mark(c, Inputs::CONTENT);
        let revealed = self.hidden.set(false);
        self.mark(revealed, Inputs::HIDDEN);
        revealed
    }

    /// Whether the overlay is still waiting for its first content layout (or closed).
    pub fn is_hidden(&self) -> bool {
        self.hidden.value()
    }

    /// Origin rectangle captured by the last committed open.
    pub fn origin(&self) -> Option<Rect> {
        self.origin.value()
    }

    /// Last reported content size of the current cycle.
    pub fn content_size(&self) -> Option<Size> {
        self.content.value()
    }

    /// Last reported container size.
    pub fn container_size(&self) -> Size {
        self.container.value()
    }

    /// Effective configuration of the open popover.
    pub fn config(&self) -> Option<AnchorConfig> {
        self.config.value()
    }

    /// Copy the current inputs; `None` while closed.
    pub fn snapshot(&self) -> Option<GeometrySnapshot> {
        let config = self.config.value()?;
        Some(GeometrySnapshot {
            origin: self.origin.value(),
            content: self.content.value(),
            container: self.container.value(),
            config,
        })
    }

    /// Current placement, recomputed only if an input changed since the last call.
    pub fn placement(&mut self) -> Placement {
        let stale = !self.dirty.is_empty();
        self.dirty = Inputs::empty();
        let snapshot = self.snapshot();
        let hidden = self.hidden.value();
        self.placement.get_or_update(stale, || match snapshot {
            None => Placement::CLOSED,
            Some(s) => Placement {
                offset: s.resolve(),
                opacity: if hidden { 0.0 } else { 1.0 },
                visible: !hidden,
            },
        })
    }

    /// How many times the placement was actually computed.
    pub fn computations(&self) -> u64 {
        self.placement.computations()
    }

    /// Inputs that changed since the previous call, for observers that repaint on change.
    pub fn take_changes(&mut self) -> Inputs {
        core::mem::replace(&mut self.changes, Inputs::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Rect {
        Rect::from_origin_size((100.0, 50.0), (40.0, 20.0))
    }

    fn config() -> AnchorConfig {
        AnchorConfig::default().with_offset(0.0, 5.0)
    }

    #[test]
    fn closed_pipeline_places_nothing() {
        let mut p = Pipeline::new();
        assert_eq!(p.placement(), Placement::CLOSED);
        assert!(p.snapshot().is_none());
        assert!(!p.set_content_size(Size::new(10.0, 10.0)));
        assert_eq!(p.content_size(), None);
    }

    #[test]
    fn hidden_until_first_content_layout() {
        let mut p = Pipeline::new();
        p.set_container_size(Size::new(400.0, 300.0));
        p.begin(origin(), config());
        let before = p.placement();
        assert!(!before.is_visible());
        assert_eq!(before.offset, Point::ZERO);

        assert!(p.set_content_size(Size::new(30.0, 10.0)));
        let after = p.placement();
        assert!(after.is_visible());
        assert_eq!(after.offset, Point::new(105.0, 75.0));
    }

    #[test]
    fn visibility_flag_tracks_opacity() {
        let mut p = Pipeline::new();
        assert_eq!(p.placement(), Placement::CLOSED);
        assert!(!Placement::CLOSED.visible);

        p.begin(origin(), config());
        let hidden = p.placement();
        assert!(!hidden.visible);
        assert_eq!(hidden.opacity, 0.0);

        p.set_content_size(Size::new(30.0, 10.0));
        let shown = p.placement();
        assert!(shown.visible);
        assert_eq!(shown.opacity, 1.0);

        p.end();
        assert!(!p.placement().visible);
    }

    #[test]
    fn relayout_after_reveal_moves_without_hiding() {
        let mut p = Pipeline::new();
        p.set_container_size(Size::new(400.0, 300.0));
        p.begin(origin(), config());
        assert!(p.set_content_size(Size::new(30.0, 10.0)));
        let _ = p.take_changes();

        assert!(!p.set_content_size(Size::new(60.0, 10.0)));
        assert!(!p.is_hidden());
        let changes = p.take_changes();
        assert!(changes.contains(Inputs::CONTENT));
        assert!(!changes.contains(Inputs::HIDDEN));
        let placed = p.placement();
        assert!(placed.is_visible());
        assert_eq!(placed.offset, Point::new(90.0, 75.0));
    }

    #[test]
    fn placement_is_memoized_until_an_input_changes() {
        let mut p = Pipeline::new();
        p.set_container_size(Size::new(400.0, 300.0));
        p.begin(origin(), config());
        p.set_content_size(Size::new(30.0, 10.0));
        let a = p.placement();
        let n = p.computations();
        assert_eq!(p.placement(), a);
        p.set_container_size(Size::new(400.0, 300.0));
        assert_eq!(p.placement(), a);
        assert_eq!(p.computations(), n);

        p.set_container_size(Size::new(120.0, 300.0));
        let b = p.placement();
        assert_eq!(p.computations(), n + 1);
        assert_eq!(b.offset.x, 120.0 - 30.0 - 16.0);
    }

    #[test]
    fn begin_resets_content_and_rehides() {
        let mut p = Pipeline::new();
        p.begin(origin(), config());
        p.set_content_size(Size::new(30.0, 10.0));
        assert!(!p.is_hidden());

        let next = Rect::from_origin_size((10.0, 10.0), (5.0, 5.0));
        p.begin(next, config());
        assert!(p.is_hidden());
        assert_eq!(p.content_size(), None);
        assert_eq!(p.origin(), Some(next));
        assert!(!p.placement().is_visible());
    }

    #[test]
    fn end_hides_and_keeps_origin() {
        let mut p = Pipeline::new();
        p.begin(origin(), config());
        p.set_content_size(Size::new(30.0, 10.0));
        p.end();
        assert!(p.is_hidden());
        assert_eq!(p.origin(), Some(origin()));
        assert_eq!(p.placement(), Placement::CLOSED);
        p.set_config(config().with_padding(0.0));
        assert_eq!(p.config(), None);
    }

    #[test]
    fn snapshot_resolves_like_the_pipeline() {
        let mut p = Pipeline::new();
        p.set_container_size(Size::new(400.0, 300.0));
        p.begin(origin(), config());
        p.set_content_size(Size::new(30.0, 10.0));
        let snap = p.snapshot().unwrap();
        assert_eq!(snap.resolve(), p.placement().offset);
    }
}
