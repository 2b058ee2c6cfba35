// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: anchors, anchor configuration, overrides, and identifiers.
//!
//! ## Overview
//!
//! These types describe how a popover is aligned to its trigger.
//! They are consumed by [`resolve`](crate::geometry::resolve) and carried by
//! [`PopoverRequest`](crate::request::PopoverRequest).

use core::fmt;
use core::str::FromStr;

/// One of nine symbolic points on a rectangle.
///
/// Each position maps to a fractional offset along both axes: `0` for the
/// left/top edge, `0.5` for the middle, `1` for the right/bottom edge.
///
/// Parses from and displays as kebab-case names (`"top-left"`, `"bottom"`, ...).
///
/// ```
/// use understory_popover::types::AnchorPosition;
///
/// let a: AnchorPosition = "bottom-right".parse().unwrap();
/// assert_eq!(a, AnchorPosition::BottomRight);
/// assert_eq!(a.fractions(), (1.0, 1.0));
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum AnchorPosition {
    /// Top-left corner.
    TopLeft,
    /// Middle of the top edge.
    Top,
    /// Top-right corner.
    TopRight,
    /// Middle of the left edge.
    Left,
    /// Center of the rectangle.
    Center,
    /// Middle of the right edge.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Middle of the bottom edge.
    #[default]
    Bottom,
    /// Bottom-right corner.
    BottomRight,
}

impl AnchorPosition {
    /// All nine positions, row by row from the top-left.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Left,
        Self::Center,
        Self::Right,
        Self::BottomLeft,
        Self::Bottom,
        Self::BottomRight,
    ];

    /// Fraction of the width selected by this anchor.
    #[inline]
    pub const fn fraction_x(self) -> f64 {
        match self {
            Self::TopLeft | Self::Left | Self::BottomLeft => 0.0,
            Self::Top | Self::Center | Self::Bottom => 0.5,
            Self::TopRight | Self::Right | Self::BottomRight => 1.0,
        }
    }

    /// Fraction of the height selected by this anchor.
    #[inline]
    pub const fn fraction_y(self) -> f64 {
        match self {
            Self::TopLeft | Self::Top | Self::TopRight => 0.0,
            Self::Left | Self::Center | Self::Right => 0.5,
            Self::BottomLeft | Self::Bottom | Self::BottomRight => 1.0,
        }
    }

    /// Both fractions as `(x, y)`.
    #[inline]
    pub const fn fractions(self) -> (f64, f64) {
        (self.fraction_x(), self.fraction_y())
    }

    /// The kebab-case name of this position.
    pub const fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::Top => "top",
            Self::TopRight => "top-right",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::BottomLeft => "bottom-left",
            Self::Bottom => "bottom",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for AnchorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names none of the nine anchor positions.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ParseAnchorError;

impl fmt::Display for ParseAnchorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            "unknown anchor position; expected one of top-left, top, top-right, left, \
             center, right, bottom-left, bottom, bottom-right",
        )
    }
}

impl core::error::Error for ParseAnchorError {}

impl FromStr for AnchorPosition {
    type Err = ParseAnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or(ParseAnchorError)
    }
}

/// Effective alignment of a popover against its trigger.
///
/// The default matches the usual dropdown layout: the top-center of the
/// content sits on the bottom-center of the trigger, with `16` units of
/// padding kept from the container edges.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnchorConfig {
    /// Point on the trigger rectangle to align to.
    pub origin_anchor: AnchorPosition,
    /// Point on the content rectangle placed on the origin anchor.
    pub content_anchor: AnchorPosition,
    /// Horizontal shift applied after alignment.
    pub offset_x: f64,
    /// Vertical shift applied after alignment.
    pub offset_y: f64,
    /// Minimum distance kept between the content and the container edges.
    pub padding: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            origin_anchor: AnchorPosition::Bottom,
            content_anchor: AnchorPosition::Top,
            offset_x: 0.0,
            offset_y: 0.0,
            padding: 16.0,
        }
    }
}

impl AnchorConfig {
    /// Replace the origin anchor.
    #[must_use]
    pub fn with_origin_anchor(mut self, anchor: AnchorPosition) -> Self {
        self.origin_anchor = anchor;
        self
    }

    /// Replace the content anchor.
    #[must_use]
    pub fn with_content_anchor(mut self, anchor: AnchorPosition) -> Self {
        self.content_anchor = anchor;
        self
    }

    /// Replace both offsets.
    #[must_use]
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Replace the padding.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Apply per-request overrides on top of these defaults.
    ///
    /// Fields set in `overrides` win; unset fields keep the value from `self`.
    #[must_use]
    pub fn merged(&self, overrides: &ConfigOverrides) -> Self {
        Self {
            origin_anchor: overrides.origin_anchor.unwrap_or(self.origin_anchor),
            content_anchor: overrides.content_anchor.unwrap_or(self.content_anchor),
            offset_x: overrides.offset_x.unwrap_or(self.offset_x),
            offset_y: overrides.offset_y.unwrap_or(self.offset_y),
            padding: overrides.padding.unwrap_or(self.padding),
        }
    }
}

/// Per-request partial configuration.
///
/// Unset fields fall back to the coordinator's root defaults.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Overrides [`AnchorConfig::origin_anchor`].
    pub origin_anchor: Option<AnchorPosition>,
    /// Overrides [`AnchorConfig::content_anchor`].
    pub content_anchor: Option<AnchorPosition>,
    /// Overrides [`AnchorConfig::offset_x`].
    pub offset_x: Option<f64>,
    /// Overrides [`AnchorConfig::offset_y`].
    pub offset_y: Option<f64>,
    /// Overrides [`AnchorConfig::padding`].
    pub padding: Option<f64>,
}

impl ConfigOverrides {
    /// No overrides.
    pub const NONE: Self = Self {
        origin_anchor: None,
        content_anchor: None,
        offset_x: None,
        offset_y: None,
        padding: None,
    };

    /// Override the origin anchor.
    #[must_use]
    pub fn origin_anchor(mut self, anchor: AnchorPosition) -> Self {
        self.origin_anchor = Some(anchor);
        self
    }

    /// Override the content anchor.
    #[must_use]
    pub fn content_anchor(mut self, anchor: AnchorPosition) -> Self {
        self.content_anchor = Some(anchor);
        self
    }

    /// Override the horizontal offset.
    #[must_use]
    pub fn offset_x(mut self, x: f64) -> Self {
        self.offset_x = Some(x);
        self
    }

    /// Override the vertical offset.
    #[must_use]
    pub fn offset_y(mut self, y: f64) -> Self {
        self.offset_y = Some(y);
        self
    }

    /// Override the padding.
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }
}

/// Identifier of one committed popover (one accepted open).
///
/// A fresh id is handed out every time an open commits, even for the same
/// trigger. Hosts re-mount the overlay when the id changes and tag content
/// layout reports with it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PopoverId(pub(crate) u64);

impl PopoverId {
    /// Raw counter value, for logging.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Handle for an in-flight origin measurement.
///
/// Returned by [`Coordinator::begin_open`](crate::coordinator::Coordinator::begin_open)
/// and redeemed with [`Coordinator::finish_open`](crate::coordinator::Coordinator::finish_open).
/// A ticket goes stale as soon as a newer open begins or the coordinator closes.
#[must_use = "the open only commits when the ticket is redeemed with `finish_open`"]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MeasureTicket(pub(crate) u64);

/// Look up whether a trigger is still mounted.
///
/// The [coordinator](crate::coordinator::Coordinator) consults this when an
/// origin measurement resolves, and drops the open if the trigger is gone.
pub trait MountLookup<K> {
    /// Returns `true` while `trigger` is attached to the element tree.
    fn is_mounted(&self, trigger: &K) -> bool;
}

/// A mount provider for hosts that never unmount triggers mid-measurement.
///
/// All calls to [`MountLookup::is_mounted`] return `true`.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlwaysMounted;

impl<K> MountLookup<K> for AlwaysMounted {
    #[inline]
    fn is_mounted(&self, _trigger: &K) -> bool {
        true
    }
}
