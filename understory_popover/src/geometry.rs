// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor geometry: align the content to its trigger, then clamp to the container.
//!
//! ## Algorithm
//!
//! 1) Pick the origin anchor point on the trigger rectangle (container coordinates).
//! 2) Pick the content anchor point on the content rectangle (relative to its top-left).
//! 3) Target top-left = origin point + offset − content point.
//! 4) Clamp each axis independently to `[padding, container − content − padding]`.
//!
//! When the content does not fit (`content > container − 2·padding`), the lower
//! bound exceeds the upper bound. The clamp is `max(min, min(value, max))`, so the
//! result is the lower bound: the content hugs the top/left padding and overflows
//! towards the bottom/right. This is deterministic and never produces NaN for
//! finite inputs.
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_popover::geometry::resolve;
//! use understory_popover::types::AnchorConfig;
//!
//! let origin = Rect::from_origin_size((100.0, 50.0), (40.0, 20.0));
//! let content = Size::new(30.0, 10.0);
//! let container = Size::new(400.0, 300.0);
//! let config = AnchorConfig::default().with_offset(0.0, 5.0);
//!
//! let p = resolve(Some(origin), Some(content), container, &config);
//! assert_eq!(p, Point::new(105.0, 75.0));
//! ```

use kurbo::{Point, Rect, Size};

use crate::types::{AnchorConfig, AnchorPosition};

/// Point selected by `anchor` on `rect`, in the rectangle's coordinate space.
#[inline]
pub fn anchor_point(anchor: AnchorPosition, rect: Rect) -> Point {
    Point::new(
        rect.x0 + anchor.fraction_x() * rect.width(),
        rect.y0 + anchor.fraction_y() * rect.height(),
    )
}

/// Point selected by `anchor` on a rectangle of `size` placed at the origin.
#[inline]
pub fn anchor_point_in(anchor: AnchorPosition, size: Size) -> Point {
    Point::new(
        anchor.fraction_x() * size.width,
        anchor.fraction_y() * size.height,
    )
}

/// Clamp with the lower bound taking precedence over the upper one.
#[inline]
pub fn clamp_low_first(value: f64, min: f64, max: f64) -> f64 {
    min.max(value.min(max))
}

/// Resolve the top-left position of the content in container coordinates.
///
/// Returns `(0, 0)` when either the origin rectangle or the content size is
/// not yet known. This function never reports readiness; callers gate
/// visibility on their own (see [`Pipeline`](crate::measure::Pipeline)).
///
/// Pure and allocation-free; safe to call every frame.
#[inline]
pub fn resolve(
    origin: Option<Rect>,
    content: Option<Size>,
    container: Size,
    config: &AnchorConfig,
) -> Point {
    let (Some(origin), Some(content)) = (origin, content) else {
        return Point::ZERO;
    };
    let o = anchor_point(config.origin_anchor, origin);
    let c = anchor_point_in(config.content_anchor, content);
    let x = o.x + config.offset_x - c.x;
    let y = o.y + config.offset_y - c.y;
    let pad = config.padding;
    Point::new(
        clamp_low_first(x, pad, container.width - content.width - pad),
        clamp_low_first(y, pad, container.height - content.height - pad),
    )
}
