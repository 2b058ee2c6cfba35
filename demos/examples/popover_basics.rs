// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popover basics.
//!
//! Opens a popover under a button, reveals it once its content is measured,
//! re-anchors it, and closes it with a press outside.
//!
//! Run:
//! - `cargo run -p understory_popover_demos --example popover_basics`

use kurbo::{Point, Rect, Size};
use understory_popover::coordinator::Coordinator;
use understory_popover::trigger::Trigger;
use understory_popover::types::{AnchorConfig, AnchorPosition, ConfigOverrides};

fn main() {
    let mut popovers: Coordinator<&'static str, String> =
        Coordinator::new(AnchorConfig::default());
    popovers.set_container_size(Size::new(400.0, 300.0));

    let button = Trigger::new("button");
    let origin = Rect::from_origin_size((100.0, 50.0), (40.0, 20.0));
    let id = button
        .open_popover(
            &mut popovers,
            |_| "Hello from the popover".to_string(),
            ConfigOverrides::default().offset_y(5.0),
            Some(origin),
        )
        .unwrap();

    println!("== Mounted ==\n  content: {:?}", popovers.render());
    let hidden = popovers.placement();
    println!("  placement before measuring: {hidden:?}");
    assert!(!hidden.is_visible());

    popovers.set_content_size(id, Size::new(30.0, 10.0));
    let shown = popovers.placement();
    println!("== Revealed ==\n  placement: {shown:?}");
    assert_eq!(shown.offset, Point::new(105.0, 75.0));

    // Anchor the right edge of the content to the left edge of the trigger.
    let side = ConfigOverrides::default()
        .origin_anchor(AnchorPosition::Left)
        .content_anchor(AnchorPosition::Right);
    button.sync(&mut popovers, |_| "Now on the left".to_string(), side);
    let moved = popovers.placement();
    println!("== Re-anchored ==\n  placement: {moved:?}");
    assert_eq!(moved.offset, Point::new(70.0, 55.0));

    // Inside the overlay: stays open. Outside: closes.
    assert!(!popovers.pointer_down(Point::new(80.0, 60.0)));
    assert!(popovers.pointer_down(Point::new(300.0, 200.0)));
    println!("== Closed ==\n  active: {}", button.is_active());
    assert!(!button.is_active());
}
