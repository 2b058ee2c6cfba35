// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Several triggers sharing one coordinator.
//!
//! Each trigger renders its own counter into the popover. Bumping the counter
//! of the open trigger refreshes the popover in place; opening another trigger
//! replaces it.
//!
//! Run:
//! - `cargo run -p understory_popover_demos --example popover_counter`

use kurbo::{Rect, Size};
use understory_popover::coordinator::Coordinator;
use understory_popover::request::ClosePopover;
use understory_popover::trigger::Trigger;
use understory_popover::types::ConfigOverrides;

/// What the overlay shows: a label and the token its close button would use.
#[derive(Clone, Debug)]
struct Card {
    label: String,
    close: ClosePopover,
}

struct Counter {
    trigger: Trigger<usize>,
    frame: Rect,
    count: u32,
}

impl Counter {
    fn render(&self) -> impl Fn(ClosePopover) -> Card + 'static {
        let key = *self.trigger.key();
        let count = self.count;
        move |close| Card {
            label: format!("counter {key}: {count}"),
            close,
        }
    }

    fn open(&self, popovers: &mut Coordinator<usize, Card>) {
        let id = self.trigger.open_popover(
            popovers,
            self.render(),
            ConfigOverrides::NONE,
            Some(self.frame),
        );
        if let Some(id) = id {
            popovers.set_content_size(id, Size::new(120.0, 40.0));
        }
    }

    fn increment(&mut self, popovers: &mut Coordinator<usize, Card>) {
        self.count += 1;
        self.trigger
            .sync(popovers, self.render(), ConfigOverrides::NONE);
    }
}

fn main() {
    let mut popovers: Coordinator<usize, Card> = Coordinator::default();
    popovers.set_container_size(Size::new(360.0, 640.0));

    let mut counters: Vec<Counter> = [200.0, 300.0, 400.0]
        .into_iter()
        .enumerate()
        .map(|(i, y)| Counter {
            trigger: Trigger::new(i),
            frame: Rect::from_origin_size((130.0, y), (100.0, 50.0)),
            count: 0,
        })
        .collect();

    counters[0].open(&mut popovers);
    counters[0].increment(&mut popovers);
    counters[0].increment(&mut popovers);
    // Not open: the refresh is ignored.
    counters[2].increment(&mut popovers);
    let card = popovers.render().unwrap();
    println!("== First ==\n  {}", card.label);
    assert_eq!(card.label, "counter 0: 2");

    counters[1].open(&mut popovers);
    let card = popovers.render().unwrap();
    let flags: Vec<bool> = counters.iter().map(|c| c.trigger.is_active()).collect();
    println!("== Second ==\n  {}\n  active flags: {flags:?}", card.label);
    assert_eq!(flags, [false, true, false]);

    // The card's close button.
    assert!(card.close.close(&mut popovers));
    println!("== Closed ==\n  placement: {:?}", popovers.placement());
    assert!(counters.iter().all(|c| !c.trigger.is_active()));
}
