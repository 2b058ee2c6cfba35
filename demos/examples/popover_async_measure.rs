// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Asynchronous trigger measurement.
//!
//! A simulated host queues measurements and resolves them on its next layout
//! pass. Opens whose trigger unmounts, or that are overtaken by a close, never
//! become active.
//!
//! Run:
//! - `cargo run -p understory_popover_demos --example popover_async_measure`

use std::collections::{HashMap, VecDeque};

use kurbo::{Rect, Size};
use understory_popover::coordinator::Coordinator;
use understory_popover::trace::{AbandonReason, CommitEvent, TraceSink};
use understory_popover::trigger::Trigger;
use understory_popover::types::{ConfigOverrides, MeasureTicket, MountLookup, PopoverId};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct Node(u32);

/// A toy layout host: mounted trigger frames and a queue of pending measurements.
#[derive(Default)]
struct Host {
    frames: HashMap<Node, Rect>,
    queue: VecDeque<(Node, MeasureTicket)>,
}

impl MountLookup<Node> for Host {
    fn is_mounted(&self, trigger: &Node) -> bool {
        self.frames.contains_key(trigger)
    }
}

impl Host {
    fn measure(&mut self, node: Node, ticket: Option<MeasureTicket>) {
        if let Some(ticket) = ticket {
            self.queue.push_back((node, ticket));
        }
    }

    /// Resolve every queued measurement, as the next layout pass would.
    fn flush(&mut self, popovers: &mut Coordinator<Node, &'static str>) {
        while let Some((node, ticket)) = self.queue.pop_front() {
            let origin = self.frames.get(&node).copied();
            let result = popovers.finish_open(ticket, origin, &*self);
            println!("  measured {node:?} -> {result:?}");
        }
    }
}

/// Prints lifecycle events.
struct Printer;

impl TraceSink for Printer {
    fn on_open_requested(&mut self, ticket: MeasureTicket) {
        println!("  [trace] requested {ticket:?}");
    }

    fn on_open_abandoned(&mut self, ticket: MeasureTicket, reason: AbandonReason) {
        println!("  [trace] abandoned {ticket:?}: {reason:?}");
    }

    fn on_open_committed(&mut self, e: &CommitEvent) {
        println!("  [trace] committed {:?} at {:?}", e.popover, e.origin);
    }

    fn on_revealed(&mut self, popover: PopoverId, content: Size) {
        println!("  [trace] revealed {popover:?} ({content:?})");
    }

    fn on_closed(&mut self, popover: PopoverId) {
        println!("  [trace] closed {popover:?}");
    }
}

fn main() {
    let mut host = Host::default();
    let mut popovers: Coordinator<Node, &'static str> = Coordinator::default();
    popovers.set_trace_sink(Box::new(Printer));
    popovers.set_container_size(Size::new(400.0, 300.0));

    let a = Trigger::new(Node(1));
    let b = Trigger::new(Node(2));
    host.frames
        .insert(Node(1), Rect::from_origin_size((20.0, 20.0), (60.0, 30.0)));
    host.frames
        .insert(Node(2), Rect::from_origin_size((200.0, 20.0), (60.0, 30.0)));

    println!("== Open A, unmount it before layout ==");
    let t = a.begin_open(&mut popovers, |_| "A", ConfigOverrides::NONE);
    host.measure(Node(1), t);
    host.frames.remove(&Node(1));
    host.flush(&mut popovers);
    assert!(!a.is_active());
    assert_eq!(popovers.active_id(), None);

    println!("== Open B, close before layout ==");
    let t = b.begin_open(&mut popovers, |_| "B", ConfigOverrides::NONE);
    host.measure(Node(2), t);
    popovers.close();
    host.flush(&mut popovers);
    assert!(!b.is_active());

    println!("== Open B for real ==");
    let t = b.begin_open(&mut popovers, |_| "B", ConfigOverrides::NONE);
    host.measure(Node(2), t);
    host.flush(&mut popovers);
    assert!(b.is_active());
    let id = popovers.active_id().unwrap();
    popovers.set_content_size(id, Size::new(80.0, 40.0));
    let placement = popovers.placement();
    println!("  placement: {placement:?}");
    assert!(placement.is_visible());
}
