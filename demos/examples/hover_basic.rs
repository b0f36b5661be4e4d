// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tooltips on a toolbar, driven by a scripted pointer.
//!
//! Shows the default trigger set (`mouseenter focus`), show/hide delays and
//! transition durations advancing on the host clock, and `hide_all`.
//!
//! Run:
//! - `RUST_LOG=understory_tooltip=debug \
//!   cargo run -p understory_tooltip_demos --example hover_basic`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_tooltip::{
    Content, ContentValue, Event, EventKind, HideAllOptions, HostConfig, NodeId, PartialProps,
    Placement, TooltipHost,
};

fn report(host: &TooltipHost, label: &str) {
    println!("t={:>4}ms  {label}", host.now());
    for instance in host.instances() {
        let popper = instance.popper();
        println!(
            "    #{:<2} {:<10} {:?} at {:?}",
            instance.id().get(),
            host.document().text_content(popper),
            instance.lifecycle(),
            host.document().bounds(popper).map(|r| (r.x0, r.y0)),
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut host = TooltipHost::new(HostConfig::default());
    let labels = ["Cut", "Copy", "Paste"];
    let mut buttons: Vec<NodeId> = Vec::new();
    {
        let doc = host.document_mut();
        let toolbar = doc.create_element("nav");
        doc.append_child(doc.body(), toolbar);
        for (i, label) in labels.iter().enumerate() {
            let button = doc.create_element("button");
            doc.add_class(button, "tool");
            doc.set_attribute(button, "title", label);
            doc.append_child(toolbar, button);
            let x = 20.0 + 90.0 * i as f64;
            doc.set_bounds(button, Rect::new(x, 200.0, x + 80.0, 230.0));
            buttons.push(button);
        }
    }

    // One call for every `.tool`; content is read from each element's title.
    let created = host.create(
        ".tool",
        PartialProps::default()
            .content(Content::producer(|doc, reference| {
                doc.attribute(reference, "title")
                    .map(|t| ContentValue::Text(t.into()))
            }))
            .delay((150, 50))
            .placement(Placement::parse("bottom").unwrap_or_default()),
    );
    println!("created {} tooltips", created.ids().len());

    host.dispatch_event(Event::new(EventKind::MouseEnter, buttons[0]).at(Point::new(40.0, 210.0)));
    host.advance(100);
    report(&host, "pointer over Cut, show delay pending");
    host.advance(60);
    report(&host, "delay elapsed, transition running");
    host.advance(300);
    report(&host, "transition done");

    // Sliding to the next button hides one and shows the other.
    host.dispatch_event(Event::new(EventKind::MouseLeave, buttons[0]).with_related(buttons[1]));
    host.dispatch_event(Event::new(EventKind::MouseEnter, buttons[1]));
    host.advance(500);
    report(&host, "moved to Copy");

    host.hide_all(HideAllOptions {
        duration: Some(0),
        ..HideAllOptions::default()
    });
    report(&host, "hide_all");
}
