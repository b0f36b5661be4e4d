// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An interactive, click-triggered popover.
//!
//! The pointer can travel from the reference into the popper without the
//! popover closing; leaving both (plus `interactive_border`) closes it, as
//! does a mousedown anywhere else.
//!
//! Run:
//! - `RUST_LOG=understory_tooltip=trace \
//!   cargo run -p understory_tooltip_demos --example interactive_menu`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_tooltip::{
    Event, EventKind, Hook, HostConfig, Lifecycle, PartialProps, TooltipHost, Triggers,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut host = TooltipHost::new(HostConfig::default());
    let doc = host.document_mut();
    let body = doc.body();
    let avatar = doc.create_element("img");
    doc.append_child(body, avatar);
    doc.set_bounds(avatar, Rect::new(600.0, 20.0, 640.0, 60.0));

    // The popover content is a real subtree owned by the caller.
    let menu = doc.create_element("ul");
    for entry in ["Profile", "Settings", "Sign out"] {
        let item = doc.create_element("li");
        let text = doc.create_text(entry);
        doc.append_child(item, text);
        doc.append_child(menu, item);
    }

    let Some(id) = host
        .create(
            avatar,
            PartialProps::default()
                .content(menu)
                .trigger(Triggers::CLICK | Triggers::MOUSE_ENTER)
                .interactive(true)
                .interactive_border(8.0)
                .theme("light")
                .on_shown(Hook::new(|i| println!("    on_shown for #{}", i.id().get())))
                .on_hidden(Hook::new(|i| println!("    on_hidden for #{}", i.id().get()))),
        )
        .single()
    else {
        return;
    };
    let root = host.instance(id).map(|i| i.popper());
    if let Some(root) = root {
        host.document_mut().set_bounds(root, Rect::new(0.0, 0.0, 120.0, 90.0));
    }

    let step = |host: &mut TooltipHost, label: &str, event: Event| {
        host.dispatch_event(event);
        host.advance(400);
        let lifecycle: Lifecycle = host.lifecycle(id);
        println!("{label:<40} -> {lifecycle:?}");
    };

    step(&mut host, "hover the avatar", Event::new(EventKind::MouseEnter, avatar));
    if let Some(root) = root {
        println!("popper placed at {:?}", host.document().bounds(root));
        step(
            &mut host,
            "leave into the popper",
            Event::new(EventKind::MouseLeave, avatar).with_related(root),
        );
        step(
            &mut host,
            "leave the popper toward the page",
            Event::new(EventKind::MouseLeave, root).with_related(body),
        );
    }
    step(
        &mut host,
        "move within the interactive border",
        Event::new(EventKind::MouseMove, body).at(Point::new(620.0, 68.0)),
    );
    step(
        &mut host,
        "move far away",
        Event::new(EventKind::MouseMove, body).at(Point::new(100.0, 500.0)),
    );

    step(&mut host, "click the avatar", Event::new(EventKind::Click, avatar));
    step(&mut host, "mousedown elsewhere", Event::new(EventKind::MouseDown, body));

    host.destroy(id);
    println!("after destroy: {:?}, timers pending: {}", host.lifecycle(id), host.pending_timers());
}
