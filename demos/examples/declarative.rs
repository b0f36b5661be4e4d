// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative tooltips from `data-tippy` attributes.
//!
//! A host configured as a browser runs `auto_init` on its first clock tick.
//! Malformed attributes and unknown options surface as warnings when
//! validation is on.
//!
//! Run:
//! - `RUST_LOG=understory_tooltip=warn cargo run -p understory_tooltip_demos --example declarative`

use kurbo::Rect;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use understory_tooltip::{DECLARATIVE_ATTRIBUTE, HostConfig, PartialProps, TooltipHost};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut host = TooltipHost::new(HostConfig {
        validate: true,
        is_browser: true,
        ..HostConfig::default()
    });

    let attributes = [
        String::from("Plain text content"),
        json!({ "content": "From JSON", "placement": "right-start", "arrow": false }).to_string(),
        json!({ "content": "Shown at once", "showOnInit": true, "duration": 0 }).to_string(),
        String::from("{ not json"),
        json!({ "content": "Typo", "plcement": "left" }).to_string(),
    ];
    let doc = host.document_mut();
    for (i, attribute) in attributes.iter().enumerate() {
        let link = doc.create_element("a");
        doc.set_attribute(link, DECLARATIVE_ATTRIBUTE, attribute);
        doc.append_child(doc.body(), link);
        let y = 40.0 * (i as f64 + 1.0);
        doc.set_bounds(link, Rect::new(40.0, y, 160.0, y + 20.0));
    }

    host.set_default_props(PartialProps::default().theme("translucent"));
    host.advance(0);

    for instance in host.instances() {
        println!(
            "#{} {:?} placement={} arrow={} content={:?}",
            instance.id().get(),
            instance.lifecycle(),
            instance.props().placement,
            instance.props().arrow,
            host.document().text_content(instance.popper()),
        );
    }
    for warning in host.take_warnings() {
        println!("warning: {warning}");
    }
}
