// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Tooltip: a headless tooltip and popover lifecycle engine.
//!
//! Given reference elements in a [`Document`], this crate creates popper
//! subtrees whose visibility, content, and position follow user interaction
//! (hover, focus, click, touch) and programmatic calls.
//!
//! The crate is headless. A [`TooltipHost`] owns:
//! - the [`Document`] the host mirrors its tree and layout boxes into,
//! - every [`Instance`] with its resolved [`Props`], popper, and pending timers,
//! - a listener table that routes host [`Event`]s to trigger handlers,
//! - a deterministic millisecond clock driven by [`TooltipHost::advance`],
//! - the defaults applied to new instances and the current [`InputModality`].
//!
//! Positions come from a [`GeometryEngine`]; [`BasicGeometry`] places the
//! popper on one side of the reference and flips when it does not fit.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_tooltip::{
//!     Event, EventKind, HideAllOptions, HostConfig, Lifecycle, PartialProps, TooltipHost,
//! };
//!
//! let mut host = TooltipHost::new(HostConfig::default());
//! let doc = host.document_mut();
//! let button = doc.create_element("button");
//! doc.append_child(doc.body(), button);
//! doc.set_bounds(button, Rect::new(200.0, 200.0, 280.0, 224.0));
//!
//! let id = host
//!     .create(button, PartialProps::default().content("Copy link"))
//!     .single()
//!     .unwrap();
//!
//! // Hovering shows; the show transition takes 300 ms by default.
//! host.dispatch_event(Event::new(EventKind::MouseEnter, button));
//! host.advance(300);
//! assert_eq!(host.lifecycle(id), Lifecycle::Visible);
//!
//! let popper = host.instance(id).unwrap().popper();
//! assert_eq!(host.document().text_content(popper), "Copy link");
//!
//! host.hide_all(HideAllOptions { duration: Some(0), ..Default::default() });
//! assert_eq!(host.lifecycle(id), Lifecycle::Unmounted);
//! ```
//!
//! ## Declarative tooltips
//!
//! Elements carrying a `data-tippy` attribute pick it up at creation: a JSON
//! object is read as options, anything else as content.
//! [`TooltipHost::auto_init`] creates instances for all of them.
//!
//! ```rust
//! use understory_tooltip::{PartialProps, TooltipHost};
//!
//! let mut host = TooltipHost::default();
//! let doc = host.document_mut();
//! let a = doc.create_element("a");
//! doc.set_attribute(a, "data-tippy", r#"{"content": "Docs", "placement": "bottom"}"#);
//! doc.append_child(doc.body(), a);
//!
//! let ids = host.auto_init();
//! let props = host.instance(ids[0]).unwrap().props();
//! assert_eq!(props.placement.to_string(), "bottom");
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: `no_std` floating point through `kurbo/libm`.

#![no_std]

extern crate alloc;

mod dom;
mod events;
mod host;
mod input;
mod instance;
mod lifecycle;
mod popper;
mod position;
mod props;
mod registry;
mod resolve;
mod selector;
mod timer;
mod triggers;
mod warning;

pub use dom::{Descendants, Document, NodeData, NodeId};
pub use events::{Event, EventKind};
pub use host::{Created, Exclude, HideAllOptions, HostConfig, Targets, TooltipHost};
pub use input::{InputModality, MOUSE_MOVE_WINDOW_MS};
pub use instance::{Instance, InstanceId, InstanceState, Lifecycle};
pub use popper::{
    ARROW_CLASS, BACKDROP_CLASS, CONTENT_CLASS, POPPER_CLASS, PopperElement, TOOLTIP_CLASS,
    popper_id,
};
pub use position::{
    BasicGeometry, GeometryEngine, Position, PositionConfig, PositionError, PositionInput,
    PositioningSession,
};
pub use props::{
    Align, AppendProducer, AppendTo, Aria, Boundary, Content, ContentProducer, ContentValue,
    FollowCursor, Guard, HideOnClick, Hook, MaxWidth, OPTION_KEYS, Pair, PartialProps, Placement,
    Props, Side, Triggers,
};
pub use resolve::DECLARATIVE_ATTRIBUTE;
pub use selector::SelectorError;
pub use warning::Warning;
