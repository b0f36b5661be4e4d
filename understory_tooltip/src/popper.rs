// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popper subtree construction and in-place updates.
//!
//! ```text
//! div.tippy-popper#tippy-N [role] {z-index}
//! └── div.tippy-tooltip [data-placement data-animation data-state ...] {max-width}
//!     ├── div.tippy-content
//!     ├── div.tippy-backdrop   (animate_fill)
//!     └── div.tippy-arrow      (arrow)
//! ```

use alloc::format;
use alloc::string::{String, ToString};

use crate::dom::{Document, NodeData, NodeId};
use crate::instance::InstanceId;
use crate::props::{ContentValue, MaxWidth, Props};

/// Class of every popper root.
pub const POPPER_CLASS: &str = "tippy-popper";
/// Class of the tooltip box.
pub const TOOLTIP_CLASS: &str = "tippy-tooltip";
/// Class of the content container.
pub const CONTENT_CLASS: &str = "tippy-content";
/// Class of the arrow.
pub const ARROW_CLASS: &str = "tippy-arrow";
/// Class of the fill backdrop.
pub const BACKDROP_CLASS: &str = "tippy-backdrop";

/// Nodes making up one popper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopperElement {
    /// Root; its identity never changes for the lifetime of the instance.
    pub root: NodeId,
    /// The `tippy-tooltip` box.
    pub tooltip: NodeId,
    /// The `tippy-content` container.
    pub content: NodeId,
    /// The arrow, when enabled.
    pub arrow: Option<NodeId>,
    /// The backdrop, when fill animation is enabled.
    pub backdrop: Option<NodeId>,
}

/// The value written to the popper root's `id` attribute.
pub fn popper_id(id: InstanceId) -> String {
    format!("tippy-{}", id.get())
}

/// Build a detached popper subtree for `props` and `content`.
pub(crate) fn build(
    doc: &mut Document,
    id: InstanceId,
    props: &Props,
    content: &ContentValue,
) -> PopperElement {
    let root = doc.create_element("div");
    doc.add_class(root, POPPER_CLASS);
    doc.set_attribute(root, "id", &popper_id(id));
    if let Some(role) = &props.role {
        doc.set_attribute(root, "role", role);
    }
    doc.set_style(root, "z-index", &props.z_index.to_string());

    let tooltip = doc.create_element("div");
    doc.add_class(tooltip, TOOLTIP_CLASS);
    doc.set_attribute(tooltip, "data-state", "hidden");
    doc.set_attribute(tooltip, "data-placement", &props.placement.to_string());
    doc.set_attribute(tooltip, "data-animation", &props.animation);
    set_flag(doc, tooltip, "data-inertia", props.inertia);
    set_flag(doc, tooltip, "data-interactive", props.interactive);
    set_max_width(doc, tooltip, props.max_width);
    for theme in props.theme.split_ascii_whitespace() {
        doc.add_class(tooltip, &format!("{theme}-theme"));
    }

    let container = doc.create_element("div");
    doc.add_class(container, CONTENT_CLASS);

    doc.append_child(root, tooltip);
    doc.append_child(tooltip, container);

    let mut popper = PopperElement {
        root,
        tooltip,
        content: container,
        arrow: None,
        backdrop: None,
    };
    set_backdrop(doc, &mut popper, props.animate_fill);
    set_arrow(doc, &mut popper, props.arrow);
    set_content(doc, &popper, content, props.allow_html);
    popper
}

/// Bring `popper` from `prev` to `next`, touching only the parts that differ.
///
/// `content` re-renders the content container when given; pass it when the
/// content value or `allow_html` changed.
pub(crate) fn update(
    doc: &mut Document,
    popper: &mut PopperElement,
    prev: &Props,
    next: &Props,
    content: Option<&ContentValue>,
) {
    if prev.placement != next.placement {
        doc.set_attribute(popper.tooltip, "data-placement", &next.placement.to_string());
    }
    if prev.animation != next.animation {
        doc.set_attribute(popper.tooltip, "data-animation", &next.animation);
    }
    if prev.inertia != next.inertia {
        set_flag(doc, popper.tooltip, "data-inertia", next.inertia);
    }
    if prev.interactive != next.interactive {
        set_flag(doc, popper.tooltip, "data-interactive", next.interactive);
    }
    if prev.max_width != next.max_width {
        set_max_width(doc, popper.tooltip, next.max_width);
    }
    if prev.theme != next.theme {
        for theme in prev.theme.split_ascii_whitespace() {
            doc.remove_class(popper.tooltip, &format!("{theme}-theme"));
        }
        for theme in next.theme.split_ascii_whitespace() {
            doc.add_class(popper.tooltip, &format!("{theme}-theme"));
        }
    }
    if prev.role != next.role {
        match &next.role {
            Some(role) => doc.set_attribute(popper.root, "role", role),
            None => doc.remove_attribute(popper.root, "role"),
        }
    }
    if prev.z_index != next.z_index {
        doc.set_style(popper.root, "z-index", &next.z_index.to_string());
    }
    if prev.animate_fill != next.animate_fill {
        set_backdrop(doc, popper, next.animate_fill);
    }
    if prev.arrow != next.arrow {
        set_arrow(doc, popper, next.arrow);
    }
    if let Some(content) = content {
        set_content(doc, popper, content, next.allow_html);
    }
}

/// Write `data-state` on the tooltip and backdrop.
pub(crate) fn set_visible(doc: &mut Document, popper: &PopperElement, visible: bool) {
    let state = if visible { "visible" } else { "hidden" };
    doc.set_attribute(popper.tooltip, "data-state", state);
    if let Some(backdrop) = popper.backdrop {
        doc.set_attribute(backdrop, "data-state", state);
    }
}

/// Write the transition duration on every animated part.
pub(crate) fn set_transition_duration(doc: &mut Document, popper: &PopperElement, ms: u64) {
    let value = format!("{ms}ms");
    doc.set_style(popper.tooltip, "transition-duration", &value);
    doc.set_style(popper.content, "transition-duration", &value);
    if let Some(backdrop) = popper.backdrop {
        doc.set_style(backdrop, "transition-duration", &value);
    }
}

/// Detach host-owned content and free the subtree.
pub(crate) fn destroy(doc: &mut Document, popper: &PopperElement) {
    release_content(doc, popper);
    doc.remove(popper.root);
}

fn set_content(doc: &mut Document, popper: &PopperElement, content: &ContentValue, html: bool) {
    release_content(doc, popper);
    match content {
        ContentValue::Text(text) if text.is_empty() => {}
        ContentValue::Text(text) => {
            let node = if html {
                doc.create_markup(text)
            } else {
                doc.create_text(text)
            };
            doc.append_child(popper.content, node);
        }
        ContentValue::Node(node) => {
            doc.append_child(popper.content, *node);
        }
    }
}

/// Empty the content container. Text and markup we created are freed;
/// host elements are only detached so the host keeps them.
fn release_content(doc: &mut Document, popper: &PopperElement) {
    let children = doc.children_of(popper.content).to_vec();
    for child in children {
        let owned = matches!(
            doc.data(child),
            Some(NodeData::Text(_) | NodeData::Markup(_))
        );
        if owned {
            doc.remove(child);
        } else {
            doc.detach(child);
        }
    }
}

fn set_arrow(doc: &mut Document, popper: &mut PopperElement, enabled: bool) {
    match (enabled, popper.arrow) {
        (true, None) => {
            let arrow = doc.create_element("div");
            doc.add_class(arrow, ARROW_CLASS);
            doc.append_child(popper.tooltip, arrow);
            popper.arrow = Some(arrow);
        }
        (false, Some(arrow)) => {
            doc.remove(arrow);
            popper.arrow = None;
        }
        _ => {}
    }
}

fn set_backdrop(doc: &mut Document, popper: &mut PopperElement, enabled: bool) {
    match (enabled, popper.backdrop) {
        (true, None) => {
            let backdrop = doc.create_element("div");
            doc.add_class(backdrop, BACKDROP_CLASS);
            let state = doc
                .attribute(popper.tooltip, "data-state")
                .unwrap_or("hidden")
                .to_string();
            doc.set_attribute(backdrop, "data-state", &state);
            doc.append_child(popper.tooltip, backdrop);
            doc.set_attribute(popper.tooltip, "data-animatefill", "");
            popper.backdrop = Some(backdrop);
        }
        (false, Some(backdrop)) => {
            doc.remove(backdrop);
            doc.remove_attribute(popper.tooltip, "data-animatefill");
            popper.backdrop = None;
        }
        _ => {}
    }
}

fn set_flag(doc: &mut Document, node: NodeId, name: &str, on: bool) {
    if on {
        doc.set_attribute(node, name, "");
    } else {
        doc.remove_attribute(node, name);
    }
}

fn set_max_width(doc: &mut Document, node: NodeId, max_width: MaxWidth) {
    match max_width {
        MaxWidth::Px(px) => doc.set_style(node, "max-width", &format!("{px}px")),
        MaxWidth::Unbounded => doc.set_style(node, "max-width", "none"),
    }
}
