// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM-shaped events and the listener table that routes them.
//!
//! Routing follows the DOM's propagation phases, restricted to what tooltips need:
//!
//! 1. document listeners registered for capture,
//! 2. listeners on the target,
//! 3. listeners on the target's ancestors (bubbling events only),
//! 4. document then window listeners (bubbling events, or events without a target).
//!
//! `WindowBlur` is delivered to window listeners only. Routing returns a
//! snapshot, so handlers may bind and unbind freely while it is processed.

use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;

use crate::dom::{Document, NodeId};
use crate::instance::InstanceId;

/// Kinds of input events a host forwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer entered an element (does not bubble).
    MouseEnter,
    /// Pointer left an element (does not bubble).
    MouseLeave,
    /// Pointer moved.
    MouseMove,
    /// Pointer button pressed.
    MouseDown,
    /// Click.
    Click,
    /// Element gained focus (does not bubble).
    Focus,
    /// Element lost focus (does not bubble).
    Blur,
    /// Focus entered an element or its subtree.
    FocusIn,
    /// Focus left an element or its subtree.
    FocusOut,
    /// Touch started.
    TouchStart,
    /// Key pressed.
    KeyDown,
    /// The window lost focus.
    WindowBlur,
}

impl EventKind {
    /// Returns true if the event propagates to ancestors.
    pub fn bubbles(self) -> bool {
        !matches!(
            self,
            Self::MouseEnter | Self::MouseLeave | Self::Focus | Self::Blur | Self::WindowBlur
        )
    }
}

/// An input event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Element the event is dispatched to; `None` for document-level events.
    pub target: Option<NodeId>,
    /// For enter/leave and focus changes: the element on the other side.
    pub related_target: Option<NodeId>,
    /// Pointer position in document coordinates, for pointer events.
    pub position: Option<Point>,
}

impl Event {
    /// An event dispatched to `target`.
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target: Some(target),
            related_target: None,
            position: None,
        }
    }

    /// An event without a target element.
    pub fn document(kind: EventKind) -> Self {
        Self {
            kind,
            target: None,
            related_target: None,
            position: None,
        }
    }

    /// The window lost focus.
    pub fn window_blur() -> Self {
        Self::document(EventKind::WindowBlur)
    }

    /// Set the related target.
    #[must_use]
    pub fn with_related(mut self, related: NodeId) -> Self {
        self.related_target = Some(related);
        self
    }

    /// Set the pointer position.
    #[must_use]
    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }
}

/// Where a listener is attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ListenTarget {
    Node(NodeId),
    Document,
    Window,
}

/// Who owns a listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Owner {
    Input,
    Instance(InstanceId),
}

/// Listener groups, unbound together.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Group {
    /// Reference and popper listeners derived from the trigger options.
    Triggers,
    /// Document listeners that only exist while visible.
    Visible,
    /// The interactive mousemove tracker.
    Interactive,
    /// Input modality tracking.
    Input,
}

/// What to do when a listener fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Handler {
    Trigger,
    Untrigger,
    Toggle,
    FollowCursor,
    PopperEnter,
    PopperLeave,
    OutsideMouseDown,
    InteractiveMove,
    InputTouchStart,
    InputKeyDown,
    InputMouseMove,
    InputWindowBlur,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Listener {
    owner: Owner,
    group: Group,
    handler: Handler,
    capture: bool,
}

/// A listener selected for one event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Routed {
    pub(crate) owner: Owner,
    pub(crate) handler: Handler,
}

/// Listener table keyed by target and event kind.
#[derive(Clone, Debug, Default)]
pub(crate) struct Binder {
    table: HashMap<(ListenTarget, EventKind), SmallVec<[Listener; 2]>>,
}

impl Binder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a listener. Binding the same listener twice is a no-op.
    pub(crate) fn bind(
        &mut self,
        target: ListenTarget,
        kind: EventKind,
        owner: Owner,
        group: Group,
        handler: Handler,
    ) {
        self.insert(target, kind, owner, group, handler, false);
    }

    /// Add a capture-phase document listener.
    pub(crate) fn bind_capture(
        &mut self,
        kind: EventKind,
        owner: Owner,
        group: Group,
        handler: Handler,
    ) {
        self.insert(ListenTarget::Document, kind, owner, group, handler, true);
    }

    fn insert(
        &mut self,
        target: ListenTarget,
        kind: EventKind,
        owner: Owner,
        group: Group,
        handler: Handler,
        capture: bool,
    ) {
        let listener = Listener {
            owner,
            group,
            handler,
            capture,
        };
        let list = self.table.entry((target, kind)).or_default();
        if !list.contains(&listener) {
            list.push(listener);
        }
    }

    /// Remove every listener of `owner` in `group`.
    pub(crate) fn unbind_group(&mut self, owner: Owner, group: Group) {
        self.retain(|l| !(l.owner == owner && l.group == group));
    }

    /// Remove every listener of `owner`.
    pub(crate) fn unbind_owner(&mut self, owner: Owner) {
        self.retain(|l| l.owner != owner);
    }

    fn retain(&mut self, mut keep: impl FnMut(&Listener) -> bool) {
        self.table.retain(|_, list| {
            list.retain(|l| keep(l));
            !list.is_empty()
        });
    }

    /// Number of listeners `owner` has bound.
    pub(crate) fn count(&self, owner: Owner) -> usize {
        self.table
            .values()
            .flat_map(|list| list.iter())
            .filter(|l| l.owner == owner)
            .count()
    }

    /// Returns true if `owner` listens for `kind` on `target`.
    pub(crate) fn is_bound(&self, target: ListenTarget, kind: EventKind, owner: Owner) -> bool {
        self.table
            .get(&(target, kind))
            .is_some_and(|list| list.iter().any(|l| l.owner == owner))
    }

    /// Listeners for `event` in propagation order.
    pub(crate) fn route(&self, doc: &Document, event: &Event) -> SmallVec<[Routed; 8]> {
        let mut out = SmallVec::new();
        let mut push = |target: ListenTarget, capture: Option<bool>| {
            if let Some(list) = self.table.get(&(target, event.kind)) {
                out.extend(
                    list.iter()
                        .filter(|l| capture.is_none_or(|c| l.capture == c))
                        .map(|l| Routed {
                            owner: l.owner,
                            handler: l.handler,
                        }),
                );
            }
        };

        if event.kind == EventKind::WindowBlur {
            push(ListenTarget::Window, None);
            return out;
        }

        push(ListenTarget::Document, Some(true));
        let bubbles = event.kind.bubbles();
        match event.target.filter(|&t| doc.is_alive(t)) {
            Some(target) => {
                push(ListenTarget::Node(target), None);
                if bubbles {
                    let mut cur = doc.parent_of(target);
                    while let Some(node) = cur {
                        push(ListenTarget::Node(node), None);
                        cur = doc.parent_of(node);
                    }
                }
            }
            None if event.target.is_some() => return out,
            None => {}
        }
        if bubbles || event.target.is_none() {
            push(ListenTarget::Document, Some(false));
            push(ListenTarget::Window, None);
        }
        tracing::trace!(kind = ?event.kind, listeners = out.len(), "routed event");
        out
    }
}
