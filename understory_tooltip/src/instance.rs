// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-reference tooltip instances.

use kurbo::Point;

use crate::dom::NodeId;
use crate::popper::PopperElement;
use crate::position::PositioningSession;
use crate::props::{ContentValue, Props};
use crate::timer::TimerId;

/// Identifier for a tooltip instance. Never reused within a host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u64);

impl InstanceId {
    /// The numeric part of the popper's `tippy-N` id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Lifecycle flags of an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstanceState {
    /// Shows are allowed.
    pub is_enabled: bool,
    /// `data-state` is `visible` (set when a show starts, cleared when a hide starts).
    pub is_visible: bool,
    /// The show transition finished and no hide has started since.
    pub is_shown: bool,
    /// The popper is attached to the document.
    pub is_mounted: bool,
}

impl Default for InstanceState {
    fn default() -> Self {
        Self {
            is_enabled: true,
            is_visible: false,
            is_shown: false,
            is_mounted: false,
        }
    }
}

/// Derived lifecycle phase, see [`TooltipHost::lifecycle`](crate::TooltipHost::lifecycle).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Popper not in the document.
    Unmounted,
    /// Mounted but hidden (with `keep_on_hide`).
    Hidden,
    /// Show transition running.
    Showing,
    /// Fully shown.
    Visible,
    /// Hide transition running.
    Hiding,
    /// Unknown or destroyed id.
    Destroyed,
}

/// Timers an instance may have pending, at most one of each.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PendingTimers {
    pub(crate) show: Option<TimerId>,
    pub(crate) hide: Option<TimerId>,
    pub(crate) transition: Option<TimerId>,
    pub(crate) follow: Option<TimerId>,
    pub(crate) interactive: Option<TimerId>,
}

impl PendingTimers {
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = TimerId> {
        let all = [
            self.show.take(),
            self.hide.take(),
            self.transition.take(),
            self.follow.take(),
            self.interactive.take(),
        ];
        all.into_iter().flatten()
    }
}

/// A tooltip attached to one reference element.
///
/// Owned by the [`TooltipHost`](crate::TooltipHost); hooks receive a shared borrow.
#[derive(Debug)]
pub struct Instance {
    pub(crate) id: InstanceId,
    pub(crate) reference: NodeId,
    pub(crate) popper: PopperElement,
    pub(crate) props: Props,
    pub(crate) content: ContentValue,
    pub(crate) state: InstanceState,
    pub(crate) session: Option<PositioningSession>,
    pub(crate) timers: PendingTimers,
    /// Bumped by each actual show or hide; completions carry the value they were scheduled with.
    pub(crate) generation: u64,
    /// Last pointer position seen by the follow-cursor handler.
    pub(crate) cursor: Option<Point>,
    /// `FollowCursor::Initial` already placed the popper for this show.
    pub(crate) cursor_locked: bool,
    /// The document mousemove tracker for interactive hiding is bound.
    pub(crate) tracking_interactive: bool,
}

impl Instance {
    /// This instance's id.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The reference element.
    pub fn reference(&self) -> NodeId {
        self.reference
    }

    /// Root node of the popper subtree.
    pub fn popper(&self) -> NodeId {
        self.popper.root
    }

    /// The popper parts.
    pub fn popper_element(&self) -> &PopperElement {
        &self.popper
    }

    /// Resolved options.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// The rendered content value.
    pub fn content(&self) -> &ContentValue {
        &self.content
    }

    /// Current flags.
    pub fn state(&self) -> InstanceState {
        self.state
    }

    /// Derived lifecycle phase.
    pub fn lifecycle(&self) -> Lifecycle {
        let transitioning = self.timers.transition.is_some();
        match (self.state.is_mounted, self.state.is_visible) {
            (false, _) => Lifecycle::Unmounted,
            (true, true) if self.state.is_shown => Lifecycle::Visible,
            (true, true) => Lifecycle::Showing,
            (true, false) if transitioning => Lifecycle::Hiding,
            (true, false) => Lifecycle::Hidden,
        }
    }
}
