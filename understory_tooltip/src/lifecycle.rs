// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The show/hide state machine and the instance operations.
//!
//! ```text
//!            show (after delay)              duration.show
//! Unmounted ──────────────────► Showing ──────────────────► Visible
//!     ▲                            │  ▲                        │
//!     │ duration.hide              │  │ show                   │ hide (after delay)
//!     │ (unless keep_on_hide)      ▼  │                        ▼
//!     └──────────────────────── Hiding ◄───────────────────────┘
//! ```
//!
//! Every actual show or hide bumps the instance generation. Completion tasks
//! carry the generation they were scheduled with and do nothing when it no
//! longer matches, so an interrupted transition never completes.

use alloc::vec::Vec;
use kurbo::Point;

use crate::dom::NodeId;
use crate::events::{EventKind, Group, Handler, ListenTarget, Owner};
use crate::host::TooltipHost;
use crate::instance::{InstanceId, InstanceState};
use crate::popper::{self, popper_id};
use crate::position::{GeometryEngine, PositioningSession, cursor_rect};
use crate::props::{AppendTo, FollowCursor, PartialProps};
use crate::resolve;
use crate::timer::Task;
use crate::warning::Warning;

impl<E: GeometryEngine> TooltipHost<E> {
    /// Show after the configured show delay.
    ///
    /// No-op for disabled, visible and destroyed instances. Cancels a pending
    /// hide; a second call restarts the delay.
    pub fn show(&mut self, id: InstanceId) {
        self.schedule_show(id, None);
    }

    /// Show after `delay` milliseconds instead of the configured delay (0 shows now).
    pub fn show_after(&mut self, id: InstanceId, delay: u64) {
        self.schedule_show(id, Some(delay));
    }

    /// Hide after the configured hide delay. Cancels a pending show.
    pub fn hide(&mut self, id: InstanceId) {
        self.schedule_hide(id, None);
    }

    /// Hide after `delay` milliseconds instead of the configured delay (0 hides now).
    pub fn hide_after(&mut self, id: InstanceId, delay: u64) {
        self.schedule_hide(id, Some(delay));
    }

    /// Allow showing again.
    pub fn enable(&mut self, id: InstanceId) {
        if let Some(instance) = self.instances.get_mut(&id) {
            instance.state.is_enabled = true;
        }
    }

    /// Cancel every pending timer, hide immediately, and block shows until
    /// [`enable`](Self::enable). Listeners stay bound.
    pub fn disable(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        let hiding = !instance.state.is_visible
            && instance
                .timers
                .transition
                .is_some_and(|timer| self.timers.is_pending(timer));
        let generation = instance.generation;
        for timer in instance.timers.drain() {
            self.timers.cancel(timer);
        }
        if instance.state.is_visible {
            self.do_hide(id, Some(0), true);
        } else if hiding {
            self.complete_hide(id, generation);
        }
        if let Some(instance) = self.instances.get_mut(&id) {
            instance.state.is_enabled = false;
        }
        tracing::debug!(?id, "tooltip disabled");
    }

    /// Merge `partial` over the instance's current options and update in place.
    ///
    /// A content producer runs again only when `partial` sets `content`.
    /// Safe while visible: the popper root keeps its identity.
    pub fn set_props(&mut self, id: InstanceId, partial: PartialProps) {
        self.report(resolve::validation_warnings(&partial));
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        let prev = instance.props.clone();
        let mut next = prev.clone();
        next.apply(&partial);
        resolve::apply_conflicts(&mut next, &self.config.user_agent);

        let mut warnings = Vec::new();
        if partial.content.is_some() {
            instance.content = resolve::evaluate_content(
                &self.doc,
                instance.reference,
                &next.content,
                &mut warnings,
            );
        }
        let rerender = partial.content.is_some() || prev.allow_html != next.allow_html;
        let content = rerender.then(|| instance.content.clone());
        popper::update(&mut self.doc, &mut instance.popper, &prev, &next, content.as_ref());

        if instance.state.is_visible && prev.aria != next.aria {
            if let Some(aria) = prev.aria {
                self.doc.remove_attribute(instance.reference, aria.attribute());
            }
            if let Some(aria) = next.aria {
                self.doc
                    .set_attribute(instance.reference, aria.attribute(), &popper_id(id));
            }
        }
        if let Some(session) = instance.session.as_mut() {
            session.set_props(instance.popper, &next);
        }
        let rebind = prev.trigger != next.trigger
            || prev.touch != next.touch
            || prev.interactive != next.interactive
            || prev.follow_cursor != next.follow_cursor;
        instance.props = next;

        self.report(warnings);
        if rebind {
            self.bind_triggers(id);
        }
        self.flush_positions(false);
        tracing::debug!(?id, rebind, rerender, "tooltip props updated");
    }

    /// Tear down the instance. Later calls with the same id do nothing.
    pub fn destroy(&mut self, id: InstanceId) {
        let Some(mut instance) = self.instances.remove(&id) else {
            return;
        };
        for timer in instance.timers.drain() {
            self.timers.cancel(timer);
        }
        self.binder.unbind_owner(Owner::Instance(id));
        if let Some(session) = instance.session.take() {
            session.destroy();
        }
        if let Some(aria) = instance.props.aria
            && self.doc.attribute(instance.reference, aria.attribute()) == Some(&*popper_id(id))
        {
            self.doc.remove_attribute(instance.reference, aria.attribute());
        }
        popper::destroy(&mut self.doc, &instance.popper);
        self.registry
            .unregister(instance.reference, instance.popper.root, id);
        instance.state = InstanceState {
            is_enabled: false,
            is_visible: false,
            is_shown: false,
            is_mounted: false,
        };
        tracing::debug!(?id, "tooltip destroyed");
        if let Some(hook) = &instance.props.on_destroy {
            hook.call(&instance);
        }
    }

    pub(crate) fn schedule_show(&mut self, id: InstanceId, delay: Option<u64>) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        if let Some(timer) = instance.timers.hide.take() {
            self.timers.cancel(timer);
        }
        if !instance.state.is_enabled || instance.state.is_visible {
            return;
        }
        if let Some(timer) = instance.timers.show.take() {
            self.timers.cancel(timer);
        }
        let delay = delay.unwrap_or(instance.props.delay.show);
        if delay > 0 {
            instance.timers.show = Some(self.timers.schedule(delay, Task::Show(id)));
        } else {
            self.do_show(id, None);
        }
    }

    pub(crate) fn schedule_hide(&mut self, id: InstanceId, delay: Option<u64>) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        if let Some(timer) = instance.timers.show.take() {
            self.timers.cancel(timer);
        }
        if !instance.state.is_visible {
            return;
        }
        if let Some(timer) = instance.timers.hide.take() {
            self.timers.cancel(timer);
        }
        let delay = delay.unwrap_or(instance.props.delay.hide);
        if delay > 0 {
            instance.timers.hide = Some(self.timers.schedule(delay, Task::Hide(id)));
        } else {
            self.do_hide(id, None, false);
        }
    }

    /// Hide without delay, dropping any pending show or hide.
    pub(crate) fn hide_now(&mut self, id: InstanceId, duration: Option<u64>) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        for timer in [instance.timers.show.take(), instance.timers.hide.take()]
            .into_iter()
            .flatten()
        {
            self.timers.cancel(timer);
        }
        self.do_hide(id, duration, false);
    }

    pub(crate) fn do_show(&mut self, id: InstanceId, duration: Option<u64>) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        if !instance.state.is_enabled || instance.state.is_visible {
            return;
        }
        if !self.check_guard(id, |p| p.on_show.as_ref()) {
            tracing::debug!(?id, "show vetoed");
            return;
        }
        if let Some(instance) = self.instances.get_mut(&id) {
            instance.cursor_locked = false;
        }
        self.mount(id);

        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        instance.state.is_visible = true;
        instance.state.is_shown = false;
        let duration = duration.unwrap_or(instance.props.duration.show);
        popper::set_visible(&mut self.doc, &instance.popper, true);
        popper::set_transition_duration(&mut self.doc, &instance.popper, duration);
        if let Some(aria) = instance.props.aria {
            self.doc
                .set_attribute(instance.reference, aria.attribute(), &popper_id(id));
        }
        self.binder.bind(
            ListenTarget::Document,
            EventKind::MouseDown,
            Owner::Instance(id),
            Group::Visible,
            Handler::OutsideMouseDown,
        );
        instance.generation += 1;
        let generation = instance.generation;
        if let Some(timer) = instance.timers.transition.take() {
            self.timers.cancel(timer);
        }
        tracing::debug!(?id, duration, "showing tooltip");
        if duration == 0 {
            self.complete_show(id, generation);
        } else {
            instance.timers.transition =
                Some(self.timers.schedule(duration, Task::ShowComplete(id, generation)));
        }
    }

    /// `force` skips the `on_hide` guard.
    pub(crate) fn do_hide(&mut self, id: InstanceId, duration: Option<u64>, force: bool) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        if !instance.state.is_visible {
            return;
        }
        if !force && !self.check_guard(id, |p| p.on_hide.as_ref()) {
            tracing::debug!(?id, "hide vetoed");
            return;
        }
        self.stop_interactive_tracking(id);
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        instance.state.is_visible = false;
        instance.state.is_shown = false;
        let duration = duration.unwrap_or(instance.props.duration.hide);
        popper::set_visible(&mut self.doc, &instance.popper, false);
        popper::set_transition_duration(&mut self.doc, &instance.popper, duration);
        if let Some(aria) = instance.props.aria {
            self.doc.remove_attribute(instance.reference, aria.attribute());
        }
        self.binder.unbind_group(Owner::Instance(id), Group::Visible);
        if let Some(timer) = instance.timers.follow.take() {
            self.timers.cancel(timer);
        }
        instance.generation += 1;
        let generation = instance.generation;
        if let Some(timer) = instance.timers.transition.take() {
            self.timers.cancel(timer);
        }
        tracing::debug!(?id, duration, "hiding tooltip");
        if duration == 0 {
            self.complete_hide(id, generation);
        } else {
            instance.timers.transition =
                Some(self.timers.schedule(duration, Task::HideComplete(id, generation)));
        }
    }

    pub(crate) fn complete_show(&mut self, id: InstanceId, generation: u64) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        if instance.generation != generation || !instance.state.is_visible {
            return;
        }
        instance.timers.transition = None;
        instance.state.is_shown = true;
        tracing::debug!(?id, "tooltip shown");
        self.call_hook(id, |p| p.on_shown.as_ref());
    }

    pub(crate) fn complete_hide(&mut self, id: InstanceId, generation: u64) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        if instance.generation != generation || instance.state.is_visible {
            return;
        }
        instance.timers.transition = None;
        if !instance.props.keep_on_hide {
            self.doc.detach(instance.popper.root);
            instance.state.is_mounted = false;
            if let Some(session) = instance.session.take() {
                session.destroy();
            }
        }
        tracing::debug!(?id, "tooltip hidden");
        self.call_hook(id, |p| p.on_hidden.as_ref());
    }

    /// Attach the popper (if needed) and position it.
    fn mount(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        let root = instance.popper.root;
        let newly_mounted = !(instance.state.is_mounted && self.doc.is_connected(root));
        if newly_mounted {
            let parent = self.append_target(id);
            if !self.doc.append_child(parent, root) {
                let body = self.doc.body();
                self.doc.append_child(body, root);
            }
        }

        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        instance.state.is_mounted = true;
        if instance.session.is_none() {
            match PositioningSession::create(
                &self.doc,
                instance.reference,
                instance.popper,
                &instance.props,
            ) {
                Ok(session) => instance.session = Some(session),
                Err(err) => tracing::debug!(?id, %err, "tooltip mounted without positioning"),
            }
        }
        if let Some(cursor) = instance.cursor
            && instance.props.follow_cursor != FollowCursor::Off
        {
            self.apply_follow_cursor(id, cursor);
        }
        if let Some(session) = self
            .instances
            .get_mut(&id)
            .and_then(|i| i.session.as_mut())
        {
            session.update(&mut self.doc, &self.engine, self.config.viewport);
        }
        if newly_mounted {
            self.call_hook(id, |p| p.on_mount.as_ref());
        }
    }

    /// The element the popper is appended to, falling back to body.
    fn append_target(&mut self, id: InstanceId) -> NodeId {
        let Some(instance) = self.instances.get(&id) else {
            return self.doc.body();
        };
        let reference = instance.reference;
        let target = match &instance.props.append_to {
            AppendTo::Body => return self.doc.body(),
            AppendTo::Parent => self.doc.parent_of(reference),
            AppendTo::Element(node) => Some(*node),
            AppendTo::Producer(producer) => producer.produce(&self.doc, reference),
        };
        match target.filter(|&node| self.doc.is_alive(node)) {
            Some(node) => node,
            None => {
                self.report([Warning::AppendToNotElement { reference }]);
                self.doc.body()
            }
        }
    }

    /// Point the session at the cursor, per the follow mode.
    pub(crate) fn apply_follow_cursor(&mut self, id: InstanceId, cursor: Point) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        let mode = instance.props.follow_cursor;
        if mode == FollowCursor::Off || (mode == FollowCursor::Initial && instance.cursor_locked) {
            return;
        }
        let Some(session) = instance.session.as_mut() else {
            return;
        };
        let Some(reference) = self.doc.bounds(instance.reference) else {
            return;
        };
        let rect = cursor_rect(
            reference,
            cursor,
            mode == FollowCursor::Horizontal,
            mode == FollowCursor::Vertical,
        );
        session.set_virtual_reference(Some(rect));
        session.update(&mut self.doc, &self.engine, self.config.viewport);
        if mode == FollowCursor::Initial {
            instance.cursor_locked = true;
        }
    }
}
