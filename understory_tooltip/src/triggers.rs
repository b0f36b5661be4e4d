// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger bindings and the handlers that turn events into show/hide calls.
//!
//! | trigger      | reference listeners                                   |
//! |--------------|-------------------------------------------------------|
//! | `MOUSE_ENTER`| mouseenter → show, mouseleave → hide, touchstart → show (with `touch`) |
//! | `FOCUS`      | focus → show, blur → hide                             |
//! | `FOCUS_IN`   | focusin → show, focusout → hide                       |
//! | `CLICK`      | click → toggle                                        |
//! | `MANUAL`     | none                                                  |
//!
//! `follow_cursor` adds a reference mousemove listener; `interactive` adds
//! mouseenter/mouseleave on the popper root. While visible, a document
//! mousedown listener implements `hide_on_click`.

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::events::{Event, EventKind, Group, Handler, ListenTarget, Owner};
use crate::host::TooltipHost;
use crate::instance::InstanceId;
use crate::position::GeometryEngine;
use crate::props::{FollowCursor, HideOnClick, Side, Triggers};
use crate::timer::Task;

impl<E: GeometryEngine> TooltipHost<E> {
    /// Replace the trigger listeners of `id` with ones matching its options.
    pub(crate) fn bind_triggers(&mut self, id: InstanceId) {
        let owner = Owner::Instance(id);
        self.binder.unbind_group(owner, Group::Triggers);
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        let props = &instance.props;
        let reference = ListenTarget::Node(instance.reference);
        let popper = ListenTarget::Node(instance.popper.root);

        let mut pairs: SmallVec<[(ListenTarget, EventKind, Handler); 8]> = SmallVec::new();
        if props.trigger.contains(Triggers::MOUSE_ENTER) {
            pairs.push((reference, EventKind::MouseEnter, Handler::Trigger));
            pairs.push((reference, EventKind::MouseLeave, Handler::Untrigger));
            if props.touch {
                pairs.push((reference, EventKind::TouchStart, Handler::Trigger));
            }
        }
        if props.trigger.contains(Triggers::FOCUS) {
            pairs.push((reference, EventKind::Focus, Handler::Trigger));
            pairs.push((reference, EventKind::Blur, Handler::Untrigger));
        }
        if props.trigger.contains(Triggers::FOCUS_IN) {
            pairs.push((reference, EventKind::FocusIn, Handler::Trigger));
            pairs.push((reference, EventKind::FocusOut, Handler::Untrigger));
        }
        if props.trigger.contains(Triggers::CLICK) {
            pairs.push((reference, EventKind::Click, Handler::Toggle));
        }
        if props.follow_cursor != FollowCursor::Off {
            pairs.push((reference, EventKind::MouseMove, Handler::FollowCursor));
        }
        if props.interactive {
            pairs.push((popper, EventKind::MouseEnter, Handler::PopperEnter));
            pairs.push((popper, EventKind::MouseLeave, Handler::PopperLeave));
        }
        for (target, kind, handler) in pairs {
            self.binder.bind(target, kind, owner, Group::Triggers, handler);
        }
    }

    pub(crate) fn handle(&mut self, id: InstanceId, handler: Handler, event: &Event) {
        tracing::trace!(?id, ?handler, kind = ?event.kind, "tooltip handler");
        match handler {
            Handler::Trigger => self.on_trigger(id, event),
            Handler::Untrigger => self.on_untrigger(id, event),
            Handler::Toggle => self.on_toggle(id, event),
            Handler::FollowCursor => self.on_cursor_move(id, event),
            Handler::PopperEnter => self.on_popper_enter(id),
            Handler::PopperLeave => self.on_popper_leave(id, event),
            Handler::OutsideMouseDown => self.on_document_mouse_down(id, event),
            Handler::InteractiveMove => self.on_interactive_move(id, event),
            Handler::InputTouchStart
            | Handler::InputKeyDown
            | Handler::InputMouseMove
            | Handler::InputWindowBlur => {}
        }
    }

    /// Disabled instances ignore input; touch input is ignored without `touch`;
    /// focus is ignored while the current input is touch.
    fn is_stopped(&self, id: InstanceId, event: &Event) -> bool {
        let Some(instance) = self.instances.get(&id) else {
            return true;
        };
        if !instance.state.is_enabled {
            return true;
        }
        let touch = self.input.is_touch() || event.kind == EventKind::TouchStart;
        if touch && !instance.props.touch {
            return true;
        }
        matches!(event.kind, EventKind::Focus | EventKind::FocusIn) && self.input.is_touch()
    }

    fn remember_cursor(&mut self, id: InstanceId, event: &Event) {
        if let (Some(instance), Some(position)) = (self.instances.get_mut(&id), event.position) {
            instance.cursor = Some(position);
        }
    }

    fn on_trigger(&mut self, id: InstanceId, event: &Event) {
        if self.is_stopped(id, event) {
            return;
        }
        self.call_hook(id, |p| p.on_trigger.as_ref());
        self.remember_cursor(id, event);
        self.stop_interactive_tracking(id);
        self.schedule_show(id, None);
    }

    fn on_untrigger(&mut self, id: InstanceId, event: &Event) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        if !instance.state.is_enabled {
            return;
        }
        self.call_hook(id, |p| p.on_untrigger.as_ref());
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        if instance.props.interactive {
            let into_popper = event
                .related_target
                .is_some_and(|rt| self.doc.contains(instance.popper.root, rt));
            if into_popper {
                return;
            }
            if event.kind == EventKind::MouseLeave {
                self.start_interactive_tracking(id);
                self.on_interactive_move(id, event);
                return;
            }
        }
        self.schedule_hide(id, None);
    }

    fn on_toggle(&mut self, id: InstanceId, event: &Event) {
        if self.is_stopped(id, event) {
            return;
        }
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        if instance.state.is_visible && instance.props.hide_on_click != HideOnClick::Never {
            self.call_hook(id, |p| p.on_untrigger.as_ref());
            self.schedule_hide(id, None);
        } else {
            self.call_hook(id, |p| p.on_trigger.as_ref());
            self.remember_cursor(id, event);
            self.schedule_show(id, None);
        }
    }

    fn on_cursor_move(&mut self, id: InstanceId, event: &Event) {
        let Some(position) = event.position else {
            return;
        };
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        instance.cursor = Some(position);
        let debounce = instance.props.interactive_debounce;
        if debounce == 0 {
            self.apply_follow_cursor(id, position);
            return;
        }
        if let Some(timer) = instance.timers.follow.take() {
            self.timers.cancel(timer);
        }
        instance.timers.follow =
            Some(self.timers.schedule(debounce, Task::FollowCursor(id, position)));
    }

    fn on_popper_enter(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        if !instance.props.interactive || !instance.state.is_visible {
            return;
        }
        if let Some(timer) = instance.timers.hide.take() {
            self.timers.cancel(timer);
        }
        self.stop_interactive_tracking(id);
    }

    fn on_popper_leave(&mut self, id: InstanceId, event: &Event) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        if !instance.props.interactive || !instance.state.is_visible {
            return;
        }
        let into_reference = event
            .related_target
            .is_some_and(|rt| self.doc.contains(instance.reference, rt));
        if !into_reference {
            self.start_interactive_tracking(id);
            self.on_interactive_move(id, event);
        }
    }

    fn on_document_mouse_down(&mut self, id: InstanceId, event: &Event) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        if instance.props.hide_on_click != HideOnClick::Always {
            return;
        }
        if let Some(target) = event.target {
            if instance.props.interactive && self.doc.contains(instance.popper.root, target) {
                return;
            }
            if self.doc.contains(instance.reference, target) {
                if self.input.is_touch() {
                    return;
                }
                // The click toggle owns clicks on the reference.
                if instance.state.is_visible && instance.props.trigger.contains(Triggers::CLICK) {
                    return;
                }
            }
        }
        self.hide_now(id, None);
    }

    fn on_interactive_move(&mut self, id: InstanceId, event: &Event) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        let debounce = instance.props.interactive_debounce;
        if debounce == 0 {
            self.check_interactive(id, event);
            return;
        }
        if let Some(timer) = instance.timers.interactive.take() {
            self.timers.cancel(timer);
        }
        instance.timers.interactive =
            Some(self.timers.schedule(debounce, Task::InteractiveMove(id, *event)));
    }

    /// Hide once the pointer leaves the popper grown by `interactive_border`.
    ///
    /// The side facing the reference is grown by `distance` as well, so the
    /// gap between the two stays inside. Events without a position are
    /// ignored.
    pub(crate) fn check_interactive(&mut self, id: InstanceId, event: &Event) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        if !instance.tracking_interactive {
            return;
        }
        let reference = instance.reference;
        let popper = instance.popper.root;
        if event.kind == EventKind::MouseMove
            && let Some(target) = event.target
            && (self.doc.contains(reference, target) || self.doc.contains(popper, target))
        {
            return;
        }
        let Some(point) = event.position else {
            return;
        };
        if let Some(bounds) = self.doc.bounds(popper) {
            let side = instance
                .session
                .as_ref()
                .and_then(|s| s.last_position())
                .map_or(instance.props.placement.side, |p| p.placement.side);
            let region = interactive_region(
                bounds,
                side,
                instance.props.interactive_border,
                instance.props.distance,
            );
            if contains_inclusive(region, point) {
                return;
            }
        }
        self.stop_interactive_tracking(id);
        self.schedule_hide(id, None);
    }

    pub(crate) fn start_interactive_tracking(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        instance.tracking_interactive = true;
        self.binder.bind(
            ListenTarget::Document,
            EventKind::MouseMove,
            Owner::Instance(id),
            Group::Interactive,
            Handler::InteractiveMove,
        );
    }

    pub(crate) fn stop_interactive_tracking(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get_mut(&id) else {
            return;
        };
        instance.tracking_interactive = false;
        if let Some(timer) = instance.timers.interactive.take() {
            self.timers.cancel(timer);
        }
        self.binder.unbind_group(Owner::Instance(id), Group::Interactive);
    }
}

/// The popper box grown by `border`, plus `distance` toward the reference.
fn interactive_region(popper: Rect, side: Side, border: f64, distance: f64) -> Rect {
    let mut r = popper.inflate(border, border);
    match side {
        Side::Top => r.y1 += distance,
        Side::Bottom => r.y0 -= distance,
        Side::Left => r.x1 += distance,
        Side::Right => r.x0 -= distance,
    }
    r
}

fn contains_inclusive(r: Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use kurbo::{Point, Rect};

    use super::interactive_region;
    use crate::events::ListenTarget;
    use crate::props::Side;
    use crate::{
        Event, EventKind, FollowCursor, HideOnClick, Hook, HostConfig, InputModality, InstanceId,
        Lifecycle, NodeId, PartialProps, TooltipHost, Triggers,
    };

    struct Fixture {
        host: TooltipHost,
        button: NodeId,
        body: NodeId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut host = TooltipHost::new(HostConfig {
                validate: true,
                ..HostConfig::default()
            });
            let doc = host.document_mut();
            let body = doc.body();
            let button = doc.create_element("button");
            doc.append_child(body, button);
            doc.set_bounds(button, Rect::new(100.0, 300.0, 180.0, 324.0));
            Self { host, button, body }
        }

        /// Create on the button with zero durations and a 60x20 popper.
        fn create(&mut self, partial: PartialProps) -> InstanceId {
            let id = self
                .host
                .create(self.button, partial.duration(0))
                .single()
                .unwrap();
            let root = self.host.instance(id).unwrap().popper();
            self.host
                .document_mut()
                .set_bounds(root, Rect::new(0.0, 0.0, 60.0, 20.0));
            id
        }

        fn send(&mut self, event: Event) {
            self.host.dispatch_event(event);
        }

        fn root(&self, id: InstanceId) -> NodeId {
            self.host.instance(id).unwrap().popper()
        }
    }

    #[test]
    fn hover_shows_and_leave_hides() {
        let mut f = Fixture::new();
        let triggered = Rc::new(Cell::new(0));
        let t = triggered.clone();
        let hook = Hook::new(move |_| t.set(t.get() + 1));
        let id = f.create(PartialProps::default().on_trigger(hook));
        f.send(Event::new(EventKind::MouseEnter, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
        assert_eq!(triggered.get(), 1);
        f.send(Event::new(EventKind::MouseLeave, f.button).with_related(f.body));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);
    }

    #[test]
    fn hide_delay_is_cancelled_by_reentering() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().delay((0, 100)));
        f.send(Event::new(EventKind::MouseEnter, f.button));
        f.send(Event::new(EventKind::MouseLeave, f.button));
        f.host.advance(50);
        f.send(Event::new(EventKind::MouseEnter, f.button));
        f.host.advance(200);
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
    }

    #[test]
    fn focus_is_ignored_after_touch() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default());
        f.send(Event::new(EventKind::TouchStart, f.body));
        assert_eq!(f.host.current_input(), InputModality::Touch);
        f.send(Event::new(EventKind::Focus, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);

        f.send(Event::new(EventKind::KeyDown, f.body));
        assert_eq!(f.host.current_input(), InputModality::Keyboard);
        f.send(Event::new(EventKind::Focus, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
        f.send(Event::new(EventKind::Blur, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);

        f.send(Event::new(EventKind::TouchStart, f.body));
        f.send(Event::window_blur());
        assert_eq!(f.host.current_input(), InputModality::Mouse);
    }

    #[test]
    fn touch_can_be_turned_off() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().touch(false));
        assert!(!f.host.is_listening(ListenTarget::Node(f.button), EventKind::TouchStart, id));
        f.send(Event::new(EventKind::TouchStart, f.button));
        // Compatibility mouse events that follow a touch are ignored too.
        f.send(Event::new(EventKind::MouseEnter, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);
    }

    #[test]
    fn touch_start_shows_with_touch_enabled() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default());
        f.send(Event::new(EventKind::TouchStart, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
        // A tap on the reference does not hide what it just showed.
        f.send(Event::new(EventKind::MouseDown, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
    }

    #[test]
    fn click_toggles() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().trigger(Triggers::CLICK));
        f.send(Event::new(EventKind::MouseEnter, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);

        f.send(Event::new(EventKind::Click, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
        f.send(Event::new(EventKind::MouseDown, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
        f.send(Event::new(EventKind::Click, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);
    }

    #[test]
    fn click_without_hide_on_click_stays_open() {
        let mut f = Fixture::new();
        let id = f.create(
            PartialProps::default()
                .trigger(Triggers::CLICK)
                .hide_on_click(HideOnClick::Never),
        );
        f.send(Event::new(EventKind::Click, f.button));
        f.send(Event::new(EventKind::Click, f.button));
        f.send(Event::new(EventKind::MouseDown, f.body));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
    }

    #[test]
    fn outside_mouse_down_hides() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default());
        f.send(Event::new(EventKind::MouseEnter, f.button));
        assert!(f.host.is_listening(ListenTarget::Document, EventKind::MouseDown, id));
        f.send(Event::new(EventKind::MouseDown, f.body));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);
        assert!(!f.host.is_listening(ListenTarget::Document, EventKind::MouseDown, id));
    }

    #[test]
    fn toggle_mode_ignores_outside_mouse_down() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().hide_on_click(HideOnClick::Toggle));
        f.send(Event::new(EventKind::MouseEnter, f.button));
        f.send(Event::new(EventKind::MouseDown, f.body));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
    }

    #[test]
    fn interactive_mouse_down_inside_popper_keeps_it() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().interactive(true));
        f.send(Event::new(EventKind::MouseEnter, f.button));
        let content = f.host.instance(id).unwrap().popper_element().content;
        f.send(Event::new(EventKind::MouseDown, content));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
    }

    #[test]
    fn interactive_hover_and_border() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().interactive(true));
        f.send(Event::new(EventKind::MouseEnter, f.button));
        let root = f.root(id);
        assert_eq!(
            f.host.document().bounds(root),
            Some(Rect::new(110.0, 270.0, 170.0, 290.0))
        );
        let tooltip = f.host.instance(id).unwrap().popper_element().tooltip;

        // Moving from the reference into the popper keeps it open.
        f.send(Event::new(EventKind::MouseLeave, f.button).with_related(tooltip));
        f.send(Event::new(EventKind::MouseEnter, root));
        f.send(Event::new(EventKind::MouseLeave, root).with_related(f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);

        // Leaving elsewhere starts tracking. The border and the gap toward the
        // reference still count as inside.
        f.send(Event::new(EventKind::MouseLeave, f.button).with_related(f.body));
        assert!(f.host.is_listening(ListenTarget::Document, EventKind::MouseMove, id));
        for (x, y) in [(140.0, 291.0), (140.0, 295.0), (140.0, 302.0), (171.0, 268.0)] {
            f.send(Event::new(EventKind::MouseMove, f.body).at(Point::new(x, y)));
            assert_eq!(f.host.lifecycle(id), Lifecycle::Visible, "({x}, {y})");
        }
        f.send(Event::new(EventKind::MouseMove, f.body).at(Point::new(175.0, 280.0)));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);
        assert!(!f.host.is_listening(ListenTarget::Document, EventKind::MouseMove, id));
    }

    #[test]
    fn interactive_leave_checks_its_own_position() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().interactive(true));
        f.send(Event::new(EventKind::MouseEnter, f.button));

        // Heading for the popper through the gap keeps it open.
        let leave = Event::new(EventKind::MouseLeave, f.button).with_related(f.body);
        f.send(leave.at(Point::new(140.0, 299.0)));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);

        // Leaving far away hides without waiting for a mousemove.
        f.send(Event::new(EventKind::MouseEnter, f.button));
        f.send(leave.at(Point::new(900.0, 700.0)));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);
    }

    #[test]
    fn interactive_popper_leave_checks_its_own_position() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().interactive(true));
        f.send(Event::new(EventKind::MouseEnter, f.button));
        let root = f.root(id);
        f.send(Event::new(EventKind::MouseLeave, f.button).with_related(root));
        f.send(Event::new(EventKind::MouseEnter, root));
        let leave = Event::new(EventKind::MouseLeave, root).with_related(f.body);
        f.send(leave.at(Point::new(140.0, 100.0)));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);
    }

    #[test]
    fn interactive_region_grows_toward_the_reference() {
        let popper = Rect::new(100.0, 100.0, 160.0, 120.0);
        assert_eq!(
            interactive_region(popper, Side::Top, 2.0, 10.0),
            Rect::new(98.0, 98.0, 162.0, 132.0)
        );
        assert_eq!(
            interactive_region(popper, Side::Bottom, 2.0, 10.0),
            Rect::new(98.0, 88.0, 162.0, 122.0)
        );
        assert_eq!(
            interactive_region(popper, Side::Left, 2.0, 10.0),
            Rect::new(98.0, 98.0, 172.0, 122.0)
        );
        assert_eq!(
            interactive_region(popper, Side::Right, 0.0, 5.0),
            Rect::new(95.0, 100.0, 160.0, 120.0)
        );
    }

    #[test]
    fn interactive_debounce_delays_the_check() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().interactive(true).interactive_debounce(30_u64));
        f.send(Event::new(EventKind::MouseEnter, f.button));
        f.send(Event::new(EventKind::MouseLeave, f.button).with_related(f.body));
        f.send(Event::new(EventKind::MouseMove, f.body).at(Point::new(500.0, 500.0)));
        f.host.advance(20);
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
        // Re-entering the popper cancels the pending check.
        f.send(Event::new(EventKind::MouseEnter, f.root(id)));
        f.host.advance(100);
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
    }

    #[test]
    fn follow_cursor_tracks_pointer() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().follow_cursor(FollowCursor::Both));
        f.send(Event::new(EventKind::MouseEnter, f.button).at(Point::new(150.0, 310.0)));
        let root = f.root(id);
        assert_eq!(
            f.host.document().bounds(root),
            Some(Rect::new(120.0, 280.0, 180.0, 300.0))
        );
        f.send(Event::new(EventKind::MouseMove, f.button).at(Point::new(120.0, 305.0)));
        assert_eq!(
            f.host.document().bounds(root),
            Some(Rect::new(90.0, 275.0, 150.0, 295.0))
        );
    }

    #[test]
    fn follow_cursor_initial_locks_after_show() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().follow_cursor(FollowCursor::Initial));
        f.send(Event::new(EventKind::MouseEnter, f.button).at(Point::new(150.0, 310.0)));
        f.send(Event::new(EventKind::MouseMove, f.button).at(Point::new(120.0, 305.0)));
        assert_eq!(f.host.document().bounds(f.root(id)).unwrap().x0, 120.0);
    }

    #[test]
    fn follow_cursor_horizontal_keeps_reference_edge() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default().follow_cursor(FollowCursor::Horizontal));
        f.send(Event::new(EventKind::MouseEnter, f.button).at(Point::new(150.0, 310.0)));
        assert_eq!(
            f.host.document().bounds(f.root(id)),
            Some(Rect::new(120.0, 270.0, 180.0, 290.0))
        );
    }

    #[test]
    fn set_props_rebinds_triggers() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default());
        let reference = ListenTarget::Node(f.button);
        assert!(f.host.is_listening(reference, EventKind::MouseEnter, id));
        assert!(f.host.is_listening(reference, EventKind::Focus, id));

        f.host.set_props(id, PartialProps::default().trigger(Triggers::CLICK));
        assert!(!f.host.is_listening(reference, EventKind::MouseEnter, id));
        assert!(f.host.is_listening(reference, EventKind::Click, id));
        f.send(Event::new(EventKind::MouseEnter, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);

        f.host.set_props(id, PartialProps::default().trigger(Triggers::MANUAL));
        f.send(Event::new(EventKind::Click, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);
        assert_eq!(f.host.listener_count(id), 0);
    }

    #[test]
    fn disabled_instance_ignores_input() {
        let mut f = Fixture::new();
        let id = f.create(PartialProps::default());
        f.host.disable(id);
        f.send(Event::new(EventKind::MouseEnter, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Unmounted);
        f.host.enable(id);
        f.send(Event::new(EventKind::MouseEnter, f.button));
        assert_eq!(f.host.lifecycle(id), Lifecycle::Visible);
    }
}
