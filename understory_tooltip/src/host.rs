// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owning host: document, instances, timers, listeners and defaults.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::dom::{Document, NodeId};
use crate::events::{Binder, Event, EventKind, Group, Handler, ListenTarget, Owner};
use crate::input::{InputModality, InputTracker};
use crate::instance::{Instance, InstanceId, InstanceState, Lifecycle, PendingTimers};
use crate::popper;
use crate::position::{BasicGeometry, GeometryEngine};
use crate::props::{Content, Guard, Hook, PartialProps, Props};
use crate::registry::Registry;
use crate::resolve::{self, DECLARATIVE_ATTRIBUTE, Resolution};
use crate::timer::{Task, TimerQueue};
use crate::warning::Warning;

/// Host environment settings.
#[derive(Clone, Debug)]
pub struct HostConfig {
    /// Surface configuration [`Warning`]s. Defaults to `cfg!(debug_assertions)`.
    pub validate: bool,
    /// User agent string, consulted for browser-specific option conflicts.
    pub user_agent: String,
    /// Run [`TooltipHost::auto_init`] once on the first [`TooltipHost::advance`].
    pub is_browser: bool,
    /// Visible area in document coordinates.
    pub viewport: Rect,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            validate: cfg!(debug_assertions),
            user_agent: String::new(),
            is_browser: false,
            viewport: Rect::new(0.0, 0.0, 1024.0, 768.0),
        }
    }
}

/// What [`TooltipHost::create`] attaches tooltips to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Targets {
    /// One element; yields [`Created::Single`] when live.
    Element(NodeId),
    /// A list of elements.
    Elements(Vec<NodeId>),
    /// Every element matching a selector.
    Selector(String),
}

impl From<NodeId> for Targets {
    fn from(value: NodeId) -> Self {
        Self::Element(value)
    }
}

impl From<Vec<NodeId>> for Targets {
    fn from(value: Vec<NodeId>) -> Self {
        Self::Elements(value)
    }
}

impl From<&[NodeId]> for Targets {
    fn from(value: &[NodeId]) -> Self {
        Self::Elements(value.to_vec())
    }
}

impl From<&str> for Targets {
    fn from(value: &str) -> Self {
        Self::Selector(String::from(value))
    }
}

impl From<String> for Targets {
    fn from(value: String) -> Self {
        Self::Selector(value)
    }
}

/// Result of [`TooltipHost::create`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Created {
    /// A single live element was given.
    Single(InstanceId),
    /// A list or selector was given (possibly matching nothing).
    Multiple(Vec<InstanceId>),
}

impl Created {
    /// Every created id.
    pub fn ids(&self) -> &[InstanceId] {
        match self {
            Self::Single(id) => core::slice::from_ref(id),
            Self::Multiple(ids) => ids,
        }
    }

    /// The id when exactly one element was targeted.
    pub fn single(&self) -> Option<InstanceId> {
        match self {
            Self::Single(id) => Some(*id),
            Self::Multiple(_) => None,
        }
    }
}

/// Instance excluded from [`TooltipHost::hide_all`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exclude {
    /// Keep the instance(s) of this reference element.
    Reference(NodeId),
    /// Keep this instance (matched by its popper).
    Instance(InstanceId),
}

/// Options for [`TooltipHost::hide_all`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HideAllOptions {
    /// Instance to leave alone.
    pub exclude: Option<Exclude>,
    /// Hide transition duration override in milliseconds.
    pub duration: Option<u64>,
}

/// Owns every tooltip and the state they share.
///
/// All work happens inside calls to this type: [`create`](Self::create) and
/// the instance operations, [`dispatch_event`](Self::dispatch_event) for input,
/// and [`advance`](Self::advance) for the clock. `E` computes popper positions.
///
/// ```rust
/// use kurbo::Rect;
/// use understory_tooltip::{Event, EventKind, HostConfig, Lifecycle, PartialProps, TooltipHost};
///
/// let mut host = TooltipHost::new(HostConfig::default());
/// let doc = host.document_mut();
/// let button = doc.create_element("button");
/// doc.append_child(doc.body(), button);
/// doc.set_bounds(button, Rect::new(100.0, 100.0, 180.0, 124.0));
///
/// let id = host
///     .create(button, PartialProps::default().content("Save").delay((200, 0)))
///     .single()
///     .unwrap();
///
/// host.dispatch_event(Event::new(EventKind::MouseEnter, button));
/// assert_eq!(host.lifecycle(id), Lifecycle::Unmounted);
/// host.advance(200);
/// assert_eq!(host.lifecycle(id), Lifecycle::Showing);
/// host.advance(300);
/// assert_eq!(host.lifecycle(id), Lifecycle::Visible);
/// ```
#[derive(Debug)]
pub struct TooltipHost<E: GeometryEngine = BasicGeometry> {
    pub(crate) doc: Document,
    pub(crate) config: HostConfig,
    pub(crate) engine: E,
    pub(crate) defaults: Props,
    pub(crate) instances: HashMap<InstanceId, Instance>,
    pub(crate) next_id: u64,
    pub(crate) registry: Registry,
    pub(crate) timers: TimerQueue,
    pub(crate) binder: Binder,
    pub(crate) input: InputTracker,
    pub(crate) input_bound: bool,
    pub(crate) warnings: Vec<Warning>,
}

impl TooltipHost<BasicGeometry> {
    /// A host with an empty document and the built-in geometry engine.
    pub fn new(config: HostConfig) -> Self {
        Self::with_engine(config, BasicGeometry)
    }
}

impl Default for TooltipHost<BasicGeometry> {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

impl<E: GeometryEngine> TooltipHost<E> {
    /// A host using `engine` for positioning.
    pub fn with_engine(config: HostConfig, engine: E) -> Self {
        let mut timers = TimerQueue::new();
        if config.is_browser {
            timers.schedule(0, Task::AutoInit);
        }
        Self {
            doc: Document::new(),
            config,
            engine,
            defaults: Props::default(),
            instances: HashMap::new(),
            next_id: 1,
            registry: Registry::new(),
            timers,
            binder: Binder::new(),
            input: InputTracker::default(),
            input_bound: false,
            warnings: Vec::new(),
        }
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access to the document, for mirroring host tree changes and layout.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Host settings.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// The geometry engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Defaults applied to instances created from now on.
    pub fn default_props(&self) -> &Props {
        &self.defaults
    }

    /// Look up an instance. `None` once destroyed.
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(&id)
    }

    /// Every live instance, in no particular order.
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.values()
    }

    /// The instance most recently created on `reference`.
    pub fn instance_for_reference(&self, reference: NodeId) -> Option<InstanceId> {
        self.registry.lookup_by_reference(reference)
    }

    /// The instance owning popper root `popper`.
    pub fn instance_for_popper(&self, popper: NodeId) -> Option<InstanceId> {
        self.registry.lookup_by_popper(popper)
    }

    /// Popper roots currently in the document, in document order.
    pub fn mounted_poppers(&self) -> Vec<NodeId> {
        self.registry.all_mounted_poppers(&self.doc)
    }

    /// Lifecycle phase of `id`; [`Lifecycle::Destroyed`] for unknown ids.
    pub fn lifecycle(&self, id: InstanceId) -> Lifecycle {
        self.instances
            .get(&id)
            .map_or(Lifecycle::Destroyed, Instance::lifecycle)
    }

    /// The last input modality.
    pub fn current_input(&self) -> InputModality {
        self.input.modality()
    }

    /// Current clock in milliseconds.
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    /// Number of tasks waiting on the clock.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Drain collected warnings (only collected when validating).
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        mem::take(&mut self.warnings)
    }

    /// Attach tooltips to `targets`.
    ///
    /// A single live element gives [`Created::Single`]; lists and selectors give
    /// [`Created::Multiple`]. Dead elements and invalid selectors give an empty
    /// [`Created::Multiple`].
    pub fn create(&mut self, targets: impl Into<Targets>, partial: PartialProps) -> Created {
        self.bind_input_listeners();
        self.report(resolve::validation_warnings(&partial));
        match targets.into() {
            Targets::Element(el) if self.doc.is_alive(el) => {
                Created::Single(self.create_one(el, &partial))
            }
            Targets::Element(el) => {
                tracing::debug!(reference = ?el, "tooltip target is not a live element");
                Created::Multiple(Vec::new())
            }
            Targets::Elements(els) => Created::Multiple(self.create_many(&els, &partial)),
            Targets::Selector(selector) => match self.doc.query_selector_all(&selector) {
                Ok(els) => Created::Multiple(self.create_many(&els, &partial)),
                Err(err) => {
                    tracing::debug!(%selector, %err, "invalid tooltip target selector");
                    Created::Multiple(Vec::new())
                }
            },
        }
    }

    fn create_many(&mut self, els: &[NodeId], partial: &PartialProps) -> Vec<InstanceId> {
        let live: Vec<NodeId> = els
            .iter()
            .copied()
            .filter(|&el| self.doc.is_alive(el))
            .collect();
        if live.len() > 1 {
            let content = partial.content.as_ref().unwrap_or(&self.defaults.content);
            if let Content::Node(node) = content {
                let node = *node;
                self.report([Warning::SharedContentNode { node }]);
            }
        }
        live.into_iter()
            .map(|el| self.create_one(el, partial))
            .collect()
    }

    fn create_one(&mut self, reference: NodeId, partial: &PartialProps) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        let Resolution {
            props,
            content,
            warnings,
        } = resolve::resolve(
            &self.doc,
            reference,
            partial,
            &self.defaults,
            &self.config.user_agent,
        );
        self.report(warnings);

        let popper = popper::build(&mut self.doc, id, &props, &content);
        let show_on_init = props.show_on_init;
        self.registry.register(reference, popper.root, id);
        self.instances.insert(
            id,
            Instance {
                id,
                reference,
                popper,
                props,
                content,
                state: InstanceState::default(),
                session: None,
                timers: PendingTimers::default(),
                generation: 0,
                cursor: None,
                cursor_locked: false,
                tracking_interactive: false,
            },
        );
        self.bind_triggers(id);
        tracing::debug!(?id, ?reference, "tooltip created");
        self.call_hook(id, |p| p.on_create.as_ref());
        if show_on_init {
            self.show(id);
        }
        id
    }

    /// Change the defaults used by instances created afterwards.
    ///
    /// Existing instances keep their resolved options.
    pub fn set_default_props(&mut self, partial: PartialProps) {
        self.report(resolve::validation_warnings(&partial));
        self.defaults.apply(&partial);
    }

    /// Create tooltips for every `[data-tippy]` element that has none yet.
    ///
    /// Elements whose attribute is empty are skipped.
    pub fn auto_init(&mut self) -> Vec<InstanceId> {
        self.bind_input_listeners();
        let selector = format!("[{DECLARATIVE_ATTRIBUTE}]");
        let Ok(found) = self.doc.query_selector_all(&selector) else {
            return Vec::new();
        };
        let fresh: Vec<NodeId> = found
            .into_iter()
            .filter(|&el| {
                self.doc
                    .attribute(el, DECLARATIVE_ATTRIBUTE)
                    .is_some_and(|v| !v.is_empty())
                    && self.registry.lookup_by_reference(el).is_none()
            })
            .collect();
        tracing::debug!(count = fresh.len(), "auto-initializing declarative tooltips");
        let empty = PartialProps::default();
        fresh
            .into_iter()
            .map(|el| self.create_one(el, &empty))
            .collect()
    }

    /// Hide every mounted tooltip except the excluded one, without delay.
    ///
    /// Works on a snapshot of the poppers mounted when called.
    pub fn hide_all(&mut self, options: HideAllOptions) {
        let excluded_popper = match options.exclude {
            Some(Exclude::Instance(id)) => self.instances.get(&id).map(|i| i.popper.root),
            _ => None,
        };
        for popper in self.registry.all_mounted_poppers(&self.doc) {
            let Some(id) = self.registry.lookup_by_popper(popper) else {
                continue;
            };
            let Some(instance) = self.instances.get(&id) else {
                continue;
            };
            let excluded = match options.exclude {
                Some(Exclude::Reference(reference)) => instance.reference == reference,
                Some(Exclude::Instance(_)) => excluded_popper == Some(popper),
                None => false,
            };
            if !excluded {
                self.hide_now(id, options.duration);
            }
        }
    }

    /// Feed an input event.
    pub fn dispatch_event(&mut self, event: Event) {
        let routed = self.binder.route(&self.doc, &event);
        for r in routed {
            match r.owner {
                Owner::Input => self.handle_input(r.handler, &event),
                Owner::Instance(id) => {
                    if self.instances.contains_key(&id) {
                        self.handle(id, r.handler, &event);
                    }
                }
            }
        }
    }

    /// Move the clock forward by `ms`, running every task that comes due, then
    /// flush pending position updates.
    pub fn advance(&mut self, ms: u64) {
        let until = self.timers.now().saturating_add(ms);
        while let Some(task) = self.timers.pop_due(until) {
            self.run(task);
        }
        self.timers.set_now(until);
        self.flush_positions(false);
    }

    /// Recompute the position of every mounted tooltip, e.g. after layout changed.
    pub fn update_positions(&mut self) {
        self.flush_positions(true);
    }

    pub(crate) fn flush_positions(&mut self, all: bool) {
        let viewport = self.config.viewport;
        for instance in self.instances.values_mut() {
            if let Some(session) = instance.session.as_mut()
                && (all || session.needs_update())
            {
                session.update(&mut self.doc, &self.engine, viewport);
            }
        }
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::Show(id) => {
                if let Some(i) = self.instances.get_mut(&id) {
                    i.timers.show = None;
                    self.do_show(id, None);
                }
            }
            Task::Hide(id) => {
                if let Some(i) = self.instances.get_mut(&id) {
                    i.timers.hide = None;
                    self.do_hide(id, None, false);
                }
            }
            Task::ShowComplete(id, generation) => self.complete_show(id, generation),
            Task::HideComplete(id, generation) => self.complete_hide(id, generation),
            Task::FollowCursor(id, point) => {
                if let Some(i) = self.instances.get_mut(&id) {
                    i.timers.follow = None;
                    self.apply_follow_cursor(id, point);
                }
            }
            Task::InteractiveMove(id, event) => {
                if let Some(i) = self.instances.get_mut(&id) {
                    i.timers.interactive = None;
                    self.check_interactive(id, &event);
                }
            }
            Task::AutoInit => {
                self.auto_init();
            }
        }
    }

    fn bind_input_listeners(&mut self) {
        if mem::replace(&mut self.input_bound, true) {
            return;
        }
        let b = &mut self.binder;
        b.bind_capture(EventKind::TouchStart, Owner::Input, Group::Input, Handler::InputTouchStart);
        b.bind_capture(EventKind::KeyDown, Owner::Input, Group::Input, Handler::InputKeyDown);
        b.bind_capture(EventKind::MouseMove, Owner::Input, Group::Input, Handler::InputMouseMove);
        b.bind(
            ListenTarget::Window,
            EventKind::WindowBlur,
            Owner::Input,
            Group::Input,
            Handler::InputWindowBlur,
        );
    }

    fn handle_input(&mut self, handler: Handler, _event: &Event) {
        let before = self.input.modality();
        match handler {
            Handler::InputTouchStart => self.input.touch_start(),
            Handler::InputKeyDown => self.input.key_down(),
            Handler::InputMouseMove => self.input.mouse_move(self.timers.now()),
            Handler::InputWindowBlur => self.input.window_blur(),
            _ => {}
        }
        let after = self.input.modality();
        if before != after {
            tracing::trace!(?before, ?after, "input modality changed");
        }
    }

    /// Emit and collect warnings when validating.
    pub(crate) fn report(&mut self, warnings: impl IntoIterator<Item = Warning>) {
        if !self.config.validate {
            return;
        }
        for warning in warnings {
            tracing::warn!("{warning}");
            self.warnings.push(warning);
        }
    }

    pub(crate) fn call_hook(&self, id: InstanceId, pick: impl Fn(&Props) -> Option<&Hook>) {
        if let Some(instance) = self.instances.get(&id) {
            if let Some(hook) = pick(&instance.props) {
                hook.call(instance);
            }
        }
    }

    /// Returns false if the guard vetoes; missing guards allow.
    pub(crate) fn check_guard(
        &self,
        id: InstanceId,
        pick: impl Fn(&Props) -> Option<&Guard>,
    ) -> bool {
        self.instances.get(&id).is_none_or(|instance| {
            pick(&instance.props).is_none_or(|guard| guard.allows(instance))
        })
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self, id: InstanceId) -> usize {
        self.binder.count(Owner::Instance(id))
    }

    #[cfg(test)]
    pub(crate) fn is_listening(
        &self,
        target: ListenTarget,
        kind: EventKind,
        id: InstanceId,
    ) -> bool {
        self.binder.is_bound(target, kind, Owner::Instance(id))
    }
}
