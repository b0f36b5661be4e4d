// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip options: the resolved [`Props`] and the layered [`PartialProps`].
//!
//! Every option has a Rust field and a camelCase key used by the dynamic JSON
//! path (declarative `data-tippy` attributes and [`PartialProps::from_json`]).
//! [`OPTION_KEYS`] lists the recognized keys; anything else is recorded as
//! unrecognized and reported by validation, never applied.
//!
//! ```rust
//! use understory_tooltip::{PartialProps, Props, Triggers};
//!
//! let mut props = Props::default();
//! props.apply(
//!     &PartialProps::default()
//!         .content("Saved")
//!         .delay((100, 0))
//!         .trigger(Triggers::CLICK),
//! );
//! assert_eq!(props.delay.show, 100);
//! assert_eq!(props.trigger, Triggers::CLICK);
//! ```

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde_json::Value;

use crate::dom::{Document, NodeId};
use crate::instance::Instance;

bitflags::bitflags! {
    /// Interactions that show and hide a tooltip.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Triggers: u8 {
        /// Pointer enters/leaves the reference (touchstart too when `touch` is on).
        const MOUSE_ENTER = 0b0000_0001;
        /// Reference gains/loses focus.
        const FOCUS       = 0b0000_0010;
        /// Focus enters/leaves the reference subtree.
        const FOCUS_IN    = 0b0000_0100;
        /// Clicking the reference toggles.
        const CLICK       = 0b0000_1000;
        /// Only programmatic calls.
        const MANUAL      = 0b0001_0000;
    }
}

impl Triggers {
    /// Parse a space-separated trigger list such as `"mouseenter focus"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut out = Self::empty();
        for word in s.split_ascii_whitespace() {
            out |= match word {
                "mouseenter" => Self::MOUSE_ENTER,
                "focus" => Self::FOCUS,
                "focusin" => Self::FOCUS_IN,
                "click" => Self::CLICK,
                "manual" => Self::MANUAL,
                _ => return None,
            };
        }
        Some(out)
    }
}

/// A `(show, hide)` pair of milliseconds, used for delays and durations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pair {
    /// Value used when showing.
    pub show: u64,
    /// Value used when hiding.
    pub hide: u64,
}

impl Pair {
    /// Same value in both directions.
    pub const fn both(value: u64) -> Self {
        Self {
            show: value,
            hide: value,
        }
    }
}

impl From<u64> for Pair {
    fn from(value: u64) -> Self {
        Self::both(value)
    }
}

impl From<(u64, u64)> for Pair {
    fn from((show, hide): (u64, u64)) -> Self {
        Self { show, hide }
    }
}

/// A renderable content value: what ends up in the tooltip's content container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentValue {
    /// Text; rendered as markup only when `allow_html` is set.
    Text(String),
    /// A host-owned node moved into the content container.
    Node(NodeId),
}

/// Produces content for a given reference element.
#[derive(Clone)]
pub struct ContentProducer(Rc<dyn Fn(&Document, NodeId) -> Option<ContentValue>>);

impl fmt::Debug for ContentProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentProducer(..)")
    }
}

impl ContentProducer {
    pub(crate) fn produce(&self, doc: &Document, reference: NodeId) -> Option<ContentValue> {
        (self.0)(doc, reference)
    }
}

/// The `content` option.
///
/// Producers run once per evaluation: at creation, and again only when a later
/// [`set_props`](crate::TooltipHost::set_props) carries a new `content`.
#[derive(Clone, Debug)]
pub enum Content {
    /// Plain text (or markup with `allow_html`).
    Text(String),
    /// A host-owned node.
    Node(NodeId),
    /// Computed from the reference element.
    Producer(ContentProducer),
}

impl Content {
    /// Content computed from the reference element; return `None` when there is nothing to show.
    pub fn producer(f: impl Fn(&Document, NodeId) -> Option<ContentValue> + 'static) -> Self {
        Self::Producer(ContentProducer(Rc::new(f)))
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NodeId> for Content {
    fn from(value: NodeId) -> Self {
        Self::Node(value)
    }
}

/// Picks the parent a popper is mounted under.
#[derive(Clone)]
pub struct AppendProducer(Rc<dyn Fn(&Document, NodeId) -> Option<NodeId>>);

impl fmt::Debug for AppendProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppendProducer(..)")
    }
}

impl AppendProducer {
    pub(crate) fn produce(&self, doc: &Document, reference: NodeId) -> Option<NodeId> {
        (self.0)(doc, reference)
    }
}

/// The `append_to` option.
#[derive(Clone, Debug, Default)]
pub enum AppendTo {
    /// The document body.
    #[default]
    Body,
    /// The reference element's parent.
    Parent,
    /// A fixed element.
    Element(NodeId),
    /// Computed from the reference element.
    Producer(AppendProducer),
}

impl AppendTo {
    /// Parent computed from the reference element.
    pub fn producer(f: impl Fn(&Document, NodeId) -> Option<NodeId> + 'static) -> Self {
        Self::Producer(AppendProducer(Rc::new(f)))
    }
}

impl From<NodeId> for AppendTo {
    fn from(value: NodeId) -> Self {
        Self::Element(value)
    }
}

/// Which ARIA relationship the reference gets while the tooltip is visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aria {
    /// `aria-describedby`.
    DescribedBy,
    /// `aria-labelledby`.
    LabelledBy,
}

impl Aria {
    /// Attribute name written on the reference.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::DescribedBy => "aria-describedby",
            Self::LabelledBy => "aria-labelledby",
        }
    }
}

/// Area the positioning engine keeps the popper inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Boundary {
    /// The host viewport.
    #[default]
    Viewport,
    /// The layout box of an element.
    Element(NodeId),
}

/// Whether the popper tracks the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FollowCursor {
    /// Position relative to the reference box.
    #[default]
    Off,
    /// Follow on both axes.
    Both,
    /// Follow horizontally, keep the reference's vertical extent.
    Horizontal,
    /// Follow vertically, keep the reference's horizontal extent.
    Vertical,
    /// Place at the pointer when shown, then stay put.
    Initial,
}

/// Clicking behavior while a tooltip is visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HideOnClick {
    /// Clicks outside hide; clicking a click-triggered reference toggles.
    #[default]
    Always,
    /// Clicking the reference toggles; outside clicks are ignored.
    Toggle,
    /// Never hide because of clicks.
    Never,
}

/// Maximum width of the tooltip box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaxWidth {
    /// Width in pixels.
    Px(f64),
    /// No limit.
    Unbounded,
}

/// Side of the reference the popper is placed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Above.
    Top,
    /// Below.
    Bottom,
    /// Left of.
    Left,
    /// Right of.
    Right,
}

impl Side {
    /// The side across the reference.
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Alignment along the side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    /// Start edges line up.
    Start,
    /// Centered.
    Center,
    /// End edges line up.
    End,
}

/// Preferred placement: a side plus an alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Side of the reference.
    pub side: Side,
    /// Alignment along that side.
    pub align: Align,
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Side::Top, Align::Center)
    }
}

impl Placement {
    /// Build a placement.
    pub const fn new(side: Side, align: Align) -> Self {
        Self { side, align }
    }

    /// Same alignment on the opposite side.
    pub fn flipped(self) -> Self {
        Self::new(self.side.opposite(), self.align)
    }

    /// Parse `"top"`, `"right-start"`, `"bottom-end"`, and so on.
    pub fn parse(s: &str) -> Option<Self> {
        let (side, align) = match s.split_once('-') {
            Some((side, "start")) => (side, Align::Start),
            Some((side, "end")) => (side, Align::End),
            Some(_) => return None,
            None => (s, Align::Center),
        };
        let side = match side {
            "top" => Side::Top,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            "right" => Side::Right,
            _ => return None,
        };
        Some(Self::new(side, align))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.side {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        })?;
        match self.align {
            Align::Start => f.write_str("-start"),
            Align::Center => Ok(()),
            Align::End => f.write_str("-end"),
        }
    }
}

/// Lifecycle callback.
#[derive(Clone)]
pub struct Hook(Rc<dyn Fn(&Instance)>);

impl Hook {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&Instance) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn call(&self, instance: &Instance) {
        (self.0)(instance);
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}

/// Lifecycle callback that can veto the transition by returning `false`.
#[derive(Clone)]
pub struct Guard(Rc<dyn Fn(&Instance) -> bool>);

impl Guard {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&Instance) -> bool + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn allows(&self, instance: &Instance) -> bool {
        (self.0)(instance)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

/// Conversion from a JSON option value.
///
/// `default` is the built-in value of the option, used to fill `null` slots of pairs.
/// Returns `None` when the value has the wrong shape.
pub(crate) trait OptionValue: Sized {
    fn from_json(value: &Value, default: &Self) -> Option<Self>;
}

impl OptionValue for bool {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        value.as_bool()
    }
}

impl OptionValue for f64 {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        value.as_f64()
    }
}

impl OptionValue for u64 {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        value.as_u64()
    }
}

impl OptionValue for i32 {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        value.as_i64().and_then(|v| i32::try_from(v).ok())
    }
}

impl OptionValue for String {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        value.as_str().map(ToString::to_string)
    }
}

impl OptionValue for Option<String> {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            Value::String(s) => Some(Some(s.clone())),
            _ => None,
        }
    }
}

impl OptionValue for Option<Aria> {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            Value::String(s) if s == "describedby" => Some(Some(Aria::DescribedBy)),
            Value::String(s) if s == "labelledby" => Some(Some(Aria::LabelledBy)),
            _ => None,
        }
    }
}

impl OptionValue for Content {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => Some(Self::Text(n.to_string())),
            _ => None,
        }
    }
}

impl OptionValue for Pair {
    fn from_json(value: &Value, default: &Self) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self::both),
            Value::Array(items) if items.len() == 2 => {
                let slot = |v: &Value, fallback: u64| match v {
                    Value::Null => Some(fallback),
                    v => v.as_u64(),
                };
                Some(Self {
                    show: slot(&items[0], default.show)?,
                    hide: slot(&items[1], default.hide)?,
                })
            }
            _ => None,
        }
    }
}

impl OptionValue for AppendTo {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        match value.as_str()? {
            "parent" => Some(Self::Parent),
            "body" => Some(Self::Body),
            _ => None,
        }
    }
}

impl OptionValue for Boundary {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        match value.as_str()? {
            "viewport" | "window" | "scrollParent" => Some(Self::Viewport),
            _ => None,
        }
    }
}

impl OptionValue for FollowCursor {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        match value {
            Value::Bool(true) => Some(Self::Both),
            Value::Bool(false) => Some(Self::Off),
            Value::String(s) => match s.as_str() {
                "horizontal" => Some(Self::Horizontal),
                "vertical" => Some(Self::Vertical),
                "initial" => Some(Self::Initial),
                _ => None,
            },
            _ => None,
        }
    }
}

impl OptionValue for HideOnClick {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        match value {
            Value::Bool(true) => Some(Self::Always),
            Value::Bool(false) => Some(Self::Never),
            Value::String(s) if s == "toggle" => Some(Self::Toggle),
            _ => None,
        }
    }
}

impl OptionValue for MaxWidth {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Px),
            Value::String(s) if s == "none" => Some(Self::Unbounded),
            Value::String(s) => s.strip_suffix("px")?.trim().parse().ok().map(Self::Px),
            _ => None,
        }
    }
}

impl OptionValue for Placement {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        Self::parse(value.as_str()?)
    }
}

impl OptionValue for Triggers {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        Self::parse(value.as_str()?)
    }
}

// Callbacks cannot be expressed in JSON; `null` clears them.
impl OptionValue for Option<Hook> {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        value.is_null().then_some(None)
    }
}

impl OptionValue for Option<Guard> {
    fn from_json(value: &Value, _: &Self) -> Option<Self> {
        value.is_null().then_some(None)
    }
}

macro_rules! define_props {
    ($(
        $(#[$meta:meta])*
        $field:ident: $ty:ty = $default:expr => $key:literal,
    )*) => {
        /// Resolved configuration of one tooltip.
        ///
        /// Instances hold their own copy; changing the host defaults later does not
        /// affect them. Replace values through
        /// [`TooltipHost::set_props`](crate::TooltipHost::set_props).
        #[derive(Clone, Debug)]
        pub struct Props {
            $(
                $(#[$meta])*
                pub $field: $ty,
            )*
        }

        impl Default for Props {
            fn default() -> Self {
                Self {
                    $( $field: $default, )*
                }
            }
        }

        /// A sparse set of options layered over [`Props`].
        ///
        /// Build it with the setter methods, or from JSON with [`PartialProps::from_json`].
        #[derive(Clone, Debug, Default)]
        pub struct PartialProps {
            $( pub(crate) $field: Option<$ty>, )*
            pub(crate) unrecognized: Vec<String>,
            pub(crate) invalid: Vec<String>,
        }

        impl PartialProps {
            $(
                $(#[$meta])*
                #[must_use]
                pub fn $field(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*

            fn set_json(&mut self, key: &str, value: &Value) {
                match key {
                    $(
                        $key => match <$ty as OptionValue>::from_json(value, &$default) {
                            Some(v) => self.$field = Some(v),
                            None => self.invalid.push(key.to_string()),
                        },
                    )*
                    _ => self.unrecognized.push(key.to_string()),
                }
            }

            /// Layer `other` over `self`: options set in `other` win.
            pub(crate) fn merge(&mut self, other: &Self) {
                $(
                    if other.$field.is_some() {
                        self.$field.clone_from(&other.$field);
                    }
                )*
                self.unrecognized.extend(other.unrecognized.iter().cloned());
                self.invalid.extend(other.invalid.iter().cloned());
            }

            /// Returns true if no option is set and nothing was rejected.
            pub fn is_empty(&self) -> bool {
                $( self.$field.is_none() && )*
                    self.unrecognized.is_empty() && self.invalid.is_empty()
            }
        }

        impl Props {
            /// Overwrite every option that `partial` sets.
            pub fn apply(&mut self, partial: &PartialProps) {
                $(
                    if let Some(v) = &partial.$field {
                        self.$field = v.clone();
                    }
                )*
            }
        }

        /// Every recognized option key, as used in JSON and declarative attributes.
        pub const OPTION_KEYS: &[&str] = &[$( $key, )*];
    };
}

define_props! {
    /// Render text content as markup instead of plain text.
    allow_html: bool = false => "allowHTML",
    /// Use a backdrop that fills the tooltip during the show animation.
    animate_fill: bool = true => "animateFill",
    /// Animation name written to `data-animation`.
    animation: String = String::from("fade") => "animation",
    /// Where the popper is mounted.
    append_to: AppendTo = AppendTo::Body => "appendTo",
    /// ARIA relationship set on the reference while visible.
    aria: Option<Aria> = Some(Aria::DescribedBy) => "aria",
    /// Render an arrow.
    arrow: bool = true => "arrow",
    /// Area the popper is kept inside.
    boundary: Boundary = Boundary::Viewport => "boundary",
    /// Tooltip content.
    content: Content = Content::default() => "content",
    /// Show/hide delays in milliseconds.
    delay: Pair = Pair::both(0) => "delay",
    /// Gap between reference and popper, in pixels.
    distance: f64 = 10.0 => "distance",
    /// Show/hide transition durations in milliseconds.
    duration: Pair = Pair { show: 300, hide: 250 } => "duration",
    /// Flip to the opposite side when the preferred one does not fit.
    flip: bool = true => "flip",
    /// Track the pointer.
    follow_cursor: FollowCursor = FollowCursor::Off => "followCursor",
    /// Click behavior while visible.
    hide_on_click: HideOnClick = HideOnClick::Always => "hideOnClick",
    /// Skip declarative attribute options.
    ignore_attributes: bool = false => "ignoreAttributes",
    /// Use an inertial easing; written to `data-inertia`.
    inertia: bool = false => "inertia",
    /// Keep the tooltip open while the pointer is over it.
    interactive: bool = false => "interactive",
    /// Extra pixels around reference and popper that still count as inside.
    interactive_border: f64 = 2.0 => "interactiveBorder",
    /// Debounce in milliseconds for pointer-move handling.
    interactive_debounce: u64 = 0 => "interactiveDebounce",
    /// Leave the popper mounted after hiding.
    keep_on_hide: bool = false => "keepOnHide",
    /// Maximum tooltip width.
    max_width: MaxWidth = MaxWidth::Px(350.0) => "maxWidth",
    /// Cross-axis offset in pixels.
    offset: f64 = 0.0 => "offset",
    /// Preferred placement.
    placement: Placement = Placement::default() => "placement",
    /// `role` attribute of the popper.
    role: Option<String> = Some(String::from("tooltip")) => "role",
    /// Show immediately after creation.
    show_on_init: bool = false => "showOnInit",
    /// Space-separated theme names; each adds a `<name>-theme` class.
    theme: String = String::new() => "theme",
    /// Respond to touch input.
    touch: bool = true => "touch",
    /// Interactions that show and hide the tooltip.
    trigger: Triggers = Triggers::MOUSE_ENTER.union(Triggers::FOCUS) => "trigger",
    /// `z-index` of the popper.
    z_index: i32 = 9999 => "zIndex",
    /// Called after the instance is created.
    on_create: Option<Hook> = None => "onCreate",
    /// Called when the instance is destroyed.
    on_destroy: Option<Hook> = None => "onDestroy",
    /// Called after the hide transition finished.
    on_hidden: Option<Hook> = None => "onHidden",
    /// Called before hiding; `false` cancels.
    on_hide: Option<Guard> = None => "onHide",
    /// Called after the popper is mounted.
    on_mount: Option<Hook> = None => "onMount",
    /// Called before showing; `false` cancels.
    on_show: Option<Guard> = None => "onShow",
    /// Called after the show transition finished.
    on_shown: Option<Hook> = None => "onShown",
    /// Called when a trigger event fires.
    on_trigger: Option<Hook> = None => "onTrigger",
    /// Called when an untrigger event fires.
    on_untrigger: Option<Hook> = None => "onUntrigger",
}

impl PartialProps {
    /// Build from a JSON object keyed by option name.
    ///
    /// Unknown keys and values of the wrong shape are kept aside for
    /// validation and never applied. Returns `None` if `value` is not an object.
    ///
    /// ```rust
    /// use understory_tooltip::PartialProps;
    ///
    /// let json = serde_json::json!({ "content": "Hi", "delay": [200, null], "foo": 1 });
    /// let partial = PartialProps::from_json(&json).unwrap();
    /// assert_eq!(partial.unrecognized(), ["foo"]);
    /// ```
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut out = Self::default();
        for (key, value) in object {
            out.set_json(key, value);
        }
        Some(out)
    }

    /// Keys that are not options.
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }

    /// Keys whose values had the wrong shape.
    pub fn invalid(&self) -> &[String] {
        &self.invalid
    }

    /// Set an `on_show` guard from a closure.
    #[must_use]
    pub fn on_show_fn(self, f: impl Fn(&Instance) -> bool + 'static) -> Self {
        self.on_show(Some(Guard::new(f)))
    }

    /// Set an `on_hide` guard from a closure.
    #[must_use]
    pub fn on_hide_fn(self, f: impl Fn(&Instance) -> bool + 'static) -> Self {
        self.on_hide(Some(Guard::new(f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let p = Props::default();
        assert_eq!(p.trigger, Triggers::MOUSE_ENTER | Triggers::FOCUS);
        assert_eq!(p.duration, Pair { show: 300, hide: 250 });
        assert_eq!(p.delay, Pair::both(0));
        assert_eq!(p.placement, Placement::new(Side::Top, Align::Center));
        assert_eq!(p.role.as_deref(), Some("tooltip"));
        assert!(p.arrow && p.animate_fill);
    }

    #[test]
    fn apply_only_overwrites_set_fields() {
        let mut p = Props::default();
        p.apply(&PartialProps::default().distance(4.0).interactive(true));
        assert_eq!(p.distance, 4.0);
        assert!(p.interactive);
        assert_eq!(p.animation, "fade");
    }

    #[test]
    fn json_values_are_parsed_per_option() {
        let partial = PartialProps::from_json(&json!({
            "allowHTML": true,
            "delay": [null, 120],
            "duration": 0,
            "trigger": "click focusin",
            "placement": "right-end",
            "followCursor": "horizontal",
            "hideOnClick": "toggle",
            "maxWidth": "none",
            "aria": null,
        }))
        .unwrap();
        let mut p = Props::default();
        p.apply(&partial);
        assert!(p.allow_html);
        assert_eq!(p.delay, Pair { show: 0, hide: 120 });
        assert_eq!(p.duration, Pair::both(0));
        assert_eq!(p.trigger, Triggers::CLICK | Triggers::FOCUS_IN);
        assert_eq!(p.placement, Placement::new(Side::Right, Align::End));
        assert_eq!(p.follow_cursor, FollowCursor::Horizontal);
        assert_eq!(p.hide_on_click, HideOnClick::Toggle);
        assert_eq!(p.max_width, MaxWidth::Unbounded);
        assert_eq!(p.aria, None);
        assert!(partial.unrecognized().is_empty());
        assert!(partial.invalid().is_empty());
    }

    #[test]
    fn duration_null_slot_falls_back_to_builtin() {
        let partial = PartialProps::from_json(&json!({ "duration": [null, 40] })).unwrap();
        assert_eq!(partial.duration, Some(Pair { show: 300, hide: 40 }));
    }

    #[test]
    fn unknown_and_invalid_keys_are_recorded_not_applied() {
        let partial =
            PartialProps::from_json(&json!({ "foo": 1, "arrow": "yes", "onShow": 3 })).unwrap();
        assert_eq!(partial.unrecognized(), ["foo"]);
        assert_eq!(partial.invalid(), ["arrow", "onShow"]);
        let mut p = Props::default();
        p.apply(&partial);
        assert!(p.arrow);
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(PartialProps::from_json(&json!([1, 2])).is_none());
        assert!(PartialProps::from_json(&json!("text")).is_none());
    }

    #[test]
    fn merge_prefers_later_layer() {
        let mut base = PartialProps::default().content("a").arrow(false);
        base.merge(&PartialProps::default().content("b"));
        assert!(matches!(base.content, Some(Content::Text(ref s)) if s == "b"));
        assert_eq!(base.arrow, Some(false));
    }

    #[test]
    fn option_keys_are_unique() {
        for (i, a) in OPTION_KEYS.iter().enumerate() {
            assert!(!OPTION_KEYS[i + 1..].contains(a), "duplicate key {a}");
        }
        assert!(OPTION_KEYS.contains(&"allowHTML"));
        assert!(!OPTION_KEYS.contains(&"target"));
    }

    #[test]
    fn placement_round_trips_through_display() {
        for s in ["top", "bottom-start", "left-end", "right"] {
            assert_eq!(Placement::parse(s).unwrap().to_string(), s);
        }
        assert!(Placement::parse("middle").is_none());
        assert!(Placement::parse("top-center").is_none());
    }

    #[test]
    fn trigger_parse_rejects_unknown_words() {
        assert_eq!(Triggers::parse("manual"), Some(Triggers::MANUAL));
        assert_eq!(Triggers::parse(""), Some(Triggers::empty()));
        assert_eq!(Triggers::parse("hover"), None);
    }
}
