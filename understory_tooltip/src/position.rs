// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positioning: a pluggable [`GeometryEngine`] and the per-instance
//! [`PositioningSession`] that applies its results to the document.
//!
//! The engine is pure: it maps a reference box, a popper size and a
//! configuration to a popper origin. [`BasicGeometry`] places the popper on a
//! side of the reference and flips to the opposite side when the boundary
//! cannot contain it.
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_tooltip::{
//!     BasicGeometry, GeometryEngine, Placement, PositionConfig, PositionInput,
//! };
//!
//! let input = PositionInput {
//!     reference: Rect::new(100.0, 100.0, 140.0, 120.0),
//!     popper: Size::new(60.0, 20.0),
//!     boundary: Rect::new(0.0, 0.0, 800.0, 600.0),
//!     config: PositionConfig {
//!         placement: Placement::default(),
//!         distance: 10.0,
//!         offset: 0.0,
//!         flip: true,
//!     },
//! };
//! let pos = BasicGeometry.compute(&input).unwrap();
//! assert_eq!((pos.origin.x, pos.origin.y), (90.0, 70.0));
//! ```

use alloc::string::ToString;

use kurbo::{Point, Rect, Size};

use crate::dom::{Document, NodeId};
use crate::popper::PopperElement;
use crate::props::{Align, Boundary, Placement, Props, Side};

/// Placement options consumed by an engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionConfig {
    /// Preferred placement.
    pub placement: Placement,
    /// Gap between reference and popper along the main axis.
    pub distance: f64,
    /// Shift along the cross axis.
    pub offset: f64,
    /// Allow flipping to the opposite side.
    pub flip: bool,
}

impl PositionConfig {
    pub(crate) fn from_props(props: &Props) -> Self {
        Self {
            placement: props.placement,
            distance: props.distance,
            offset: props.offset,
            flip: props.flip,
        }
    }
}

/// Everything an engine needs for one computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionInput {
    /// Reference box (or a virtual box when following the cursor).
    pub reference: Rect,
    /// Size of the popper.
    pub popper: Size,
    /// Area the popper should stay inside.
    pub boundary: Rect,
    /// Placement options.
    pub config: PositionConfig,
}

/// Computed popper position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    /// Top-left corner of the popper.
    pub origin: Point,
    /// Placement actually used (after flipping).
    pub placement: Placement,
}

/// Computes popper positions.
pub trait GeometryEngine {
    /// Returns `None` when no position can be computed; the previous one is kept.
    fn compute(&self, input: &PositionInput) -> Option<Position>;
}

/// Side placement with alignment, distance, offset, and flipping.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicGeometry;

impl GeometryEngine for BasicGeometry {
    fn compute(&self, input: &PositionInput) -> Option<Position> {
        if !input.reference.is_finite() {
            return None;
        }
        let preferred = input.config.placement;
        let rect = place(input, preferred);
        if input.config.flip && !fits(input.boundary, rect) {
            let flipped = preferred.flipped();
            let alt = place(input, flipped);
            if fits(input.boundary, alt) {
                return Some(Position {
                    origin: alt.origin(),
                    placement: flipped,
                });
            }
        }
        Some(Position {
            origin: rect.origin(),
            placement: preferred,
        })
    }
}

fn place(input: &PositionInput, placement: Placement) -> Rect {
    let r = input.reference;
    let Size { width, height } = input.popper;
    let PositionConfig {
        distance, offset, ..
    } = input.config;
    let along = |start: f64, end: f64, extent: f64| {
        let aligned = match placement.align {
            Align::Start => start,
            Align::Center => (start + end - extent) / 2.0,
            Align::End => end - extent,
        };
        aligned + offset
    };
    let origin = match placement.side {
        Side::Top => Point::new(along(r.x0, r.x1, width), r.y0 - distance - height),
        Side::Bottom => Point::new(along(r.x0, r.x1, width), r.y1 + distance),
        Side::Left => Point::new(r.x0 - distance - width, along(r.y0, r.y1, height)),
        Side::Right => Point::new(r.x1 + distance, along(r.y0, r.y1, height)),
    };
    Rect::from_origin_size(origin, input.popper)
}

fn fits(boundary: Rect, rect: Rect) -> bool {
    rect.x0 >= boundary.x0
        && rect.y0 >= boundary.y0
        && rect.x1 <= boundary.x1
        && rect.y1 <= boundary.y1
}

/// Why a session could not be created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The reference or popper node no longer exists.
    #[error("reference or popper node is stale")]
    Stale,
    /// The popper is not attached to the document.
    #[error("popper is not connected to the document")]
    Detached,
}

/// Positioning state of one mounted popper.
#[derive(Clone, Debug)]
pub struct PositioningSession {
    reference: NodeId,
    popper: PopperElement,
    config: PositionConfig,
    boundary: Boundary,
    virtual_reference: Option<Rect>,
    needs_update: bool,
    last: Option<Position>,
}

impl PositioningSession {
    /// Start positioning `popper` against `reference`.
    pub fn create(
        doc: &Document,
        reference: NodeId,
        popper: PopperElement,
        props: &Props,
    ) -> Result<Self, PositionError> {
        if !doc.is_alive(reference) || !doc.is_alive(popper.root) {
            return Err(PositionError::Stale);
        }
        if !doc.is_connected(popper.root) {
            return Err(PositionError::Detached);
        }
        Ok(Self {
            reference,
            popper,
            config: PositionConfig::from_props(props),
            boundary: props.boundary,
            virtual_reference: None,
            needs_update: true,
            last: None,
        })
    }

    /// Replace the options, e.g. after `set_props`.
    pub fn set_props(&mut self, popper: PopperElement, props: &Props) {
        self.popper = popper;
        self.config = PositionConfig::from_props(props);
        self.boundary = props.boundary;
        self.needs_update = true;
    }

    /// Use a virtual reference box instead of the reference element's bounds.
    pub fn set_virtual_reference(&mut self, rect: Option<Rect>) {
        self.virtual_reference = rect;
        self.needs_update = true;
    }

    /// The virtual reference box, if any.
    pub fn virtual_reference(&self) -> Option<Rect> {
        self.virtual_reference
    }

    /// Mark the position stale.
    pub fn schedule_update(&mut self) {
        self.needs_update = true;
    }

    /// Returns true if an update is pending.
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// The last successfully applied position.
    pub fn last_position(&self) -> Option<Position> {
        self.last
    }

    /// Recompute and write the popper's bounds and `data-placement`.
    ///
    /// When the engine gives up (or the reference is gone) the last good
    /// position stays in place.
    pub fn update<E: GeometryEngine + ?Sized>(
        &mut self,
        doc: &mut Document,
        engine: &E,
        viewport: Rect,
    ) -> Option<Position> {
        self.needs_update = false;
        let reference = match self.virtual_reference {
            Some(rect) => rect,
            None => doc.bounds(self.reference)?,
        };
        let popper_bounds = doc.bounds(self.popper.root)?;
        let boundary = match self.boundary {
            Boundary::Viewport => viewport,
            Boundary::Element(node) => doc.bounds(node).unwrap_or(viewport),
        };
        let input = PositionInput {
            reference,
            popper: popper_bounds.size(),
            boundary,
            config: self.config,
        };
        let Some(position) = engine.compute(&input) else {
            tracing::debug!(reference = ?self.reference, "geometry engine produced no position");
            return self.last;
        };
        doc.set_bounds(
            self.popper.root,
            Rect::from_origin_size(position.origin, popper_bounds.size()),
        );
        doc.set_attribute(
            self.popper.tooltip,
            "data-placement",
            &position.placement.to_string(),
        );
        self.last = Some(position);
        Some(position)
    }

    /// End the session.
    pub fn destroy(self) {
        tracing::trace!(reference = ?self.reference, "positioning session destroyed");
    }
}

/// Virtual reference box for a cursor position, per follow mode.
pub(crate) fn cursor_rect(
    reference: Rect,
    cursor: Point,
    horizontal: bool,
    vertical: bool,
) -> Rect {
    match (horizontal, vertical) {
        (true, false) => Rect::new(cursor.x, reference.y0, cursor.x, reference.y1),
        (false, true) => Rect::new(reference.x0, cursor.y, reference.x1, cursor.y),
        _ => Rect::from_origin_size(cursor, Size::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::InstanceId;
    use crate::popper;
    use crate::props::{ContentValue, PartialProps};
    use alloc::string::String;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    fn input(reference: Rect, placement: &str) -> PositionInput {
        PositionInput {
            reference,
            popper: Size::new(100.0, 40.0),
            boundary: VIEWPORT,
            config: PositionConfig {
                placement: Placement::parse(placement).unwrap(),
                distance: 10.0,
                offset: 0.0,
                flip: true,
            },
        }
    }

    #[test]
    fn sides_and_alignment() {
        let r = Rect::new(300.0, 300.0, 400.0, 320.0);
        let at = |p| BasicGeometry.compute(&input(r, p)).unwrap().origin;
        assert_eq!(at("top"), Point::new(300.0, 250.0));
        assert_eq!(at("bottom-start"), Point::new(300.0, 330.0));
        assert_eq!(at("bottom-end"), Point::new(300.0, 330.0));
        assert_eq!(at("left"), Point::new(190.0, 290.0));
        assert_eq!(at("right-start"), Point::new(410.0, 300.0));
    }

    #[test]
    fn offset_shifts_cross_axis() {
        let mut i = input(Rect::new(300.0, 300.0, 400.0, 320.0), "top");
        i.config.offset = 15.0;
        assert_eq!(BasicGeometry.compute(&i).unwrap().origin.x, 315.0);
    }

    #[test]
    fn flips_when_preferred_side_overflows() {
        let near_top = Rect::new(300.0, 5.0, 400.0, 25.0);
        let pos = BasicGeometry.compute(&input(near_top, "top")).unwrap();
        assert_eq!(pos.placement, Placement::parse("bottom").unwrap());
        assert_eq!(pos.origin.y, 35.0);

        let mut no_flip = input(near_top, "top");
        no_flip.config.flip = false;
        let pos = BasicGeometry.compute(&no_flip).unwrap();
        assert_eq!(pos.placement, Placement::parse("top").unwrap());
    }

    #[test]
    fn keeps_preferred_when_neither_side_fits() {
        let mut i = input(Rect::new(300.0, 5.0, 400.0, 25.0), "top");
        i.boundary = Rect::new(0.0, 0.0, 800.0, 40.0);
        let pos = BasicGeometry.compute(&i).unwrap();
        assert_eq!(pos.placement, Placement::parse("top").unwrap());
    }

    fn mounted() -> (Document, NodeId, PopperElement) {
        let mut doc = Document::new();
        let reference = doc.create_element("button");
        doc.append_child(doc.body(), reference);
        doc.set_bounds(reference, Rect::new(300.0, 300.0, 400.0, 320.0));
        let p = popper::build(
            &mut doc,
            InstanceId(1),
            &Props::default(),
            &ContentValue::Text(String::from("x")),
        );
        doc.set_bounds(p.root, Rect::new(0.0, 0.0, 100.0, 40.0));
        (doc, reference, p)
    }

    #[test]
    fn session_requires_connected_popper() {
        let (mut doc, reference, p) = mounted();
        assert_eq!(
            PositioningSession::create(&doc, reference, p, &Props::default()).unwrap_err(),
            PositionError::Detached
        );
        let body = doc.body();
        doc.append_child(body, p.root);
        doc.remove(reference);
        assert_eq!(
            PositioningSession::create(&doc, reference, p, &Props::default()).unwrap_err(),
            PositionError::Stale
        );
    }

    #[test]
    fn update_writes_bounds_and_placement() {
        let (mut doc, reference, p) = mounted();
        let body = doc.body();
        doc.append_child(body, p.root);
        let props = {
            let mut props = Props::default();
            props.apply(&PartialProps::default().placement(Placement::parse("right").unwrap()));
            props
        };
        let mut session = PositioningSession::create(&doc, reference, p, &props).unwrap();
        assert!(session.needs_update());
        let pos = session.update(&mut doc, &BasicGeometry, VIEWPORT).unwrap();
        assert!(!session.needs_update());
        assert_eq!(doc.bounds(p.root), Some(Rect::new(410.0, 290.0, 510.0, 330.0)));
        assert_eq!(doc.attribute(p.tooltip, "data-placement"), Some("right"));

        struct Never;
        impl GeometryEngine for Never {
            fn compute(&self, _: &PositionInput) -> Option<Position> {
                None
            }
        }
        assert_eq!(session.update(&mut doc, &Never, VIEWPORT), Some(pos));
        assert_eq!(doc.bounds(p.root), Some(Rect::new(410.0, 290.0, 510.0, 330.0)));
    }

    #[test]
    fn virtual_reference_follows_cursor() {
        let (mut doc, reference, p) = mounted();
        let body = doc.body();
        doc.append_child(body, p.root);
        let mut session =
            PositioningSession::create(&doc, reference, p, &Props::default()).unwrap();
        let r = doc.bounds(reference).unwrap();
        session.set_virtual_reference(Some(cursor_rect(r, Point::new(500.0, 500.0), false, false)));
        let pos = session.update(&mut doc, &BasicGeometry, VIEWPORT).unwrap();
        assert_eq!(pos.origin, Point::new(450.0, 450.0));

        let horizontal = cursor_rect(r, Point::new(350.0, 999.0), true, false);
        assert_eq!(horizontal, Rect::new(350.0, 300.0, 350.0, 320.0));
    }
}
