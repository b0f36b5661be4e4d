// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration diagnostics.

use alloc::string::String;

use crate::dom::NodeId;

/// A non-fatal configuration problem.
///
/// Warnings never change behavior. They are emitted through `tracing` and
/// collected for [`TooltipHost::take_warnings`](crate::TooltipHost::take_warnings)
/// when [`HostConfig::validate`](crate::HostConfig::validate) is on.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    /// An option key that does not exist.
    #[error("`{key}` is not a valid option")]
    UnknownOption {
        /// The key as written.
        key: String,
    },
    /// An option that existed in older releases and was removed.
    #[error("the `target` option was removed; use `Targets::Selector` or one instance per element")]
    RemovedTarget,
    /// A recognized key whose value has the wrong shape.
    #[error("invalid value for option `{key}`")]
    InvalidValue {
        /// The key as written.
        key: String,
    },
    /// A `data-tippy` attribute that looks like JSON but does not parse to an object.
    #[error("`data-tippy` attribute on {reference:?} is not a valid options object: {reason}")]
    MalformedAttribute {
        /// Element carrying the attribute.
        reference: NodeId,
        /// Parser message.
        reason: String,
    },
    /// Content could not be turned into something renderable.
    #[error("content for {reference:?} is not renderable; showing empty text")]
    ContentNotRenderable {
        /// Reference element of the instance.
        reference: NodeId,
    },
    /// An `append_to` producer or element did not resolve to a live element.
    #[error("`appendTo` for {reference:?} did not resolve to a live element; using body")]
    AppendToNotElement {
        /// Reference element of the instance.
        reference: NodeId,
    },
    /// One content node was given to several instances; only the last one keeps it.
    #[error("content node {node:?} is shared by several tooltips; only the last one shows it")]
    SharedContentNode {
        /// The shared node.
        node: NodeId,
    },
}
