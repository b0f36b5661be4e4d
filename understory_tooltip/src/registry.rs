// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference and popper lookups across instances.
//!
//! Keys are generational [`NodeId`]s, so an entry left behind for a removed
//! node can never match a later node. Entries are still removed on destroy so
//! queries never report destroyed instances.

use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::dom::{Document, NodeId};
use crate::instance::InstanceId;

#[derive(Clone, Debug, Default)]
pub(crate) struct Registry {
    by_reference: HashMap<NodeId, InstanceId>,
    by_popper: HashMap<NodeId, InstanceId>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Associate both nodes with `id`. A later registration for the same reference wins.
    pub(crate) fn register(&mut self, reference: NodeId, popper: NodeId, id: InstanceId) {
        self.by_reference.insert(reference, id);
        self.by_popper.insert(popper, id);
    }

    /// Remove the associations that still point at `id`.
    pub(crate) fn unregister(&mut self, reference: NodeId, popper: NodeId, id: InstanceId) {
        if self.by_reference.get(&reference) == Some(&id) {
            self.by_reference.remove(&reference);
        }
        if self.by_popper.get(&popper) == Some(&id) {
            self.by_popper.remove(&popper);
        }
    }

    pub(crate) fn lookup_by_reference(&self, reference: NodeId) -> Option<InstanceId> {
        self.by_reference.get(&reference).copied()
    }

    pub(crate) fn lookup_by_popper(&self, popper: NodeId) -> Option<InstanceId> {
        self.by_popper.get(&popper).copied()
    }

    /// Registered poppers attached to the document, in document order.
    pub(crate) fn all_mounted_poppers(&self, doc: &Document) -> Vec<NodeId> {
        if self.by_popper.is_empty() {
            return Vec::new();
        }
        doc.descendants(doc.root())
            .filter(|n| self.by_popper.contains_key(n))
            .collect()
    }
}
