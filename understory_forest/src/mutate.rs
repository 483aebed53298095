// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-place edits: modify, remove, insert, and append.
//!
//! Every edit locates its target first and does nothing if there is none. A successful edit
//! leaves the flat index stale so that the next read rebuilds it from the edited forest.

use alloc::string::String;
use alloc::vec::Vec;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::address::Address;
use crate::forest::Forest;

impl Forest {
    /// Overwrite fields of a node with the values in `patch`.
    ///
    /// Only fields the target already has are written; keys of `patch` the target lacks are
    /// ignored. Pick the target with [`Modify::which`].
    pub fn modify(&mut self, patch: Map<String, Value>) -> Modify<'_> {
        Modify {
            forest: self,
            patch,
        }
    }

    /// Remove the first node satisfying `predicate`, together with its subtree.
    ///
    /// Roots are checked in order; within each root the search runs in
    /// [`Strategy::Stack`](crate::Strategy::Stack) order. Returns the detached node, or `None`
    /// (and leaves the forest untouched) if nothing matches.
    pub fn remove(&mut self, predicate: impl FnMut(&Value) -> bool) -> Option<Value> {
        let address = self.located_address(predicate)?;
        let (siblings, index) = self.owning_array_mut(&address)?;
        if index >= siblings.len() {
            return None;
        }
        let removed = siblings.remove(index);
        debug!(address = ?address, "removed node");
        self.invalidate();
        Some(removed)
    }

    /// Insert `node` next to another node. Pick the position with [`Insert::before`] or
    /// [`Insert::after`].
    pub fn insert(&mut self, node: Value) -> Insert<'_> {
        Insert { forest: self, node }
    }

    /// Append `node` to the children of another node. Pick the parent with
    /// [`AppendChild::which`].
    pub fn append_child(&mut self, node: Value) -> AppendChild<'_> {
        AppendChild { forest: self, node }
    }
}

/// Pending [`Forest::modify`].
#[must_use = "nothing is modified until `which` is called"]
#[derive(Debug)]
pub struct Modify<'f> {
    forest: &'f mut Forest,
    patch: Map<String, Value>,
}

impl<'f> Modify<'f> {
    /// Apply the patch to the first node satisfying `predicate` in default order.
    ///
    /// Returns the node after modification, or `None` if nothing matches.
    pub fn which(self, predicate: impl FnMut(&Value) -> bool) -> Option<&'f Value> {
        let Self { forest, patch } = self;
        let address = forest.address_of(predicate)?;

        let mut written = 0_usize;
        if let Some(fields) = forest.node_at_mut(&address)?.as_object_mut() {
            for (key, value) in patch {
                if let Some(slot) = fields.get_mut(&key) {
                    *slot = value;
                    written += 1;
                }
            }
        }
        if written > 0 {
            debug!(address = ?address, fields = written, "modified node");
            forest.invalidate();
        }

        let forest: &'f Forest = forest;
        forest.node_at(&address)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Placement {
    Before,
    After,
}

/// Pending [`Forest::insert`].
#[must_use = "nothing is inserted until `before` or `after` is called"]
#[derive(Debug)]
pub struct Insert<'f> {
    forest: &'f mut Forest,
    node: Value,
}

impl<'f> Insert<'f> {
    /// Insert immediately before the first node satisfying `predicate`, in the same array.
    ///
    /// Returns the inserted node in its new position, or `None` if nothing matches.
    pub fn before(self, predicate: impl FnMut(&Value) -> bool) -> Option<&'f Value> {
        self.place(predicate, Placement::Before)
    }

    /// Insert immediately after the first node satisfying `predicate`, in the same array.
    ///
    /// Returns the inserted node in its new position, or `None` if nothing matches.
    pub fn after(self, predicate: impl FnMut(&Value) -> bool) -> Option<&'f Value> {
        self.place(predicate, Placement::After)
    }

    fn place(
        self,
        predicate: impl FnMut(&Value) -> bool,
        placement: Placement,
    ) -> Option<&'f Value> {
        let Self { forest, node } = self;
        let target = forest.located_address(predicate)?;
        let at = match placement {
            Placement::Before => target.index(),
            Placement::After => target.index() + 1,
        };

        let (siblings, _) = forest.owning_array_mut(&target)?;
        if at > siblings.len() {
            return None;
        }
        siblings.insert(at, node);

        let inserted = match target.parent() {
            Some(parent) => parent.child(at),
            None => Address::root(at),
        };
        debug!(anchor = ?target, inserted = ?inserted, ?placement, "inserted node");
        forest.invalidate();

        let forest: &'f Forest = forest;
        forest.node_at(&inserted)
    }
}

/// Pending [`Forest::append_child`].
#[must_use = "nothing is appended until `which` is called"]
#[derive(Debug)]
pub struct AppendChild<'f> {
    forest: &'f mut Forest,
    node: Value,
}

impl<'f> AppendChild<'f> {
    /// Push the node onto the children of the first node satisfying `predicate` in default
    /// order, creating the child array if the field is missing or `null`.
    ///
    /// Returns the parent after the append. Returns `None` without editing anything if nothing
    /// matches, if the match is not an object, or if its child field holds something other
    /// than an array.
    pub fn which(self, predicate: impl FnMut(&Value) -> bool) -> Option<&'f Value> {
        let Self { forest, node } = self;
        let address = forest.address_of(predicate)?;
        let child_key = forest.options().child_key.clone();

        let Some(fields) = forest.node_at_mut(&address)?.as_object_mut() else {
            warn!(address = ?address, "append target is not an object");
            return None;
        };
        let children = fields
            .entry(child_key)
            .or_insert_with(|| Value::Array(Vec::new()));
        if children.is_null() {
            *children = Value::Array(Vec::new());
        }
        let Some(children) = children.as_array_mut() else {
            warn!(address = ?address, "append target's child field is not an array");
            return None;
        };
        children.push(node);
        debug!(parent = ?address, children = children.len(), "appended child");
        forest.invalidate();

        let forest: &'f Forest = forest;
        forest.node_at(&address)
    }
}
