// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! How the traversal engine reaches into caller-owned nodes.

use alloc::vec::Vec;

use serde_json::Value;

/// Read access to the child list of a node.
///
/// The traversal engine is generic over the node type `N`; this trait is the only thing it
/// needs to know about a node. Implementations decide where children live and what counts as an
/// absent node.
///
/// A node without children (or whose children field has an unexpected shape) should return an
/// empty slice rather than signal an error.
pub trait NodeAccess<N> {
    /// Children of `node`, in declared order.
    fn children<'a>(&self, node: &'a N) -> &'a [N];

    /// Whether `node` is a placeholder that should be skipped entirely.
    ///
    /// Absent nodes are never visited, emitted, or passed to predicates, and their children
    /// are not explored. Defaults to `false`.
    fn is_absent(&self, _node: &N) -> bool {
        false
    }
}

/// [`NodeAccess`] for JSON nodes whose children live in a named field.
///
/// - A missing field, or one holding anything other than an array, means "no children".
/// - [`Value::Null`] is treated as an absent node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonChildren<'k> {
    /// Name of the field holding the child array.
    pub field: &'k str,
}

impl<'k> JsonChildren<'k> {
    /// Read children from `field`.
    pub const fn new(field: &'k str) -> Self {
        Self { field }
    }
}

impl NodeAccess<Value> for JsonChildren<'_> {
    fn children<'a>(&self, node: &'a Value) -> &'a [Value] {
        node.get(self.field)
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice)
    }

    fn is_absent(&self, node: &Value) -> bool {
        node.is_null()
    }
}
