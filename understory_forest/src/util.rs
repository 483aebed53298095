// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::Value;

use crate::address::Address;

/// Hashable form of a node's identity: the JSON text of its key field, `null` when missing.
pub(crate) fn key_repr(node: &Value, node_key: &str) -> String {
    node.get(node_key)
        .map_or_else(|| "null".to_string(), Value::to_string)
}

/// Follow `address` from `roots` through `child_key` arrays.
pub(crate) fn resolve<'a>(roots: &'a [Value], child_key: &str, address: &Address) -> Option<&'a Value> {
    let (&first, rest) = address.as_slice().split_first()?;
    let mut node = roots.get(first)?;
    for &i in rest {
        node = node.get(child_key)?.as_array()?.get(i)?;
    }
    Some(node)
}

/// Mutable counterpart of [`resolve`].
pub(crate) fn resolve_mut<'a>(
    roots: &'a mut [Value],
    child_key: &str,
    address: &Address,
) -> Option<&'a mut Value> {
    let (&first, rest) = address.as_slice().split_first()?;
    let mut node = roots.get_mut(first)?;
    for &i in rest {
        node = node.get_mut(child_key)?.as_array_mut()?.get_mut(i)?;
    }
    Some(node)
}

/// Every node from the root down to `address`, inclusive.
pub(crate) fn resolve_path<'a>(
    roots: &'a [Value],
    child_key: &str,
    address: &Address,
) -> Vec<&'a Value> {
    let mut path = Vec::with_capacity(address.depth() + 1);
    let Some((&first, rest)) = address.as_slice().split_first() else {
        return path;
    };
    let Some(mut node) = roots.get(first) else {
        return path;
    };
    path.push(node);
    for &i in rest {
        match node.get(child_key).and_then(Value::as_array).and_then(|c| c.get(i)) {
            Some(child) => {
                path.push(child);
                node = child;
            }
            None => {
                // Stale address: report no path rather than a truncated one.
                path.clear();
                break;
            }
        }
    }
    path
}

/// The array owning the node at `address` and the node's index in it.
pub(crate) fn owning_array_mut<'a>(
    roots: &'a mut Vec<Value>,
    child_key: &str,
    address: &Address,
) -> Option<(&'a mut Vec<Value>, usize)> {
    let index = address.index();
    match address.parent() {
        None => Some((roots, index)),
        Some(parent) => {
            let node = resolve_mut(roots, child_key, &parent)?;
            let siblings = node.get_mut(child_key)?.as_array_mut()?;
            Some((siblings, index))
        }
    }
}
