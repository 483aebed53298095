// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat index over a forest, rebuilt wholesale after every structural edit.

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::OnceCell;
use core::ops::ControlFlow;

use hashbrown::HashMap;
use serde_json::Value;
use tracing::trace;

use crate::access::JsonChildren;
use crate::address::Address;
use crate::options::ForestOptions;
use crate::traverse::Strategy;
use crate::util::key_repr;

/// Whether a forest's flat index can be used as-is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheState {
    /// No index is held; the next read rebuilds it.
    Stale,
    /// The index reflects the current contents of the forest.
    Fresh,
}

/// Every node of one forest snapshot, in [`Strategy::Stack`] order.
#[derive(Clone, Debug)]
pub(crate) struct FlatIndex {
    /// Epoch of the snapshot this index was built from.
    epoch: u64,
    addresses: Vec<Address>,
    /// Key representation to position in `addresses`; first occurrence wins.
    by_key: HashMap<String, usize>,
}

impl FlatIndex {
    pub(crate) fn build(roots: &[Value], options: &ForestOptions, epoch: u64) -> Self {
        let access = JsonChildren::new(&options.child_key);
        let mut addresses = Vec::new();
        let mut by_key = HashMap::new();
        let _ = Strategy::Stack.traverse(roots, &access, |visit| {
            by_key
                .entry(key_repr(visit.node, &options.node_key))
                .or_insert(addresses.len());
            addresses.push(visit.address.clone());
            ControlFlow::Continue(())
        });
        trace!(nodes = addresses.len(), epoch, "rebuilt flat index");
        Self {
            epoch,
            addresses,
            by_key,
        }
    }

    pub(crate) fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub(crate) fn position_of_key(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.addresses.len()
    }
}

/// Two-state holder for the flat index: empty is [`CacheState::Stale`].
///
/// Reads go through [`FlatCache::get_or_rebuild`] and edits call [`FlatCache::invalidate`];
/// nothing patches an index in place.
#[derive(Debug, Default)]
pub(crate) struct FlatCache {
    cell: OnceCell<FlatIndex>,
}

impl FlatCache {
    pub(crate) fn state(&self) -> CacheState {
        if self.cell.get().is_some() {
            CacheState::Fresh
        } else {
            CacheState::Stale
        }
    }

    pub(crate) fn get_or_rebuild(
        &self,
        roots: &[Value],
        options: &ForestOptions,
        epoch: u64,
    ) -> &FlatIndex {
        let index = self
            .cell
            .get_or_init(|| FlatIndex::build(roots, options, epoch));
        debug_assert_eq!(
            index.epoch, epoch,
            "flat index was built from a different snapshot"
        );
        index
    }

    pub(crate) fn invalidate(&mut self) {
        self.cell.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stale_until_read_then_fresh_until_invalidated() {
        let roots = alloc::vec![json!({ "id": 1, "children": [{ "id": 2 }] })];
        let options = ForestOptions::default();
        let mut cache = FlatCache::default();
        assert_eq!(cache.state(), CacheState::Stale);

        assert_eq!(cache.get_or_rebuild(&roots, &options, 0).len(), 2);
        assert_eq!(cache.state(), CacheState::Fresh);

        cache.invalidate();
        assert_eq!(cache.state(), CacheState::Stale);
        assert_eq!(cache.get_or_rebuild(&roots, &options, 1).len(), 2);
    }

    #[test]
    fn key_index_keeps_first_occurrence() {
        let roots = alloc::vec![
            json!({ "id": "x", "children": [{ "id": "a" }, { "id": "b" }] }),
            json!({ "id": "a" }),
        ];
        let index = FlatIndex::build(&roots, &ForestOptions::default(), 0);
        // Stack order: x, b, a (first root), a (second root).
        let position = index.position_of_key("\"a\"").unwrap();
        assert_eq!(position, 2);
        assert_eq!(index.addresses()[position].as_slice(), &[0, 0]);
        assert_eq!(index.position_of_key("\"zz\""), None);
    }
}
