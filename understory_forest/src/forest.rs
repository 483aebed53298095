// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree instance: an owned forest of JSON nodes plus its flat index.

use alloc::string::ToString;
use alloc::vec::Vec;
use core::ops::ControlFlow;

use serde_json::Value;

use crate::access::{JsonChildren, NodeAccess};
use crate::address::Address;
use crate::cache::{CacheState, FlatCache, FlatIndex};
use crate::error::ForestError;
use crate::locate::{locate, locate_path, locate_with_parent};
use crate::options::{ForestOptions, Options};
use crate::util::{owning_array_mut, resolve, resolve_mut, resolve_path};

/// A forest of caller-supplied JSON nodes with traversal, lookup, search, and editing.
///
/// The forest owns the root array for its lifetime and edits it in place; take it back with
/// [`Forest::into_roots`].
///
/// Reads that do not request an explicit [`Strategy`](crate::Strategy) go through a flat
/// index of every node in [`Strategy::Stack`](crate::Strategy::Stack) order. The index is
/// [`CacheState::Stale`] after construction and after every edit, and is rebuilt in full by the
/// next read that needs it.
///
/// ## Example
///
/// ```rust
/// use serde_json::json;
/// use understory_forest::{Forest, ForestOptions};
///
/// let mut forest = Forest::new(
///     vec![json!({ "id": 1, "children": [{ "id": 2 }, { "id": 3 }] })],
///     ForestOptions::default(),
/// )
/// .unwrap();
///
/// // Default order visits siblings last-to-first.
/// let ids: Vec<_> = forest.flat().iter().map(|n| n["id"].clone()).collect();
/// assert_eq!(ids, [json!(1), json!(3), json!(2)]);
///
/// forest.remove(|n| n["id"] == 2);
/// assert_eq!(forest.len(), 2);
/// ```
pub struct Forest {
    roots: Vec<Value>,
    options: ForestOptions,
    cache: FlatCache,
    /// bumped on every structural edit
    epoch: u64,
}

impl core::fmt::Debug for Forest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Forest")
            .field("roots", &self.roots.len())
            .field("node_key", &self.options.node_key)
            .field("child_key", &self.options.child_key)
            .field("epoch", &self.epoch)
            .field("cache", &self.cache.state())
            .finish_non_exhaustive()
    }
}

impl Forest {
    /// Take ownership of `roots` and interpret them with `options`.
    ///
    /// Fails only if `options` is rejected by [`ForestOptions::validate`].
    pub fn new(roots: Vec<Value>, options: ForestOptions) -> Result<Self, ForestError> {
        options.validate()?;
        Ok(Self {
            roots,
            options,
            cache: FlatCache::default(),
            epoch: 0,
        })
    }

    /// The root array as it currently stands.
    pub fn roots(&self) -> &[Value] {
        &self.roots
    }

    /// Give the (possibly edited) root array back.
    pub fn into_roots(self) -> Vec<Value> {
        self.roots
    }

    /// Field names this forest was configured with.
    pub fn options(&self) -> &ForestOptions {
        &self.options
    }

    /// Whether the flat index is currently usable without a rebuild.
    pub fn cache_state(&self) -> CacheState {
        self.cache.state()
    }

    /// Number of structural edits applied so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of reachable nodes.
    pub fn len(&self) -> usize {
        self.index().len()
    }

    /// Returns `true` if no node is reachable.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every node, in [`Strategy::Stack`](crate::Strategy::Stack) order.
    pub fn flat(&self) -> Vec<&Value> {
        self.flat_with(Options::new())
    }

    /// Every node, in the order selected by `options`.
    pub fn flat_with<'a>(&'a self, options: Options<'_, [&'a Value]>) -> Vec<&'a Value> {
        let result = match options.strategy {
            None => self.cached_nodes().collect(),
            Some(strategy) => {
                let mut nodes = Vec::new();
                let _ = strategy.traverse(&self.roots, &self.access(), |visit| {
                    nodes.push(visit.node);
                    ControlFlow::Continue(())
                });
                nodes
            }
        };
        options.complete(&result);
        result
    }

    /// First node satisfying `predicate` in default order.
    pub fn find(&self, predicate: impl FnMut(&Value) -> bool) -> Option<&Value> {
        self.find_with(predicate, Options::new())
    }

    /// First node satisfying `predicate` in the order selected by `options`.
    ///
    /// Without an explicit strategy the flat index is scanned; with one, the forest is
    /// traversed live in that order.
    pub fn find_with<'a>(
        &'a self,
        mut predicate: impl FnMut(&Value) -> bool,
        options: Options<'_, Option<&'a Value>>,
    ) -> Option<&'a Value> {
        let result = match options.strategy {
            None => self.cached_nodes().find(|node| predicate(*node)),
            Some(strategy) => locate(&self.roots, &self.access(), predicate, strategy),
        };
        options.complete(&result);
        result
    }

    /// Root-to-match path of the first node satisfying `predicate` in default order.
    ///
    /// Empty when nothing matches.
    pub fn find_path(&self, predicate: impl FnMut(&Value) -> bool) -> Vec<&Value> {
        self.find_path_with(predicate, Options::new())
    }

    /// Root-to-match path of the first node satisfying `predicate` in the order selected by
    /// `options`.
    pub fn find_path_with<'a>(
        &'a self,
        mut predicate: impl FnMut(&Value) -> bool,
        options: Options<'_, [&'a Value]>,
    ) -> Vec<&'a Value> {
        let result = match options.strategy {
            None => self
                .address_of(&mut predicate)
                .map(|address| self.path_at(&address))
                .unwrap_or_default(),
            Some(strategy) => locate_path(&self.roots, &self.access(), predicate, strategy),
        };
        options.complete(&result);
        result
    }

    /// Every node satisfying `predicate`, in default order.
    pub fn filter(&self, mut predicate: impl FnMut(&Value) -> bool) -> Vec<&Value> {
        self.cached_nodes().filter(|node| predicate(*node)).collect()
    }

    /// Node whose `node_key` field equals `key`.
    ///
    /// Uses the flat index's key map instead of scanning. A node without the key field is
    /// found under [`Value::Null`].
    pub fn find_by_key(&self, key: &Value) -> Option<&Value> {
        let index = self.index();
        let position = index.position_of_key(&key.to_string())?;
        self.node_at(&index.addresses()[position])
    }

    /// Parent of the first node satisfying `predicate`.
    ///
    /// `None` if nothing matches or if the first match is a root.
    pub fn parent(&self, predicate: impl FnMut(&Value) -> bool) -> Option<&Value> {
        locate_with_parent(&self.roots, &self.access(), predicate)?.parent
    }

    /// All children of the parent of the first node satisfying `predicate`, the match
    /// included.
    ///
    /// Empty if nothing matches or if the first match is a root.
    pub fn siblings(&self, predicate: impl FnMut(&Value) -> bool) -> &[Value] {
        self.parent(predicate)
            .map_or(&[][..], |parent| self.access().children(parent))
    }

    // --- internals ---

    pub(crate) fn access(&self) -> JsonChildren<'_> {
        JsonChildren::new(&self.options.child_key)
    }

    /// The flat index for the current snapshot, rebuilding it if stale.
    pub(crate) fn index(&self) -> &FlatIndex {
        self.cache
            .get_or_rebuild(&self.roots, &self.options, self.epoch)
    }

    pub(crate) fn cached_nodes(&self) -> impl Iterator<Item = &Value> + '_ {
        self.index()
            .addresses()
            .iter()
            .filter_map(|address| self.node_at(address))
    }

    /// Address of the first node satisfying `predicate` in default order.
    pub(crate) fn address_of(&self, mut predicate: impl FnMut(&Value) -> bool) -> Option<Address> {
        self.index()
            .addresses()
            .iter()
            .find(|address| self.node_at(address).is_some_and(&mut predicate))
            .cloned()
    }

    /// Address of the first node satisfying `predicate` found by the parent-aware scan.
    pub(crate) fn located_address(&self, predicate: impl FnMut(&Value) -> bool) -> Option<Address> {
        locate_with_parent(&self.roots, &self.access(), predicate).map(|hit| hit.address)
    }

    pub(crate) fn node_at(&self, address: &Address) -> Option<&Value> {
        resolve(&self.roots, &self.options.child_key, address)
    }

    pub(crate) fn path_at(&self, address: &Address) -> Vec<&Value> {
        resolve_path(&self.roots, &self.options.child_key, address)
    }

    pub(crate) fn node_at_mut(&mut self, address: &Address) -> Option<&mut Value> {
        resolve_mut(&mut self.roots, &self.options.child_key, address)
    }

    pub(crate) fn owning_array_mut(&mut self, address: &Address) -> Option<(&mut Vec<Value>, usize)> {
        owning_array_mut(&mut self.roots, &self.options.child_key, address)
    }

    /// Record a structural edit: the flat index goes stale and the epoch advances.
    pub(crate) fn invalidate(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.cache.invalidate();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::traverse::Strategy;
    use alloc::vec;
    use serde_json::json;

    /// ```text
    /// 1
    /// ├── 2
    /// │   ├── 4
    /// │   └── 5
    /// └── 3
    ///     └── 6
    /// 7
    /// ```
    pub(crate) fn sample() -> Forest {
        Forest::new(
            vec![
                json!({ "id": 1, "name": "one", "children": [
                    { "id": 2, "name": "two", "children": [
                        { "id": 4, "name": "four" },
                        { "id": 5, "name": "five" }
                    ] },
                    { "id": 3, "name": "three", "children": [{ "id": 6, "name": "six" }] }
                ] }),
                json!({ "id": 7, "name": "seven" }),
            ],
            ForestOptions::default(),
        )
        .unwrap()
    }

    pub(crate) fn id(id: i64) -> impl Fn(&Value) -> bool {
        move |node| node["id"] == id
    }

    pub(crate) fn ids(nodes: &[&Value]) -> Vec<i64> {
        nodes.iter().filter_map(|n| n["id"].as_i64()).collect()
    }

    #[test]
    fn rejects_bad_options() {
        let err = Forest::new(vec![], ForestOptions::new().with_child_key("id")).unwrap_err();
        assert_eq!(
            err,
            ForestError::SameField {
                field: "id".to_string()
            }
        );
    }

    #[test]
    fn flat_orders() {
        let forest = sample();
        assert_eq!(ids(&forest.flat()), [1, 3, 6, 2, 5, 4, 7]);
        assert_eq!(
            ids(&forest.flat_with(Options::new().using(Strategy::Depth))),
            [1, 2, 4, 5, 3, 6, 7]
        );
        assert_eq!(
            ids(&forest.flat_with(Options::new().using(Strategy::Breadth))),
            [1, 2, 3, 4, 5, 6, 7]
        );
    }

    #[test]
    fn flat_is_idempotent_and_counts_everything() {
        let forest = sample();
        let first = forest.flat();
        let second = forest.flat();
        assert_eq!(first, second);
        assert_eq!(first.len(), forest.filter(|_| true).len());
        assert_eq!(forest.len(), 7);
        assert!(!forest.is_empty());
    }

    #[test]
    fn reads_make_the_cache_fresh() {
        let forest = sample();
        assert_eq!(forest.cache_state(), CacheState::Stale);
        let _ = forest.find(id(5));
        assert_eq!(forest.cache_state(), CacheState::Fresh);
    }

    #[test]
    fn explicit_strategy_bypasses_the_cache() {
        let forest = sample();
        let hit = forest.find_with(id(6), Options::new().using(Strategy::Breadth));
        assert_eq!(hit.map(|n| &n["name"]), Some(&json!("six")));
        assert_eq!(forest.cache_state(), CacheState::Stale);
    }

    #[test]
    fn find_returns_matching_node_or_none() {
        let forest = sample();
        for strategy in [None, Some(Strategy::Stack), Some(Strategy::Depth), Some(Strategy::Breadth)] {
            let options = match strategy {
                Some(s) => Options::new().using(s),
                None => Options::new(),
            };
            let hit = forest.find_with(|n| n["name"] == "four", options).unwrap();
            assert_eq!(hit["id"], 4);
            assert!(forest.find_with(id(99), Options::new()).is_none());
        }
    }

    #[test]
    fn find_path_round_trips_with_find() {
        let forest = sample();
        let path = forest.find_path(id(5));
        assert_eq!(ids(&path), [1, 2, 5]);
        assert_eq!(path.last().copied(), forest.find(id(5)));
        assert!(forest.roots().iter().any(|r| core::ptr::eq(r, path[0])));

        let live = forest.find_path_with(id(6), Options::new().using(Strategy::Depth));
        assert_eq!(ids(&live), [1, 3, 6]);
        assert!(forest.find_path(id(99)).is_empty());
    }

    #[test]
    fn default_find_prefers_stack_order() {
        // Both leaves match; stack order reaches the later sibling first.
        let forest = sample();
        let hit = forest.find(|n| n.get("children").is_none()).unwrap();
        assert_eq!(hit["id"], 6);
        let hit = forest
            .find_with(|n| n.get("children").is_none(), Options::new().using(Strategy::Depth))
            .unwrap();
        assert_eq!(hit["id"], 4);
    }

    #[test]
    fn hooks_see_the_result() {
        let forest = sample();
        let mut flat_len = 0;
        let nodes = forest.flat_with(Options::new().on_complete(|r: &[&Value]| flat_len = r.len()));
        assert_eq!(flat_len, nodes.len());

        let mut found = None;
        let _ = forest.find_with(
            id(3),
            Options::new().on_complete(|r: &Option<&Value>| found = r.map(|n| n["name"].clone())),
        );
        assert_eq!(found, Some(json!("three")));

        let mut path_len = 0;
        let _ = forest.find_path_with(
            id(99),
            Options::new().on_complete(|r: &[&Value]| path_len = r.len() + 1),
        );
        assert_eq!(path_len, 1, "hook runs on misses too");
    }

    #[test]
    fn filter_keeps_matches_in_order() {
        let forest = sample();
        assert_eq!(ids(&forest.filter(|n| n["id"].as_i64().unwrap_or(0) % 2 == 0)), [6, 2, 4]);
        assert!(forest.filter(id(99)).is_empty());
    }

    #[test]
    fn find_by_key_uses_identity() {
        let forest = sample();
        assert_eq!(forest.find_by_key(&json!(5)).map(|n| &n["name"]), Some(&json!("five")));
        assert!(forest.find_by_key(&json!("5")).is_none());
        assert!(forest.find_by_key(&json!(99)).is_none());
    }

    #[test]
    fn parent_and_siblings() {
        let forest = sample();
        assert_eq!(forest.parent(id(5)).map(|n| n["id"].clone()), Some(json!(2)));
        assert!(forest.parent(id(1)).is_none(), "roots have no parent");
        assert!(forest.parent(id(99)).is_none());

        let siblings: Vec<_> = forest.siblings(id(4)).iter().collect();
        assert_eq!(ids(&siblings), [4, 5]);
        assert!(forest.siblings(id(7)).is_empty());
    }

    #[test]
    fn null_and_malformed_nodes_are_tolerated() {
        let forest = Forest::new(
            vec![
                Value::Null,
                json!({ "id": 1, "children": "not an array" }),
                json!({ "id": 2, "children": [null, { "id": 3 }] }),
            ],
            ForestOptions::default(),
        )
        .unwrap();
        assert_eq!(ids(&forest.flat()), [1, 2, 3]);
        for strategy in [Strategy::Stack, Strategy::Depth, Strategy::Breadth] {
            assert_eq!(ids(&forest.flat_with(Options::new().using(strategy))).len(), 3);
        }
        assert_eq!(forest.find_path(id(3)).len(), 2);
    }

    #[test]
    fn custom_field_names() {
        let forest = Forest::new(
            vec![json!({ "key": "a", "items": [{ "key": "b" }] })],
            ForestOptions::new().with_node_key("key").with_child_key("items"),
        )
        .unwrap();
        assert_eq!(forest.len(), 2);
        assert!(forest.find_by_key(&json!("b")).is_some());
        assert_eq!(forest.parent(|n| n["key"] == "b").map(|n| &n["key"]), Some(&json!("a")));
    }
}
