// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pruned reconstruction: matches plus the ancestors that connect them to their roots.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use serde_json::{Map, Value};
use tracing::trace;

use crate::forest::Forest;
use crate::util::key_repr;

/// One distinct node of the reconstructed forest before it is linked.
#[derive(Debug)]
struct Scaffold<'a> {
    node: &'a Value,
    key: String,
    /// Key of the node preceding this one on the first chain that reached it.
    parent: Option<String>,
}

impl Forest {
    /// Copy out the part of the forest that leads to nodes satisfying `predicate`.
    ///
    /// The result keeps every match and each of its ancestors, linked as in the original
    /// forest, and drops every subtree without a match. Ancestors shared by several matches
    /// appear once. Returned nodes are copies: they carry every field of the original except
    /// the child field, which is replaced by the rebuilt (possibly empty) child array.
    ///
    /// Nodes are told apart by their `node_key` value, so keys must be unique for the result
    /// to be meaningful.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use understory_forest::{Forest, ForestOptions};
    ///
    /// let forest = Forest::new(
    ///     vec![json!({ "id": "menu", "children": [
    ///         { "id": "file", "children": [{ "id": "open" }, { "id": "save" }] },
    ///         { "id": "edit", "children": [{ "id": "undo" }] }
    ///     ] })],
    ///     ForestOptions::default(),
    /// )
    /// .unwrap();
    ///
    /// let found = forest.search(|n| n["id"] == "save");
    /// assert_eq!(
    ///     found,
    ///     [json!({ "id": "menu", "children": [
    ///         { "id": "file", "children": [{ "id": "save", "children": [] }] }
    ///     ] })]
    /// );
    /// ```
    pub fn search(&self, mut predicate: impl FnMut(&Value) -> bool) -> Vec<Value> {
        let node_key = self.options().node_key.as_str();
        let child_key = self.options().child_key.as_str();

        // Flatten the root-to-match chain of every match, keeping the first sighting of a key.
        let mut scaffold: Vec<Scaffold<'_>> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut matches = 0_usize;
        for address in self.index().addresses() {
            let Some(node) = self.node_at(address) else {
                continue;
            };
            if !predicate(node) {
                continue;
            }
            matches += 1;
            let mut parent: Option<String> = None;
            for link in self.path_at(address) {
                let key = key_repr(link, node_key);
                if seen.insert(key.clone()) {
                    scaffold.push(Scaffold {
                        node: link,
                        key: key.clone(),
                        parent: parent.clone(),
                    });
                }
                parent = Some(key);
            }
        }

        let mut roots = Vec::new();
        let mut children_of: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, entry) in scaffold.iter().enumerate() {
            match &entry.parent {
                Some(parent) => children_of.entry(parent.as_str()).or_default().push(i),
                None => roots.push(i),
            }
        }

        let mut linked = alloc::vec![false; scaffold.len()];
        let forest: Vec<Value> = roots
            .into_iter()
            .filter_map(|i| link(i, &scaffold, &children_of, &mut linked, child_key))
            .collect();
        trace!(matches, kept = scaffold.len(), roots = forest.len(), "search rebuilt forest");
        forest
    }
}

/// Build the copy of `scaffold[i]` with its linked children.
///
/// Each scaffold entry is emitted at most once, which also keeps malformed (non-unique) keys
/// from looping.
fn link(
    i: usize,
    scaffold: &[Scaffold<'_>],
    children_of: &HashMap<&str, Vec<usize>>,
    linked: &mut [bool],
    child_key: &str,
) -> Option<Value> {
    if core::mem::replace(&mut linked[i], true) {
        return None;
    }
    let entry = &scaffold[i];

    let mut children = Vec::new();
    if let Some(indices) = children_of.get(entry.key.as_str()) {
        for &c in indices {
            if let Some(child) = link(c, scaffold, children_of, linked, child_key) {
                children.push(child);
            }
        }
    }

    let mut copy: Map<String, Value> = match entry.node {
        Value::Object(fields) => fields
            .iter()
            .filter(|(key, _)| key.as_str() != child_key)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        _ => Map::new(),
    };
    copy.insert(child_key.to_string(), Value::Array(children));
    Some(Value::Object(copy))
}

#[cfg(test)]
mod tests {
    use crate::forest::tests::sample;
    use crate::{Forest, ForestOptions};
    use alloc::vec;
    use alloc::vec::Vec;
    use serde_json::{Value, json};

    fn count(forest: &[Value]) -> usize {
        forest
            .iter()
            .map(|n| 1 + n["children"].as_array().map_or(0, |c| count(c)))
            .sum()
    }

    #[test]
    fn single_match_keeps_only_its_chain() {
        let forest = sample();
        let found = forest.search(|n| n["id"] == 5);
        assert_eq!(
            found,
            [json!({ "id": 1, "name": "one", "children": [
                { "id": 2, "name": "two", "children": [
                    { "id": 5, "name": "five", "children": [] }
                ] }
            ] })]
        );
    }

    #[test]
    fn shared_ancestors_collapse() {
        let forest = sample();
        let found = forest.search(|n| n["id"] == 4 || n["id"] == 5);
        assert_eq!(found.len(), 1);
        let two = &found[0]["children"];
        assert_eq!(two.as_array().map(Vec::len), Some(1), "node 2 appears once");
        // Stack order meets 5 before 4, so 5 is linked first.
        let leaves: Vec<_> = two[0]["children"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["id"].clone())
            .collect();
        assert_eq!(leaves, [json!(5), json!(4)]);
        assert_eq!(count(&found), 4);
    }

    #[test]
    fn matches_across_roots_and_levels() {
        let forest = sample();
        let found = forest.search(|n| n["id"] == 2 || n["id"] == 6 || n["id"] == 7);
        let roots: Vec<_> = found.iter().map(|n| n["id"].clone()).collect();
        assert_eq!(roots, [json!(1), json!(7)]);
        // 1 -> {3 -> 6, 2}; 2 matched itself so its unmatched children are pruned.
        assert_eq!(count(&found), 5);
        let two = found[0]["children"]
            .as_array()
            .unwrap()
            .iter()
            .find(|n| n["id"] == 2)
            .unwrap();
        assert_eq!(two["children"], json!([]));
    }

    #[test]
    fn every_returned_subtree_contains_a_match() {
        fn all_lead_to_match(node: &Value) -> bool {
            let is_match = node["name"].as_str().is_some_and(|s| s.contains('i'));
            let children = node["children"].as_array().unwrap();
            (is_match || !children.is_empty()) && children.iter().all(all_lead_to_match)
        }
        let forest = sample();
        let found = forest.search(|n| n["name"].as_str().is_some_and(|s| s.contains('i')));
        assert!(!found.is_empty());
        assert!(found.iter().all(all_lead_to_match));
    }

    #[test]
    fn no_match_is_empty() {
        let forest = sample();
        assert!(forest.search(|n| n["id"] == 99).is_empty());
    }

    #[test]
    fn output_is_detached_from_the_forest() {
        let forest = sample();
        let mut found = forest.search(|n| n["id"] == 6);
        found[0]["name"] = json!("changed");
        assert_eq!(forest.roots()[0]["name"], "one");
    }

    #[test]
    fn custom_fields_and_missing_keys() {
        let forest = Forest::new(
            vec![json!({ "key": "a", "kids": [{ "label": "no key" }, { "key": "b" }] })],
            ForestOptions::new().with_node_key("key").with_child_key("kids"),
        )
        .unwrap();
        let found = forest.search(|n| n["key"] == "b" || n.get("label").is_some());
        assert_eq!(found.len(), 1);
        assert_eq!(count_kids(&found), 3);
    }

    fn count_kids(forest: &[Value]) -> usize {
        forest
            .iter()
            .map(|n| 1 + n["kids"].as_array().map_or(0, |c| count_kids(c)))
            .sum()
    }
}
