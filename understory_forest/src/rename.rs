// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field renaming over a whole forest.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::{Map, Value};
use tracing::trace;

use crate::forest::Forest;

/// A renamed copy of one node, still linked to the node it was made from.
///
/// `fields` holds every field of the original except an array-valued child field, under its
/// new name. Children are kept separately in `children` and stored back under `child_key`
/// (the renamed child field) by [`Renamed::to_value`].
#[derive(Clone, Debug, PartialEq)]
pub struct Renamed<'a> {
    /// Non-child fields with their new names.
    pub fields: Map<String, Value>,
    /// Renamed children, in their original order.
    pub children: Vec<Renamed<'a>>,
    /// Name the child array is stored under, if the original node had one.
    pub child_key: Option<String>,
    /// The node this copy was made from.
    pub raw: &'a Value,
}

impl Renamed<'_> {
    /// Plain JSON for this node and everything below it.
    pub fn to_value(&self) -> Value {
        let mut fields = self.fields.clone();
        if let Some(child_key) = &self.child_key {
            let children = self.children.iter().map(Self::to_value).collect();
            fields.insert(child_key.clone(), Value::Array(children));
        }
        Value::Object(fields)
    }
}

impl Forest {
    /// Copy the forest with fields renamed through `key_map`.
    ///
    /// Each pair is `(old, new)`. Fields missing from the map keep their name. The child field
    /// is recursed into and may be renamed like any other. Null children are skipped.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use understory_forest::{Forest, ForestOptions};
    ///
    /// let forest = Forest::new(
    ///     vec![json!({ "id": 1, "title": "root", "children": [{ "id": 2, "title": "leaf" }] })],
    ///     ForestOptions::default(),
    /// )
    /// .unwrap();
    ///
    /// let renamed = forest.key_to_key(&[("title", "label"), ("children", "items")]);
    /// assert_eq!(
    ///     renamed[0].to_value(),
    ///     json!({ "id": 1, "label": "root", "items": [{ "id": 2, "label": "leaf" }] })
    /// );
    /// ```
    pub fn key_to_key(&self, key_map: &[(&str, &str)]) -> Vec<Renamed<'_>> {
        let child_key = self.options().child_key.as_str();
        let renamed: Vec<_> = self
            .roots()
            .iter()
            .filter(|node| !node.is_null())
            .map(|node| rename(node, key_map, child_key))
            .collect();
        trace!(roots = renamed.len(), pairs = key_map.len(), "renamed forest");
        renamed
    }

    /// [`Forest::key_to_key`], then hand the result to `on_complete` before returning it.
    pub fn key_to_key_with<'a>(
        &'a self,
        key_map: &[(&str, &str)],
        on_complete: impl FnOnce(&[Renamed<'a>]),
    ) -> Vec<Renamed<'a>> {
        let renamed = self.key_to_key(key_map);
        on_complete(&renamed);
        renamed
    }
}

fn new_name(key: &str, key_map: &[(&str, &str)]) -> String {
    match key_map.iter().find(|(old, _)| *old == key) {
        Some((_, new)) => (*new).to_string(),
        None => key.to_string(),
    }
}

fn rename<'a>(node: &'a Value, key_map: &[(&str, &str)], child_key: &str) -> Renamed<'a> {
    let mut fields = Map::new();
    let mut children = Vec::new();
    let mut renamed_child_key = None;
    if let Value::Object(object) = node {
        for (key, value) in object {
            match value {
                Value::Array(kids) if key == child_key => {
                    children = kids
                        .iter()
                        .filter(|kid| !kid.is_null())
                        .map(|kid| rename(kid, key_map, child_key))
                        .collect();
                    renamed_child_key = Some(new_name(key, key_map));
                }
                _ => {
                    fields.insert(new_name(key, key_map), value.clone());
                }
            }
        }
    }

    Renamed {
        fields,
        children,
        child_key: renamed_child_key,
        raw: node,
    }
}
