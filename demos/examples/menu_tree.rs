// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Application menu as an `understory_forest::Forest`.
//!
//! This example shows how to:
//! - load a menu from JSON and walk it in each traversal order,
//! - search it down to the entries matching a filter,
//! - edit it in place and read it back through the rebuilt flat index,
//! - rename fields for a consumer that expects different names.
//!
//! Run:
//! - `RUST_LOG=understory_forest=trace cargo run -p understory_forest_demos --example menu_tree`

use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_forest::{CacheState, Forest, ForestOptions, Options, Strategy};

fn labels(nodes: &[&Value]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| n["label"].as_str().unwrap_or("?").to_string())
        .collect()
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    let menu = json!([
        { "key": "file", "label": "File", "items": [
            { "key": "new", "label": "New", "shortcut": "Ctrl+N" },
            { "key": "open", "label": "Open", "shortcut": "Ctrl+O" },
            { "key": "recent", "label": "Open Recent", "items": [
                { "key": "recent-1", "label": "notes.md" },
                { "key": "recent-2", "label": "todo.md" }
            ] }
        ] },
        { "key": "edit", "label": "Edit", "items": [
            { "key": "undo", "label": "Undo", "shortcut": "Ctrl+Z" },
            { "key": "redo", "label": "Redo", "shortcut": "Ctrl+Y" }
        ] },
        { "key": "help", "label": "Help" }
    ]);
    let Value::Array(roots) = menu else {
        unreachable!("menu literal is an array");
    };

    let options = ForestOptions::new()
        .with_node_key("key")
        .with_child_key("items");
    let mut forest = match Forest::new(roots, options) {
        Ok(forest) => forest,
        Err(err) => {
            eprintln!("invalid options: {err}");
            return;
        }
    };

    // Traversal orders.
    info!(order = ?labels(&forest.flat()), "stack");
    for strategy in [Strategy::Depth, Strategy::Breadth] {
        let nodes = forest.flat_with(Options::new().using(strategy));
        info!(order = ?labels(&nodes), "{strategy:?}");
    }

    // Paths and neighbours.
    let path = forest.find_path(|n| n["key"] == "recent-2");
    info!(path = ?labels(&path), "breadcrumb for todo.md");
    let siblings: Vec<&Value> = forest.siblings(|n| n["key"] == "undo").iter().collect();
    info!(siblings = ?labels(&siblings), "undo group");

    // Everything with a keyboard shortcut, kept in menu shape.
    let with_shortcuts = forest.search(|n| n.get("shortcut").is_some());
    println!(
        "entries with shortcuts:\n{}",
        serde_json::to_string_pretty(&with_shortcuts).unwrap_or_default()
    );

    // Edits.
    forest
        .insert(json!({ "key": "save", "label": "Save", "shortcut": "Ctrl+S" }))
        .after(|n| n["key"] == "open");
    forest
        .append_child(json!({ "key": "about", "label": "About" }))
        .which(|n| n["key"] == "help");
    let mut patch = serde_json::Map::new();
    patch.insert("label".into(), json!("Recent Files"));
    forest.modify(patch).which(|n| n["key"] == "recent");
    if let Some(removed) = forest.remove(|n| n["key"] == "recent-1") {
        info!(label = %removed["label"], "removed");
    }
    assert_eq!(forest.cache_state(), CacheState::Stale);
    info!(nodes = forest.len(), epoch = forest.epoch(), "after edits");
    info!(order = ?labels(&forest.flat()), "stack");

    // Field renaming for a consumer expecting `id` / `title` / `children`.
    let renamed: Vec<Value> = forest
        .key_to_key(&[("key", "id"), ("label", "title"), ("items", "children")])
        .iter()
        .map(|node| node.to_value())
        .collect();
    println!(
        "renamed:\n{}",
        serde_json::to_string_pretty(&renamed).unwrap_or_default()
    );
}
