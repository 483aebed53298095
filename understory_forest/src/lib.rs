// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_forest --heading-base-level=0

//! Understory Forest: traversal, lookup, search, and in-place editing for caller-owned trees.
//!
//! Understory Forest works on forests of loosely-shaped records, such as menus, org charts,
//! category lists, or file listings delivered as JSON, where each node carries an identity
//! field and an optional array of children under another field.
//!
//! - Flattens the forest in one of three orders and finds nodes and root-to-node paths.
//! - Reconstructs a pruned copy holding only matches and the ancestors that connect them.
//! - Edits the forest in place: modify fields, remove subtrees, insert siblings, append children.
//! - Keeps a flat index of every node for default-order reads, rebuilt after every edit.
//!
//! Nodes are [`serde_json::Value`]s. Field names default to `id` and `children` and can be
//! changed per forest through [`ForestOptions`]. Nodes missing the child field, or holding
//! something other than an array there, are leaves. `null` entries are skipped.
//!
//! ## Traversal orders
//!
//! [`Strategy`] selects how a forest is walked. Roots are always handled in array order.
//!
//! - [`Strategy::Stack`] (the default): explicit-stack pre-order. Children are pushed in
//!   declared order, so the last sibling is visited first.
//! - [`Strategy::Depth`]: recursive pre-order, siblings in declared order.
//! - [`Strategy::Breadth`]: level order.
//!
//! The traversal engine is generic over [`NodeAccess`], so [`flatten`], [`locate`],
//! [`locate_path`], and [`locate_with_parent`] work on any tree type, not just JSON.
//!
//! ## Flat index
//!
//! A [`Forest`] holds a [`CacheState::Fresh`] or [`CacheState::Stale`] index of every node in
//! default order. Reads without an explicit strategy build it on demand and reuse it; every
//! edit marks it stale and advances [`Forest::epoch`]. Reads with an explicit strategy
//! through [`Options::using`] traverse the live forest and leave the index alone.
//!
//! ## API overview
//!
//! - [`Forest::new`]: take ownership of the roots, validated against [`ForestOptions`].
//! - [`Forest::flat`], [`Forest::find`], [`Forest::find_path`], [`Forest::filter`], and
//!   [`Forest::find_by_key`] for reads; the `_with` variants take [`Options`].
//! - [`Forest::search`]: pruned copy containing matches and their ancestors.
//! - [`Forest::modify`], [`Forest::remove`], [`Forest::insert`], and
//!   [`Forest::append_child`] for edits.
//! - [`Forest::parent`] and [`Forest::siblings`] for neighbourhood queries.
//! - [`Forest::key_to_key`]: copy with fields renamed, as [`Renamed`] nodes.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::{Value, json};
//! use understory_forest::{Forest, ForestOptions, Options, Strategy};
//!
//! fn ids(nodes: Vec<&Value>) -> Vec<&str> {
//!     nodes.into_iter().filter_map(|n| n["id"].as_str()).collect()
//! }
//!
//! let mut forest = Forest::new(
//!     vec![json!({ "id": "root", "children": [
//!         { "id": "a", "children": [{ "id": "a1" }] },
//!         { "id": "b" }
//!     ] })],
//!     ForestOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(ids(forest.flat()), ["root", "b", "a", "a1"]);
//! assert_eq!(
//!     ids(forest.flat_with(Options::new().using(Strategy::Breadth))),
//!     ["root", "a", "b", "a1"]
//! );
//! assert_eq!(ids(forest.find_path(|n| n["id"] == "a1")), ["root", "a", "a1"]);
//!
//! forest.append_child(json!({ "id": "b1" })).which(|n| n["id"] == "b");
//! assert_eq!(forest.parent(|n| n["id"] == "b1").unwrap()["id"], "b");
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): use the standard library in `serde_json`, `thiserror`, and
//!   `tracing`. Without it the crate builds against `core` and `alloc` only.
//!
//! ## Logging
//!
//! Edits and index rebuilds are reported through [`tracing`] events (`debug` for edits,
//! `trace` for rebuilds and searches, `warn` for refused appends). No subscriber is installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod access;
mod address;
mod cache;
mod error;
mod forest;
mod locate;
mod mutate;
mod options;
mod rename;
mod search;
mod traverse;
mod util;

pub use access::{JsonChildren, NodeAccess};
pub use address::Address;
pub use cache::CacheState;
pub use error::ForestError;
pub use forest::Forest;
pub use locate::{Located, locate, locate_path, locate_with_parent};
pub use mutate::{AppendChild, Insert, Modify};
pub use options::{ForestOptions, Options};
pub use rename::Renamed;
pub use traverse::{Flattened, PathAnnotated, Strategy, Visit, flatten};
