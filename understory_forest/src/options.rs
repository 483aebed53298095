// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forest configuration and per-call options.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

use crate::error::ForestError;
use crate::traverse::Strategy;

/// Field names that give a forest its shape.
///
/// Defaults to `"id"` for identity and `"children"` for the child array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForestOptions {
    /// Field whose value identifies a node. Values must be unique across the forest.
    pub node_key: String,
    /// Field holding the ordered array of child nodes.
    pub child_key: String,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            node_key: "id".to_string(),
            child_key: "children".to_string(),
        }
    }
}

impl ForestOptions {
    /// Default field names (`"id"` / `"children"`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `key` as the identity field.
    pub fn with_node_key(mut self, key: impl Into<String>) -> Self {
        self.node_key = key.into();
        self
    }

    /// Use `key` as the child array field.
    pub fn with_child_key(mut self, key: impl Into<String>) -> Self {
        self.child_key = key.into();
        self
    }

    /// Check that both names are non-empty and distinct.
    pub fn validate(&self) -> Result<(), ForestError> {
        if self.node_key.is_empty() {
            return Err(ForestError::EmptyField { role: "node key" });
        }
        if self.child_key.is_empty() {
            return Err(ForestError::EmptyField { role: "child key" });
        }
        if self.node_key == self.child_key {
            return Err(ForestError::SameField {
                field: self.node_key.clone(),
            });
        }
        Ok(())
    }
}

/// Per-call options for reads that accept a strategy.
///
/// - [`Options::using`] forces a live traversal in the given order. Without it, reads go
///   through the forest's cache, which is kept in [`Strategy::Stack`] order.
/// - [`Options::on_complete`] registers a hook that is called synchronously with the result
///   right before the operation returns.
///
/// `R` is the result type the hook observes, for example `[&Value]` for
/// [`Forest::flat_with`](crate::Forest::flat_with).
pub struct Options<'c, R: ?Sized> {
    pub(crate) strategy: Option<Strategy>,
    on_complete: Option<Box<dyn FnOnce(&R) + 'c>>,
}

impl<R: ?Sized> Default for Options<'_, R> {
    fn default() -> Self {
        Self {
            strategy: None,
            on_complete: None,
        }
    }
}

impl<R: ?Sized> fmt::Debug for Options<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("strategy", &self.strategy)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl<'c, R: ?Sized> Options<'c, R> {
    /// No explicit strategy, no hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Traverse live in `strategy` order instead of consulting the cache.
    pub fn using(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Call `hook` with the result before returning it.
    pub fn on_complete(mut self, hook: impl FnOnce(&R) + 'c) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    /// The explicitly requested strategy, if any.
    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }

    pub(crate) fn complete(self, result: &R) {
        if let Some(hook) = self.on_complete {
            hook(result);
        }
    }
}
