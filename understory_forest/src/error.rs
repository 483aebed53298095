// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported when a forest is configured.

use alloc::string::String;

/// Rejected [`ForestOptions`](crate::ForestOptions).
///
/// Lookups and edits never fail; absence is reported through `Option` and empty collections.
/// Only construction can go wrong.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ForestError {
    /// A configured field name is empty.
    #[error("the {role} field name must not be empty")]
    EmptyField {
        /// Which setting was empty (`"node key"` or `"child key"`).
        role: &'static str,
    },
    /// Identity and children were configured to live in the same field.
    #[error("node key and child key must differ, both are `{field}`")]
    SameField {
        /// The shared field name.
        field: String,
    },
}
