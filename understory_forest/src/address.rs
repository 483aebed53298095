// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positional handles for nodes inside a forest.

use core::fmt;

use smallvec::SmallVec;

/// Position of a node in a forest: the root index followed by one child index per level.
///
/// A root has a one-element address. Addresses are only meaningful for the snapshot they were
/// taken from; any structural mutation may shift positions.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Address(SmallVec<[usize; 8]>);

impl Address {
    /// Address of the root at `index`.
    pub fn root(index: usize) -> Self {
        let mut inner = SmallVec::new();
        inner.push(index);
        Self(inner)
    }

    /// Address of the child at `index` below this node.
    pub fn child(&self, index: usize) -> Self {
        let mut inner = self.0.clone();
        inner.push(index);
        Self(inner)
    }

    /// Address of the node that owns this one, or `None` for roots.
    pub fn parent(&self) -> Option<Self> {
        match self.0.len() {
            0 | 1 => None,
            n => Some(Self(self.0[..n - 1].iter().copied().collect())),
        }
    }

    /// Position of this node within its owning array (the roots, or its parent's children).
    pub fn index(&self) -> usize {
        self.0.last().copied().unwrap_or_default()
    }

    /// Number of levels from the root; roots have depth 0.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Returns `true` if this addresses a root.
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// The raw index sequence.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub(crate) fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl From<&[usize]> for Address {
    fn from(indices: &[usize]) -> Self {
        Self(indices.iter().copied().collect())
    }
}
