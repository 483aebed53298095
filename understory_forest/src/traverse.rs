// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traversal engine: the three visitation strategies and flattening.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::ops::ControlFlow;

use crate::access::NodeAccess;
use crate::address::Address;

/// Visitation order used by traversals, lookups, and flattening.
///
/// Roots are always processed one after another in their declared order; the strategy governs
/// the order within each root's subtree.
///
/// The default is [`Strategy::Stack`], which is **not** the same order as [`Strategy::Depth`]:
/// for `root -> [a, b]`, `Stack` yields `root, b, a` while `Depth` yields `root, a, b`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Iterative pre-order over an explicit stack.
    ///
    /// Children are pushed in declared order and popped in reverse, so siblings are visited
    /// last-to-first and each subtree is finished before the next stacked sibling.
    #[default]
    Stack,
    /// Recursive pre-order, siblings in declared order.
    Depth,
    /// Level order over a FIFO queue, siblings in declared order within a level.
    Breadth,
}

/// One step of a traversal.
#[derive(Debug)]
pub struct Visit<'a, 'v, N> {
    /// The visited node.
    pub node: &'a N,
    /// Nodes from the root (inclusive) to [`Visit::node`] (inclusive).
    pub path: &'v [&'a N],
    /// Position of [`Visit::node`] in the forest.
    pub address: &'v Address,
}

impl<N> Clone for Visit<'_, '_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Visit<'_, '_, N> {}

impl Strategy {
    /// Walk every node reachable from `roots` in this strategy's order.
    ///
    /// `visit` is called once per node; returning [`ControlFlow::Break`] stops the walk
    /// immediately and is propagated to the caller. Absent nodes (see
    /// [`NodeAccess::is_absent`]) are skipped together with their subtrees.
    pub fn traverse<'a, N, A, F>(self, roots: &'a [N], access: &A, mut visit: F) -> ControlFlow<()>
    where
        A: NodeAccess<N> + ?Sized,
        F: for<'v> FnMut(Visit<'a, 'v, N>) -> ControlFlow<()>,
    {
        for (index, root) in roots.iter().enumerate() {
            if access.is_absent(root) {
                continue;
            }
            match self {
                Self::Stack => stack_preorder(root, index, access, &mut visit)?,
                Self::Depth => {
                    let mut path = Vec::new();
                    let mut address = Address::root(index);
                    depth_preorder(root, access, &mut path, &mut address, &mut visit)?;
                }
                Self::Breadth => level_order(root, index, access, &mut visit)?,
            }
        }
        ControlFlow::Continue(())
    }
}

fn stack_preorder<'a, N, A, F>(
    root: &'a N,
    index: usize,
    access: &A,
    visit: &mut F,
) -> ControlFlow<()>
where
    A: NodeAccess<N> + ?Sized,
    F: for<'v> FnMut(Visit<'a, 'v, N>) -> ControlFlow<()>,
{
    let mut stack: Vec<(&'a N, Vec<&'a N>, Address)> =
        alloc::vec![(root, alloc::vec![root], Address::root(index))];

    while let Some((node, path, address)) = stack.pop() {
        visit(Visit {
            node,
            path: &path,
            address: &address,
        })?;

        for (i, child) in access.children(node).iter().enumerate() {
            if access.is_absent(child) {
                continue;
            }
            let mut child_path = path.clone();
            child_path.push(child);
            stack.push((child, child_path, address.child(i)));
        }
    }
    ControlFlow::Continue(())
}

fn depth_preorder<'a, N, A, F>(
    node: &'a N,
    access: &A,
    path: &mut Vec<&'a N>,
    address: &mut Address,
    visit: &mut F,
) -> ControlFlow<()>
where
    A: NodeAccess<N> + ?Sized,
    F: for<'v> FnMut(Visit<'a, 'v, N>) -> ControlFlow<()>,
{
    path.push(node);
    let mut flow = visit(Visit {
        node,
        path: path.as_slice(),
        address: &*address,
    });

    if flow.is_continue() {
        for (i, child) in access.children(node).iter().enumerate() {
            if access.is_absent(child) {
                continue;
            }
            address.push(i);
            flow = depth_preorder(child, access, path, address, visit);
            address.pop();
            if flow.is_break() {
                break;
            }
        }
    }

    path.pop();
    flow
}

fn level_order<'a, N, A, F>(root: &'a N, index: usize, access: &A, visit: &mut F) -> ControlFlow<()>
where
    A: NodeAccess<N> + ?Sized,
    F: for<'v> FnMut(Visit<'a, 'v, N>) -> ControlFlow<()>,
{
    let mut queue: VecDeque<(&'a N, Vec<&'a N>, Address)> = VecDeque::new();
    queue.push_back((root, alloc::vec![root], Address::root(index)));

    while let Some((node, path, address)) = queue.pop_front() {
        visit(Visit {
            node,
            path: &path,
            address: &address,
        })?;

        for (i, child) in access.children(node).iter().enumerate() {
            if access.is_absent(child) {
                continue;
            }
            let mut child_path = path.clone();
            child_path.push(child);
            queue.push_back((child, child_path, address.child(i)));
        }
    }
    ControlFlow::Continue(())
}

/// A node together with the path that led to it.
#[derive(Clone, Debug)]
pub struct PathAnnotated<'a, N> {
    /// The node.
    pub node: &'a N,
    /// Nodes from the root (inclusive) to [`PathAnnotated::node`] (inclusive).
    pub path: Vec<&'a N>,
    /// Position of the node in the forest.
    pub address: Address,
}

/// Output of [`flatten`]: the same visitation in two shapes.
#[derive(Clone, Debug)]
pub struct Flattened<'a, N> {
    /// Every reachable node, in visitation order.
    pub nodes: Vec<&'a N>,
    /// Every reachable node with its path, in the same order as [`Flattened::nodes`].
    pub annotated: Vec<PathAnnotated<'a, N>>,
}

/// Flatten a forest in `strategy` order.
///
/// ```rust
/// use serde_json::json;
/// use understory_forest::{JsonChildren, Strategy, flatten};
///
/// let roots = vec![json!({ "id": "root", "children": [{ "id": "a" }, { "id": "b" }] })];
/// let ids = |s| -> Vec<_> {
///     flatten(&roots, &JsonChildren::new("children"), s)
///         .nodes
///         .iter()
///         .map(|n| n["id"].clone())
///         .collect()
/// };
///
/// assert_eq!(ids(Strategy::Stack), [json!("root"), json!("b"), json!("a")]);
/// assert_eq!(ids(Strategy::Depth), [json!("root"), json!("a"), json!("b")]);
/// assert_eq!(ids(Strategy::Breadth), [json!("root"), json!("a"), json!("b")]);
/// ```
pub fn flatten<'a, N, A>(roots: &'a [N], access: &A, strategy: Strategy) -> Flattened<'a, N>
where
    A: NodeAccess<N> + ?Sized,
{
    let mut nodes = Vec::new();
    let mut annotated = Vec::new();
    let _ = strategy.traverse(roots, access, |visit| {
        nodes.push(visit.node);
        annotated.push(PathAnnotated {
            node: visit.node,
            path: visit.path.to_vec(),
            address: visit.address.clone(),
        });
        ControlFlow::Continue(())
    });
    Flattened { nodes, annotated }
}
