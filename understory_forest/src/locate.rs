// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! First-match lookups built on [`Strategy::traverse`].

use alloc::vec::Vec;
use core::ops::ControlFlow;

use crate::access::NodeAccess;
use crate::address::Address;
use crate::traverse::Strategy;

/// A located node with enough context to edit around it.
#[derive(Clone, Debug)]
pub struct Located<'a, N> {
    /// The matched node.
    pub node: &'a N,
    /// The node owning [`Located::node`] in its children, or `None` for a root.
    pub parent: Option<&'a N>,
    /// Position of [`Located::node`] among its parent's children, or `None` for a root.
    pub index: Option<usize>,
    /// Full position of the node in the forest.
    pub address: Address,
}

/// Return the first node satisfying `predicate` in `strategy` order.
///
/// Roots are searched in order and the walk stops at the first hit.
pub fn locate<'a, N, A, P>(
    roots: &'a [N],
    access: &A,
    mut predicate: P,
    strategy: Strategy,
) -> Option<&'a N>
where
    A: NodeAccess<N> + ?Sized,
    P: FnMut(&N) -> bool,
{
    let mut found = None;
    let _ = strategy.traverse(roots, access, |visit| {
        if predicate(visit.node) {
            found = Some(visit.node);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });
    found
}

/// Return the root-to-match path of the first node satisfying `predicate`.
///
/// The path is empty when nothing matches.
pub fn locate_path<'a, N, A, P>(
    roots: &'a [N],
    access: &A,
    mut predicate: P,
    strategy: Strategy,
) -> Vec<&'a N>
where
    A: NodeAccess<N> + ?Sized,
    P: FnMut(&N) -> bool,
{
    let mut found = Vec::new();
    let _ = strategy.traverse(roots, access, |visit| {
        if predicate(visit.node) {
            found = visit.path.to_vec();
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });
    found
}

/// Return the first node satisfying `predicate` in [`Strategy::Stack`] order, together with
/// its parent and its index among the parent's children.
pub fn locate_with_parent<'a, N, A, P>(
    roots: &'a [N],
    access: &A,
    mut predicate: P,
) -> Option<Located<'a, N>>
where
    A: NodeAccess<N> + ?Sized,
    P: FnMut(&N) -> bool,
{
    let mut found = None;
    let _ = Strategy::Stack.traverse(roots, access, |visit| {
        if !predicate(visit.node) {
            return ControlFlow::Continue(());
        }
        let parent = match visit.path {
            [.., parent, _] => Some(*parent),
            _ => None,
        };
        found = Some(Located {
            node: visit.node,
            parent,
            index: parent.map(|_| visit.address.index()),
            address: visit.address.clone(),
        });
        ControlFlow::Break(())
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traverse::tests::{Children, Node, branch, leaf, sample};
    use alloc::vec;

    fn named(name: &'static str) -> impl FnMut(&Node) -> bool {
        move |n| n.name == name
    }

    #[test]
    fn locate_follows_strategy_order() {
        // Two nodes share a name; each strategy reaches a different one first.
        let roots = vec![branch(
            "r",
            vec![
                branch("a", vec![leaf("dup"), leaf("a-side")]),
                branch("b", vec![branch("b1", vec![leaf("dup")])]),
                leaf("dup"),
            ],
        )];
        let first_parent = |strategy| {
            let path = locate_path(&roots, &Children, named("dup"), strategy);
            path[path.len() - 2].name
        };
        assert_eq!(first_parent(Strategy::Stack), "r");
        assert_eq!(first_parent(Strategy::Depth), "a");
        assert_eq!(first_parent(Strategy::Breadth), "r");
    }

    #[test]
    fn locate_misses() {
        let roots = sample();
        for strategy in [Strategy::Stack, Strategy::Depth, Strategy::Breadth] {
            assert!(locate(&roots, &Children, named("zz"), strategy).is_none());
            assert!(locate_path(&roots, &Children, named("zz"), strategy).is_empty());
        }
    }

    #[test]
    fn path_ends_at_located_node() {
        let roots = sample();
        for strategy in [Strategy::Stack, Strategy::Depth, Strategy::Breadth] {
            let node = locate(&roots, &Children, named("a2"), strategy).unwrap();
            let path = locate_path(&roots, &Children, named("a2"), strategy);
            let names: Vec<_> = path.iter().map(|n| n.name).collect();
            assert_eq!(names, ["r", "a", "a2"]);
            assert!(core::ptr::eq(*path.last().unwrap(), node));
        }
    }

    #[test]
    fn second_root_is_searched() {
        let roots = sample();
        let path = locate_path(&roots, &Children, named("s"), Strategy::Depth);
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].name, "s");
    }

    #[test]
    fn with_parent_reports_index() {
        let roots = sample();
        let hit = locate_with_parent(&roots, &Children, named("a2")).unwrap();
        assert_eq!(hit.node.name, "a2");
        assert_eq!(hit.parent.map(|p| p.name), Some("a"));
        assert_eq!(hit.index, Some(1));
        assert_eq!(hit.address.as_slice(), &[0, 0, 1]);
    }

    #[test]
    fn with_parent_on_root() {
        let roots = sample();
        let hit = locate_with_parent(&roots, &Children, named("s")).unwrap();
        assert!(hit.parent.is_none());
        assert_eq!(hit.index, None);
        assert!(hit.address.is_root());
        assert_eq!(hit.address.index(), 1);
    }
}
