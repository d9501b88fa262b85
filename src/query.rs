// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Breadth-first search for nodes below a given node.

//! Only nodes are ever matched, never leaves. The depth passed to
//! predicates is 1 for direct children of the node the search starts
//! from, 2 for grandchildren, etc. `max_depth` limits how deep the
//! search goes: `None` means unbounded, `Some(n)` means that nodes at
//! depth `n` are still tested but not searched further.

use crate::queue::Queue;
use crate::tree::{Node, NodeId, Tree};
use std::ops::ControlFlow;

impl Tree {
    // Visit all nodes below `from` in breadth-first order until
    // `visit` breaks.
    fn walk_breadth_first(
        &self,
        from: NodeId,
        max_depth: Option<usize>,
        mut visit: impl FnMut(NodeId, usize) -> ControlFlow<()>,
    ) {
        let mut queue = Queue::new();
        queue.enqueue((from, 0));
        while let Some((id, depth)) = queue.dequeue() {
            let depth = depth + 1;
            for child in self.node(id).child_nodes() {
                if visit(child, depth).is_break() {
                    return;
                }
                if max_depth.map_or(true, |max| depth < max) {
                    queue.enqueue((child, depth));
                }
            }
        }
    }

    /// The first node below `from`, in breadth-first order, for which
    /// `pred` returns true.
    pub fn find_child(
        &self,
        from: NodeId,
        mut pred: impl FnMut(&Node, usize) -> bool,
        max_depth: Option<usize>,
    ) -> Option<NodeId> {
        let mut found = None;
        self.walk_breadth_first(from, max_depth, |id, depth| {
            if pred(self.node(id), depth) {
                found = Some(id);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        found
    }

    /// All nodes below `from` for which `pred` returns true, in
    /// breadth-first order.
    pub fn find_children(
        &self,
        from: NodeId,
        mut pred: impl FnMut(&Node, usize) -> bool,
        max_depth: Option<usize>,
    ) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.walk_breadth_first(from, max_depth, |id, depth| {
            if pred(self.node(id), depth) {
                found.push(id);
            }
            ControlFlow::Continue(())
        });
        found
    }

    pub fn find_child_by_name(
        &self,
        from: NodeId,
        name: &str,
        max_depth: Option<usize>,
    ) -> Option<NodeId> {
        self.find_child(from, |n, _| n.name() == name, max_depth)
    }

    pub fn find_children_by_name(
        &self,
        from: NodeId,
        name: &str,
        max_depth: Option<usize>,
    ) -> Vec<NodeId> {
        self.find_children(from, |n, _| n.name() == name, max_depth)
    }

    pub fn find_direct_child_by_name(&self, from: NodeId, name: &str)
                                     -> Option<NodeId> {
        self.find_child_by_name(from, name, Some(1))
    }

    pub fn find_direct_children_by_name(&self, from: NodeId, name: &str)
                                        -> Vec<NodeId> {
        self.find_children_by_name(from, name, Some(1))
    }
}
