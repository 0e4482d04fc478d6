use std::mem;

use crate::errors::{Error, Result};

use super::graph::SceneGraph;
use super::node::Node;
use super::NodeId;

impl SceneGraph {
    /// Visits the subtree rooted at `root` without recursion. `pre` is called
    /// on a node before any of its descendants, `post` after all of them, each
    /// exactly once per node. Children are visited in sibling order.
    ///
    /// The explicit stack is reused across calls, its depth is bounded by the
    /// number of pending siblings instead of call-stack frames.
    pub fn walk<Pre, Post>(&mut self, root: NodeId, mut pre: Pre, mut post: Post) -> Result<()>
    where
        Pre: FnMut(NodeId, &mut Node),
        Post: FnMut(NodeId, &mut Node),
    {
        if !self.nodes.contains(root) {
            return Err(Error::NodeNotFound(root));
        }

        let mut stack = mem::replace(&mut self.ctx.walk_stack, Vec::new());
        stack.clear();
        stack.push((root, false));

        let mut dangling = None;
        while let Some((id, after_children)) = stack.pop() {
            let node = match self.nodes.get_mut(id) {
                Some(node) => node,
                None => {
                    dangling = Some(id);
                    break;
                }
            };

            if after_children {
                post(id, &mut *node);
                continue;
            }

            pre(id, &mut *node);
            stack.push((id, true));
            stack.extend(node.children.iter().rev().map(|&v| (v, false)));
        }

        stack.clear();
        self.ctx.walk_stack = stack;

        match dangling {
            Some(id) => {
                debug_assert!(false, "{} is listed as a child but does not exist.", id);
                Err(Error::NodeNotFound(id))
            }
            None => Ok(()),
        }
    }

    /// Returns an iterator of references to its ancestors, nearest first.
    #[inline]
    pub fn ancestors(&self, id: NodeId) -> Ancestors {
        Ancestors {
            cursor: self.parent(id),
            graph: self,
        }
    }

    /// Returns an iterator of references to its descendants in pre-order.
    #[inline]
    pub fn descendants(&self, id: NodeId) -> Descendants {
        let stack = self.children(id).iter().rev().cloned().collect();
        Descendants { stack, graph: self }
    }
}

/// An iterator of references to its ancestors.
pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let v = self.cursor?;
        self.cursor = self.graph.parent(v);
        Some(v)
    }
}

/// An iterator of references to its descendants, in tree order.
pub struct Descendants<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let v = self.stack.pop()?;
        self.stack.extend(self.graph.children(v).iter().rev().cloned());
        Some(v)
    }
}
