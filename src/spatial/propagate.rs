use std::mem;

use crate::errors::{Error, Result};

use super::dirty::DirtyFlags;
use super::graph::SceneGraph;
use super::NodeId;

impl SceneGraph {
    /// Marks `id` and every descendant as needing world-transform recomposition
    /// for at least `flags`. Descendants receive `flags | POSITION`.
    ///
    /// Nodes that already carry the incoming flags and have been stamped in the
    /// current epoch are skipped along with their subtrees, so repeated
    /// invalidation of a dirty region costs nothing.
    pub fn invalidate(&mut self, id: NodeId, flags: DirtyFlags) -> Result<()> {
        if !self.nodes.contains(id) {
            return Err(Error::NodeNotFound(id));
        }

        let version = self.ctx.version;
        let mut stack = mem::replace(&mut self.ctx.dirty_stack, Vec::new());
        stack.clear();
        stack.push((id, flags));

        let mut propagated = 0;
        while let Some((v, bits)) = stack.pop() {
            let node = match self.nodes.get_mut(v) {
                Some(node) => node,
                None => {
                    debug_assert!(false, "{} is listed as a child but does not exist.", v);
                    continue;
                }
            };

            let record = &mut node.transform;
            if record.dirty.contains(bits) && record.version == version {
                continue;
            }

            record.dirty |= bits;
            record.version = version;
            propagated += 1;

            let escalated = bits.escalate();
            stack.extend(node.children.iter().map(|&child| (child, escalated)));
        }

        self.ctx.stats.propagated += propagated;
        self.ctx.dirty_stack = stack;
        Ok(())
    }

    /// Returns true if any aspect of the cached world transform is stale.
    #[inline]
    pub fn is_transform_dirty(&self, id: NodeId) -> bool {
        self.dirty_flags(id).map(|v| !v.is_empty()).unwrap_or(false)
    }

    /// Gets the stale aspects of the cached world transform.
    #[inline]
    pub fn dirty_flags(&self, id: NodeId) -> Option<DirtyFlags> {
        self.nodes.get(id).map(|v| v.transform.dirty)
    }

    /// Returns true if the transform of this node, or of any of its ancestors,
    /// has been changed since the last `reset_changed_flags`.
    #[inline]
    pub fn has_changed_this_frame(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .map(|v| v.transform.version == self.ctx.version)
            .unwrap_or(false)
    }

    /// Starts a new frame. Should be called once per frame boundary, every node
    /// stops reporting `has_changed_this_frame` until it is touched again.
    #[inline]
    pub fn reset_changed_flags(&mut self) {
        self.ctx.advance();
    }
}
