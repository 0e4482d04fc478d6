use std::cell::RefCell;

use smallvec::SmallVec;

use crate::errors::{Error, Result};

use super::dirty::DirtyFlags;
use super::events::HierarchyEvent;
use super::graph::SceneGraph;
use super::node::Lifecycle;
use super::NodeId;

impl SceneGraph {
    /// Gets the parent node.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|v| v.parent)
    }

    /// Gets the children of this node in sibling order.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|v| &v.children[..]).unwrap_or(&[])
    }

    #[inline]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// Gets the nodes without parent, in sibling order.
    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns true if this is the root of a hierarchy, aka. has no parent.
    #[inline]
    pub fn is_root(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .map(|v| v.parent.is_none())
            .unwrap_or(false)
    }

    /// Returns true if this is the leaf of a hierarchy, aka. has no child.
    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .map(|v| v.children.is_empty())
            .unwrap_or(false)
    }

    /// Return true if rhs is one of the ancestor of `lhs`.
    #[inline]
    pub fn is_ancestor(&self, lhs: NodeId, rhs: NodeId) -> bool {
        self.ancestors(lhs).any(|v| v == rhs)
    }

    /// Attachs a node to `parent` as its last child, or makes it a root if
    /// `parent` is `None`.
    ///
    /// With `keep_world_pose` the world transform of the node is preserved and
    /// its local transform is rewritten, otherwise the local transform is kept
    /// and the node moves along with its new parent.
    pub fn set_parent<T>(&mut self, child: NodeId, parent: T, keep_world_pose: bool) -> Result<()>
    where
        T: Into<Option<NodeId>>,
    {
        let parent = parent.into();
        let old_parent = {
            let node = self.get(child)?;
            if node.lifecycle == Lifecycle::Destroying {
                return Err(Error::NodeDestroying(child));
            }

            node.parent
        };

        if let Some(parent) = parent {
            if parent == child {
                return Err(Error::CanNotAttachSelfAsParent(child));
            }

            if self.get(parent)?.lifecycle == Lifecycle::Destroying {
                return Err(Error::NodeDestroying(parent));
            }

            if self.is_ancestor(parent, child) {
                return Err(Error::CyclicHierarchy {
                    node: child,
                    parent,
                });
            }
        }

        if old_parent == parent {
            return Ok(());
        }

        let world = if keep_world_pose {
            Some(self.world_matrix(child)?)
        } else {
            None
        };

        self.unlink(child)?;
        self.link(child, parent)?;
        self.get_mut(child)?.lifecycle = if parent.is_some() {
            Lifecycle::Attached
        } else {
            Lifecycle::Detached
        };

        if let Some(world) = world {
            self.set_local_from_world(child, parent, &world)?;
        }

        self.invalidate(child, DirtyFlags::TRS)?;
        self.refresh_active_in_hierarchy(child)?;

        trace!(
            "[SceneGraph] reparent {} from {:?} to {:?}.",
            child,
            old_parent,
            parent
        );

        if let Some(old_parent) = old_parent {
            self.notify(HierarchyEvent::ChildRemoved {
                parent: old_parent,
                child,
            });
        }

        if let Some(parent) = parent {
            self.notify(HierarchyEvent::ChildAdded { parent, child });
        }

        self.notify(HierarchyEvent::ParentChanged {
            node: child,
            old_parent,
        });

        Ok(())
    }

    /// Detach a node from its parent and siblings, it becomes the last root.
    /// Children are not affected.
    #[inline]
    pub fn remove_from_parent(&mut self, child: NodeId, keep_world_pose: bool) -> Result<()> {
        self.set_parent(child, None, keep_world_pose)
    }

    /// Gets the position of this node among its siblings.
    #[inline]
    pub fn sibling_index(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id).map(|v| v.sibling_index)
    }

    /// Moves this node to `index` among its siblings. Indices past the end are
    /// clamped to the last position.
    ///
    /// `SiblingIndexChanged` fires for the moved node first, then for every
    /// sibling shifted by the move.
    pub fn set_sibling_index(&mut self, id: NodeId, index: usize) -> Result<()> {
        let (parent, current) = {
            let node = self.get(id)?;
            (node.parent, node.sibling_index)
        };

        let index = {
            let siblings = self.siblings_mut(parent)?;
            let index = index.min(siblings.len() - 1);
            if index == current {
                return Ok(());
            }

            siblings.remove(current);
            siblings.insert(index, id);
            index
        };

        let (lo, hi) = (current.min(index), current.max(index));
        self.renumber(parent, lo)?;
        self.notify(HierarchyEvent::SiblingIndexChanged { node: id });

        for i in lo..=hi {
            let v = self.siblings(parent)?[i];
            if v != id {
                self.notify(HierarchyEvent::SiblingIndexChanged { node: v });
            }
        }

        Ok(())
    }

    #[inline]
    pub fn set_as_first_sibling(&mut self, id: NodeId) -> Result<()> {
        self.set_sibling_index(id, 0)
    }

    #[inline]
    pub fn set_as_last_sibling(&mut self, id: NodeId) -> Result<()> {
        self.set_sibling_index(id, ::std::usize::MAX)
    }

    /// Activates or deactivates this node. Descendants are active in hierarchy
    /// only if every ancestor is active as well.
    pub fn set_active(&mut self, id: NodeId, active: bool) -> Result<()> {
        let node = self.get_mut(id)?;
        if node.active == active {
            return Ok(());
        }

        node.active = active;
        self.refresh_active_in_hierarchy(id)
    }

    /// Gets the local active state of this node.
    #[inline]
    pub fn is_active(&self, id: NodeId) -> bool {
        self.nodes.get(id).map(|v| v.active).unwrap_or(false)
    }

    /// Returns true if this node and all of its ancestors are active.
    #[inline]
    pub fn is_active_in_hierarchy(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .map(|v| v.active_in_hierarchy)
            .unwrap_or(false)
    }

    /// Recomputes `active_in_hierarchy` for the subtree rooted at `id`.
    pub(crate) fn refresh_active_in_hierarchy(&mut self, id: NodeId) -> Result<()> {
        let inherited = match self.get(id)?.parent {
            Some(parent) => self.get(parent)?.active_in_hierarchy,
            None => true,
        };

        let states = RefCell::new(SmallVec::<[bool; 16]>::new());
        states.borrow_mut().push(inherited);

        self.walk(
            id,
            |_, node| {
                let mut states = states.borrow_mut();
                let v = states.last().cloned().unwrap_or(true) && node.active;
                node.active_in_hierarchy = v;
                states.push(v);
            },
            |_, _| {
                states.borrow_mut().pop();
            },
        )
    }
}
