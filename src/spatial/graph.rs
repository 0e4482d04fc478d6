use crate::errors::{Error, Result};
use crate::utils::ObjectPool;

use super::context::{SceneGraphContext, Statistics};
use super::events::{HierarchyEvent, HierarchyObserver, ObserverHandle, Observers};
use super::node::{Children, Lifecycle, Node};
use super::params::SceneGraphParams;
use super::NodeId;

/// What happens to the children of a node that is being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyPolicy {
    /// Destroys the whole subtree, children first.
    Cascade,
    /// Moves the children to the parent of the removed node, keeping their
    /// world transforms, and destroys the node alone.
    DetachChildren,
}

/// A scene graph that is used to store and manipulate the position, rotation and scale
/// of the objects. We also keep the tree relationships between objects, so
/// you can access properties of transformation in both local and world space.
///
/// World transforms are cached per node and recomputed lazily, only when queried
/// after a mutation.
pub struct SceneGraph {
    pub(crate) nodes: ObjectPool<NodeId, Node>,
    pub(crate) roots: Children,
    pub(crate) ctx: SceneGraphContext,
    pub(crate) params: SceneGraphParams,
    observers: Observers,
}

impl Default for SceneGraph {
    fn default() -> Self {
        SceneGraph::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        SceneGraph::with_params(SceneGraphParams::default())
    }

    pub fn with_params(params: SceneGraphParams) -> Self {
        SceneGraph {
            nodes: ObjectPool::with_capacity(params.capacity),
            roots: Children::new(),
            ctx: SceneGraphContext::new(params.capacity),
            params,
            observers: Observers::default(),
        }
    }

    #[inline]
    pub fn params(&self) -> &SceneGraphParams {
        &self.params
    }

    /// The change epoch and scratch buffers of this graph.
    #[inline]
    pub fn context(&self) -> &SceneGraphContext {
        &self.ctx
    }

    /// Counters of the nodes touched by propagation and resolution so far.
    #[inline]
    pub fn stats(&self) -> Statistics {
        self.ctx.stats()
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.ctx.reset_stats();
    }

    /// Get the number of alive nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks if specified `NodeId` was created by this graph, and has not been
    /// removed yet.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Returns an iterator over all the alive nodes.
    #[inline]
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes.handles()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Creates a new root node with identity transform.
    pub fn create<T: AsRef<str>>(&mut self, name: T) -> NodeId {
        let node = Node::new(name.as_ref().into(), self.ctx.version);
        let id = self.nodes.create(node);

        let index = self.roots.len();
        self.roots.push(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.sibling_index = index;
        }

        trace!("[SceneGraph] create {} ({:?}).", id, name.as_ref());
        id
    }

    /// Removes a node and all of its descendants. Returns the removed nodes,
    /// children first.
    #[inline]
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        self.remove_with(id, DestroyPolicy::Cascade)
    }

    /// Removes a node, dealing with its children according to `policy`.
    pub fn remove_with(&mut self, id: NodeId, policy: DestroyPolicy) -> Result<Vec<NodeId>> {
        let (parent, children) = {
            let node = self.get(id)?;
            if node.lifecycle == Lifecycle::Destroying {
                return Err(Error::NodeDestroying(id));
            }

            (node.parent, node.children.clone())
        };

        if policy == DestroyPolicy::DetachChildren {
            for child in children {
                self.set_parent(child, parent, true)?;
            }
        }

        let parent = self.unlink(id)?;
        if let Some(parent) = parent {
            self.notify(HierarchyEvent::ChildRemoved { parent, child: id });
        }

        let mut removes = Vec::new();
        self.walk(
            id,
            |_, node| node.lifecycle = Lifecycle::Destroying,
            |v, _| removes.push(v),
        )?;

        for &v in &removes {
            self.nodes.free(v);
        }

        trace!("[SceneGraph] remove {} with {} nodes.", id, removes.len());
        Ok(removes)
    }

    /// Gets the hierarchy membership of a node. Stale handles report
    /// `Lifecycle::Destroyed`.
    #[inline]
    pub fn lifecycle(&self, id: NodeId) -> Lifecycle {
        self.nodes
            .get(id)
            .map(|v| v.lifecycle)
            .unwrap_or(Lifecycle::Destroyed)
    }

    /// Gets the name of this node.
    #[inline]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(|v| v.name.as_ref())
    }

    /// Sets the name of this node.
    #[inline]
    pub fn set_name<T: AsRef<str>>(&mut self, id: NodeId, name: T) -> Result<()> {
        self.get_mut(id)?.name = name.as_ref().into();
        Ok(())
    }

    /// Finds a node by name and returns it.
    ///
    /// If no node with name can be found, None is returned. If name contains a '/' character,
    /// it traverses the hierarchy like a path name, starting from the roots.
    pub fn find<N: AsRef<str>>(&self, name: N) -> Option<NodeId> {
        let mut components = name
            .as_ref()
            .trim_start_matches('/')
            .split('/')
            .filter(|v| !v.is_empty());

        let first = components.next()?;
        let rest: Vec<_> = components.collect();

        self.roots
            .iter()
            .filter(|&&v| self.name(v) == Some(first))
            .filter_map(|&v| self.find_components(v, &rest))
            .next()
    }

    /// Finds a node from specified searching root and returns it.
    ///
    /// If no node with name can be found, None is returned. If name contains a '/' character,
    /// it traverses the hierarchy like a path name.
    pub fn find_from<N: AsRef<str>>(&self, root: NodeId, name: N) -> Option<NodeId> {
        if !self.contains(root) {
            return None;
        }

        let components: Vec<_> = name
            .as_ref()
            .split('/')
            .filter(|v| !v.is_empty())
            .collect();

        self.find_components(root, &components)
    }

    fn find_components(&self, root: NodeId, components: &[&str]) -> Option<NodeId> {
        let mut iter = root;
        for component in components {
            iter = *self
                .children(iter)
                .iter()
                .find(|&&child| self.name(child) == Some(*component))?;
        }

        Some(iter)
    }

    /// Registers a observer of hierarchy changes.
    pub fn subscribe<T>(&mut self, observer: T) -> ObserverHandle
    where
        T: HierarchyObserver + 'static,
    {
        self.observers.add(Box::new(observer))
    }

    /// Removes a observer registered by `subscribe`.
    pub fn unsubscribe(&mut self, handle: ObserverHandle) -> bool {
        self.observers.remove(handle).is_some()
    }
}

impl SceneGraph {
    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    #[inline]
    pub(crate) fn notify(&mut self, event: HierarchyEvent) {
        self.observers.dispatch(event);
    }

    /// The sibling list a node with `parent` lives in.
    pub(crate) fn siblings(&self, parent: Option<NodeId>) -> Result<&Children> {
        match parent {
            Some(parent) => Ok(&self.get(parent)?.children),
            None => Ok(&self.roots),
        }
    }

    pub(crate) fn siblings_mut(&mut self, parent: Option<NodeId>) -> Result<&mut Children> {
        match parent {
            Some(parent) => Ok(&mut self.get_mut(parent)?.children),
            None => Ok(&mut self.roots),
        }
    }

    /// Rewrites the sibling indices of a sibling list, starting at `from`.
    pub(crate) fn renumber(&mut self, parent: Option<NodeId>, from: usize) -> Result<()> {
        let len = self.siblings(parent)?.len();
        for i in from..len {
            let v = self.siblings(parent)?[i];
            self.get_mut(v)?.sibling_index = i;
        }

        Ok(())
    }

    /// Removes a node from its sibling list. Returns the old parent.
    pub(crate) fn unlink(&mut self, id: NodeId) -> Result<Option<NodeId>> {
        let (parent, index) = {
            let node = self.get(id)?;
            (node.parent, node.sibling_index)
        };

        {
            let siblings = self.siblings_mut(parent)?;
            if siblings.get(index) != Some(&id) {
                debug_assert!(false, "{} is not listed in the children of {:?}.", id, parent);
                return Err(Error::ChildNotFound { parent, child: id });
            }

            siblings.remove(index);
        }

        self.renumber(parent, index)?;
        self.get_mut(id)?.parent = None;
        Ok(parent)
    }

    /// Appends a unlinked node to the sibling list of `parent`.
    pub(crate) fn link(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<()> {
        let index = {
            let siblings = self.siblings_mut(parent)?;
            siblings.push(id);
            siblings.len() - 1
        };

        let node = self.get_mut(id)?;
        node.parent = parent;
        node.sibling_index = index;
        Ok(())
    }
}
