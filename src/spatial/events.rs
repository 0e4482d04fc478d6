//! Hierarchy change notifications for the component layer.

use crate::utils::ObjectPool;

use super::NodeId;

impl_handle!(ObserverHandle);

/// A structural change of the hierarchy, dispatched synchronously while the
/// mutation that caused it is still in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyEvent {
    /// `node` has been attached to a new parent, or detached into a root.
    ParentChanged {
        node: NodeId,
        old_parent: Option<NodeId>,
    },
    /// `child` has been appended to the children of `parent`.
    ChildAdded { parent: NodeId, child: NodeId },
    /// `child` has been removed from the children of `parent`.
    ChildRemoved { parent: NodeId, child: NodeId },
    /// `node` has been moved to another place among its siblings.
    SiblingIndexChanged { node: NodeId },
}

impl HierarchyEvent {
    /// The node whose observers should react to this event.
    pub fn target(&self) -> NodeId {
        match *self {
            HierarchyEvent::ParentChanged { node, .. } => node,
            HierarchyEvent::ChildAdded { parent, .. } => parent,
            HierarchyEvent::ChildRemoved { parent, .. } => parent,
            HierarchyEvent::SiblingIndexChanged { node } => node,
        }
    }
}

/// Receives `HierarchyEvent`s. Observers never get access to the graph itself,
/// they are expected to record what happened and act on it later.
pub trait HierarchyObserver {
    fn on_hierarchy_event(&mut self, event: &HierarchyEvent);
}

impl<F> HierarchyObserver for F
where
    F: FnMut(&HierarchyEvent),
{
    fn on_hierarchy_event(&mut self, event: &HierarchyEvent) {
        (self)(event)
    }
}

#[derive(Default)]
pub(crate) struct Observers {
    observers: ObjectPool<ObserverHandle, Box<dyn HierarchyObserver>>,
}

impl Observers {
    pub fn add(&mut self, observer: Box<dyn HierarchyObserver>) -> ObserverHandle {
        self.observers.create(observer)
    }

    pub fn remove(&mut self, handle: ObserverHandle) -> Option<Box<dyn HierarchyObserver>> {
        self.observers.free(handle)
    }

    pub fn dispatch(&mut self, event: HierarchyEvent) {
        for v in self.observers.values_mut() {
            v.on_hierarchy_event(&event);
        }
    }
}
