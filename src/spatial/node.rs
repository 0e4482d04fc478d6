use inlinable_string::InlinableString;
use smallvec::SmallVec;

use crate::math::{Mat4, One, Quat, SquareMatrix, Vec3};

use super::dirty::DirtyFlags;
use super::transform::Transform;
use super::NodeId;

/// The ordered children of a node, or the ordered roots of a graph.
pub type Children = SmallVec<[NodeId; 4]>;

/// The hierarchy membership of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created but never attached to a parent.
    Unattached,
    /// Attached to a parent.
    Attached,
    /// Detached from a parent it used to have.
    Detached,
    /// Being torn down along with its subtree. Can not be reparented.
    Destroying,
    /// Freed. Stale handles report this state.
    Destroyed,
}

/// Local transform, cached world transform and the bookkeeping that tells
/// when the cache is stale.
#[derive(Debug, Clone, Copy)]
pub struct TransformRecord {
    pub(crate) local: Transform,
    pub(crate) euler: Option<Vec3>,

    pub(crate) world_position: Vec3,
    pub(crate) world_rotation: Quat,
    pub(crate) world_scale: Vec3,
    pub(crate) world_matrix: Mat4,

    pub(crate) dirty: DirtyFlags,
    pub(crate) version: u64,
}

impl TransformRecord {
    pub(crate) fn new(version: u64) -> Self {
        TransformRecord {
            local: Transform::default(),
            euler: Some(Vec3::new(0.0, 0.0, 0.0)),
            world_position: Vec3::new(0.0, 0.0, 0.0),
            world_rotation: Quat::one(),
            world_scale: Vec3::new(1.0, 1.0, 1.0),
            world_matrix: Mat4::identity(),
            dirty: DirtyFlags::empty(),
            version,
        }
    }

    /// The transform relative to the parent.
    #[inline]
    pub fn local(&self) -> &Transform {
        &self.local
    }

    /// The aspects of the cached world transform that are stale.
    #[inline]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// The epoch this record was last invalidated in.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// `Node` is a entry in the `SceneGraph`. Every `Node` can have a parent, which
/// allows you to apply position, rotation and scale hierarchically.
///
/// `NodeId` are used to record the tree relationships. Every access requires going
/// through the arena, which can be cumbersome and comes with some runtime overhead.
/// But a stale `NodeId` is always detected, instead of dangling.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: InlinableString,
    pub(crate) active: bool,
    pub(crate) active_in_hierarchy: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Children,
    pub(crate) sibling_index: usize,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) transform: TransformRecord,
}

impl Node {
    pub(crate) fn new(name: InlinableString, version: u64) -> Self {
        Node {
            name,
            active: true,
            active_in_hierarchy: true,
            parent: None,
            children: Children::new(),
            sibling_index: 0,
            lifecycle: Lifecycle::Unattached,
            transform: TransformRecord::new(version),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn sibling_index(&self) -> usize {
        self.sibling_index
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn is_active_in_hierarchy(&self) -> bool {
        self.active_in_hierarchy
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[inline]
    pub fn transform(&self) -> &TransformRecord {
        &self.transform
    }
}
