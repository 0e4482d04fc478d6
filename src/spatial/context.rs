use super::dirty::DirtyFlags;
use super::NodeId;

/// Counters of the work done by the propagation engine and the resolver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    /// Nodes whose dirty flags or change stamp were updated by `invalidate`.
    pub propagated: u64,
    /// Nodes whose world transform was recomputed by `resolve_world`.
    pub resolved: u64,
}

/// The per-frame state of a `SceneGraph`.
///
/// Holds the change epoch that answers "did this node change since the last
/// frame boundary", and the scratch buffers reused across traversals so they
/// don't allocate. Each graph owns its own context, so independent scenes never
/// share epochs.
#[derive(Debug)]
pub struct SceneGraphContext {
    pub(crate) version: u64,
    pub(crate) dirty_stack: Vec<(NodeId, DirtyFlags)>,
    pub(crate) chain: Vec<NodeId>,
    pub(crate) walk_stack: Vec<(NodeId, bool)>,
    pub(crate) stats: Statistics,
}

impl SceneGraphContext {
    pub fn new(capacity: usize) -> Self {
        SceneGraphContext {
            version: 1,
            dirty_stack: Vec::with_capacity(capacity),
            chain: Vec::with_capacity(capacity),
            walk_stack: Vec::with_capacity(capacity),
            stats: Statistics::default(),
        }
    }

    /// The current change epoch.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Starts a new epoch. Nodes stamped before this point no longer count as
    /// changed.
    #[inline]
    pub fn advance(&mut self) {
        self.version += 1;
    }

    #[inline]
    pub fn stats(&self) -> Statistics {
        self.stats
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats = Statistics::default();
    }
}

impl Default for SceneGraphContext {
    fn default() -> Self {
        SceneGraphContext::new(0)
    }
}
