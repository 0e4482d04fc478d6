//! The transform hierarchy of objects, along with the lazily resolved world
//! transforms.

pub mod context;
pub mod dirty;
pub mod events;
pub mod graph;
pub mod node;
pub mod params;
pub mod prefab;
pub mod transform;
pub mod walk;

mod hierarchy;
mod local;
mod propagate;
mod resolve;

impl_handle!(NodeId);

pub mod prelude {
    pub use super::context::{SceneGraphContext, Statistics};
    pub use super::dirty::DirtyFlags;
    pub use super::events::{HierarchyEvent, HierarchyObserver, ObserverHandle};
    pub use super::graph::{DestroyPolicy, SceneGraph};
    pub use super::node::{Lifecycle, Node, TransformRecord};
    pub use super::params::SceneGraphParams;
    pub use super::prefab::{Prefab, PrefabNode};
    pub use super::transform::Transform;
    pub use super::walk::{Ancestors, Descendants};
    pub use super::NodeId;
}
