use std::collections::HashMap;

use crate::errors::{Error, Result};

use super::dirty::DirtyFlags;
use super::events::HierarchyEvent;
use super::graph::SceneGraph;
use super::node::{Lifecycle, Node};
use super::transform::Transform;
use super::NodeId;

/// A prefab acts as a template from which you can create new node hierarchies
/// in a `SceneGraph`. Nodes are stored flat, every node refers to its parent by
/// index, and parents always come before their children.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Prefab {
    pub nodes: Vec<PrefabNode>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PrefabNode {
    /// The name of this node.
    pub name: String,
    /// The transformation in local space.
    #[serde(default)]
    pub local_transform: Transform,
    /// The index of the parent node, or `None` for a root of the prefab.
    #[serde(default)]
    pub parent: Option<usize>,
    /// The local active state.
    #[serde(default = "PrefabNode::default_active")]
    pub active: bool,
}

impl PrefabNode {
    fn default_active() -> bool {
        true
    }
}

impl Prefab {
    pub fn validate(&self) -> Result<()> {
        for (i, v) in self.nodes.iter().enumerate() {
            if let Some(parent) = v.parent {
                if parent >= i {
                    return Err(Error::InvalidPrefab(format!(
                        "node #{} ({:?}) refers to parent #{} which does not precede it",
                        i, v.name, parent
                    )));
                }
            }
        }

        Ok(())
    }

    /// Takes a snapshot of the subtree rooted at `root`, in pre-order.
    pub fn from_graph(graph: &SceneGraph, root: NodeId) -> Result<Prefab> {
        graph.get(root)?;

        let mut remap = HashMap::new();
        let mut nodes = Vec::new();

        for id in Some(root).into_iter().chain(graph.descendants(root)) {
            let node = graph.get(id)?;
            let parent = if id == root {
                None
            } else {
                node.parent.and_then(|v| remap.get(&v).cloned())
            };

            remap.insert(id, nodes.len());
            nodes.push(PrefabNode {
                name: node.name().to_owned(),
                local_transform: node.transform.local,
                parent,
                active: node.active,
            });
        }

        Ok(Prefab { nodes })
    }
}

impl SceneGraph {
    /// Creates the nodes described by `prefab`. Returns the new nodes in the same
    /// order as `prefab.nodes`; nodes without parent are appended to the roots.
    ///
    /// The hierarchy is linked up first, then each new root is invalidated once,
    /// instead of invalidating on every single attachment.
    pub fn instantiate(&mut self, prefab: &Prefab) -> Result<Vec<NodeId>> {
        prefab.validate()?;

        let mut ids: Vec<NodeId> = Vec::with_capacity(prefab.nodes.len());
        for v in &prefab.nodes {
            let mut node = Node::new(v.name.as_str().into(), self.ctx.version);
            node.transform.local = v.local_transform;
            node.transform.euler = None;
            node.active = v.active;

            let id = self.nodes.create(node);
            let parent = v.parent.map(|index| ids[index]);
            self.link(id, parent)?;
            ids.push(id);

            if let Some(parent) = parent {
                self.get_mut(id)?.lifecycle = Lifecycle::Attached;
                self.notify(HierarchyEvent::ChildAdded { parent, child: id });
                self.notify(HierarchyEvent::ParentChanged {
                    node: id,
                    old_parent: None,
                });
            }
        }

        for (i, v) in prefab.nodes.iter().enumerate() {
            if v.parent.is_none() {
                self.invalidate(ids[i], DirtyFlags::TRS)?;
                self.refresh_active_in_hierarchy(ids[i])?;
            }
        }

        debug!(
            "[SceneGraph] instantiate prefab with {} nodes.",
            prefab.nodes.len()
        );

        Ok(ids)
    }
}
