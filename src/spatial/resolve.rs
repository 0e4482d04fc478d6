use std::mem;

use crate::errors::{Error, Result};
use crate::math::{self, InnerSpace, Mat4, Quat, Rotation, Vec3};

use super::dirty::DirtyFlags;
use super::graph::SceneGraph;
use super::transform::Transform;
use super::NodeId;

impl SceneGraph {
    /// Brings the cached world transform of `id` up to date.
    ///
    /// Walks up from `id` until a clean ancestor or a root, then back down,
    /// recomputing only the dirty chain. Parents are always resolved before
    /// their children.
    pub fn resolve_world(&mut self, id: NodeId) -> Result<()> {
        let mut chain = mem::replace(&mut self.ctx.chain, Vec::new());
        chain.clear();

        let mut cursor = id;
        let result = loop {
            let node = match self.nodes.get(cursor) {
                Some(node) => node,
                None => break Err(Error::NodeNotFound(cursor)),
            };

            if node.transform.dirty.is_empty() {
                break Ok(());
            }

            chain.push(cursor);
            match node.parent {
                Some(parent) => cursor = parent,
                None => break Ok(()),
            }
        };

        if result.is_ok() {
            for &v in chain.iter().rev() {
                self.recompose(v);
            }

            self.ctx.stats.resolved += chain.len() as u64;
        }

        chain.clear();
        self.ctx.chain = chain;
        result
    }

    fn recompose(&mut self, id: NodeId) {
        let parent = self
            .nodes
            .get(id)
            .and_then(|v| v.parent)
            .and_then(|v| self.nodes.get(v))
            .map(|v| (v.transform.world_matrix, v.transform.world_rotation));

        let record = match self.nodes.get_mut(id) {
            Some(node) => &mut node.transform,
            None => return,
        };

        let flags = record.dirty;
        let local = record.local;

        match parent {
            None => {
                if flags.intersects(DirtyFlags::RS) {
                    record.world_matrix = local.matrix();
                    record.world_rotation = local.rotation;
                    record.world_scale = local.scale;
                } else {
                    record.world_matrix.w = local.position.extend(1.0);
                }

                record.world_position = local.position;
            }
            Some((parent_matrix, parent_rotation)) => {
                if flags.intersects(DirtyFlags::RS) {
                    let m = parent_matrix * local.matrix();
                    record.world_matrix = m;
                    record.world_position = m.w.truncate();
                    record.world_scale = math::decompose_scale(&m);

                    // Extracted rotation depends on every scale above this node.
                    record.world_rotation = math::decompose_rotation(&m, record.world_scale)
                        .unwrap_or_else(|| (parent_rotation * local.rotation).normalize());
                } else if flags.contains(DirtyFlags::POSITION) {
                    let p = math::transform_point(&parent_matrix, local.position);
                    record.world_position = p;
                    record.world_matrix.w = p.extend(1.0);
                }
            }
        }

        record.dirty = DirtyFlags::empty();
    }

    /// Gets the matrix that transforms from local space into world space.
    pub fn world_matrix(&mut self, id: NodeId) -> Result<Mat4> {
        self.resolve_world(id)?;
        Ok(self.get(id)?.transform.world_matrix)
    }

    /// Gets the matrix that transforms from world space into local space.
    pub fn inverse_world_matrix(&mut self, id: NodeId) -> Result<Mat4> {
        let m = self.world_matrix(id)?;
        math::try_invert_with(&m, self.params.degenerate_determinant)
            .ok_or(Error::DegenerateTransform(id))
    }

    /// Gets the transform in world space.
    pub fn transform(&mut self, id: NodeId) -> Result<Transform> {
        self.resolve_world(id)?;
        let record = &self.get(id)?.transform;
        Ok(Transform {
            position: record.world_position,
            rotation: record.world_rotation,
            scale: record.world_scale,
        })
    }

    /// Gets position of the transform in world space.
    pub fn position(&mut self, id: NodeId) -> Result<Vec3> {
        self.resolve_world(id)?;
        Ok(self.get(id)?.transform.world_position)
    }

    /// Sets position of the transform in world space.
    pub fn set_position<T>(&mut self, id: NodeId, position: T) -> Result<()>
    where
        T: Into<Vec3>,
    {
        let position = position.into();
        let local = match self.get(id)?.parent {
            Some(parent) => match self.parent_inverse(parent, id)? {
                Some(inverse) => math::transform_point(&inverse, position),
                None => position,
            },
            None => position,
        };

        self.set_local_position(id, local)
    }

    /// Gets rotation of the transform in world space.
    pub fn rotation(&mut self, id: NodeId) -> Result<Quat> {
        self.resolve_world(id)?;
        Ok(self.get(id)?.transform.world_rotation)
    }

    /// Sets rotation of the transform in world space.
    pub fn set_rotation<T>(&mut self, id: NodeId, rotation: T) -> Result<()>
    where
        T: Into<Quat>,
    {
        let rotation = rotation.into();
        let local = match self.get(id)?.parent {
            Some(parent) => self.rotation(parent)?.invert() * rotation,
            None => rotation,
        };

        self.set_local_rotation(id, local)
    }

    /// Gets the (lossy) scale of the transform in world space.
    pub fn scale(&mut self, id: NodeId) -> Result<Vec3> {
        self.resolve_world(id)?;
        Ok(self.get(id)?.transform.world_scale)
    }

    /// Sets scale of the transform in world space. Axes of collapsed ancestors
    /// take the value as is.
    pub fn set_scale<T>(&mut self, id: NodeId, scale: T) -> Result<()>
    where
        T: Into<Vec3>,
    {
        let scale = scale.into();
        let local = match self.get(id)?.parent {
            Some(parent) => {
                let ancestor = self.scale(parent)?;
                let div = |v: f32, s: f32| {
                    if s.abs() > math::DEGENERATE_SCALE {
                        v / s
                    } else {
                        v
                    }
                };

                Vec3::new(
                    div(scale.x, ancestor.x),
                    div(scale.y, ancestor.y),
                    div(scale.z, ancestor.z),
                )
            }
            None => scale,
        };

        self.set_local_scale(id, local)
    }

    /// Rewrites the local transform of `id` so its world matrix becomes `world`
    /// under `parent`. A singular parent falls back to taking `world` as the
    /// local transform.
    pub(crate) fn set_local_from_world(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
        world: &Mat4,
    ) -> Result<()> {
        let m = match parent {
            Some(parent) => match self.parent_inverse(parent, id)? {
                Some(inverse) => inverse * *world,
                None => *world,
            },
            None => *world,
        };

        let record = &mut self.get_mut(id)?.transform;
        record.local = Transform::from_matrix(&m);
        record.euler = None;
        Ok(())
    }

    fn parent_inverse(&mut self, parent: NodeId, child: NodeId) -> Result<Option<Mat4>> {
        let m = self.world_matrix(parent)?;
        let inverse = math::try_invert_with(&m, self.params.degenerate_determinant);
        if inverse.is_none() {
            warn!(
                "[SceneGraph] world transform of {} is degenerate, {} falls back to identity-relative transform.",
                parent, child
            );
        }

        Ok(inverse)
    }
}
