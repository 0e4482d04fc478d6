use crate::errors::Result;
use crate::math::{self, Quat, Vec3};

use super::dirty::DirtyFlags;
use super::graph::SceneGraph;
use super::transform::Transform;
use super::NodeId;

impl SceneGraph {
    /// Gets the transform in local space.
    #[inline]
    pub fn local_transform(&self, id: NodeId) -> Option<Transform> {
        self.nodes.get(id).map(|v| v.transform.local)
    }

    /// Sets the transform in local space.
    pub fn set_local_transform(&mut self, id: NodeId, transform: Transform) -> Result<()> {
        let record = &mut self.get_mut(id)?.transform;
        record.local = transform;
        record.euler = None;
        self.invalidate(id, DirtyFlags::TRS)
    }

    /// Gets position of the transform in local space.
    #[inline]
    pub fn local_position(&self, id: NodeId) -> Option<Vec3> {
        self.nodes.get(id).map(|v| v.transform.local.position)
    }

    /// Sets position of the transform in local space.
    pub fn set_local_position<T>(&mut self, id: NodeId, position: T) -> Result<()>
    where
        T: Into<Vec3>,
    {
        self.get_mut(id)?.transform.local.position = position.into();
        self.invalidate(id, DirtyFlags::POSITION)
    }

    /// Moves the transform in the direction and distance of translation.
    pub fn translate<T>(&mut self, id: NodeId, translation: T) -> Result<()>
    where
        T: Into<Vec3>,
    {
        self.get_mut(id)?.transform.local.position += translation.into();
        self.invalidate(id, DirtyFlags::POSITION)
    }

    /// Gets rotation of the transform in local space.
    #[inline]
    pub fn local_rotation(&self, id: NodeId) -> Option<Quat> {
        self.nodes.get(id).map(|v| v.transform.local.rotation)
    }

    /// Sets rotation of the transform in local space.
    pub fn set_local_rotation<T>(&mut self, id: NodeId, rotation: T) -> Result<()>
    where
        T: Into<Quat>,
    {
        let record = &mut self.get_mut(id)?.transform;
        record.local.rotation = rotation.into();
        record.euler = None;
        self.invalidate(id, DirtyFlags::ROTATION)
    }

    /// Applies a rotation of node, in local space.
    pub fn rotate<T>(&mut self, id: NodeId, rotation: T) -> Result<()>
    where
        T: Into<Quat>,
    {
        let record = &mut self.get_mut(id)?.transform;
        record.local.rotation = rotation.into() * record.local.rotation;
        record.euler = None;
        self.invalidate(id, DirtyFlags::ROTATION)
    }

    /// Gets the local rotation as Euler angles in radians, rotated about x
    /// first, then y, then z.
    ///
    /// The angles are cached until the rotation is written again, so reading
    /// back what `set_local_euler_angles` wrote returns the very same values.
    pub fn local_euler_angles(&mut self, id: NodeId) -> Option<Vec3> {
        let record = &mut self.nodes.get_mut(id)?.transform;
        let rotation = record.local.rotation;
        Some(*record.euler.get_or_insert_with(|| math::quat_to_euler(rotation)))
    }

    /// Sets the local rotation from Euler angles in radians.
    pub fn set_local_euler_angles<T>(&mut self, id: NodeId, angles: T) -> Result<()>
    where
        T: Into<Vec3>,
    {
        let angles = angles.into();
        let record = &mut self.get_mut(id)?.transform;
        record.local.rotation = math::quat_from_euler(angles);
        record.euler = Some(angles);
        self.invalidate(id, DirtyFlags::ROTATION)
    }

    /// Gets scale of the transform in local space.
    #[inline]
    pub fn local_scale(&self, id: NodeId) -> Option<Vec3> {
        self.nodes.get(id).map(|v| v.transform.local.scale)
    }

    /// Sets scale of the transform in local space.
    pub fn set_local_scale<T>(&mut self, id: NodeId, scale: T) -> Result<()>
    where
        T: Into<Vec3>,
    {
        self.get_mut(id)?.transform.local.scale = scale.into();
        self.invalidate(id, DirtyFlags::SCALE)
    }

    /// Rotate the transform so the forward vector points at target's current
    /// position. Nothing happens if the target coincides with this node, or lies
    /// along `up`.
    pub fn look_at<T1, T2>(&mut self, id: NodeId, center: T1, up: T2) -> Result<()>
    where
        T1: Into<Vec3>,
        T2: Into<Vec3>,
    {
        let center: Vec3 = center.into();
        let eye = self.position(id)?;
        match math::quat_look_rotation(center - eye, up.into()) {
            Some(rotation) => self.set_rotation(id, rotation),
            None => Ok(()),
        }
    }
}
