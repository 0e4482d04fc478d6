use crate::math::{self, ElementWise, Mat4, One, Quat, Vec3};

/// `Transform` is used to store and manipulate the position, rotation and scale
/// of the object. We use a left handed, y-up world coordinate system.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            position: Vec3::new(0.0, 0.0, 0.0),
            rotation: Quat::one(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new<T1, T2, T3>(position: T1, rotation: T2, scale: T3) -> Self
    where
        T1: Into<Vec3>,
        T2: Into<Quat>,
        T3: Into<Vec3>,
    {
        Transform {
            position: position.into(),
            rotation: rotation.into(),
            scale: scale.into(),
        }
    }

    /// Splits a matrix into a transform. Shear can not be represented and is
    /// dropped, collapsed axes yield an identity rotation.
    #[inline]
    pub fn from_matrix(m: &Mat4) -> Self {
        let (position, rotation, scale) = math::decompose(m);
        Transform {
            position,
            rotation,
            scale,
        }
    }

    /// Returns the matrix representation, `M = T * R * S`.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        math::compose(self.position, self.rotation, self.scale)
    }

    /// Transforms direction from local space to transform's space.
    ///
    /// This operation is not affected by scale or position of the transform. The returned
    /// vector has the same length as direction.
    #[inline]
    pub fn transform_direction<T>(&self, v: T) -> Vec3
    where
        T: Into<Vec3>,
    {
        self.rotation * v.into()
    }

    /// Transforms vector from local space to transform's space.
    ///
    /// This operation is not affected by position of the transform, but is is affected by scale.
    /// The returned vector may have a different length than vector.
    #[inline]
    pub fn transform_vector<T>(&self, v: T) -> Vec3
    where
        T: Into<Vec3>,
    {
        self.rotation * v.into().mul_element_wise(self.scale)
    }

    /// Transforms points from local space to transform's space.
    #[inline]
    pub fn transform_point<T>(&self, v: T) -> Vec3
    where
        T: Into<Vec3>,
    {
        self.transform_vector(v) + self.position
    }

    /// Returns the up direction in transform's space, which is looking down the positive y-axis.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.transform_direction(Vec3::unit_y())
    }

    /// Returns the forward direction in transform's space, which is looking down the positive z-axis.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.transform_direction(Vec3::unit_z())
    }

    /// Returns the right direction in transform's space, which is looking down the positive x-axis.
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.transform_direction(Vec3::unit_x())
    }
}
