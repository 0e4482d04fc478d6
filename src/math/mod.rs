//! This module contains the math utils that mainly comes from `cgmath`, plus the
//! compose/decompose helpers used by the transform hierarchy.
//!
//! All angles are in radians.

pub use cgmath::{
    Deg, ElementWise, Euler, InnerSpace, Matrix, Matrix3, Matrix4, One, Quaternion, Rad, Rotation,
    Rotation3, SquareMatrix, Vector3, Vector4, Zero,
};

pub type Vec3 = Vector3<f32>;
pub type Quat = Quaternion<f32>;
pub type Mat3 = Matrix3<f32>;
pub type Mat4 = Matrix4<f32>;

/// Matrices whose determinant falls below this are treated as singular.
pub const DEGENERATE_DETERMINANT: f32 = 1e-12;

/// Scale factors below this are treated as collapsed axes.
pub const DEGENERATE_SCALE: f32 = 1e-6;

/// Transforms a point with `m`, translation included.
#[inline]
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    (m * p.extend(1.0)).truncate()
}

/// Transforms a vector with `m`. Translation is ignored.
#[inline]
pub fn transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    (m * v.extend(0.0)).truncate()
}

/// Builds the matrix `T * R * S`.
#[inline]
pub fn compose(position: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
    let r = Mat3::from(rotation);
    Mat4::from_cols(
        (r.x * scale.x).extend(0.0),
        (r.y * scale.y).extend(0.0),
        (r.z * scale.z).extend(0.0),
        position.extend(1.0),
    )
}

/// Extracts the (lossy) scale of `m`. A negative determinant is folded into
/// the x axis.
pub fn decompose_scale(m: &Mat4) -> Vec3 {
    let x = m.x.truncate();
    let y = m.y.truncate();
    let z = m.z.truncate();

    let scale = Vec3::new(x.magnitude(), y.magnitude(), z.magnitude());
    if Mat3::from_cols(x, y, z).determinant() < 0.0 {
        Vec3::new(-scale.x, scale.y, scale.z)
    } else {
        scale
    }
}

/// Extracts the rotation of `m`, given the scale returned by `decompose_scale`.
///
/// Returns `None` if any axis has collapsed, since the rotation is undefined.
pub fn decompose_rotation(m: &Mat4, scale: Vec3) -> Option<Quat> {
    if scale.x.abs() <= DEGENERATE_SCALE
        || scale.y.abs() <= DEGENERATE_SCALE
        || scale.z.abs() <= DEGENERATE_SCALE
    {
        return None;
    }

    let basis = Mat3::from_cols(
        m.x.truncate() / scale.x,
        m.y.truncate() / scale.y,
        m.z.truncate() / scale.z,
    );

    Some(Quat::from(basis).normalize())
}

/// Splits `m` into translation, rotation and scale. Collapsed axes yield an
/// identity rotation instead of NaNs.
pub fn decompose(m: &Mat4) -> (Vec3, Quat, Vec3) {
    let scale = decompose_scale(m);
    let rotation = decompose_rotation(m, scale).unwrap_or_else(Quat::one);
    (m.w.truncate(), rotation, scale)
}

/// Inverts `m`, or returns `None` if it is (nearly) singular.
#[inline]
pub fn try_invert(m: &Mat4) -> Option<Mat4> {
    try_invert_with(m, DEGENERATE_DETERMINANT)
}

/// Inverts `m` with a custom singularity threshold.
pub fn try_invert_with(m: &Mat4, epsilon: f32) -> Option<Mat4> {
    let det = m.determinant();
    if !det.is_finite() || det.abs() <= epsilon {
        None
    } else {
        m.invert()
    }
}

/// Builds a rotation from Euler angles, applied about x first, then y, then z.
#[inline]
pub fn quat_from_euler(angles: Vec3) -> Quat {
    Quat::from_angle_z(Rad(angles.z))
        * Quat::from_angle_y(Rad(angles.y))
        * Quat::from_angle_x(Rad(angles.x))
}

/// The inverse of `quat_from_euler`. The y angle is clamped to [-PI/2, PI/2].
pub fn quat_to_euler(rotation: Quat) -> Vec3 {
    let q = rotation.normalize();
    let (w, x, y, z) = (q.s, q.v.x, q.v.y, q.v.z);

    let sinr_cosp = 2.0 * (w * x + y * z);
    let cosr_cosp = 1.0 - 2.0 * (x * x + y * y);
    let roll = sinr_cosp.atan2(cosr_cosp);

    let sinp = 2.0 * (w * y - z * x);
    let pitch = if sinp.abs() >= 1.0 {
        ::std::f32::consts::FRAC_PI_2.copysign(sinp)
    } else {
        sinp.asin()
    };

    let siny_cosp = 2.0 * (w * z + x * y);
    let cosy_cosp = 1.0 - 2.0 * (y * y + z * z);
    let yaw = siny_cosp.atan2(cosy_cosp);

    Vec3::new(roll, pitch, yaw)
}

/// Builds a rotation whose positive z-axis points along `forward`.
///
/// Returns `None` if `forward` is zero or parallel with `up`.
pub fn quat_look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    if forward.magnitude2() <= DEGENERATE_SCALE {
        return None;
    }

    let dir = forward.normalize();
    let side = up.cross(dir);
    if side.magnitude2() <= DEGENERATE_SCALE {
        return None;
    }

    let side = side.normalize();
    let up = dir.cross(side).normalize();
    Some(Quat::from(Mat3::from_cols(side, up, dir)))
}
