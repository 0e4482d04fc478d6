use crate::math;

/// Tunables of a `SceneGraph`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneGraphParams {
    /// The number of nodes, and the depth of scratch buffers, reserved up front.
    pub capacity: usize,
    /// Matrices whose determinant falls below this can not be inversed, and
    /// trigger the identity-relative fallback when a world transform is kept.
    pub degenerate_determinant: f32,
}

impl Default for SceneGraphParams {
    fn default() -> Self {
        SceneGraphParams {
            capacity: 128,
            degenerate_determinant: math::DEGENERATE_DETERMINANT,
        }
    }
}
