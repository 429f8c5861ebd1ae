use crate::Vec3;

/// A right-handed orthonormal frame, usually built around a surface normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoNormalBasis {
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

impl OrthoNormalBasis {
    /// Build a basis whose z axis is `z` (normalized).
    pub fn from_z(z: Vec3) -> Self {
        let z = z.normalize();
        let (x, y) = z.any_orthonormal_pair();
        Self { x, y, z }
    }

    /// Transform a vector expressed in this frame into world space.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.x * local.x + self.y * local.y + self.z * local.z
    }
}
