use crate::foundation::core::{Mat3, Mat4, Quat, Vec3};

/// Rigid pose: translation plus rotation.
///
/// Equality is exact per-component float equality. Recording relies on this: any change at all,
/// however small, is a change.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Translation in world units.
    pub translation: Vec3,
    /// Unit rotation quaternion, serialized as `[x, y, z, w]`.
    pub rotation: Quat,
}

impl Transform {
    /// The identity pose.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Build a pose from its parts.
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    /// Pure rotation.
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation,
        }
    }

    /// Extract the rigid part of an affine matrix.
    ///
    /// Scale and shear are dropped by normalizing the basis columns before converting the
    /// upper 3x3 block to a quaternion.
    pub fn from_matrix(m: &Mat4) -> Self {
        let basis = Mat3::from_mat4(*m);
        let rotation_shear = Mat3::from_cols(
            basis.x_axis.normalize_or_zero(),
            basis.y_axis.normalize_or_zero(),
            basis.z_axis.normalize_or_zero(),
        );
        Self {
            translation: m.w_axis.truncate(),
            rotation: Quat::from_mat3(&rotation_shear),
        }
    }

    /// 4x4 matrix for this pose.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }

    /// `true` when every component is finite. Only finite poses can be recorded and exported.
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite()
    }

    /// Map a point from local space into the space this pose is expressed in.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.translation + self.rotation * p
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `parent * child` composes a child pose expressed in the parent's space.
impl std::ops::Mul for Transform {
    type Output = Transform;

    fn mul(self, child: Transform) -> Transform {
        Transform {
            translation: self.transform_point(child.translation),
            rotation: self.rotation * child.rotation,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
