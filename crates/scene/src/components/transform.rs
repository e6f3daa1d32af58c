use foundation::math::{
    Mat4, Vec3, mat4_mul, mat4_rotation_x, mat4_rotation_y, mat4_rotation_z, mat4_scale,
    mat4_translation,
};

/// Local transform relative to the parent node.
///
/// Rotation is Euler XYZ in radians; the composed matrix is
/// `T * Rx * Ry * Rz * S`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        let r = mat4_mul(
            mat4_rotation_x(self.rotation.x),
            mat4_mul(
                mat4_rotation_y(self.rotation.y),
                mat4_rotation_z(self.rotation.z),
            ),
        );
        mat4_mul(
            mat4_translation(self.position),
            mat4_mul(r, mat4_scale(self.scale)),
        )
    }
}
