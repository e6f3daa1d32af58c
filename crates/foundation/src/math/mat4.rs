//! Column-major 4x4 matrices in the layout WGSL expects (`m[col][row]`).

use super::Vec3;

pub type Mat4 = [[f32; 4]; 4];

pub const MAT4_IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    // Column-major matrix multiply: c = a * b
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

pub fn mat4_translation(t: Vec3) -> Mat4 {
    let mut m = MAT4_IDENTITY;
    m[3] = [t.x as f32, t.y as f32, t.z as f32, 1.0];
    m
}

pub fn mat4_scale(s: f64) -> Mat4 {
    let s = s as f32;
    [
        [s, 0.0, 0.0, 0.0],
        [0.0, s, 0.0, 0.0],
        [0.0, 0.0, s, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

pub fn mat4_rotation_x(angle_rad: f64) -> Mat4 {
    let (s, c) = (angle_rad.sin() as f32, angle_rad.cos() as f32);
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, s, 0.0],
        [0.0, -s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

pub fn mat4_rotation_y(angle_rad: f64) -> Mat4 {
    let (s, c) = (angle_rad.sin() as f32, angle_rad.cos() as f32);
    [
        [c, 0.0, -s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

pub fn mat4_rotation_z(angle_rad: f64) -> Mat4 {
    let (s, c) = (angle_rad.sin() as f32, angle_rad.cos() as f32);
    [
        [c, s, 0.0, 0.0],
        [-s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

pub fn mat4_transform_point(m: Mat4, p: Vec3) -> Vec3 {
    let (x, y, z) = (p.x as f32, p.y as f32, p.z as f32);
    Vec3::new(
        (m[0][0] * x + m[1][0] * y + m[2][0] * z + m[3][0]) as f64,
        (m[0][1] * x + m[1][1] * y + m[2][1] * z + m[3][1]) as f64,
        (m[0][2] * x + m[1][2] * y + m[2][2] * z + m[3][2]) as f64,
    )
}

pub fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    // RH, depth range [0, 1].
    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

pub fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalize();
    let s = f.cross(up).normalize();
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, -f.x as f32, 0.0],
        [s.y as f32, u.y as f32, -f.y as f32, 0.0],
        [s.z as f32, u.z as f32, -f.z as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        let d = (a - b).length();
        assert!(d < 1e-5, "expected {a:?} ~= {b:?}");
    }

    #[test]
    fn identity_is_neutral() {
        let t = mat4_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mat4_mul(MAT4_IDENTITY, t), t);
        assert_eq!(mat4_mul(t, MAT4_IDENTITY), t);
    }

    #[test]
    fn translate_then_scale_composes_right_to_left() {
        let m = mat4_mul(mat4_translation(Vec3::new(1.0, 0.0, 0.0)), mat4_scale(2.0));
        let p = mat4_transform_point(m, Vec3::new(1.0, 1.0, 1.0));
        assert_vec_close(p, Vec3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn rotation_y_turns_x_towards_negative_z() {
        let m = mat4_rotation_y(std::f64::consts::FRAC_PI_2);
        let p = mat4_transform_point(m, Vec3::new(1.0, 0.0, 0.0));
        assert_vec_close(p, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn look_at_moves_eye_to_origin() {
        let eye = Vec3::new(0.0, 0.0, 7.5);
        let view = mat4_look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        assert_vec_close(mat4_transform_point(view, eye), Vec3::ZERO);
        // The target sits straight ahead (-z in view space).
        assert_vec_close(mat4_transform_point(view, Vec3::ZERO), Vec3::new(0.0, 0.0, -7.5));
    }
}
