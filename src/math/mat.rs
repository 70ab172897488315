use crate::math::vec::Vec3;

/// Column-major 4x4 matrix, laid out the way WGSL reads a `mat4x4<f32>`.
///
/// `Mat4(m)` stores `m[column][row]`; points are column vectors and
/// `a.multiply(&b)` is the product `a · b`, so `b` applies first.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed perspective projection with a `[0, 1]` depth range.
    pub fn perspective(fov_y: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
        let f = 1.0 / (fov_y * 0.5).tan();
        let range_reciprocal = 1.0 / (z_near - z_far);

        Mat4([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, z_far * range_reciprocal, -1.0],
            [0.0, 0.0, z_far * z_near * range_reciprocal, 0.0],
        ])
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx, ty, tz, 1.0],
        ])
    }

    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
        Mat4([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about +X by `angle` radians; positive tilts -Z upward.
    pub fn rotation_x(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about +Y by `angle` radians; positive turns -Z toward -X.
    pub fn rotation_y(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn multiply(&self, b: &Mat4) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for (column, cells) in result.iter_mut().enumerate() {
            for (row, cell) in cells.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[k][row] * b.0[column][k]).sum();
            }
        }
        Mat4(result)
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.0;
        let v = [p.x(), p.y(), p.z(), 1.0];
        let row = |r: usize| (0..4).map(|c| m[c][r] * v[c]).sum::<f32>();
        let w = row(3);
        let w = if w == 0.0 { 1.0 } else { w };
        Vec3::new(row(0) / w, row(1) / w, row(2) / w)
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    fn from(matrix: [[f32; 4]; 4]) -> Self {
        Mat4(matrix)
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(matrix: Mat4) -> Self {
        matrix.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    /// Tests that the product applies the right-hand matrix first.
    #[test]
    fn test_multiply_order() {
        let t = Mat4::translation(1.0, 0.0, 0.0);
        let s = Mat4::scaling(2.0, 2.0, 2.0);
        let p = Vec3::new(1.0, 1.0, 1.0);
        assert!(close(t.multiply(&s).transform_point(p), Vec3::new(3.0, 2.0, 2.0)));
        assert!(close(s.multiply(&t).transform_point(p), Vec3::new(4.0, 2.0, 2.0)));
    }

    /// Tests that a quarter turn about Y maps -Z onto -X.
    #[test]
    fn test_rotation_y_direction() {
        let r = Mat4::rotation_y(FRAC_PI_2);
        assert!(close(
            r.transform_point(Vec3::new(0.0, 0.0, -1.0)),
            Vec3::new(-1.0, 0.0, 0.0)
        ));
    }

    /// Tests that a positive X rotation tilts the forward axis upward.
    #[test]
    fn test_rotation_x_direction() {
        let r = Mat4::rotation_x(FRAC_PI_2);
        assert!(close(
            r.transform_point(Vec3::new(0.0, 0.0, -1.0)),
            Vec3::new(0.0, 1.0, 0.0)
        ));
    }
}
