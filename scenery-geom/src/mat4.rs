//! Matrix4x4

use std::ops::{Index, IndexMut, Mul, MulAssign};

use approx::{AbsDiffEq, RelativeEq};

use crate::{Mat3, Vec3, Vec4};

/// Column-major 4x4 matrix. Composition follows the column-vector
/// convention: in `a * b`, `b` is applied to a point first.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

impl Mat4 {
    pub const fn new(col0: Vec4, col1: Vec4, col2: Vec4, col3: Vec4) -> Mat4 {
        Mat4 {
            cols: [col0, col1, col2, col3],
        }
    }

    pub const fn identity() -> Mat4 {
        Self::eye(1.0)
    }

    pub const fn eye(val: f32) -> Mat4 {
        Self::new(
            Vec4::new(val, 0.0, 0.0, 0.0),
            Vec4::new(0.0, val, 0.0, 0.0),
            Vec4::new(0.0, 0.0, val, 0.0),
            Vec4::new(0.0, 0.0, 0.0, val),
        )
    }

    pub fn from_mat3(m: Mat3, col3: Vec4) -> Mat4 {
        Self::new(
            Vec4::from_xyz(m[0], 0.0),
            Vec4::from_xyz(m[1], 0.0),
            Vec4::from_xyz(m[2], 0.0),
            col3,
        )
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        let mut m = Self::identity();
        m[3] = Vec4::new(x, y, z, 1.0);
        m
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Mat4 {
        Self::new(
            Vec4::new(x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, z, 0.0),
            Vec4::identity(),
        )
    }

    /// Counter-clockwise rotation about +x (looking down the axis toward the origin).
    pub fn rotation_x(degrees: f32) -> Mat4 {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::new(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::identity(),
        )
    }

    pub fn rotation_y(degrees: f32) -> Mat4 {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::new(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::identity(),
        )
    }

    pub fn rotation_z(degrees: f32) -> Mat4 {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::new(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::identity(),
        )
    }

    /// Rotation about an arbitrary axis through the origin. The axis does not
    /// need to be unit length; a zero axis yields the identity.
    pub fn rotation(degrees: f32, axis: Vec3) -> Mat4 {
        let a = match axis.try_normalized(f32::EPSILON) {
            Some(a) => a,
            None => return Self::identity(),
        };
        let (s, c) = degrees.to_radians().sin_cos();
        let t = 1.0 - c;
        Self::new(
            Vec4::new(
                t * a.x * a.x + c,
                t * a.x * a.y + s * a.z,
                t * a.x * a.z - s * a.y,
                0.0,
            ),
            Vec4::new(
                t * a.x * a.y - s * a.z,
                t * a.y * a.y + c,
                t * a.y * a.z + s * a.x,
                0.0,
            ),
            Vec4::new(
                t * a.x * a.z + s * a.y,
                t * a.y * a.z - s * a.x,
                t * a.z * a.z + c,
                0.0,
            ),
            Vec4::identity(),
        )
    }

    /// OpenGL-style frustum (right-handed eye space, clip z in [-w, w]).
    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        Self::new(
            Vec4::new(2.0 * near / (right - left), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * near / (top - bottom), 0.0, 0.0),
            Vec4::new(
                (right + left) / (right - left),
                (top + bottom) / (top - bottom),
                -(far + near) / (far - near),
                -1.0,
            ),
            Vec4::new(0.0, 0.0, -2.0 * far * near / (far - near), 0.0),
        )
    }

    /// Symmetric perspective frustum. `fov` is the full vertical field of
    /// view in degrees.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let top = near * (fov * 0.5).to_radians().tan();
        let right = aspect * top;
        Self::frustum(-right, right, -top, top, near, far)
    }

    /// World-to-eye transform for an eye at `eye` with view axes `u`
    /// (right), `v` (up) and `n` (pointing back toward the viewer).
    pub fn view(eye: Vec3, u: Vec3, v: Vec3, n: Vec3) -> Mat4 {
        Self::new(
            Vec4::new(u.x, v.x, n.x, 0.0),
            Vec4::new(u.y, v.y, n.y, 0.0),
            Vec4::new(u.z, v.z, n.z, 0.0),
            Vec4::new(-u.dot(eye), -v.dot(eye), -n.dot(eye), 1.0),
        )
    }

    pub fn mat3(&self) -> Mat3 {
        Mat3::new(self[0].xyz(), self[1].xyz(), self[2].xyz())
    }

    pub fn transposed(&self) -> Mat4 {
        Self::new(
            Vec4::new(self[0][0], self[1][0], self[2][0], self[3][0]),
            Vec4::new(self[0][1], self[1][1], self[2][1], self[3][1]),
            Vec4::new(self[0][2], self[1][2], self[2][2], self[3][2]),
            Vec4::new(self[0][3], self[1][3], self[2][3], self[3][3]),
        )
    }

    /// Inverse of an affine transform (bottom row 0, 0, 0, 1).
    pub fn affine_inverse(&self) -> Option<Mat4> {
        let r = self.mat3().inverse()?;
        let t = r * self[3].xyz();
        Some(Self::from_mat3(r, Vec4::point(-t)))
    }

    /// Matrix for transforming normals: the inverse-transpose of the upper
    /// 3x3. Falls back to the identity for singular (zero-scale) transforms.
    pub fn normal_matrix(&self) -> Mat3 {
        self.mat3().inverse_transposed().unwrap_or_default()
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let r = *self * Vec4::point(p);
        if r.w != 0.0 && r.w != 1.0 {
            r.xyz() / r.w
        } else {
            r.xyz()
        }
    }

    pub fn transform_vector(&self, d: Vec3) -> Vec3 {
        (*self * Vec4::direction(d)).xyz()
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Mat4> for [f32; 16] {
    fn from(m: Mat4) -> Self {
        let mut out = [0.0; 16];
        for (c, col) in m.cols.iter().enumerate() {
            for r in 0..4 {
                out[c * 4 + r] = col[r];
            }
        }
        out
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}

impl IndexMut<usize> for Mat4 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.cols[index]
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Self::Output {
        self[0] * rhs.x + self[1] * rhs.y + self[2] * rhs.z + self[3] * rhs.w
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        Self::new(self * rhs[0], self * rhs[1], self * rhs[2], self * rhs[3])
    }
}

impl MulAssign<Mat4> for Mat4 {
    fn mul_assign(&mut self, rhs: Mat4) {
        *self = *self * rhs;
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        (0..4).all(|i| self[i].abs_diff_eq(&other[i], epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        (0..4).all(|i| self[i].relative_eq(&other[i], epsilon, max_relative))
    }
}
