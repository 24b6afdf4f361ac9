//! Matrix3x3

use std::ops::{Div, Index, IndexMut, Mul};

use approx::{AbsDiffEq, RelativeEq};

use crate::Vec3;

/// Column-major 3x3 matrix
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub cols: [Vec3; 3],
}

impl Mat3 {
    pub const fn new(col0: Vec3, col1: Vec3, col2: Vec3) -> Mat3 {
        Mat3 {
            cols: [col0, col1, col2],
        }
    }

    pub const fn identity() -> Mat3 {
        Self::eye(1.0)
    }

    pub const fn eye(val: f32) -> Mat3 {
        Self::new(
            Vec3::new(val, 0.0, 0.0),
            Vec3::new(0.0, val, 0.0),
            Vec3::new(0.0, 0.0, val),
        )
    }

    pub fn transposed(&self) -> Mat3 {
        Self::new(
            Vec3::new(self[0][0], self[1][0], self[2][0]),
            Vec3::new(self[0][1], self[1][1], self[2][1]),
            Vec3::new(self[0][2], self[1][2], self[2][2]),
        )
    }

    pub fn det(&self) -> f32 {
        self[0].dot(self[1].cross(self[2]))
    }

    /// Inverse-transpose, the matrix that carries surface normals through
    /// this transform. `None` when the matrix is singular.
    pub fn inverse_transposed(&self) -> Option<Mat3> {
        let det = self.det();
        if det.abs() <= f32::EPSILON * f32::EPSILON || !det.is_finite() {
            return None;
        }
        Some(
            Mat3::new(
                self[1].cross(self[2]),
                self[2].cross(self[0]),
                self[0].cross(self[1]),
            ) / det,
        )
    }

    pub fn inverse(&self) -> Option<Mat3> {
        self.inverse_transposed().map(|m| m.transposed())
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<usize> for Mat3 {
    type Output = Vec3;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}

impl IndexMut<usize> for Mat3 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.cols[index]
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        self[0] * rhs.x + self[1] * rhs.y + self[2] * rhs.z
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Self::Output {
        Self::new(self * rhs[0], self * rhs[1], self * rhs[2])
    }
}

impl Div<f32> for Mat3 {
    type Output = Mat3;

    fn div(self, rhs: f32) -> Self::Output {
        Self::new(self[0] / rhs, self[1] / rhs, self[2] / rhs)
    }
}

impl AbsDiffEq for Mat3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        (0..3).all(|i| self[i].abs_diff_eq(&other[i], epsilon))
    }
}

impl RelativeEq for Mat3 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        (0..3).all(|i| self[i].relative_eq(&other[i], epsilon, max_relative))
    }
}
