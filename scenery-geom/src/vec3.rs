//! 3D Vector (points and directions)

use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use approx::{AbsDiffEq, RelativeEq};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }

    pub const fn one() -> Vec3 {
        Self::new(1.0, 1.0, 1.0)
    }

    pub const fn zero() -> Vec3 {
        Self::new(0.0, 0.0, 0.0)
    }

    pub const fn pos_x() -> Vec3 {
        Self::new(1.0, 0.0, 0.0)
    }

    pub const fn pos_y() -> Vec3 {
        Self::new(0.0, 1.0, 0.0)
    }

    pub const fn pos_z() -> Vec3 {
        Self::new(0.0, 0.0, 1.0)
    }

    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub fn magnitude_sqr(self) -> f32 {
        self.dot(self)
    }

    pub fn magnitude(self) -> f32 {
        self.magnitude_sqr().sqrt()
    }

    pub fn distance(self, rhs: Vec3) -> f32 {
        (self - rhs).magnitude()
    }

    pub fn normalize(&mut self) {
        *self = self.normalized()
    }

    /// Unit vector in the same direction. A zero vector yields NaN components;
    /// use [`Vec3::try_normalized`] when the input may be degenerate.
    pub fn normalized(self) -> Vec3 {
        self / self.magnitude()
    }

    /// Returns `None` when the magnitude is not above `min_len`.
    pub fn try_normalized(self, min_len: f32) -> Option<Vec3> {
        let len = self.magnitude();
        if len.is_finite() && len > min_len {
            Some(self / len)
        } else {
            None
        }
    }

    /// Index (0, 1 or 2) of the component with the smallest absolute value.
    pub fn min_abs_axis(self) -> usize {
        let (ax, ay, az) = (self.x.abs(), self.y.abs(), self.z.abs());
        if ax <= ay && ax <= az {
            0
        } else if ay <= az {
            1
        } else {
            2
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(a: [f32; 3]) -> Self {
        Vec3::new(a[0], a[1], a[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Index<usize> for Vec3 {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index out of range: {}", index),
        }
    }
}

impl IndexMut<usize> for Vec3 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vec3 index out of range: {}", index),
        }
    }
}

impl Add<Vec3> for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign<Vec3> for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub<Vec3> for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign<Vec3> for Vec3 {
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Self::Output {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        rhs * self
    }
}

impl MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;

    fn div(self, rhs: f32) -> Self::Output {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl DivAssign<f32> for Vec3 {
    fn div_assign(&mut self, rhs: f32) {
        self.x /= rhs;
        self.y /= rhs;
        self.z /= rhs;
    }
}

impl AbsDiffEq for Vec3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vec3 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_relative_eq!(Vec3::pos_x().cross(Vec3::pos_y()), Vec3::pos_z());
        assert_relative_eq!(Vec3::pos_y().cross(Vec3::pos_z()), Vec3::pos_x());
        assert_relative_eq!(Vec3::pos_z().cross(Vec3::pos_x()), Vec3::pos_y());
    }

    #[test]
    fn try_normalized_rejects_zero() {
        assert!(Vec3::zero().try_normalized(1e-6).is_none());
        let n = Vec3::new(0.0, 3.0, 4.0).try_normalized(1e-6).unwrap();
        assert_relative_eq!(n, Vec3::new(0.0, 0.6, 0.8));
    }

    #[test]
    fn min_abs_axis_picks_least_aligned() {
        assert_eq!(Vec3::new(0.1, -0.9, 0.4).min_abs_axis(), 0);
        assert_eq!(Vec3::new(0.7, 0.0, -0.7).min_abs_axis(), 1);
        assert_eq!(Vec3::new(0.0, 0.0, 1.0).min_abs_axis(), 0);
    }
}
