//! Transform nodes

use scenery_geom::{Mat4, Vec3};

/// Local modeling transform. Every builder call right-multiplies the local
/// matrix (`local = local * op`), so the last call is the first one applied
/// to a point: `translate(..); rotate_z(..); scale(..)` yields `T * R * S`,
/// which scales, then rotates, then translates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformNode {
    local: Mat4,
}

impl TransformNode {
    pub fn new() -> TransformNode {
        Self::default()
    }

    pub fn from_matrix(local: Mat4) -> TransformNode {
        TransformNode { local }
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.local
    }

    pub fn load_identity(&mut self) -> &mut Self {
        self.local = Mat4::identity();
        self
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.local *= Mat4::translation(x, y, z);
        self
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.local *= Mat4::scale(x, y, z);
        self
    }

    pub fn rotate_x(&mut self, degrees: f32) -> &mut Self {
        self.local *= Mat4::rotation_x(degrees);
        self
    }

    pub fn rotate_y(&mut self, degrees: f32) -> &mut Self {
        self.local *= Mat4::rotation_y(degrees);
        self
    }

    pub fn rotate_z(&mut self, degrees: f32) -> &mut Self {
        self.local *= Mat4::rotation_z(degrees);
        self
    }

    pub fn rotate(&mut self, degrees: f32, axis: Vec3) -> &mut Self {
        self.local *= Mat4::rotation(degrees, axis);
        self
    }

    pub fn transform(&mut self, m: &Mat4) -> &mut Self {
        self.local *= *m;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn builder_order_matches_matrix_product() {
        let mut node = TransformNode::new();
        node.translate(-50.0, 50.0, 0.0)
            .rotate_z(30.0)
            .scale(6.0, 6.0, 20.0);
        let expected = Mat4::translation(-50.0, 50.0, 0.0)
            * Mat4::rotation_z(30.0)
            * Mat4::scale(6.0, 6.0, 20.0);
        assert_relative_eq!(*node.matrix(), expected, epsilon = 1e-5);
    }

    #[test]
    fn point_is_scaled_then_rotated_then_translated() {
        let mut node = TransformNode::new();
        node.translate(0.0, 100.0, 40.0)
            .rotate_x(90.0)
            .scale(200.0, 80.0, 1.0);
        let p = node.matrix().transform_point(Vec3::new(0.5, 0.5, 0.0));
        assert_abs_diff_eq!(p, Vec3::new(100.0, 100.0, 80.0), epsilon = 1e-4);
    }

    #[test]
    fn load_identity_clears_local() {
        let mut node = TransformNode::new();
        node.rotate(45.0, Vec3::new(1.0, 1.0, 0.0)).load_identity();
        assert_eq!(*node.matrix(), Mat4::identity());
    }
}
