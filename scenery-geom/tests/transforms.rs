use approx::{assert_abs_diff_eq, assert_relative_eq};
use scenery_geom::{Mat3, Mat4, Vec3, Vec4};

#[test]
fn perspective_maps_clip_planes_to_unit_depth() {
    let p = Mat4::perspective(50.0, 4.0 / 3.0, 1.0, 300.0);
    let near = p.transform_point(Vec3::new(0.0, 0.0, -1.0));
    let far = p.transform_point(Vec3::new(0.0, 0.0, -300.0));
    assert_abs_diff_eq!(near.z, -1.0, epsilon = 1e-4);
    assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-4);

    // top edge of the frustum at the near plane lands on y = 1
    let top = (25.0f32).to_radians().tan();
    let edge = p.transform_point(Vec3::new(0.0, top, -1.0));
    assert_abs_diff_eq!(edge.y, 1.0, epsilon = 1e-4);
}

#[test]
fn view_matrix_moves_eye_to_origin() {
    let eye = Vec3::new(0.0, -100.0, 20.0);
    let n = Vec3::new(0.0, -1.0, 0.0);
    let u = Vec3::pos_z().cross(n).normalized();
    let v = n.cross(u);
    let view = Mat4::view(eye, u, v, n);
    assert_abs_diff_eq!(view.transform_point(eye), Vec3::zero(), epsilon = 1e-4);
    assert_abs_diff_eq!(
        view.transform_point(Vec3::new(0.0, 0.0, 20.0)),
        Vec3::new(0.0, 0.0, -100.0),
        epsilon = 1e-4
    );
}

#[test]
fn normal_matrix_undoes_non_uniform_scale() {
    let model = Mat4::rotation_z(30.0) * Mat4::scale(4.0, 1.0, 1.0);
    // a plane x = y in object space has normal (1, -1, 0)
    let tangent = model.transform_vector(Vec3::new(1.0, 1.0, 0.0));
    let normal = model.normal_matrix() * Vec3::new(1.0, -1.0, 0.0);
    assert_abs_diff_eq!(tangent.dot(normal), 0.0, epsilon = 1e-4);
}

#[test]
fn affine_inverse_round_trip() {
    let m = Mat4::translation(3.0, -2.0, 7.0)
        * Mat4::rotation(40.0, Vec3::new(1.0, 2.0, 3.0))
        * Mat4::scale(2.0, 0.5, 3.0);
    let inv = m.affine_inverse().unwrap();
    assert_relative_eq!(m * inv, Mat4::identity(), epsilon = 1e-5);
    assert!(Mat4::scale(1.0, 0.0, 1.0).affine_inverse().is_none());
}

#[test]
fn elementary_rotations_agree_with_axis_rotation() {
    assert_relative_eq!(
        Mat4::rotation(35.0, Vec3::pos_x()),
        Mat4::rotation_x(35.0),
        epsilon = 1e-6
    );
    assert_relative_eq!(
        Mat4::rotation(-80.0, Vec3::pos_y()),
        Mat4::rotation_y(-80.0),
        epsilon = 1e-6
    );
    let r = Mat4::rotation_z(90.0) * Vec4::direction(Vec3::pos_x());
    assert_abs_diff_eq!(r, Vec4::new(0.0, 1.0, 0.0, 0.0), epsilon = 1e-6);
    assert_eq!(Mat4::identity().mat3(), Mat3::identity());
}
