//! Camera

use scenery_geom::{Mat4, Vec3, EPSILON};
use thiserror::Error;

use super::SceneState;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("Field of view must be in (0, 180) degrees, got {0}")]
    FieldOfView(f32),
    #[error("Aspect ratio must be positive, got {0}")]
    AspectRatio(f32),
    #[error("Clip planes must satisfy 0 < near < far, got near = {near}, far = {far}")]
    ClipPlanes { near: f32, far: f32 },
}

/// Camera mutations an input layer can issue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    Roll(f32),
    Pitch(f32),
    Heading(f32),
    Slide(Vec3),
    MoveAndTurn { right: f32, up: f32, forward: f32 },
    LookAt { eye: Vec3, look_at: Vec3, up: Vec3 },
}

/// Viewing camera. Keeps the eye (view reference point), the lookat point, a
/// view-up hint and the derived right-handed orthonormal axes `u` (right),
/// `v` (up) and `n` (view plane normal, pointing from the lookat point back
/// toward the eye). Nodes added under the camera are drawn with its view and
/// projection bound.
#[derive(Debug, Clone)]
pub struct CameraNode {
    fov: f32,
    aspect_ratio: f32,
    near_clip: f32,
    far_clip: f32,

    vrp: Vec3,
    lpt: Vec3,
    up_hint: Vec3,

    u: Vec3,
    v: Vec3,
    n: Vec3,

    view: Mat4,
    projection: Mat4,
}

impl CameraNode {
    pub fn new() -> CameraNode {
        let mut camera = CameraNode {
            fov: 50.0,
            aspect_ratio: 1.0,
            near_clip: 1.0,
            far_clip: 1000.0,
            vrp: Vec3::zero(),
            lpt: Vec3::new(0.0, 0.0, -1.0),
            up_hint: Vec3::pos_y(),
            u: Vec3::pos_x(),
            v: Vec3::pos_y(),
            n: Vec3::pos_z(),
            view: Mat4::identity(),
            projection: Mat4::identity(),
        };
        camera.look_at();
        camera.update_projection();
        camera
    }

    pub fn set_position(&mut self, vrp: Vec3) {
        self.vrp = vrp;
        self.look_at();
    }

    pub fn get_position(&self) -> Vec3 {
        self.vrp
    }

    pub fn set_look_at_pt(&mut self, lpt: Vec3) {
        self.lpt = lpt;
        self.look_at();
    }

    pub fn get_look_at_pt(&self) -> Vec3 {
        self.lpt
    }

    pub fn set_view_up(&mut self, vup: Vec3) {
        self.up_hint = vup;
        self.look_at();
    }

    pub fn get_view_plane_normal(&self) -> Vec3 {
        self.n
    }

    pub fn get_view_right(&self) -> Vec3 {
        self.u
    }

    pub fn get_view_up(&self) -> Vec3 {
        self.v
    }

    /// Distance from the eye to the lookat point.
    pub fn view_distance(&self) -> f32 {
        self.vrp.distance(self.lpt)
    }

    /// Rotates `u` and `v` about `n`. Eye and lookat point do not move.
    pub fn roll(&mut self, degrees: f32) {
        let (s, c) = degrees.to_radians().sin_cos();
        let (u, v) = (self.u, self.v);
        self.u = u * c + v * s;
        self.v = v * c - u * s;
        self.reorthonormalize();
        self.set_view_matrix();
    }

    /// Rotates `v` and `n` about `u`, swinging the lookat point around the eye.
    pub fn pitch(&mut self, degrees: f32) {
        let (s, c) = degrees.to_radians().sin_cos();
        let (v, n) = (self.v, self.n);
        self.v = v * c + n * s;
        self.n = n * c - v * s;
        self.turn_about_eye();
    }

    /// Rotates `n` and `u` about `v`, swinging the lookat point around the eye.
    pub fn heading(&mut self, degrees: f32) {
        let (s, c) = degrees.to_radians().sin_cos();
        let (u, n) = (self.u, self.n);
        self.n = n * c + u * s;
        self.u = u * c - n * s;
        self.turn_about_eye();
    }

    /// Moves the lookat point by `right` along `u`, `up` along `v` and
    /// `forward` along the view direction (`-n`), then places the eye back at
    /// its previous distance from the lookat point, on the line toward the
    /// old eye position.
    pub fn move_and_turn(&mut self, right: f32, up: f32, forward: f32) {
        let dist = self.view_distance();
        self.lpt += self.u * right + self.v * up - self.n * forward;
        let dir = (self.vrp - self.lpt)
            .try_normalized(EPSILON)
            .unwrap_or(self.n);
        self.vrp = self.lpt + dir * dist;
        self.look_at();
    }

    /// Translates eye and lookat point together along the view axes.
    pub fn slide(&mut self, x: f32, y: f32, z: f32) {
        let d = self.u * x + self.v * y + self.n * z;
        self.vrp += d;
        self.lpt += d;
        self.set_view_matrix();
    }

    pub fn apply(&mut self, command: CameraCommand) {
        match command {
            CameraCommand::Roll(deg) => self.roll(deg),
            CameraCommand::Pitch(deg) => self.pitch(deg),
            CameraCommand::Heading(deg) => self.heading(deg),
            CameraCommand::Slide(d) => self.slide(d.x, d.y, d.z),
            CameraCommand::MoveAndTurn { right, up, forward } => {
                self.move_and_turn(right, up, forward)
            }
            CameraCommand::LookAt { eye, look_at, up } => {
                self.vrp = eye;
                self.lpt = look_at;
                self.up_hint = up;
                self.look_at();
            }
        }
    }

    pub fn get_view_matrix(&self) -> &Mat4 {
        &self.view
    }

    pub fn get_projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    pub fn field_of_view(&self) -> f32 {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn clipping_planes(&self) -> (f32, f32) {
        (self.near_clip, self.far_clip)
    }

    /// Symmetric perspective projection. `fov` is the full vertical field of
    /// view in degrees. On error the previous projection stays in effect.
    pub fn set_perspective(
        &mut self,
        fov: f32,
        ratio: f32,
        near: f32,
        far: f32,
    ) -> Result<(), ProjectionError> {
        check_field_of_view(fov)?;
        check_aspect_ratio(ratio)?;
        check_clip_planes(near, far)?;
        self.fov = fov;
        self.aspect_ratio = ratio;
        self.near_clip = near;
        self.far_clip = far;
        self.update_projection();
        Ok(())
    }

    pub fn change_field_of_view(&mut self, fov: f32) -> Result<(), ProjectionError> {
        check_field_of_view(fov)?;
        self.fov = fov;
        self.update_projection();
        Ok(())
    }

    pub fn change_aspect_ratio(&mut self, ratio: f32) -> Result<(), ProjectionError> {
        check_aspect_ratio(ratio)?;
        self.aspect_ratio = ratio;
        self.update_projection();
        Ok(())
    }

    pub fn change_clipping_planes(&mut self, near: f32, far: f32) -> Result<(), ProjectionError> {
        check_clip_planes(near, far)?;
        self.near_clip = near;
        self.far_clip = far;
        self.update_projection();
        Ok(())
    }

    pub(crate) fn apply_to_state(&self, state: &mut SceneState) {
        state.set_camera(self.vrp, self.projection * self.view);
    }

    /// Rebuilds the axes from eye, lookat point and the up hint.
    fn look_at(&mut self) {
        match (self.vrp - self.lpt).try_normalized(EPSILON) {
            Some(n) => self.n = n,
            None => log::warn!(
                "Camera eye and lookat point coincide at {:?}, keeping previous view direction",
                self.vrp
            ),
        }
        let u = match self.up_hint.cross(self.n).try_normalized(EPSILON) {
            Some(u) => u,
            None => {
                let mut axis = Vec3::zero();
                axis[self.n.min_abs_axis()] = 1.0;
                log::warn!(
                    "View up {:?} is parallel to the view direction, substituting {:?}",
                    self.up_hint,
                    axis
                );
                axis.cross(self.n).normalized()
            }
        };
        self.u = u;
        self.v = self.n.cross(self.u);
        self.set_view_matrix();
    }

    /// Re-derives `u` and `v` from `n` so rounding drift from repeated
    /// rotations cannot accumulate. The up hint follows the camera.
    fn reorthonormalize(&mut self) {
        self.n = self.n.normalized();
        self.u = self.v.cross(self.n).normalized();
        self.v = self.n.cross(self.u);
        self.up_hint = self.v;
    }

    fn turn_about_eye(&mut self) {
        let dist = self.view_distance();
        self.reorthonormalize();
        self.lpt = self.vrp - self.n * dist;
        self.set_view_matrix();
    }

    fn set_view_matrix(&mut self) {
        self.view = Mat4::view(self.vrp, self.u, self.v, self.n);
    }

    fn update_projection(&mut self) {
        self.projection = Mat4::perspective(self.fov, self.aspect_ratio, self.near_clip, self.far_clip);
    }
}

impl Default for CameraNode {
    fn default() -> Self {
        Self::new()
    }
}

fn check_field_of_view(fov: f32) -> Result<(), ProjectionError> {
    if fov > 0.0 && fov < 180.0 {
        Ok(())
    } else {
        Err(ProjectionError::FieldOfView(fov))
    }
}

fn check_aspect_ratio(ratio: f32) -> Result<(), ProjectionError> {
    if ratio > 0.0 && ratio.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::AspectRatio(ratio))
    }
}

fn check_clip_planes(near: f32, far: f32) -> Result<(), ProjectionError> {
    if near > 0.0 && far > near && far.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::ClipPlanes { near, far })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn room_camera() -> CameraNode {
        let mut camera = CameraNode::new();
        camera.set_position(Vec3::new(0.0, -100.0, 20.0));
        camera.set_look_at_pt(Vec3::new(0.0, 0.0, 20.0));
        camera.set_view_up(Vec3::new(0.0, 0.0, 1.0));
        camera
            .set_perspective(50.0, 1.0, 1.0, 300.0)
            .expect("valid projection");
        camera
    }

    fn assert_orthonormal(camera: &CameraNode) {
        let (u, v, n) = (
            camera.get_view_right(),
            camera.get_view_up(),
            camera.get_view_plane_normal(),
        );
        assert_abs_diff_eq!(u.magnitude(), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(v.magnitude(), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(n.magnitude(), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(u.dot(v), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(u.dot(n), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(v.dot(n), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(u.cross(v), n, epsilon = 1e-4);
    }

    #[test]
    fn initial_room_basis() {
        let camera = room_camera();
        assert_abs_diff_eq!(camera.get_view_right(), Vec3::pos_x(), epsilon = 1e-6);
        assert_abs_diff_eq!(camera.get_view_up(), Vec3::pos_z(), epsilon = 1e-6);
        assert_abs_diff_eq!(
            camera.get_view_plane_normal(),
            Vec3::new(0.0, -1.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn roll_90_swaps_right_and_up() {
        let mut camera = room_camera();
        let (u, v, n) = (
            camera.get_view_right(),
            camera.get_view_up(),
            camera.get_view_plane_normal(),
        );
        let (eye, lpt) = (camera.get_position(), camera.get_look_at_pt());
        camera.roll(90.0);
        assert_abs_diff_eq!(camera.get_view_right().dot(v).abs(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.get_view_up().dot(u).abs(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.get_view_plane_normal(), n, epsilon = 1e-6);
        assert_eq!(camera.get_position(), eye);
        assert_eq!(camera.get_look_at_pt(), lpt);
    }

    #[test]
    fn pitch_and_heading_keep_view_distance() {
        let mut camera = room_camera();
        let eye = camera.get_position();
        let dist = camera.view_distance();
        camera.pitch(5.0);
        assert_relative_eq!(camera.view_distance(), dist, epsilon = 1e-3);
        camera.heading(-35.0);
        assert_relative_eq!(camera.view_distance(), dist, epsilon = 1e-3);
        assert_eq!(camera.get_position(), eye);
        assert_orthonormal(&camera);
    }

    #[test]
    fn heading_swings_lookat_about_eye() {
        let mut camera = room_camera();
        camera.heading(90.0);
        assert_abs_diff_eq!(
            camera.get_look_at_pt(),
            Vec3::new(-100.0, -100.0, 20.0),
            epsilon = 1e-3
        );
        camera.heading(-90.0);
        assert_abs_diff_eq!(camera.get_look_at_pt(), Vec3::new(0.0, 0.0, 20.0), epsilon = 1e-3);
    }

    #[test]
    fn slide_moves_eye_and_lookat_together() {
        let mut camera = room_camera();
        let (u, v, n) = (
            camera.get_view_right(),
            camera.get_view_up(),
            camera.get_view_plane_normal(),
        );
        let (eye, lpt) = (camera.get_position(), camera.get_look_at_pt());
        camera.slide(5.0, -2.0, 3.0);
        let d = u * 5.0 - v * 2.0 + n * 3.0;
        assert_abs_diff_eq!(camera.get_position(), eye + d, epsilon = 1e-4);
        assert_abs_diff_eq!(camera.get_look_at_pt(), lpt + d, epsilon = 1e-4);
        assert_eq!(camera.get_view_right(), u);
        assert_eq!(camera.get_view_up(), v);
        assert_eq!(camera.get_view_plane_normal(), n);
    }

    #[test]
    fn move_and_turn_round_trip() {
        let mut camera = room_camera();
        let (eye, lpt) = (camera.get_position(), camera.get_look_at_pt());
        camera.move_and_turn(0.1, 0.05, 0.0);
        assert!(camera.get_look_at_pt().distance(lpt) > 0.1);
        camera.move_and_turn(-0.1, -0.05, 0.0);
        assert_abs_diff_eq!(camera.get_look_at_pt(), lpt, epsilon = 1e-3);
        assert_abs_diff_eq!(camera.get_position(), eye, epsilon = 1e-3);
    }

    #[test]
    fn move_and_turn_forward_flies_along_view() {
        let mut camera = room_camera();
        camera.move_and_turn(0.0, 0.0, 10.0);
        assert_abs_diff_eq!(
            camera.get_position(),
            Vec3::new(0.0, -90.0, 20.0),
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(
            camera.get_look_at_pt(),
            Vec3::new(0.0, 10.0, 20.0),
            epsilon = 1e-3
        );
        assert_relative_eq!(camera.view_distance(), 100.0, epsilon = 1e-3);
    }

    #[test]
    fn mixed_operations_stay_orthonormal() {
        let mut camera = room_camera();
        for i in 0..200 {
            let deg = (i as f32 * 7.3) % 45.0 - 20.0;
            match i % 6 {
                0 => camera.roll(deg),
                1 => camera.pitch(deg),
                2 => camera.heading(deg),
                3 => camera.move_and_turn(deg * 0.1, -deg * 0.05, 1.0),
                4 => camera.set_position(camera.get_position() + Vec3::new(deg, 1.0, 0.5)),
                _ => camera.set_view_up(Vec3::new(0.1 * deg, 0.3, 1.0)),
            }
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn parallel_view_up_falls_back_to_axis() {
        let mut camera = room_camera();
        camera.set_view_up(Vec3::new(0.0, 1.0, 0.0));
        assert!(camera.get_view_right().is_finite());
        assert!(camera.get_view_up().is_finite());
        assert_orthonormal(&camera);

        camera.set_view_up(Vec3::zero());
        assert_orthonormal(&camera);
    }

    #[test]
    fn coincident_eye_and_lookat_keeps_direction() {
        let mut camera = room_camera();
        let n = camera.get_view_plane_normal();
        camera.set_look_at_pt(camera.get_position());
        assert_eq!(camera.get_view_plane_normal(), n);
        assert_orthonormal(&camera);
    }

    #[test]
    fn invalid_projection_keeps_previous() {
        let mut camera = room_camera();
        let before = *camera.get_projection_matrix();
        assert_eq!(
            camera.change_clipping_planes(10.0, 5.0),
            Err(ProjectionError::ClipPlanes {
                near: 10.0,
                far: 5.0
            })
        );
        assert!(camera.change_aspect_ratio(0.0).is_err());
        assert!(camera.change_field_of_view(180.0).is_err());
        assert_eq!(*camera.get_projection_matrix(), before);
    }

    #[test]
    fn projection_tracks_aspect_ratio() {
        let mut camera = room_camera();
        camera.change_aspect_ratio(800.0 / 600.0).unwrap();
        let p = camera.get_projection_matrix();
        let f = 1.0 / 25.0_f32.to_radians().tan();
        assert_relative_eq!(p[1][1], f, epsilon = 1e-5);
        assert_relative_eq!(p[0][0], f * 600.0 / 800.0, epsilon = 1e-5);
    }

    #[test]
    fn view_matrix_maps_lookat_down_negative_z() {
        let camera = room_camera();
        let p = camera
            .get_view_matrix()
            .transform_point(camera.get_look_at_pt());
        assert_abs_diff_eq!(p, Vec3::new(0.0, 0.0, -100.0), epsilon = 1e-4);
    }
}
