//! Mouse and keyboard navigation

use scenery_geom::Vec3;

use crate::{
    scene::{CameraNode, ProjectionError},
    NavigationParams,
};

const MIN_VELOCITY: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Window-system input, already decoded by whatever backend owns the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    Resized { width: u32, height: u32 },
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    MouseMoved { x: i32, y: i32 },
    /// A key press. Upper case letters carry the shifted meaning.
    Key(char),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeView {
    pub eye: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
}

/// Turns input into camera motion. While a mouse button is held the camera
/// flies toward (left) or away from (right) the pointer every frame.
#[derive(Debug, Clone)]
pub struct Navigator {
    params: NavigationParams,
    home: HomeView,
    velocity: f32,
    animate: bool,
    forward: bool,
    mouse_x: i32,
    mouse_y: i32,
    width: u32,
    height: u32,
}

impl Navigator {
    pub fn new(params: NavigationParams, home: HomeView, width: u32, height: u32) -> Navigator {
        Navigator {
            velocity: params.velocity,
            params,
            home,
            animate: false,
            forward: true,
            mouse_x: 0,
            mouse_y: 0,
            width,
            height,
        }
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_animating(&self) -> bool {
        self.animate
    }

    pub fn increase_velocity(&mut self) {
        self.velocity += self.params.velocity_step;
    }

    pub fn decrease_velocity(&mut self) {
        self.velocity -= self.params.velocity_step;
        if self.velocity < self.params.velocity_step {
            self.velocity = MIN_VELOCITY;
        }
    }

    /// Moves the camera home: eye, lookat point and view up of the initial view.
    pub fn reset_view(&self, camera: &mut CameraNode) {
        camera.set_position(self.home.eye);
        camera.set_look_at_pt(self.home.look_at);
        camera.set_view_up(self.home.up);
    }

    /// Flies the camera relative to the pointer's offset from the window
    /// center, scaled by the current velocity.
    pub fn update_view(&self, camera: &mut CameraNode) {
        let (w, h) = (self.width.max(1) as f32, self.height.max(1) as f32);
        let dx = 4.0 * (self.mouse_x as f32 - w * 0.5) / w;
        let dy = 4.0 * (h * 0.5 - self.mouse_y as f32) / h;
        let dz = if self.forward {
            self.velocity
        } else {
            -self.velocity
        };
        camera.move_and_turn(dx * self.velocity, dy * self.velocity, dz);
    }

    /// Per-frame step: keeps flying while a button is held.
    pub fn frame(&self, camera: &mut CameraNode) {
        if self.animate {
            self.update_view(camera);
        }
    }

    /// Applies one event. Returns `Ok(false)` when the program should quit.
    pub fn handle(
        &mut self,
        event: InputEvent,
        camera: &mut CameraNode,
    ) -> Result<bool, ProjectionError> {
        match event {
            InputEvent::Quit | InputEvent::Escape => return Ok(false),
            InputEvent::Resized { width, height } => {
                self.width = width;
                self.height = height;
                if height > 0 {
                    camera.change_aspect_ratio(width as f32 / height as f32)?;
                }
            }
            InputEvent::MouseDown(button) | InputEvent::MouseUp(button) => {
                let pressed = matches!(event, InputEvent::MouseDown(_));
                match button {
                    MouseButton::Left => {
                        self.forward = true;
                        self.animate = pressed;
                    }
                    MouseButton::Right => {
                        self.forward = false;
                        self.animate = pressed;
                    }
                    MouseButton::Middle => (),
                }
            }
            InputEvent::MouseMoved { x, y } => {
                self.mouse_x = x;
                self.mouse_y = y;
            }
            InputEvent::Key(key) => self.handle_key(key, camera),
        }
        Ok(true)
    }

    fn handle_key(&mut self, key: char, camera: &mut CameraNode) {
        let rotate = self.params.rotate_step;
        let slide = self.params.slide_step;
        let sign = if key.is_uppercase() { -1.0 } else { 1.0 };
        match key {
            'i' | 'I' => self.reset_view(camera),
            'r' | 'R' => camera.roll(sign * rotate),
            'p' | 'P' => camera.pitch(sign * rotate),
            'h' | 'H' => camera.heading(sign * rotate),
            'V' => self.increase_velocity(),
            'v' => self.decrease_velocity(),
            'x' | 'X' => camera.slide(-sign * slide, 0.0, 0.0),
            'y' | 'Y' => camera.slide(0.0, -sign * slide, 0.0),
            'f' | 'F' => camera.slide(0.0, 0.0, sign * slide),
            _ => log::trace!("Unmapped key {:?}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn home() -> HomeView {
        HomeView {
            eye: Vec3::new(0.0, -100.0, 20.0),
            look_at: Vec3::new(0.0, 0.0, 20.0),
            up: Vec3::pos_z(),
        }
    }

    fn setup() -> (Navigator, CameraNode) {
        let nav = Navigator::new(NavigationParams::default(), home(), 800, 600);
        let mut camera = CameraNode::new();
        nav.reset_view(&mut camera);
        (nav, camera)
    }

    #[test]
    fn velocity_never_drops_below_floor() {
        let (mut nav, _) = setup();
        for _ in 0..10 {
            nav.decrease_velocity();
        }
        assert_abs_diff_eq!(nav.velocity(), 0.1);
        nav.increase_velocity();
        assert_abs_diff_eq!(nav.velocity(), 0.3, epsilon = 1e-6);
    }

    #[test]
    fn centered_pointer_flies_straight() {
        let (mut nav, mut camera) = setup();
        nav.handle(InputEvent::MouseMoved { x: 400, y: 300 }, &mut camera)
            .unwrap();
        nav.handle(InputEvent::MouseDown(MouseButton::Left), &mut camera)
            .unwrap();
        nav.frame(&mut camera);
        assert_abs_diff_eq!(camera.get_position(), Vec3::new(0.0, -99.0, 20.0), epsilon = 1e-3);

        nav.handle(InputEvent::MouseUp(MouseButton::Left), &mut camera)
            .unwrap();
        nav.frame(&mut camera);
        assert_abs_diff_eq!(camera.get_position(), Vec3::new(0.0, -99.0, 20.0), epsilon = 1e-3);
    }

    #[test]
    fn keys_map_to_camera_moves() {
        let (mut nav, mut camera) = setup();
        nav.handle(InputEvent::Key('X'), &mut camera).unwrap();
        assert_abs_diff_eq!(camera.get_position(), Vec3::new(5.0, -100.0, 20.0), epsilon = 1e-4);
        nav.handle(InputEvent::Key('F'), &mut camera).unwrap();
        assert_abs_diff_eq!(camera.get_position(), Vec3::new(5.0, -95.0, 20.0), epsilon = 1e-4);
        nav.handle(InputEvent::Key('i'), &mut camera).unwrap();
        assert_abs_diff_eq!(camera.get_position(), home().eye);
        assert!(!nav.handle(InputEvent::Escape, &mut camera).unwrap());
    }

    #[test]
    fn resize_updates_aspect() {
        let (mut nav, mut camera) = setup();
        nav.handle(InputEvent::Resized { width: 1200, height: 600 }, &mut camera)
            .unwrap();
        assert_abs_diff_eq!(camera.aspect_ratio(), 2.0);
        nav.handle(InputEvent::Resized { width: 0, height: 0 }, &mut camera)
            .unwrap();
        assert_abs_diff_eq!(camera.aspect_ratio(), 2.0);
    }
}
