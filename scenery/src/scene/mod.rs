//! Scene graph module

mod camera;
mod geometry;
mod light;
mod node;
mod presentation;
mod shader;
mod state;
mod transform;

pub use camera::*;
pub use geometry::*;
pub use light::*;
pub use node::*;
pub use presentation::*;
pub use shader::*;
pub use state::*;
pub use transform::*;

/// A graph together with the camera node that views it and the state reused
/// by every frame. The camera must be reachable from `root` to take effect.
pub struct Scene {
    root: NodeRef,
    camera: NodeRef,
    state: SceneState,
}

impl Scene {
    pub fn new(root: NodeRef, camera: NodeRef, max_lights: usize) -> Result<Scene, SceneError> {
        if camera.borrow().as_camera().is_none() {
            let name = camera
                .borrow()
                .name()
                .cloned()
                .unwrap_or_else(|| camera.borrow().node_kind().to_string());
            return Err(SceneError::NotACamera(name));
        }
        Ok(Scene {
            root,
            camera,
            state: SceneState::new(max_lights),
        })
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn camera(&self) -> &NodeRef {
        &self.camera
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    /// Runs `f` against the camera. Must not be called while a frame is
    /// being drawn.
    pub fn with_camera<R, F: FnOnce(&mut CameraNode) -> R>(&self, f: F) -> Option<R> {
        self.camera.borrow_mut().as_camera_mut().map(f)
    }

    /// Resets the state and draws the whole graph once.
    pub fn draw_frame(&mut self) -> Result<(), SceneError> {
        self.state.init();
        self.root.borrow().draw(&mut self.state)
    }

    pub fn update_frame(&mut self) -> Result<(), SceneError> {
        self.state.init();
        self.root.borrow().update(&mut self.state)
    }

    pub fn print_graph<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        self.root.borrow().print_graph(out, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use approx::assert_relative_eq;
    use scenery_geom::{Mat4, Vec3};
    use std::rc::Rc;

    #[test]
    fn scene_requires_camera_node() {
        let root = SceneNode::new_empty();
        let result = Scene::new(Rc::clone(&root), root, 3);
        assert!(matches!(result, Err(SceneError::NotACamera(_))));
    }

    #[test]
    fn frames_start_from_fresh_state() {
        let root = SceneNode::new_empty();
        let camera = SceneNode::new_camera(CameraNode::new());
        SceneNode::add_child(&root, Rc::clone(&camera)).unwrap();
        let leaf = Rc::new(RecordingGeometry::new("leaf"));
        SceneNode::add_child(&camera, SceneNode::new_geometry(leaf.clone())).unwrap();
        SceneNode::add_child(
            &camera,
            SceneNode::new_presentation(PresentationNode::from_material(Material {
                diffuse: Color::red(),
                ..Default::default()
            })),
        )
        .unwrap();

        let mut scene = Scene::new(root, camera, 3).unwrap();
        scene.draw_frame().unwrap();
        scene.with_camera(|camera| camera.slide(0.0, 0.0, 10.0));
        scene.draw_frame().unwrap();

        let records = leaf.records();
        assert_eq!(records.len(), 2);
        // the red material bound late in frame one must not reach frame two
        assert_eq!(records[1].material, Material::default());
        assert_eq!(records[1].camera_position, Vec3::new(0.0, 0.0, 10.0));
        assert_relative_eq!(records[1].model_matrix, Mat4::identity());
    }
}
