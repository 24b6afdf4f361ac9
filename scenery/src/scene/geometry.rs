//! Geometry leaves

use std::cell::{Ref, RefCell};

use scenery_geom::{Mat3, Mat4, Vec3};

use super::{LightBinding, Material, SceneError, SceneState};

/// Contract for drawable leaves. At draw time the state carries the model
/// matrix, the camera's projection * view, the bound material and lights,
/// and the attribute/uniform locations of the active shader.
///
/// Geometry is typically shared by many parents (one unit square under every
/// wall transform), so it is drawn through `&self`.
pub trait Geometry {
    fn name(&self) -> &str {
        "geometry"
    }

    fn draw(&self, state: &SceneState) -> Result<(), SceneError>;

    fn update(&self, _state: &SceneState) -> Result<(), SceneError> {
        Ok(())
    }
}

/// Everything a draw call would consume, captured at the moment the leaf
/// was visited.
#[derive(Debug, Clone)]
pub struct DrawRecord {
    pub name: String,
    pub model_matrix: Mat4,
    pub pvm_matrix: Mat4,
    pub normal_matrix: Mat3,
    pub camera_position: Vec3,
    pub material: Material,
    pub lights: Vec<LightBinding>,
}

impl DrawRecord {
    pub fn capture(name: &str, state: &SceneState) -> DrawRecord {
        DrawRecord {
            name: name.to_string(),
            model_matrix: *state.model_matrix(),
            pvm_matrix: state.pvm_matrix(),
            normal_matrix: state.normal_matrix(),
            camera_position: state.camera_position(),
            material: state.material().clone(),
            lights: state.lights().to_vec(),
        }
    }
}

/// Headless geometry that records each draw instead of submitting it.
#[derive(Debug, Default)]
pub struct RecordingGeometry {
    name: String,
    records: RefCell<Vec<DrawRecord>>,
}

impl RecordingGeometry {
    pub fn new<S: Into<String>>(name: S) -> RecordingGeometry {
        RecordingGeometry {
            name: name.into(),
            records: RefCell::new(vec![]),
        }
    }

    pub fn records(&self) -> Ref<'_, Vec<DrawRecord>> {
        self.records.borrow()
    }

    pub fn draw_count(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl Geometry for RecordingGeometry {
    fn name(&self) -> &str {
        &self.name
    }

    fn draw(&self, state: &SceneState) -> Result<(), SceneError> {
        log::trace!("Draw {} at {:?}", self.name, state.model_matrix()[3]);
        self.records
            .borrow_mut()
            .push(DrawRecord::capture(&self.name, state));
        Ok(())
    }
}
