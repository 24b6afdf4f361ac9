//! Per-frame traversal state

use std::{
    ops::{Deref, DerefMut},
    rc::Rc,
};

use scenery_geom::{Mat3, Mat4, Vec3, Vec4};

use super::{Material, ShaderLocations};
use crate::Color;

/// Upper bound on light slots used when no explicit bound is configured.
pub const DEFAULT_MAX_LIGHTS: usize = 3;

/// Values bound to one light slot. Written by light nodes, read by geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct LightBinding {
    pub enabled: bool,
    pub spotlight: bool,
    /// w = 0: directional light, w = 1: positional light.
    pub position: Vec4,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub spot_direction: Vec3,
    pub spot_cutoff: f32,
    pub spot_exponent: f32,
}

impl Default for LightBinding {
    fn default() -> Self {
        LightBinding {
            enabled: false,
            spotlight: false,
            position: Vec4::new(0.0, 0.0, 1.0, 0.0),
            ambient: Color::black(),
            diffuse: Color::black(),
            specular: Color::black(),
            spot_direction: Vec3::new(0.0, 0.0, -1.0),
            spot_cutoff: 180.0,
            spot_exponent: 0.0,
        }
    }
}

/// Program-wide values bound by the active shader node.
#[derive(Debug, Clone)]
pub struct ShaderBinding {
    pub locations: Rc<ShaderLocations>,
    pub light_count: usize,
    pub global_ambient: Color,
}

/// Mutable context threaded through one depth-first traversal.
///
/// Transforms are scoped: [`SceneState::push_transform`] hands out a guard
/// that restores the parent's model matrix when dropped. Material and light
/// bindings are not scoped; whatever was written last stays bound for every
/// node visited afterwards.
#[derive(Debug, Clone)]
pub struct SceneState {
    model_matrix: Mat4,
    model_matrix_stack: Vec<Mat4>,
    projection_view: Mat4,
    camera_position: Vec3,
    material: Material,
    lights: Vec<LightBinding>,
    shader: Option<ShaderBinding>,
}

impl SceneState {
    pub fn new(max_lights: usize) -> SceneState {
        SceneState {
            model_matrix: Mat4::identity(),
            model_matrix_stack: vec![],
            projection_view: Mat4::identity(),
            camera_position: Vec3::zero(),
            material: Material::default(),
            lights: vec![LightBinding::default(); max_lights],
            shader: None,
        }
    }

    /// Resets the state at the start of a frame.
    pub fn init(&mut self) {
        let max_lights = self.lights.len();
        *self = SceneState::new(max_lights);
    }

    pub fn max_lights(&self) -> usize {
        self.lights.len()
    }

    /// Copies the current model matrix onto the stack.
    pub fn push_transforms(&mut self) {
        self.model_matrix_stack.push(self.model_matrix);
    }

    /// Restores the most recently pushed model matrix, or the identity when
    /// nothing was pushed.
    pub fn pop_transforms(&mut self) {
        self.model_matrix = self.model_matrix_stack.pop().unwrap_or_default();
    }

    /// Pushes the current model matrix and composes `local` onto it. The
    /// previous matrix comes back when the returned scope is dropped, which
    /// also happens on early returns and unwinding.
    pub fn push_transform(&mut self, local: &Mat4) -> TransformScope<'_> {
        self.push_transforms();
        self.model_matrix = self.model_matrix * *local;
        TransformScope { state: self }
    }

    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    pub fn stack_depth(&self) -> usize {
        self.model_matrix_stack.len()
    }

    pub fn projection_view(&self) -> &Mat4 {
        &self.projection_view
    }

    /// Composite projection * view * model for the geometry being drawn.
    pub fn pvm_matrix(&self) -> Mat4 {
        self.projection_view * self.model_matrix
    }

    pub fn normal_matrix(&self) -> Mat3 {
        self.model_matrix.normal_matrix()
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    pub(crate) fn set_camera(&mut self, position: Vec3, projection_view: Mat4) {
        self.camera_position = position;
        self.projection_view = projection_view;
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub(crate) fn set_material(&mut self, material: &Material) {
        self.material = material.clone();
    }

    pub fn light(&self, index: usize) -> Option<&LightBinding> {
        self.lights.get(index)
    }

    pub fn lights(&self) -> &[LightBinding] {
        &self.lights
    }

    pub(crate) fn light_mut(&mut self, index: usize) -> Option<&mut LightBinding> {
        self.lights.get_mut(index)
    }

    pub fn shader(&self) -> Option<&ShaderBinding> {
        self.shader.as_ref()
    }

    pub(crate) fn bind_shader(&mut self, binding: ShaderBinding) {
        self.shader = Some(binding);
    }
}

impl Default for SceneState {
    fn default() -> Self {
        SceneState::new(DEFAULT_MAX_LIGHTS)
    }
}

/// Guard returned by [`SceneState::push_transform`].
pub struct TransformScope<'a> {
    state: &'a mut SceneState,
}

impl Deref for TransformScope<'_> {
    type Target = SceneState;

    fn deref(&self) -> &SceneState {
        self.state
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut SceneState {
        self.state
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.state.pop_transforms();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn scope_restores_model_matrix() {
        let mut state = SceneState::default();
        let outer = Mat4::translation(1.0, 2.0, 3.0);
        {
            let mut scope = state.push_transform(&outer);
            assert_eq!(scope.stack_depth(), 1);
            {
                let inner = scope.push_transform(&Mat4::scale(2.0, 2.0, 2.0));
                assert_relative_eq!(
                    *inner.model_matrix(),
                    outer * Mat4::scale(2.0, 2.0, 2.0)
                );
            }
            assert_relative_eq!(*scope.model_matrix(), outer);
        }
        assert_eq!(state.stack_depth(), 0);
        assert_eq!(*state.model_matrix(), Mat4::identity());
    }

    #[test]
    fn scope_pops_during_unwind() {
        let mut state = SceneState::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = state.push_transform(&Mat4::translation(5.0, 0.0, 0.0));
            panic!("descendant failed");
        }));
        assert!(result.is_err());
        assert_eq!(state.stack_depth(), 0);
        assert_eq!(*state.model_matrix(), Mat4::identity());
    }

    #[test]
    fn pop_on_empty_stack_resets_to_identity() {
        let mut state = SceneState::default();
        state.model_matrix = Mat4::translation(1.0, 0.0, 0.0);
        state.pop_transforms();
        assert_eq!(*state.model_matrix(), Mat4::identity());
    }

    #[test]
    fn init_keeps_light_bound() {
        let mut state = SceneState::new(2);
        state.light_mut(1).unwrap().enabled = true;
        state.push_transforms();
        state.init();
        assert_eq!(state.max_lights(), 2);
        assert_eq!(state.stack_depth(), 0);
        assert!(!state.light(1).unwrap().enabled);
    }
}
