//! Presentation (material) nodes

use super::SceneState;
use crate::Color;

/// Phong reflectance properties bound to subsequently drawn geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub emission: Color,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            ambient: Color::black(),
            diffuse: Color::black(),
            specular: Color::black(),
            emission: Color::black(),
            shininess: 1.0,
        }
    }
}

/// Carries a material. Drawing it binds the material for its children and,
/// since nothing is restored afterwards, for every later node as well until
/// another presentation node rebinds it.
#[derive(Debug, Clone, Default)]
pub struct PresentationNode {
    material: Material,
}

impl PresentationNode {
    pub fn new(
        ambient: Color,
        diffuse: Color,
        specular: Color,
        emission: Color,
        shininess: f32,
    ) -> PresentationNode {
        let mut node = PresentationNode {
            material: Material {
                ambient,
                diffuse,
                specular,
                emission,
                shininess: 0.0,
            },
        };
        node.set_material_shininess(shininess);
        node
    }

    pub fn from_material(material: Material) -> PresentationNode {
        let shininess = material.shininess;
        let mut node = PresentationNode { material };
        node.set_material_shininess(shininess);
        node
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn set_material_ambient(&mut self, c: Color) {
        self.material.ambient = c;
    }

    pub fn set_material_diffuse(&mut self, c: Color) {
        self.material.diffuse = c;
    }

    pub fn set_material_ambient_and_diffuse(&mut self, c: Color) {
        self.material.ambient = c;
        self.material.diffuse = c;
    }

    pub fn set_material_specular(&mut self, c: Color) {
        self.material.specular = c;
    }

    pub fn set_material_emission(&mut self, c: Color) {
        self.material.emission = c;
    }

    /// Shininess is clamped to be non-negative.
    pub fn set_material_shininess(&mut self, s: f32) {
        if s < 0.0 || s.is_nan() {
            log::warn!("Material shininess {} clamped to 0", s);
            self.material.shininess = 0.0;
        } else {
            self.material.shininess = s;
        }
    }

    pub(crate) fn apply(&self, state: &mut SceneState) {
        state.set_material(&self.material);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_shininess_is_clamped() {
        let node = PresentationNode::new(
            Color::black(),
            Color::white(),
            Color::white(),
            Color::black(),
            -4.0,
        );
        assert_eq!(node.material().shininess, 0.0);
    }

    #[test]
    fn ambient_and_diffuse_set_together() {
        let mut node = PresentationNode::default();
        node.set_material_ambient_and_diffuse(Color::red());
        assert_eq!(node.material().ambient, Color::red());
        assert_eq!(node.material().diffuse, Color::red());
        assert_eq!(node.material().shininess, 1.0);
    }

    #[test]
    fn apply_overwrites_binding() {
        let mut state = SceneState::default();
        let mut node = PresentationNode::default();
        node.set_material_emission(Color::green());
        node.apply(&mut state);
        assert_eq!(state.material().emission, Color::green());
    }
}
