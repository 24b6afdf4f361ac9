//! Lighting shader node

use std::{collections::HashMap, rc::Rc};

use thiserror::Error;

use super::{SceneState, ShaderBinding};
use crate::Color;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShaderError {
    #[error("Error getting {0} attribute location")]
    MissingAttribute(&'static str),
    #[error("Error getting {0} uniform location")]
    MissingUniform(&'static str),
}

/// Location lookup offered by a compiled shader program.
pub trait ShaderProgram {
    fn attribute_location(&self, name: &str) -> Option<u32>;

    fn uniform_location(&self, name: &str) -> Option<u32>;
}

/// Program interface described by plain name tables, for backends that
/// assign locations up front and for headless runs.
#[derive(Debug, Clone, Default)]
pub struct ProgramInterface {
    attributes: HashMap<String, u32>,
    uniforms: HashMap<String, u32>,
}

impl ProgramInterface {
    pub fn new() -> ProgramInterface {
        Self::default()
    }

    pub fn with_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let loc = self.attributes.len() as u32;
            self.attributes.insert(name.into(), loc);
        }
        self
    }

    pub fn with_uniforms<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let loc = self.uniforms.len() as u32;
            self.uniforms.insert(name.into(), loc);
        }
        self
    }

    /// Interface of the Phong lighting program with `light_count` light slots.
    pub fn lighting(light_count: usize) -> ProgramInterface {
        let mut uniforms: Vec<String> = [
            "pvm_matrix",
            "model_matrix",
            "normal_matrix",
            "camera_position",
            "num_lights",
            "global_light_ambient",
            "material_ambient",
            "material_diffuse",
            "material_specular",
            "material_emission",
            "material_shininess",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        for i in 0..light_count {
            for field in LIGHT_FIELDS {
                uniforms.push(format!("lights[{}].{}", i, field));
            }
        }
        Self::new()
            .with_attributes(vec!["vtx_position", "vtx_normal"])
            .with_uniforms(uniforms)
    }
}

impl ShaderProgram for ProgramInterface {
    fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attributes.get(name).copied()
    }

    fn uniform_location(&self, name: &str) -> Option<u32> {
        self.uniforms.get(name).copied()
    }
}

const LIGHT_FIELDS: [&str; 9] = [
    "enabled",
    "spotlight",
    "position",
    "ambient",
    "diffuse",
    "specular",
    "spot_direction",
    "spot_cutoff",
    "spot_exponent",
];

/// Uniform locations for one light slot. Unused uniforms may be optimized
/// out of the program, so every entry is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightLocations {
    pub enabled: Option<u32>,
    pub spotlight: Option<u32>,
    pub position: Option<u32>,
    pub ambient: Option<u32>,
    pub diffuse: Option<u32>,
    pub specular: Option<u32>,
    pub spot_direction: Option<u32>,
    pub spot_cutoff: Option<u32>,
    pub spot_exponent: Option<u32>,
}

/// Locations resolved once when the scene is built and stable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderLocations {
    pub position: u32,
    pub normal: u32,
    pub pvm_matrix: u32,
    pub model_matrix: u32,
    pub normal_matrix: u32,
    pub camera_position: Option<u32>,
    pub num_lights: Option<u32>,
    pub global_ambient: Option<u32>,
    pub material_ambient: Option<u32>,
    pub material_diffuse: Option<u32>,
    pub material_specular: Option<u32>,
    pub material_emission: Option<u32>,
    pub material_shininess: Option<u32>,
    pub lights: Vec<LightLocations>,
}

impl ShaderLocations {
    pub fn resolve(
        program: &dyn ShaderProgram,
        light_count: usize,
    ) -> Result<ShaderLocations, ShaderError> {
        let attribute = |name: &'static str| {
            program
                .attribute_location(name)
                .ok_or(ShaderError::MissingAttribute(name))
        };
        let required = |name: &'static str| {
            program
                .uniform_location(name)
                .ok_or(ShaderError::MissingUniform(name))
        };
        let optional = |name: &str| {
            let loc = program.uniform_location(name);
            if loc.is_none() {
                log::debug!("Uniform {} not found, it may be optimized out", name);
            }
            loc
        };

        let lights = (0..light_count)
            .map(|i| {
                let field = |f: &str| optional(&format!("lights[{}].{}", i, f));
                LightLocations {
                    enabled: field("enabled"),
                    spotlight: field("spotlight"),
                    position: field("position"),
                    ambient: field("ambient"),
                    diffuse: field("diffuse"),
                    specular: field("specular"),
                    spot_direction: field("spot_direction"),
                    spot_cutoff: field("spot_cutoff"),
                    spot_exponent: field("spot_exponent"),
                }
            })
            .collect();

        Ok(ShaderLocations {
            position: attribute("vtx_position")?,
            normal: attribute("vtx_normal")?,
            pvm_matrix: required("pvm_matrix")?,
            model_matrix: required("model_matrix")?,
            normal_matrix: required("normal_matrix")?,
            camera_position: optional("camera_position"),
            num_lights: optional("num_lights"),
            global_ambient: optional("global_light_ambient"),
            material_ambient: optional("material_ambient"),
            material_diffuse: optional("material_diffuse"),
            material_specular: optional("material_specular"),
            material_emission: optional("material_emission"),
            material_shininess: optional("material_shininess"),
            lights,
        })
    }
}

/// Activates a lighting program for its subtree: binds the program's
/// locations, light count and global ambient into the state.
#[derive(Debug, Clone)]
pub struct ShaderNode {
    locations: Rc<ShaderLocations>,
    light_count: usize,
    global_ambient: Color,
}

impl ShaderNode {
    pub fn new(program: &dyn ShaderProgram, light_count: usize) -> Result<ShaderNode, ShaderError> {
        let locations = ShaderLocations::resolve(program, light_count)?;
        log::info!(
            "Lighting shader resolved: position = {}, normal = {}, {} lights",
            locations.position,
            locations.normal,
            light_count
        );
        Ok(ShaderNode {
            locations: Rc::new(locations),
            light_count,
            global_ambient: Color::black(),
        })
    }

    pub fn locations(&self) -> &ShaderLocations {
        &self.locations
    }

    pub fn get_position_loc(&self) -> u32 {
        self.locations.position
    }

    pub fn get_normal_loc(&self) -> u32 {
        self.locations.normal
    }

    pub fn light_count(&self) -> usize {
        self.light_count
    }

    pub fn global_ambient(&self) -> Color {
        self.global_ambient
    }

    pub fn set_global_ambient(&mut self, global_ambient: Color) {
        self.global_ambient = global_ambient;
    }

    pub(crate) fn apply(&self, state: &mut SceneState) {
        state.bind_shader(ShaderBinding {
            locations: Rc::clone(&self.locations),
            light_count: self.light_count,
            global_ambient: self.global_ambient,
        });
    }
}
