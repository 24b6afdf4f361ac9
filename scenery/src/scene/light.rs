//! Lights

use scenery_geom::{Vec3, Vec4};

use super::SceneState;
use crate::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightMode {
    Directional,
    Point,
    Spot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spotlight {
    pub direction: Vec3,
    /// Cone half-angle in degrees.
    pub cutoff: f32,
    pub exponent: f32,
}

impl Default for Spotlight {
    fn default() -> Self {
        Spotlight {
            direction: Vec3::new(0.0, 0.0, -1.0),
            cutoff: 180.0,
            exponent: 0.0,
        }
    }
}

/// Light source placed in the graph. Drawing it writes its parameters into
/// the state slot `index`; the binding stays in effect after the node's
/// subtree, so a later light node with the same index overrides it.
#[derive(Debug, Clone)]
pub struct LightNode {
    index: usize,
    enabled: bool,
    position: Vec4,
    ambient: Color,
    diffuse: Color,
    specular: Color,
    spotlight: bool,
    spot: Spotlight,
}

impl LightNode {
    /// Point (w = 1) or directional (w = 0) light.
    pub fn new(
        index: usize,
        position: Vec4,
        ambient: Color,
        diffuse: Color,
        specular: Color,
    ) -> LightNode {
        LightNode {
            index,
            enabled: true,
            position,
            ambient,
            diffuse,
            specular,
            spotlight: false,
            spot: Spotlight::default(),
        }
    }

    pub fn directional(index: usize, direction: Vec3, color: Color) -> LightNode {
        Self::new(
            index,
            Vec4::direction(direction),
            Color::black(),
            color,
            color,
        )
    }

    pub fn point(index: usize, position: Vec3, color: Color) -> LightNode {
        Self::new(index, Vec4::point(position), Color::black(), color, color)
    }

    pub fn spotlight(
        index: usize,
        position: Vec4,
        ambient: Color,
        diffuse: Color,
        specular: Color,
        spot: Spotlight,
    ) -> LightNode {
        LightNode {
            spotlight: true,
            spot,
            ..Self::new(index, position, ambient, diffuse, specular)
        }
    }

    pub fn mode(&self) -> LightMode {
        if self.spotlight {
            LightMode::Spot
        } else if self.position.w == 0.0 {
            LightMode::Directional
        } else {
            LightMode::Point
        }
    }

    pub fn light_index(&self) -> usize {
        self.index
    }

    pub fn is_spotlight(&self) -> bool {
        self.spotlight
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn position(&self) -> Vec4 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec4) {
        self.position = position;
    }

    pub fn set_ambient(&mut self, ambient: Color) {
        self.ambient = ambient;
    }

    pub fn set_diffuse(&mut self, diffuse: Color) {
        self.diffuse = diffuse;
    }

    pub fn set_specular(&mut self, specular: Color) {
        self.specular = specular;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_spot_direction(&mut self, direction: Vec3) {
        self.spot.direction = direction;
    }

    pub fn set_spot_cutoff(&mut self, cutoff: f32) {
        self.spot.cutoff = cutoff;
    }

    pub fn set_spot_exponent(&mut self, exponent: f32) {
        self.spot.exponent = exponent;
    }

    pub(crate) fn apply(&self, state: &mut SceneState) {
        let slot = match state.light_mut(self.index) {
            Some(slot) => slot,
            None => {
                log::debug!(
                    "Light index {} ignored, only {} slots bound",
                    self.index,
                    state.max_lights()
                );
                return;
            }
        };
        slot.enabled = self.enabled;
        slot.spotlight = self.spotlight;
        slot.position = self.position;
        slot.ambient = self.ambient;
        slot.diffuse = self.diffuse;
        slot.specular = self.specular;
        if self.spotlight {
            slot.spot_direction = self.spot.direction;
            slot.spot_cutoff = self.spot.cutoff;
            slot.spot_exponent = self.spot.exponent;
        }
    }
}
