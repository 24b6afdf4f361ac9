//! Geometric math for the scene graph: vectors and column-major matrices.

mod mat3;
mod mat4;
mod vec3;
mod vec4;

pub use mat3::*;
pub use mat4::*;
pub use vec3::*;
pub use vec4::*;

/// Tolerance used when deciding whether a direction is degenerate.
pub const EPSILON: f32 = 1.0e-5;
