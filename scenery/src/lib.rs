//! Scenery: retained-mode scene graph

mod color;
pub use color::Color;
mod navigation;
pub use navigation::*;
pub mod scene;
use scene::{Scene, SceneError, DEFAULT_MAX_LIGHTS};

use std::{fs, path::Path, thread, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config file parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportParams {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportParams {
    fn default() -> Self {
        ViewportParams {
            title: "Simple 3-D Scene".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl ViewportParams {
    pub fn aspect(&self) -> f32 {
        match self.height {
            0 => 1.0,
            _ => (self.width as f32) / (self.height as f32),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    pub draws_per_second: u32,
    pub max_lights: usize,
    /// Stop after this many frames; `None` runs until the script quits.
    pub max_frames: Option<u64>,
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            draws_per_second: 72,
            max_lights: DEFAULT_MAX_LIGHTS,
            max_frames: None,
        }
    }
}

impl RenderParams {
    pub fn draw_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.draws_per_second.max(1)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationParams {
    pub velocity: f32,
    pub velocity_step: f32,
    pub rotate_step: f32,
    pub slide_step: f32,
}

impl Default for NavigationParams {
    fn default() -> Self {
        NavigationParams {
            velocity: 1.0,
            velocity_step: 0.2,
            rotate_step: 5.0,
            slide_step: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigParams {
    pub viewport: ViewportParams,
    pub render: RenderParams,
    pub navigation: NavigationParams,
}

impl ConfigParams {
    /// Reads a JSON config. Missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ConfigParams, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        let params = serde_json::from_str(&text)?;
        log::info!("Config loaded from {}", path.as_ref().display());
        Ok(params)
    }
}

/// Per-frame hooks driven by [`launch`].
pub trait FrameScript {
    /// Drains pending input. Returning `false` ends the loop.
    fn handle_events(&mut self, scene: &Scene) -> Result<bool, SceneError>;

    fn update(&mut self, scene: &Scene) -> Result<(), SceneError>;
}

/// Runs the fixed-rate loop: handle events, update, draw, sleep. Returns the
/// number of frames drawn.
pub fn launch<S: FrameScript>(
    params: &ConfigParams,
    scene: &mut Scene,
    script: &mut S,
) -> Result<u64, SceneError> {
    let interval = params.render.draw_interval();
    log::info!(
        "Render loop started, {} draws per second",
        params.render.draws_per_second
    );

    let mut frames = 0u64;
    while script.handle_events(scene)? {
        script.update(scene)?;
        if let Err(e) = scene.draw_frame() {
            log::error!("Rendering error: {}", e);
            return Err(e);
        }
        frames += 1;
        if params.render.max_frames.map_or(false, |max| frames >= max) {
            break;
        }
        thread::sleep(interval);
    }

    log::info!("Render loop ended after {} frames", frames);
    Ok(frames)
}
