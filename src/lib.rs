mod camera;
mod config;
mod framebuffer;
pub mod geometry;
mod renderer;
pub mod scene;
mod screen_block;
mod util;

pub use crate::renderer::{
    AMBIENT_COLOR, BACKGROUND_COLOR, DIFFUSE_COLOR, RenderError, RenderProgress, RenderSettings,
    SchedulerState, TileProgress, WorkerCount, color_to_pixel, render, render_sequential, trace,
};
pub use camera::Camera;
pub use config::{ConfigError, RenderConfig, SceneSettings};
pub use framebuffer::Framebuffer;
pub use scene::Scene;
pub use screen_block::{InternalPoints, ScanTiles, ScreenBlockExt};
pub use util::{Color, Stats};
