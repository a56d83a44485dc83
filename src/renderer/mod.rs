mod machinery;
mod tracer;
mod worker;

use std::num::{NonZeroU32, NonZeroUsize};

use crate::geometry::ScreenSize;

pub use crate::renderer::machinery::{
    RenderError, RenderProgress, SchedulerState, TileProgress, render, render_sequential,
};
pub use crate::renderer::tracer::{AMBIENT_COLOR, BACKGROUND_COLOR, DIFFUSE_COLOR, trace};
pub use crate::renderer::worker::color_to_pixel;

const DEFAULT_TILE_SIZE: NonZeroU32 = NonZeroU32::new(16).unwrap();

#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    pub tile_width: NonZeroU32,
    pub tile_height: NonZeroU32,
    /// Supersampling factor, each pixel is an average of `samples_per_axis`² rays.
    pub samples_per_axis: NonZeroU32,
    pub worker_count: WorkerCount,
    /// Pin worker threads to CPU cores, round robin.
    pub pin_workers: bool,
}

impl RenderSettings {
    pub fn tile_size(&self) -> ScreenSize {
        ScreenSize::new(self.tile_width.get(), self.tile_height.get())
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            samples_per_axis: NonZeroU32::MIN,
            worker_count: WorkerCount::Auto,
            pin_workers: false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkerCount {
    /// One worker per logical CPU.
    Auto,
    Manual(NonZeroUsize),
}

impl WorkerCount {
    pub fn resolve(self) -> usize {
        match self {
            WorkerCount::Auto => num_cpus::get().max(1),
            WorkerCount::Manual(count) => count.get(),
        }
    }
}
