use std::num::{NonZeroU32, NonZeroUsize};

use bon::bon;
use nalgebra::Unit;
use thiserror::Error;

use crate::{
    camera::Camera,
    geometry::{EPSILON, FloatType, ScreenSize, WorldPoint, WorldVector},
    renderer::{RenderSettings, WorkerCount},
    scene::Scene,
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Recursion level must be at least 1")]
    ZeroLevel,

    #[error("Image width must be positive")]
    ZeroWidth,

    #[error("Image height must be positive")]
    ZeroHeight,

    #[error("Supersampling factor must be at least 1")]
    ZeroSamples,

    #[error("Tile width must be positive")]
    ZeroTileWidth,

    #[error("Tile height must be positive")]
    ZeroTileHeight,

    #[error("Worker count must be at least 1")]
    ZeroWorkers,

    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(FloatType),

    #[error("Light direction must be non-zero")]
    DegenerateLight,
}

/// Parameters of the sphere pyramid scene and the eye looking at it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneSettings {
    pub level: NonZeroU32,
    pub center: WorldPoint,
    pub radius: FloatType,
    pub light: Unit<WorldVector>,
    pub eye: WorldPoint,
}

impl Default for SceneSettings {
    fn default() -> Self {
        SceneSettings {
            level: DEFAULT_LEVEL,
            center: default_center(),
            radius: 1.0,
            light: Unit::new_normalize(default_light()),
            eye: default_eye(),
        }
    }
}

const DEFAULT_LEVEL: NonZeroU32 = NonZeroU32::new(8).unwrap();
const DEFAULT_RESOLUTION: u32 = 1024;
const DEFAULT_TILE_SIZE: u32 = 16;

fn default_center() -> WorldPoint {
    WorldPoint::new(0.0, -1.0, 0.0)
}

fn default_light() -> WorldVector {
    WorldVector::new(-1.0, -3.0, 2.0)
}

fn default_eye() -> WorldPoint {
    WorldPoint::new(0.0, 0.0, -4.0)
}

/// Everything needed for one render, validated.
#[derive(Copy, Clone, Debug)]
pub struct RenderConfig {
    pub resolution: ScreenSize,
    pub scene: SceneSettings,
    pub render: RenderSettings,
}

#[bon]
impl RenderConfig {
    /// Checks all parameters, nothing gets scheduled with an invalid configuration.
    #[builder]
    pub fn new(
        #[builder(default = DEFAULT_RESOLUTION)] width: u32,
        #[builder(default = DEFAULT_RESOLUTION)] height: u32,
        #[builder(default = DEFAULT_LEVEL.get())] level: u32,
        #[builder(default = default_center())] center: WorldPoint,
        #[builder(default = 1.0)] radius: FloatType,
        // Direction the light travels in, doesn't need to be normalized
        #[builder(default = default_light())]
        light: WorldVector,
        #[builder(default = default_eye())] eye: WorldPoint,
        // Sub-samples along each pixel axis
        #[builder(default = 1)]
        samples_per_axis: u32,
        #[builder(default = DEFAULT_TILE_SIZE)] tile_width: u32,
        #[builder(default = DEFAULT_TILE_SIZE)] tile_height: u32,
        // Number of worker threads, one per CPU if not set
        workers: Option<usize>,
        #[builder(default)] pin_workers: bool,
    ) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        let level = NonZeroU32::new(level).ok_or(ConfigError::ZeroLevel)?;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::InvalidRadius(radius));
        }
        let light = Unit::try_new(light, EPSILON).ok_or(ConfigError::DegenerateLight)?;
        let samples_per_axis = NonZeroU32::new(samples_per_axis).ok_or(ConfigError::ZeroSamples)?;
        let tile_width = NonZeroU32::new(tile_width).ok_or(ConfigError::ZeroTileWidth)?;
        let tile_height = NonZeroU32::new(tile_height).ok_or(ConfigError::ZeroTileHeight)?;
        let worker_count = match workers {
            None => WorkerCount::Auto,
            Some(n) => WorkerCount::Manual(NonZeroUsize::new(n).ok_or(ConfigError::ZeroWorkers)?),
        };

        Ok(RenderConfig {
            resolution: ScreenSize::new(width, height),
            scene: SceneSettings {
                level,
                center,
                radius,
                light,
                eye,
            },
            render: RenderSettings {
                tile_width,
                tile_height,
                samples_per_axis,
                worker_count,
                pin_workers,
            },
        })
    }
}

impl RenderConfig {
    pub fn camera(&self) -> Camera {
        Camera::builder()
            .eye(self.scene.eye)
            .resolution(self.resolution)
            .build()
    }

    pub fn build_scene(&self) -> Scene {
        Scene::sphere_pyramid(&self.scene)
    }
}
