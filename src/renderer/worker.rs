use image::RgbaImage;
use itertools::iproduct;

use crate::{
    camera::Camera,
    geometry::{FloatType, ScreenBlock, ScreenSize},
    renderer::{RenderSettings, tracer::trace},
    scene::{Object, Scene},
    screen_block::ScreenBlockExt,
    util::Color,
};

/// Per thread rendering state, owns the scratch buffer that one tile is rendered into.
pub struct Worker {
    id: usize,
    buffer: RgbaImage,
}

impl Worker {
    /// Tiles never extend past the image, so the buffer doesn't either.
    pub fn new(id: usize, settings: &RenderSettings, resolution: ScreenSize) -> Self {
        Self {
            id,
            buffer: RgbaImage::new(
                settings.tile_width.get().min(resolution.x),
                settings.tile_height.get().min(resolution.y),
            ),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Renders the tile into the scratch buffer and returns it.
    ///
    /// Tile coordinates have y pointing up, rows of the buffer go top down, so the
    /// tile ends up flipped in the buffer's top left corner, ready to be copied to
    /// the mirrored block of the output image.
    pub fn render_tile<O: Object>(
        &mut self,
        scene: &Scene<O>,
        camera: &Camera,
        settings: &RenderSettings,
        tile: &ScreenBlock,
    ) -> &RgbaImage {
        let samples = settings.samples_per_axis;
        let sample_weight = 1.0 / (samples.get() * samples.get()) as FloatType;

        for point in tile.internal_points() {
            let mut pixel_sum = Color::new(0.0, 0.0, 0.0);
            for sample in iproduct!(0..samples.get(), 0..samples.get()) {
                pixel_sum += trace(scene, &camera.sample_ray(&point, sample, samples));
            }

            let buffer_x = point.x - tile.min.x;
            let buffer_y = tile.max.y - 1 - point.y;
            self.buffer
                .put_pixel(buffer_x, buffer_y, color_to_pixel(pixel_sum * sample_weight));
        }

        &self.buffer
    }
}

/// Maps a 0-1 color to an opaque 8 bit pixel, rounding half up.
pub fn color_to_pixel(color: Color) -> image::Rgba<u8> {
    let channel = |value: FloatType| (0.5 + value * 255.0).clamp(0.0, 255.0) as u8;
    image::Rgba([channel(color.r), channel(color.g), channel(color.b), 255])
}
