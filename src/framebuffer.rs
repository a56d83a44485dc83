use std::{io::Write, ops::Deref as _};

use image::{
    ExtendedColorType, GenericImage, GenericImageView, ImageEncoder, ImageResult, Rgba, RgbImage,
    RgbaImage,
    buffer::ConvertBuffer,
    codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding},
};

use crate::geometry::{ScreenBlock, ScreenPoint, ScreenSize};

/// Final image, row 0 at the top.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Framebuffer {
    image: RgbaImage,
}

impl Framebuffer {
    /// Fully transparent black image of the given size.
    pub fn new(resolution: ScreenSize) -> Framebuffer {
        Framebuffer {
            image: RgbaImage::new(resolution.x, resolution.y),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn resolution(&self) -> ScreenSize {
        ScreenSize::new(self.width(), self.height())
    }

    pub fn pixel(&self, point: ScreenPoint) -> Rgba<u8> {
        *self.image.get_pixel(point.x, point.y)
    }

    /// Copies the top left `block`-sized corner of `buffer` into `block` of this image.
    /// The block must lie inside the image and the buffer must be at least as large as the block.
    pub fn write_block(&mut self, block: &ScreenBlock, buffer: &RgbaImage) {
        self.image
            .copy_from(
                buffer.view(0, 0, block.width(), block.height()).deref(),
                block.min.x,
                block.min.y,
            )
            .unwrap_or_else(|_| unreachable!("Block {block:?} doesn't fit into the image"));
    }

    /// Raw RGBA bytes, row by row from the top.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// The image without the alpha channel, which is always opaque anyway.
    pub fn to_rgb_image(&self) -> RgbImage {
        self.image.convert()
    }

    /// Writes the image as a binary PPM (P6), for streaming to a pipe.
    pub fn write_ppm(&self, out: impl Write) -> ImageResult<()> {
        let image = self.to_rgb_image();
        PnmEncoder::new(out)
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    #[test]
    fn new_is_transparent_black() {
        let framebuffer = Framebuffer::new(ScreenSize::new(3, 2));

        assert!(framebuffer.resolution() == ScreenSize::new(3, 2));
        assert!(framebuffer.as_raw().len() == 3 * 2 * 4);
        assert!(framebuffer.as_raw().iter().all(|&b| b == 0));
    }

    /// Framebuffer with a single pixel set.
    fn with_pixel(size: ScreenSize, point: ScreenPoint, pixel: Rgba<u8>) -> Framebuffer {
        let mut framebuffer = Framebuffer::new(size);
        let block = ScreenBlock::new(point, ScreenPoint::new(point.x + 1, point.y + 1));
        framebuffer.write_block(&block, &RgbaImage::from_pixel(1, 1, pixel));
        framebuffer
    }

    #[test]
    fn pixel_access() {
        let point = ScreenPoint::new(1, 2);
        let framebuffer = with_pixel(ScreenSize::new(4, 4), point, Rgba([1, 2, 3, 4]));

        assert!(framebuffer.pixel(point) == Rgba([1, 2, 3, 4]));
        assert!(&framebuffer.as_raw()[(2 * 4 + 1) * 4..][..4] == &[1, 2, 3, 4]);
    }

    #[test]
    fn write_block_copies_only_the_block() {
        let mut framebuffer = Framebuffer::new(ScreenSize::new(5, 4));

        // Buffer larger than the block, the extra pixels must not leak out
        let buffer = RgbaImage::from_fn(3, 3, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        let block = ScreenBlock::new(ScreenPoint::new(3, 1), ScreenPoint::new(5, 3));
        framebuffer.write_block(&block, &buffer);

        for y in 0..4 {
            for x in 0..5 {
                let point = ScreenPoint::new(x, y);
                let expected = if block.contains(&point) {
                    Rgba([(x - 3) as u8, (y - 1) as u8, 7, 255])
                } else {
                    Rgba([0, 0, 0, 0])
                };
                assert!(framebuffer.pixel(point) == expected);
            }
        }
    }

    #[test]
    fn into_image_keeps_pixels() {
        let framebuffer = with_pixel(
            ScreenSize::new(2, 2),
            ScreenPoint::new(1, 0),
            Rgba([9, 9, 9, 9]),
        );

        let image = framebuffer.into_image();
        assert!(*image.get_pixel(1, 0) == Rgba([9, 9, 9, 9]));
    }

    #[test]
    fn rgb_image_drops_alpha() {
        let framebuffer = with_pixel(
            ScreenSize::new(3, 2),
            ScreenPoint::new(2, 1),
            Rgba([26, 77, 51, 255]),
        );

        let image = framebuffer.to_rgb_image();
        assert!(image.dimensions() == (3, 2));
        assert!(image.as_raw().len() == 3 * 2 * 3);
        assert!(*image.get_pixel(2, 1) == image::Rgb([26, 77, 51]));
    }

    #[test]
    fn ppm_is_binary_rgb() {
        let framebuffer = with_pixel(
            ScreenSize::new(2, 2),
            ScreenPoint::new(0, 1),
            Rgba([1, 2, 3, 255]),
        );

        let mut out = Vec::new();
        framebuffer.write_ppm(&mut out).unwrap();

        assert!(out.starts_with(b"P6"));
        let pixels = [0, 0, 0, 0, 0, 0, 1, 2, 3, 0, 0, 0];
        assert!(out.ends_with(&pixels));
        // Header ends with the max value line, no alpha bytes follow
        assert!(out[..out.len() - pixels.len()].ends_with(b"255\n"));
    }

    #[test]
    #[should_panic]
    fn block_outside_image() {
        let mut framebuffer = Framebuffer::new(ScreenSize::new(2, 2));
        let buffer = RgbaImage::new(4, 4);
        framebuffer.write_block(
            &ScreenBlock::new(ScreenPoint::new(1, 1), ScreenPoint::new(3, 3)),
            &buffer,
        );
    }
}
