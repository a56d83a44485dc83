use std::num::NonZeroU32;

use assert2::assert;
use bon::bon;

use crate::geometry::{FloatType, Ray, ScreenPoint, ScreenSize, WorldPoint, WorldVector};

/// Pinhole camera looking along +Z from the eye point.
///
/// The image plane sits at a distance equal to the image width, so the horizontal field
/// of view is always about 53 degrees.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    eye: WorldPoint,
    resolution: ScreenSize,
}

#[bon]
impl Camera {
    #[builder]
    pub fn new(eye: WorldPoint, resolution: ScreenSize) -> Self {
        assert!(resolution.x > 0);
        assert!(resolution.y > 0);

        Camera { eye, resolution }
    }
}

impl Camera {
    pub fn get_resolution(&self) -> ScreenSize {
        self.resolution
    }

    pub fn eye(&self) -> WorldPoint {
        self.eye
    }

    /// Ray through a (possibly fractional) position on the image plane.
    /// Y grows upwards here, the flip to image rows happens when writing pixels.
    pub fn ray_through(&self, x: FloatType, y: FloatType) -> Ray {
        let width = self.resolution.x as FloatType;
        let height = self.resolution.y as FloatType;
        let direction = WorldVector::new(x - width * 0.5, y - height * 0.5, width).normalize();

        Ray::new(self.eye, direction)
    }

    /// Ray for one sub-sample of a regular `samples_per_axis`² grid inside a pixel.
    /// Sub-sample (0, 0) is the pixel corner.
    pub fn sample_ray(
        &self,
        point: &ScreenPoint,
        sample: (u32, u32),
        samples_per_axis: NonZeroU32,
    ) -> Ray {
        let n = samples_per_axis.get() as FloatType;
        self.ray_through(
            point.x as FloatType + sample.0 as FloatType / n,
            point.y as FloatType + sample.1 as FloatType / n,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    fn camera(width: u32, height: u32) -> Camera {
        Camera::builder()
            .eye(WorldPoint::new(0.0, 0.0, -4.0))
            .resolution(ScreenSize::new(width, height))
            .build()
    }

    #[test]
    fn center_looks_forward() {
        let ray = camera(800, 600).ray_through(400.0, 300.0);
        assert!(ray.origin == WorldPoint::new(0.0, 0.0, -4.0));
        assert!(ray.direction == WorldVector::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn directions_are_normalized() {
        let camera = camera(800, 600);
        for (x, y) in [(0.0, 0.0), (799.0, 0.0), (123.5, 456.25), (799.0, 599.0)] {
            let ray = camera.ray_through(x, y);
            assert!((ray.direction.norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn depth_scales_with_width() {
        // Edge of a square image is at 45 degrees
        let ray = camera(100, 100).ray_through(0.0, 50.0);
        let expected = WorldVector::new(-1.0, 0.0, 2.0).normalize();
        assert!((ray.direction - expected).norm() < 1e-6);
    }

    #[test]
    fn left_right_up_down() {
        let camera = camera(800, 600);
        let center = camera.ray_through(400.0, 300.0);
        let left = camera.ray_through(0.0, 300.0);
        let right = camera.ray_through(799.0, 300.0);
        let low = camera.ray_through(400.0, 0.0);
        let high = camera.ray_through(400.0, 599.0);

        assert!(left.direction.x < center.direction.x);
        assert!(right.direction.x > center.direction.x);
        assert!(low.direction.y < center.direction.y);
        assert!(high.direction.y > center.direction.y);
    }

    #[test]
    fn sub_samples_are_spread_over_the_pixel() {
        let camera = camera(16, 16);
        let samples = NonZeroU32::new(4).unwrap();
        let point = ScreenPoint::new(3, 5);

        assert!(camera.sample_ray(&point, (0, 0), samples) == camera.ray_through(3.0, 5.0));
        assert!(camera.sample_ray(&point, (2, 1), samples) == camera.ray_through(3.5, 5.25));
        assert!(camera.sample_ray(&point, (3, 3), samples) == camera.ray_through(3.75, 5.75));
    }

    #[test]
    #[should_panic]
    fn zero_resolution() {
        camera(0, 10);
    }
}
