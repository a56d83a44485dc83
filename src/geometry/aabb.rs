use std::ops::{Mul, Sub};

use nalgebra::{ClosedAddAssign, Point2, Scalar, Vector2};
use num_traits::Zero;

/// Axis aligned box, `min` inclusive and `max` exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }
}

impl<T: Scalar + Copy + ClosedAddAssign> AABB<Point2<T>> {
    pub fn with_size(min: Point2<T>, size: &Vector2<T>) -> AABB<Point2<T>> {
        let max = min + *size;
        AABB { min, max }
    }
}

impl<T> AABB<Point2<T>>
where
    T: Scalar + Copy + PartialOrd + Zero + Sub<Output = T> + Mul<Output = T>,
{
    /// Box is empty when it has zero width or height (or when min and max are swapped).
    pub fn is_empty(&self) -> bool {
        !(self.min.x < self.max.x && self.min.y < self.max.y)
    }

    pub fn width(&self) -> T {
        if self.is_empty() {
            T::zero()
        } else {
            self.max.x - self.min.x
        }
    }

    pub fn height(&self) -> T {
        if self.is_empty() {
            T::zero()
        } else {
            self.max.y - self.min.y
        }
    }

    pub fn size(&self) -> Vector2<T> {
        Vector2::new(self.width(), self.height())
    }

    pub fn area(&self) -> T {
        self.width() * self.height()
    }

    pub fn contains(&self, point: &Point2<T>) -> bool {
        self.min.x <= point.x && point.x < self.max.x && self.min.y <= point.y && point.y < self.max.y
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;
    use test_case::test_case;

    #[test_case(0, 0, 4, 3, false ; "regular")]
    #[test_case(2, 2, 2, 5, true ; "zero width")]
    #[test_case(2, 2, 5, 2, true ; "zero height")]
    #[test_case(5, 5, 2, 7, true ; "swapped")]
    fn emptiness(l: u32, t: u32, r: u32, b: u32, expected: bool) {
        let block = AABB::new(Point2::new(l, t), Point2::new(r, b));
        assert!(block.is_empty() == expected);
    }

    #[test]
    fn size_of_empty_block_is_zero() {
        let block = AABB::new(Point2::new(5u32, 5), Point2::new(2, 7));
        assert!(block.width() == 0);
        assert!(block.height() == 0);
        assert!(block.area() == 0);
    }

    #[test]
    fn with_size() {
        let block = AABB::with_size(Point2::new(16u32, 32), &Vector2::new(16, 8));
        assert!(block.max == Point2::new(32, 40));
        assert!(block.size() == Vector2::new(16, 8));
        assert!(block.area() == 128);
    }

    #[test]
    fn contains_is_half_open() {
        let block = AABB::new(Point2::new(0u32, 0), Point2::new(2, 2));
        assert!(block.contains(&Point2::new(0, 0)));
        assert!(block.contains(&Point2::new(1, 1)));
        assert!(!block.contains(&Point2::new(2, 1)));
        assert!(!block.contains(&Point2::new(1, 2)));
    }
}
