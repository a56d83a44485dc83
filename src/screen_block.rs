use std::iter::FusedIterator;

use assert2::assert;

use crate::geometry::{ScreenBlock, ScreenPoint, ScreenSize};

pub trait ScreenBlockExt {
    fn internal_points(&self) -> InternalPoints;
    fn scan_tiles(&self, tile_size: ScreenSize) -> ScanTiles;
    fn flipped_vertically(&self, height: u32) -> ScreenBlock;
}

impl ScreenBlockExt for ScreenBlock {
    /// Create an iterator over coordinates (x, y) pairs inside the block,
    /// in C order (x changes first, then y)
    fn internal_points(&self) -> InternalPoints {
        if self.is_empty() {
            InternalPoints::empty()
        } else {
            InternalPoints {
                min_x: self.min.x,
                max: self.max,

                cursor: self.min,
            }
        }
    }

    /// Create an iterator over tiles covering the block, in row-major scan order.
    /// Tiles are tile_size large, except on the bottom and right side of the block,
    /// where they are clipped if tile size doesn't evenly divide block size.
    /// Tile size must be non zero.
    fn scan_tiles(&self, tile_size: ScreenSize) -> ScanTiles {
        assert!(tile_size.x > 0);
        assert!(tile_size.y > 0);

        if self.is_empty() {
            return ScanTiles::empty();
        }

        let columns = self.width().div_ceil(tile_size.x);
        let rows = self.height().div_ceil(tile_size.y);

        ScanTiles {
            block: *self,
            tile_size,
            cursor: self.min,
            remaining: columns as usize * rows as usize,
        }
    }

    /// Mirrors the block vertically inside an image of the given height.
    fn flipped_vertically(&self, height: u32) -> ScreenBlock {
        debug_assert!(self.max.y <= height);
        ScreenBlock::new(
            ScreenPoint::new(self.min.x, height - self.max.y),
            ScreenPoint::new(self.max.x, height - self.min.y),
        )
    }
}

#[derive(Copy, Clone, Debug)]
pub struct InternalPoints {
    min_x: u32,
    max: ScreenPoint,

    cursor: ScreenPoint,
}

impl InternalPoints {
    // Construct an iterator over internal points that returns no points
    fn empty() -> Self {
        InternalPoints {
            min_x: 0,
            max: ScreenPoint::origin(),

            cursor: ScreenPoint::origin(),
        }
    }
}

impl Iterator for InternalPoints {
    type Item = ScreenPoint;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.y >= self.max.y {
            return None;
        }

        let ret = self.cursor;

        debug_assert!(self.cursor.x < self.max.x);
        self.cursor.x += 1;
        if self.cursor.x >= self.max.x {
            self.cursor.x = self.min_x;
            self.cursor.y += 1;
        }

        Some(ret)
    }
}

impl ExactSizeIterator for InternalPoints {
    fn len(&self) -> usize {
        if self.cursor.y >= self.max.y {
            0
        } else {
            let whole_rows =
                ScreenBlock::new(ScreenPoint::new(self.min_x, self.cursor.y + 1), self.max);
            let current_row = ScreenBlock::new(
                self.cursor,
                ScreenPoint::new(self.max.x, self.cursor.y + 1),
            );
            (whole_rows.area() + current_row.area()) as usize
        }
    }
}

impl FusedIterator for InternalPoints {}

/// Iterator over tiles of a block, all tiles of a row before the next row.
#[derive(Copy, Clone, Debug)]
pub struct ScanTiles {
    block: ScreenBlock,
    tile_size: ScreenSize,
    cursor: ScreenPoint,
    remaining: usize,
}

impl ScanTiles {
    fn empty() -> ScanTiles {
        ScanTiles {
            block: ScreenBlock::new(ScreenPoint::origin(), ScreenPoint::origin()),
            tile_size: ScreenSize::new(1, 1),
            cursor: ScreenPoint::origin(),
            remaining: 0,
        }
    }
}

impl Iterator for ScanTiles {
    type Item = ScreenBlock;

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let max = ScreenPoint::new(
            self.cursor.x.saturating_add(self.tile_size.x).min(self.block.max.x),
            self.cursor.y.saturating_add(self.tile_size.y).min(self.block.max.y),
        );
        let tile = ScreenBlock::new(self.cursor, max);

        self.cursor.x = max.x;
        if self.cursor.x >= self.block.max.x {
            self.cursor.x = self.block.min.x;
            self.cursor.y = max.y;
        }

        Some(tile)
    }
}

impl ExactSizeIterator for ScanTiles {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl FusedIterator for ScanTiles {}
