mod stats;

pub use stats::Stats;

use crate::geometry::FloatType;

/// Linear color, components nominally in 0-1.
pub type Color = rgb::RGB<FloatType>;
