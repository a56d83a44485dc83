use std::num::NonZeroU32;

use itertools::iproduct;

use crate::{
    config::SceneSettings,
    geometry::{FloatType, WorldPoint, WorldVector},
};

use super::{Geometry, Group, Scene, Sphere};

const CHILD_SIDES: [FloatType; 2] = [-1.0, 1.0];

/// Builds a pyramid of spheres `level` levels deep.
///
/// Every level above the first is a group of the sphere itself and four half-sized
/// sub-pyramids sitting above it, bounded by a sphere three times the radius.
pub fn sphere_pyramid(level: NonZeroU32, center: WorldPoint, radius: FloatType) -> Geometry {
    let sphere = Sphere::new(center, radius);

    let Some(child_level) = NonZeroU32::new(level.get() - 1) else {
        return sphere.into();
    };

    let child_offset = 3.0 * radius / FloatType::sqrt(12.0);

    let children = std::iter::once(sphere.into())
        .chain(iproduct!(CHILD_SIDES, CHILD_SIDES).map(|(dz, dx)| {
            let child_center = center + WorldVector::new(dx, 1.0, dz) * child_offset;
            sphere_pyramid(child_level, child_center, radius * 0.5)
        }))
        .collect();

    Group::new(Sphere::new(center, 3.0 * radius), children).into()
}

impl Scene {
    pub fn sphere_pyramid(settings: &SceneSettings) -> Scene {
        Scene::new(
            settings.light,
            sphere_pyramid(settings.level, settings.center, settings.radius),
        )
    }
}
