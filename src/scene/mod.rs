pub mod primitives;
mod pyramid;
mod statistics;

use nalgebra::Unit;

use crate::geometry::{Ray, WorldVector};

pub use primitives::{Geometry, Group, Hit, Sphere};
pub use pyramid::sphere_pyramid;

/// Renderable object
pub trait Object {
    /// Intersects the ray with the object, overwriting `hit` only if this object
    /// is hit strictly closer than `hit.distance`.
    fn intersect(&self, ray: &Ray, hit: &mut Hit);

    /// Nearest hit of the ray, or a miss.
    fn first_hit(&self, ray: &Ray) -> Hit {
        let mut hit = Hit::missed();
        self.intersect(ray, &mut hit);
        hit
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene<O: Object = Geometry> {
    /// Direction the light travels in (pointing away from the light source).
    pub light: Unit<WorldVector>,
    pub object: O,
}

impl<O: Object> Scene<O> {
    pub fn new(light: Unit<WorldVector>, object: O) -> Self {
        Scene { light, object }
    }
}
