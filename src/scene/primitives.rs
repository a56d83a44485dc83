use crate::geometry::{FloatType, Ray, WorldPoint, WorldVector};

use super::Object;

/// Nearest intersection found so far.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    /// Distance along the ray, infinity while nothing was hit.
    pub distance: FloatType,
    /// Unit surface normal at the hit point.
    pub normal: WorldVector,
}

impl Hit {
    pub fn missed() -> Hit {
        Hit {
            distance: FloatType::INFINITY,
            normal: WorldVector::zeros(),
        }
    }

    pub fn is_miss(&self) -> bool {
        self.distance == FloatType::INFINITY
    }
}

impl Default for Hit {
    fn default() -> Self {
        Hit::missed()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: WorldPoint,
    pub radius: FloatType,
}

impl Sphere {
    pub fn new(center: WorldPoint, radius: FloatType) -> Sphere {
        Sphere { center, radius }
    }

    /// Distance along the ray to the sphere surface, infinity if the ray misses.
    ///
    /// Returns the near root if it lies in front of the ray origin, otherwise the far one.
    /// For a ray starting inside the sphere that is the exit point.
    /// The ray direction must be normalized for the result to be a distance.
    pub fn ray_distance(&self, ray: &Ray) -> FloatType {
        let v = self.center - ray.origin;
        let b = v.dot(&ray.direction);
        let discriminant = b * b - v.dot(&v) + self.radius * self.radius;

        if discriminant < 0.0 {
            return FloatType::INFINITY;
        }

        let d = discriminant.sqrt();
        let t2 = b + d;
        if t2 < 0.0 {
            return FloatType::INFINITY;
        }

        let t1 = b - d;
        if t1 > 0.0 { t1 } else { t2 }
    }
}

impl Object for Sphere {
    fn intersect(&self, ray: &Ray, hit: &mut Hit) {
        let distance = self.ray_distance(ray);
        if distance >= hit.distance {
            return;
        }

        hit.distance = distance;
        hit.normal = (ray.point_at(distance) - self.center).normalize();
    }
}

/// Children enclosed in a bounding sphere.
/// The bound is never checked against the children, the caller has to make sure it
/// encloses all of them.
#[derive(Clone, Debug, PartialEq)]
pub struct Group<C = Geometry> {
    pub bound: Sphere,
    pub children: Vec<C>,
}

impl<C> Group<C> {
    pub fn new(bound: Sphere, children: Vec<C>) -> Self {
        Group { bound, children }
    }
}

impl<C: Object> Object for Group<C> {
    fn intersect(&self, ray: &Ray, hit: &mut Hit) {
        if self.bound.ray_distance(ray) >= hit.distance {
            return;
        }

        for child in &self.children {
            child.intersect(ray, hit);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Sphere(Sphere),
    Group(Group),
}

impl Object for Geometry {
    #[inline]
    fn intersect(&self, ray: &Ray, hit: &mut Hit) {
        match self {
            Geometry::Sphere(sphere) => sphere.intersect(ray, hit),
            Geometry::Group(group) => group.intersect(ray, hit),
        }
    }
}

impl From<Sphere> for Geometry {
    fn from(value: Sphere) -> Self {
        Geometry::Sphere(value)
    }
}

impl From<Group> for Geometry {
    fn from(value: Group) -> Self {
        Geometry::Group(value)
    }
}
