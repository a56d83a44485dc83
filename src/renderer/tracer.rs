use crate::{
    geometry::{FloatType, Ray},
    scene::{Object, Scene},
    util::Color,
};

pub const BACKGROUND_COLOR: Color = Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
};
pub const AMBIENT_COLOR: Color = Color {
    r: 0.2,
    g: 0.3,
    b: 0.2,
};
pub const DIFFUSE_COLOR: Color = Color {
    r: 0.0,
    g: 0.7,
    b: 0.0,
};

/// Offset of shadow ray origins along the surface normal, keeps them off the surface they start on.
fn shadow_bias() -> FloatType {
    FloatType::EPSILON.sqrt()
}

/// Color seen along a primary ray. Single bounce, one directional light, hard shadows.
pub fn trace<O: Object>(scene: &Scene<O>, ray: &Ray) -> Color {
    let hit = scene.object.first_hit(ray);
    if hit.is_miss() {
        return BACKGROUND_COLOR;
    }

    let light = scene.light.into_inner();
    let gradient = hit.normal.dot(&light);
    if gradient >= 0.0 {
        // Facing away from the light
        return AMBIENT_COLOR;
    }

    let shadow_origin = ray.point_at(hit.distance) + hit.normal * shadow_bias();
    let shadow_ray = Ray::new(shadow_origin, -light);
    if !scene.object.first_hit(&shadow_ray).is_miss() {
        return AMBIENT_COLOR;
    }

    AMBIENT_COLOR + DIFFUSE_COLOR * -gradient
}
