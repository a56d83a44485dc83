use assert2::{assert, let_assert};
use image::Rgba;
use nalgebra::Unit;
use sphere_pyramid::{
    AMBIENT_COLOR, Framebuffer, RenderConfig, Scene, color_to_pixel,
    geometry::{Ray, ScreenPoint, WorldPoint, WorldVector},
    render, render_sequential,
    scene::{Geometry, Group, Sphere},
    trace,
};
use test_case::test_case;

const BACKGROUND: Rgba<u8> = Rgba([26, 26, 26, 255]);

fn render_parallel(config: &RenderConfig) -> Framebuffer {
    let progress = render(
        config.build_scene(),
        config.camera(),
        config.render,
        |_| {},
        |_, _| {},
    )
    .unwrap();
    let_assert!(Ok(framebuffer) = progress.wait());
    framebuffer
}

#[test]
fn two_by_two_single_sphere() {
    let_assert!(
        Ok(config) = RenderConfig::builder()
            .width(2)
            .height(2)
            .level(1)
            .workers(2)
            .build()
    );
    let framebuffer = render_parallel(&config);

    assert!(framebuffer.as_raw().len() == 2 * 2 * 4);
    // Left column looks past the sphere
    assert!(framebuffer.pixel(ScreenPoint::new(0, 0)) == BACKGROUND);
    assert!(framebuffer.pixel(ScreenPoint::new(0, 1)) == BACKGROUND);
    // Bottom right looks down at the sphere
    assert!(framebuffer.pixel(ScreenPoint::new(1, 1)) != BACKGROUND);
    assert!(framebuffer.as_raw().chunks(4).all(|pixel| pixel[3] == 255));
}

#[test]
fn image_is_not_upside_down() {
    let_assert!(Ok(config) = RenderConfig::builder().width(8).height(8).level(1).build());
    let framebuffer = render_parallel(&config);

    // The sphere is below the eye, so it shows in the bottom of the image
    for x in 0..8 {
        assert!(framebuffer.pixel(ScreenPoint::new(x, 0)) == BACKGROUND);
    }
    assert!(framebuffer.pixel(ScreenPoint::new(4, 7)) != BACKGROUND);
}

#[test]
fn occluded_point_is_ambient() {
    let light = Unit::new_normalize(WorldVector::new(0.0, -1.0, 0.0));
    let target = Sphere::new(WorldPoint::origin(), 1.0);
    let occluder = Sphere::new(WorldPoint::new(0.0, 3.0, -0.866), 1.0);
    let ray = Ray::new(WorldPoint::new(0.0, 0.5, -5.0), WorldVector::new(0.0, 0.0, 1.0));

    let lit: Scene = Scene::new(light, target.into());
    assert!(color_to_pixel(trace(&lit, &ray)) == Rgba([51, 166, 51, 255]));

    let shadowed: Scene = Scene::new(
        light,
        Geometry::Group(Group::new(
            Sphere::new(WorldPoint::origin(), 10.0),
            vec![target.into(), occluder.into()],
        )),
    );
    assert!(trace(&shadowed, &ray) == AMBIENT_COLOR);
    assert!(color_to_pixel(trace(&shadowed, &ray)) == Rgba([51, 77, 51, 255]));
}

#[test_case(1 ; "one worker")]
#[test_case(2 ; "two workers")]
#[test_case(7 ; "seven workers")]
fn parallel_render_is_deterministic(workers: usize) {
    let_assert!(
        Ok(config) = RenderConfig::builder()
            .width(37)
            .height(23)
            .level(4)
            .samples_per_axis(2)
            .tile_width(8)
            .tile_height(6)
            .workers(workers)
            .build()
    );

    let sequential = render_sequential(&config.build_scene(), &config.camera(), &config.render);
    let parallel = render_parallel(&config);

    assert!(parallel == sequential);
    assert!(parallel.as_raw().chunks(4).any(|pixel| pixel != BACKGROUND.0));
}

#[test_case(1, 1)]
#[test_case(4, 3)]
#[test_case(5, 64)]
#[test_case(64, 64)]
fn tile_size_does_not_change_the_image(tile_width: u32, tile_height: u32) {
    let base = || RenderConfig::builder().width(21).height(13).level(3).workers(3);

    let_assert!(Ok(reference) = base().build());
    let_assert!(
        Ok(tiled) = base()
            .tile_width(tile_width)
            .tile_height(tile_height)
            .build()
    );

    assert!(render_parallel(&tiled) == render_parallel(&reference));
}

#[test]
fn tile_larger_than_the_image() {
    let_assert!(
        Ok(config) = RenderConfig::builder()
            .width(2)
            .height(2)
            .level(1)
            .tile_width(u32::MAX)
            .tile_height(u32::MAX)
            .workers(2)
            .build()
    );

    let framebuffer = render_parallel(&config);
    let sequential = render_sequential(&config.build_scene(), &config.camera(), &config.render);
    assert!(framebuffer == sequential);
    assert!(framebuffer.pixel(ScreenPoint::new(0, 0)) == BACKGROUND);
    assert!(framebuffer.pixel(ScreenPoint::new(1, 1)) != BACKGROUND);
}
