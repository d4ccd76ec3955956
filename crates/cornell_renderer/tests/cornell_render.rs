//! End-to-end renders of the built-in scenes at preview quality.

use cornell_renderer::{render, write_ppm, RenderConfig, Scene, SceneKind};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn preview(scene: SceneKind) -> RenderConfig {
    RenderConfig {
        scene,
        image_width: 24,
        aspect_ratio: 1.0,
        samples_per_pixel: 4,
        max_depth: 5,
        seed: 2024,
        parallel: true,
    }
}

fn render_ppm(scene: &Scene, config: &RenderConfig) -> Vec<u8> {
    let image = render(scene, config).unwrap();
    let mut out = Vec::new();
    write_ppm(&mut out, &image).unwrap();
    out
}

#[test]
fn cornell_box_renders_identically_twice() {
    init_logging();
    let config = preview(SceneKind::CornellBox);
    let scene = Scene::build(config.scene).unwrap();

    let first = render_ppm(&scene, &config);
    let second = render_ppm(&scene, &config);

    assert_eq!(first, second);
}

#[test]
fn cornell_box_parallel_matches_sequential() {
    init_logging();
    let config = preview(SceneKind::CornellBox);
    let scene = Scene::build(config.scene).unwrap();

    let parallel = render_ppm(&scene, &config);
    let sequential = render_ppm(&scene, &RenderConfig { parallel: false, ..config });

    assert_eq!(parallel, sequential);
}

#[test]
fn cornell_box_image_is_lit() {
    init_logging();
    let config = preview(SceneKind::CornellBox);
    let scene = Scene::build(config.scene).unwrap();
    let image = render(&scene, &config).unwrap();

    assert_eq!(image.pixels.len(), 24 * 24);
    assert!(image.pixels.iter().all(|c| !c.is_nan()));

    let rgb = image.to_rgb8();
    assert_eq!(rgb.len(), 24 * 24 * 3);
    assert!(rgb.iter().any(|&b| b > 0));

    let text = String::from_utf8(render_ppm(&scene, &config)).unwrap();
    assert!(text.starts_with("P3\n24 24\n255\n"));
    assert_eq!(text.lines().count(), 3 + 24 * 24);
}

#[test]
fn cornell_box_left_wall_is_green_and_right_wall_is_red() {
    init_logging();
    let config = RenderConfig {
        image_width: 32,
        samples_per_pixel: 16,
        ..preview(SceneKind::CornellBox)
    };
    let scene = Scene::build(config.scene).unwrap();
    let image = render(&scene, &config).unwrap();

    // Sum a band of columns near each edge, halfway up the image.
    let band = |columns: std::ops::Range<u32>| {
        let mut sum = cornell_renderer::Color::ZERO;
        for y in 12..20 {
            for x in columns.clone() {
                sum += image.get(x, y);
            }
        }
        sum
    };
    let left = band(0..3);
    let right = band(29..32);

    // The camera faces +z, so the x = 555 wall is on the left of the image.
    assert!(left.y > left.x, "left wall {:?}", left);
    assert!(right.x > right.y, "right wall {:?}", right);
}

#[test]
fn cornell_smoke_renders() {
    init_logging();
    let config = preview(SceneKind::CornellSmoke);
    let scene = Scene::build(config.scene).unwrap();
    let image = render(&scene, &config).unwrap();

    assert_eq!(image.pixels.len(), 24 * 24);
    assert!(image.to_rgb8().iter().any(|&b| b > 0));
}
