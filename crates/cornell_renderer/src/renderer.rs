//! Pixel driver.
//!
//! Traces `samples_per_pixel` camera rays per pixel through the estimator and
//! stores the summed radiance. Rows are independent and render in parallel
//! with rayon; every pixel seeds its own generator, so the image does not
//! depend on scheduling.

use crate::{camera::Camera, error::ConfigError, integrator::ray_color, Color, Scene, SceneKind};
use cornell_math::sampling::gen_f32;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Largest image `render` will allocate.
pub const MAX_PIXELS: u64 = 1 << 28;

/// Render configuration.
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Built-in scene to render
    pub scene: SceneKind,
    pub image_width: u32,
    /// Width over height
    pub aspect_ratio: f32,
    /// Estimates accumulated per pixel
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed for every pixel generator
    pub seed: u64,
    /// Render rows on the rayon pool
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::CornellBox,
            image_width: 600,
            aspect_ratio: 1.0,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
            parallel: true,
        }
    }
}

impl RenderConfig {
    /// Image height implied by the width and aspect ratio, at least 1.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f32 / self.aspect_ratio) as u32).max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::InvalidAspectRatio(self.aspect_ratio));
        }
        let height = self.image_height();
        if self.image_width as u64 * height as u64 > MAX_PIXELS {
            return Err(ConfigError::TooManyPixels {
                width: self.image_width,
                height,
                max: MAX_PIXELS,
            });
        }
        Ok(())
    }
}

/// Accumulated radiance sums, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Number of estimates summed into every pixel
    pub samples_per_pixel: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y), y counted from the top.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y), y counted from the top.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }
}

/// Seed for the generator of pixel `index`, spread so neighbouring pixels do
/// not get correlated streams.
fn pixel_seed(seed: u64, index: u64) -> u64 {
    seed.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Per-render state shared by every row.
struct Frame<'a> {
    scene: &'a Scene,
    camera: Camera,
    config: &'a RenderConfig,
    width: u32,
    height: u32,
}

impl Frame<'_> {
    fn render_row(&self, row: u32) -> Vec<Color> {
        let j = self.height - 1 - row;
        let row_colors = (0..self.width)
            .map(|i| {
                let index = row as u64 * self.width as u64 + i as u64;
                let mut rng = StdRng::seed_from_u64(pixel_seed(self.config.seed, index));
                render_pixel(self.scene, &self.camera, self.config, (self.width, self.height), (i, j), &mut rng)
            })
            .collect();
        log::debug!("Row {} of {} done", row + 1, self.height);
        row_colors
    }
}

/// Sum of `samples_per_pixel` radiance estimates for pixel `(i, j)`, with `j`
/// counted from the bottom of the image.
pub fn render_pixel(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    (width, height): (u32, u32),
    (i, j): (u32, u32),
    rng: &mut dyn RngCore,
) -> Color {
    // Single-pixel axes sample their whole extent.
    let s_scale = width.saturating_sub(1).max(1) as f32;
    let t_scale = height.saturating_sub(1).max(1) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (i as f32 + gen_f32(rng)) / s_scale;
        let t = (j as f32 + gen_f32(rng)) / t_scale;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, scene, config.max_depth, rng);
    }
    pixel_color
}

/// Render the scene to an image buffer of summed radiance.
///
/// The scene's camera is re-aimed at the configured aspect ratio; the scene
/// itself is only read.
pub fn render(scene: &Scene, config: &RenderConfig) -> Result<ImageBuffer, ConfigError> {
    config.validate()?;

    let mut camera = scene.camera.clone().with_aspect_ratio(config.aspect_ratio);
    camera.initialize()?;
    let frame = Frame {
        scene,
        camera,
        config,
        width: config.image_width,
        height: config.image_height(),
    };
    let (width, height) = (frame.width, frame.height);

    log::info!(
        "Rendering {}x{} at {} spp, depth {} ({})",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        if config.parallel { "parallel" } else { "sequential" }
    );
    let start = Instant::now();

    let rows: Vec<Vec<Color>> = if config.parallel {
        (0..height)
            .into_par_iter()
            .map(|row| frame.render_row(row))
            .collect()
    } else {
        (0..height).map(|row| frame.render_row(row)).collect()
    };

    let image = ImageBuffer {
        width,
        height,
        samples_per_pixel: config.samples_per_pixel,
        pixels: rows.into_iter().flatten().collect(),
    };

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hittable::{Hittable, HittableList},
        light::RectLight,
        rect::AxisRect,
        sphere::Sphere,
        DiffuseLight, Lambertian, SceneError,
    };
    use cornell_math::Vec3;
    use std::sync::Arc;

    /// A grey sphere under a small light, viewed from the front.
    fn small_scene() -> Scene {
        let grey = Arc::new(Lambertian::new(Color::splat(0.5)).into());
        let emit = Arc::new(DiffuseLight::new(Color::splat(4.0)).into());
        let light_rect = AxisRect::xz(-1.0, 1.0, -1.0, 1.0, 3.0, emit).unwrap();
        let light = RectLight::from_rect(&light_rect);

        let mut objects = HittableList::new();
        objects.add(Hittable::from(light_rect).flip_face());
        objects.add(Sphere::new(Vec3::ZERO, 1.0, grey).unwrap());

        let mut camera = Camera::new()
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 0.0, 5.0);
        camera.initialize().unwrap();

        Scene {
            world: Hittable::Bvh(objects.into_bvh().unwrap()),
            light: Some(light),
            background: Color::new(0.1, 0.1, 0.1),
            camera,
        }
    }

    fn small_config() -> RenderConfig {
        RenderConfig {
            image_width: 12,
            aspect_ratio: 1.5,
            samples_per_pixel: 3,
            max_depth: 4,
            seed: 11,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.image_width, 600);
        assert_eq!(config.image_height(), 600);
        assert_eq!(config.samples_per_pixel, 100);
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.seed, 0);
        assert!(config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{ "scene": "cornell-smoke", "image_width": 200, "seed": 7 }"#;
        let config: RenderConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.scene, SceneKind::CornellSmoke);
        assert_eq!(config.image_width, 200);
        assert_eq!(config.seed, 7);
        assert_eq!(config.samples_per_pixel, 100);
        assert!(config.parallel);
    }

    #[test]
    fn test_config_validation() {
        let zero_width = RenderConfig { image_width: 0, ..RenderConfig::default() };
        assert_eq!(zero_width.validate(), Err(ConfigError::ZeroWidth));

        let zero_samples = RenderConfig { samples_per_pixel: 0, ..RenderConfig::default() };
        assert_eq!(zero_samples.validate(), Err(ConfigError::ZeroSamples));

        let flat = RenderConfig { aspect_ratio: 0.0, ..RenderConfig::default() };
        assert!(matches!(flat.validate(), Err(ConfigError::InvalidAspectRatio(_))));

        let nan = RenderConfig { aspect_ratio: f32::NAN, ..RenderConfig::default() };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_oversized_image_rejected() {
        // 70000 x 70000 wraps a u32 pixel count.
        let wide = RenderConfig { image_width: 70_000, ..RenderConfig::default() };
        assert!(matches!(wide.validate(), Err(ConfigError::TooManyPixels { width: 70_000, .. })));

        let tall = RenderConfig { image_width: 600, aspect_ratio: 1e-5, ..RenderConfig::default() };
        assert!(matches!(tall.validate(), Err(ConfigError::TooManyPixels { width: 600, .. })));

        let square = RenderConfig { image_width: 1 << 14, ..RenderConfig::default() };
        assert!(square.validate().is_ok());
    }

    #[test]
    fn test_image_height_from_aspect() {
        let config = RenderConfig { image_width: 400, aspect_ratio: 16.0 / 9.0, ..RenderConfig::default() };
        assert_eq!(config.image_height(), 225);

        let sliver = RenderConfig { image_width: 1, aspect_ratio: 10.0, ..RenderConfig::default() };
        assert_eq!(sliver.image_height(), 1);
    }

    #[test]
    fn test_render_rejects_invalid_config() {
        let scene = small_scene();
        let config = RenderConfig { samples_per_pixel: 0, ..small_config() };
        assert_eq!(render(&scene, &config), Err(ConfigError::ZeroSamples));
    }

    #[test]
    fn test_render_rejects_degenerate_camera() {
        let mut scene = small_scene();
        let eye = Vec3::new(0.0, 0.0, 5.0);
        scene.camera = Camera::new().with_position(eye, eye, Vec3::Y);

        let result = render(&scene, &small_config());
        assert!(matches!(result, Err(ConfigError::Camera(SceneError::DegenerateCamera(_)))));
    }

    #[test]
    fn test_render_dimensions_and_sample_count() {
        let scene = small_scene();
        let config = small_config();
        let image = render(&scene, &config).unwrap();

        assert_eq!(image.width, 12);
        assert_eq!(image.height, 8);
        assert_eq!(image.samples_per_pixel, 3);
        assert_eq!(image.pixels.len(), 96);
        assert!(image.pixels.iter().all(|c| c.cmpge(Color::ZERO).all()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let scene = small_scene();
        let parallel = render(&scene, &small_config()).unwrap();
        let sequential = render(&scene, &RenderConfig { parallel: false, ..small_config() }).unwrap();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_seed_changes_image() {
        let scene = small_scene();
        let a = render(&scene, &small_config()).unwrap();
        let b = render(&scene, &RenderConfig { seed: 12, ..small_config() }).unwrap();

        assert_ne!(a.pixels, b.pixels);
    }

    #[test]
    fn test_corner_pixels_see_background() {
        // The sphere is centered and the light sits above the view, so the
        // bottom corners only see the background.
        let scene = small_scene();
        let config = small_config();
        let image = render(&scene, &config).unwrap();

        let expected = scene.background * config.samples_per_pixel as f32;
        let corner = image.get(0, image.height - 1);
        assert!((corner - expected).length() < 1e-5);
    }

    #[test]
    fn test_image_buffer_get_set() {
        let mut image = ImageBuffer::new(4, 3, 1);
        image.set(3, 2, Color::ONE);

        assert_eq!(image.get(3, 2), Color::ONE);
        assert_eq!(image.pixels[11], Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);
    }
}
