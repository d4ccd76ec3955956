//! Recursive radiance estimators.
//!
//! Both estimators are pure functions of the ray, the read-only scene and
//! the caller's random generator, so independent samples can run on any
//! thread without coordination.

use crate::{
    hittable::Hittable,
    light::LightSampler,
    material::{Lobe, ScatterRecord},
    Color, Ray, Scene,
};
use cornell_math::{Interval, Vec3};
use rand::RngCore;

/// Lower bound of every scene query. Keeps a ray from re-hitting the
/// surface it just left because of floating point error (shadow acne).
pub const T_MIN: f32 = 0.001;

/// Light cosines below this are treated as viewing the light edge-on.
pub const LIGHT_COSINE_EPSILON: f32 = 0.000001;

/// Material pdfs below this are treated as zero-probability directions.
const PDF_EPSILON: f32 = 1e-8;

/// Radiance along `ray`, using the scene's light sampler when it has one
/// and the material's own sampling otherwise.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, rng: &mut dyn RngCore) -> Color {
    match &scene.light {
        Some(light) => estimate(ray, scene.background, &scene.world, light, depth, rng),
        None => estimate_material_sampled(ray, scene.background, &scene.world, depth, rng),
    }
}

/// Solid-angle density of sampling a point on an area light, or `None` when
/// the light is seen edge-on and the density would blow up.
///
/// `direction` must be unit length and point from the shading point to the
/// sampled point on the light.
pub fn light_pdf(
    direction: Vec3,
    distance_squared: f32,
    light_normal: Vec3,
    light_area: f32,
) -> Option<f32> {
    let light_cosine = direction.dot(light_normal).abs();
    if light_cosine < LIGHT_COSINE_EPSILON {
        return None;
    }
    Some(distance_squared / (light_cosine * light_area))
}

/// Light-sampling estimator.
///
/// Diffuse bounces are aimed at a uniformly sampled point on `light` and
/// weighted by the material's scattering density over the light's
/// solid-angle density. Specular bounces follow the material's own ray.
pub fn estimate(
    ray: &Ray,
    background: Color,
    world: &Hittable,
    light: &dyn LightSampler,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded the ray bounce limit, no more light is gathered.
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY), rng) else {
        return background;
    };

    let emitted = rec.material.emitted(ray, &rec);
    let Some(scatter) = rec.material.scatter(ray, &rec, rng) else {
        return emitted;
    };

    if scatter.lobe == Lobe::Specular {
        return emitted
            + scatter.attenuation * estimate(&scatter.scattered, background, world, light, depth - 1, rng);
    }

    let on_light = light.sample_point(rng);
    let to_light = on_light - rec.p;
    let distance_squared = to_light.length_squared();
    let to_light = to_light.normalize();

    // Surfaces only reflect into the hemisphere around their normal. Inside
    // a medium every direction is valid.
    if scatter.lobe == Lobe::Hemisphere && to_light.dot(rec.normal) < 0.0 {
        return emitted;
    }

    let Some(pdf) = light_pdf(to_light, distance_squared, light.normal(), light.area()) else {
        return emitted;
    };

    let scattered = Ray::new(rec.p, to_light, ray.time());
    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);

    emitted
        + scatter.attenuation
            * scattering_pdf
            * estimate(&scattered, background, world, light, depth - 1, rng)
            / pdf
}

/// Material-sampling estimator.
///
/// Follows the direction the material sampled and divides by its density.
/// Converges slowly for small bright lights; used for scenes without a
/// light sampler.
pub fn estimate_material_sampled(
    ray: &Ray,
    background: Color,
    world: &Hittable,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY), rng) else {
        return background;
    };

    let emitted = rec.material.emitted(ray, &rec);
    let Some(scatter) = rec.material.scatter(ray, &rec, rng) else {
        return emitted;
    };

    if scatter.lobe == Lobe::Specular {
        return emitted
            + scatter.attenuation
                * estimate_material_sampled(&scatter.scattered, background, world, depth - 1, rng);
    }

    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scatter.scattered);
    let Some(weight) = sampled_weight(&scatter, scattering_pdf) else {
        return emitted;
    };
    emitted + weight * estimate_material_sampled(&scatter.scattered, background, world, depth - 1, rng)
}

/// Throughput of a material-sampled bounce, or `None` when its density is too
/// small to divide by. Checked before the bounce is traced.
fn sampled_weight(scatter: &ScatterRecord, scattering_pdf: f32) -> Option<Color> {
    if scatter.pdf < PDF_EPSILON {
        return None;
    }
    Some(scatter.attenuation * scattering_pdf / scatter.pdf)
}
