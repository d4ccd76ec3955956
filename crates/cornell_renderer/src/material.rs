//! Surface and volume scattering models.
//!
//! `Material` is a closed set of variants dispatched by `match`. Geometry
//! holds materials behind `Arc` so one instance is shared by every primitive
//! that uses it.

use crate::{hittable::HitRecord, Color, Ray, Texture};
use cornell_math::sampling::{gen_f32, random_cosine_direction, random_in_unit_sphere, random_unit_vector};
use cornell_math::{Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// Shape of the distribution a scattered direction was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lobe {
    /// Diffuse surface: directions on the hemisphere around the normal.
    Hemisphere,
    /// Participating medium: directions on the whole sphere.
    Sphere,
    /// Delta distribution (mirror, glass). The pdf is meaningless.
    Specular,
}

/// Outcome of a successful `scatter`.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    /// Albedo of the surface at the hit point.
    pub attenuation: Color,
    /// Direction sampled from the material's own distribution.
    pub scattered: Ray,
    /// Density of `scattered` under that distribution.
    pub pdf: f32,
    pub lobe: Lobe,
}

/// Lambertian (diffuse) reflector.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Texture,
}

impl Lambertian {
    pub fn new(albedo: impl Into<Texture>) -> Self {
        Self { albedo: albedo.into() }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let uvw = Onb::from_w(rec.normal);
        let direction = uvw.local(random_cosine_direction(rng)).normalize();

        Some(ScatterRecord {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, direction, ray_in.time()),
            pdf: uvw.w().dot(direction) / PI,
            lobe: Lobe::Hemisphere,
        })
    }

    fn scattering_pdf(&self, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cosine = rec.normal.dot(scattered.direction().normalize());
        cosine.max(0.0) / PI
    }
}

/// Area light. Emits on its front face and never scatters.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Texture,
}

impl DiffuseLight {
    pub fn new(emit: impl Into<Texture>) -> Self {
        Self { emit: emit.into() }
    }

    fn emitted(&self, rec: &HitRecord) -> Color {
        if rec.front_face {
            self.emit.value(rec.u, rec.v, rec.p)
        } else {
            Color::ZERO
        }
    }
}

/// Fuzzy mirror.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// `fuzz` is clamped to `[0, 1]`; 0 is a perfect mirror.
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push the ray below the surface; absorb it.
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
            pdf: 0.0,
            lobe: Lobe::Specular,
        })
    }
}

/// Clear dielectric (glass, water).
#[derive(Debug, Clone)]
pub struct Dielectric {
    ior: f32,
}

impl Dielectric {
    /// `ior`: index of refraction (1.0 = air, 1.5 = glass).
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance.
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let direction = if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterRecord {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
            pdf: 0.0,
            lobe: Lobe::Specular,
        })
    }
}

/// Phase function of a constant-density medium: equal scattering in
/// every direction.
#[derive(Debug, Clone)]
pub struct Isotropic {
    albedo: Texture,
}

impl Isotropic {
    pub fn new(albedo: impl Into<Texture>) -> Self {
        Self { albedo: albedo.into() }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_unit_vector(rng), ray_in.time()),
            pdf: UNIFORM_SPHERE_PDF,
            lobe: Lobe::Sphere,
        })
    }
}

const UNIFORM_SPHERE_PDF: f32 = 1.0 / (4.0 * PI);

/// How light interacts with a surface or medium.
#[derive(Debug, Clone)]
pub enum Material {
    Lambertian(Lambertian),
    DiffuseLight(DiffuseLight),
    Metal(Metal),
    Dielectric(Dielectric),
    Isotropic(Isotropic),
}

impl Material {
    /// Light emitted at the hit point. Black for everything but lights.
    pub fn emitted(&self, _ray_in: &Ray, rec: &HitRecord) -> Color {
        match self {
            Material::DiffuseLight(light) => light.emitted(rec),
            _ => Color::ZERO,
        }
    }

    /// Sample a scattered ray from the material's own distribution.
    ///
    /// Returns `None` when the ray is absorbed or the material only emits.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::DiffuseLight(_) => None,
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
            Material::Isotropic(m) => m.scatter(ray_in, rec, rng),
        }
    }

    /// Density of the material's scattering distribution evaluated at
    /// `scattered`. Zero for emitters and delta distributions.
    pub fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        match self {
            Material::Lambertian(m) => m.scattering_pdf(rec, scattered),
            Material::Isotropic(_) => UNIFORM_SPHERE_PDF,
            Material::DiffuseLight(_) | Material::Metal(_) | Material::Dielectric(_) => 0.0,
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<DiffuseLight> for Material {
    fn from(m: DiffuseLight) -> Self {
        Material::DiffuseLight(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

impl From<Isotropic> for Material {
    fn from(m: Isotropic) -> Self {
        Material::Isotropic(m)
    }
}

/// Reflect `v` about the normal `n`.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract unit vector `uv` through a surface with normal `n`.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(material: &Material, normal: Vec3, front_face: bool) -> HitRecord<'_> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            material,
            u: 0.5,
            v: 0.5,
            t: 1.0,
            front_face,
        }
    }

    #[test]
    fn test_lambertian_scatter_pdf_matches_scattering_pdf() {
        let material = Material::from(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
        let rec = record(&material, Vec3::Y, true);
        let ray_in = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y, 0.25);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..100 {
            let scatter = material.scatter(&ray_in, &rec, &mut rng).expect("lambertian scatters");
            assert_eq!(scatter.lobe, Lobe::Hemisphere);
            assert_eq!(scatter.attenuation, Color::splat(0.73));
            assert_eq!(scatter.scattered.time(), 0.25);
            assert!(scatter.scattered.direction().dot(rec.normal) >= 0.0);

            let pdf = material.scattering_pdf(&ray_in, &rec, &scatter.scattered);
            assert!((pdf - scatter.pdf).abs() < 1e-4);
        }
    }

    #[test]
    fn test_lambertian_scattering_pdf_is_clamped_cosine() {
        let material = Material::from(Lambertian::new(Color::ONE));
        let rec = record(&material, Vec3::Y, true);
        let ray_in = Ray::new(Vec3::Y, -Vec3::Y, 0.0);

        let straight_up = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0), 0.0);
        assert!((material.scattering_pdf(&ray_in, &rec, &straight_up) - 1.0 / PI).abs() < 1e-6);

        let below = Ray::new(Vec3::ZERO, -Vec3::Y, 0.0);
        assert_eq!(material.scattering_pdf(&ray_in, &rec, &below), 0.0);
    }

    #[test]
    fn test_diffuse_light_emits_on_front_face_only() {
        let material = Material::from(DiffuseLight::new(Color::splat(15.0)));
        let ray_in = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        let front = record(&material, -Vec3::Y, true);
        assert_eq!(material.emitted(&ray_in, &front), Color::splat(15.0));
        assert!(material.scatter(&ray_in, &front, &mut rng).is_none());

        let back = record(&material, -Vec3::Y, false);
        assert_eq!(material.emitted(&ray_in, &back), Color::ZERO);
    }

    #[test]
    fn test_non_emitters_are_black() {
        let material = Material::from(Lambertian::new(Color::ONE));
        let rec = record(&material, Vec3::Y, true);

        assert_eq!(material.emitted(&Ray::new(Vec3::Y, -Vec3::Y, 0.0), &rec), Color::ZERO);
    }

    #[test]
    fn test_isotropic_is_uniform() {
        let material = Material::from(Isotropic::new(Color::ONE));
        let rec = record(&material, Vec3::X, true);
        let ray_in = Ray::new(Vec3::ZERO, Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(3);

        let scatter = material.scatter(&ray_in, &rec, &mut rng).expect("isotropic scatters");
        assert_eq!(scatter.lobe, Lobe::Sphere);
        assert!((scatter.scattered.direction().length() - 1.0).abs() < 1e-4);

        let any = Ray::new(Vec3::ZERO, -Vec3::X, 0.0);
        assert!((material.scattering_pdf(&ray_in, &rec, &any) - 1.0 / (4.0 * PI)).abs() < 1e-7);
    }

    #[test]
    fn test_perfect_metal_mirrors() {
        let material = Material::from(Metal::new(Color::splat(0.8), 0.0));
        let rec = record(&material, Vec3::Y, true);
        let ray_in = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        let scatter = material.scatter(&ray_in, &rec, &mut rng).expect("mirror reflects");
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((scatter.scattered.direction() - expected).length() < 1e-5);
        assert_eq!(scatter.lobe, Lobe::Specular);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Material::from(Dielectric::new(1.5));
        // Grazing ray from inside the glass.
        let rec = record(&material, Vec3::Y, false);
        let ray_in = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.1, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        let scatter = material.scatter(&ray_in, &rec, &mut rng).expect("glass always scatters");
        assert!(scatter.scattered.direction().y > 0.0);
        assert_eq!(scatter.attenuation, Color::ONE);
    }
}
